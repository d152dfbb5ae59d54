/// Resource registry and VRAM accounting
///
/// Every texture, buffer, render target and shader created through a device
/// lives in one of the slot maps below. Registry membership is the resource's
/// liveness window: the key is valid from creation until destruction.
///
/// VRAM counters always equal the sum of the sizes of the live resources of
/// each category. Context loss and restore never touch them.

use slotmap::SlotMap;
use crate::error::Result;
use crate::graphics_device::{
    Buffer, BufferDesc, BufferKey, BufferUsage, DeviceBackend, RenderTarget, RenderTargetDesc,
    RenderTargetKey, Shader, ShaderDesc, ShaderKey, Texture, TextureDesc, TextureKey,
    TextureProfilerHint,
};

/// Bytes of GPU memory per category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VramUsage {
    /// All textures
    pub tex: u64,
    /// Vertex buffers
    pub vb: u64,
    /// Index buffers
    pub ib: u64,
    /// Uniform buffers
    pub ub: u64,
    /// Storage buffers
    pub sb: u64,
    /// Subset of `tex` tagged `TextureProfilerHint::Asset`
    pub tex_asset: u64,
    /// Subset of `tex` tagged `TextureProfilerHint::Shadow`
    pub tex_shadow: u64,
    /// Subset of `tex` tagged `TextureProfilerHint::Lightmap`
    pub tex_lightmap: u64,
}

impl VramUsage {
    /// Textures plus every buffer category
    pub fn total(&self) -> u64 {
        self.tex + self.vb + self.ib + self.ub + self.sb
    }

    fn buffer_counter(&mut self, usage: BufferUsage) -> &mut u64 {
        match usage {
            BufferUsage::Vertex => &mut self.vb,
            BufferUsage::Index => &mut self.ib,
            BufferUsage::Uniform => &mut self.ub,
            BufferUsage::Storage => &mut self.sb,
        }
    }

    fn texture_hint_counter(&mut self, hint: TextureProfilerHint) -> Option<&mut u64> {
        match hint {
            TextureProfilerHint::None => None,
            TextureProfilerHint::Asset => Some(&mut self.tex_asset),
            TextureProfilerHint::Shadow => Some(&mut self.tex_shadow),
            TextureProfilerHint::Lightmap => Some(&mut self.tex_lightmap),
        }
    }
}

fn charge(counter: &mut u64, bytes: u64) {
    *counter += bytes;
}

fn refund(counter: &mut u64, bytes: u64) {
    debug_assert!(*counter >= bytes, "VRAM counter underflow");
    *counter = counter.saturating_sub(bytes);
}

#[derive(Debug, Default)]
pub struct ResourceRegistry {
    textures: SlotMap<TextureKey, Texture>,
    buffers: SlotMap<BufferKey, Buffer>,
    render_targets: SlotMap<RenderTargetKey, RenderTarget>,
    shaders: SlotMap<ShaderKey, Shader>,
    vram: VramUsage,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vram(&self) -> &VramUsage {
        &self.vram
    }

    // ===== TEXTURES =====

    pub(crate) fn insert_texture(&mut self, desc: TextureDesc) -> TextureKey {
        let texture = Texture::new(desc);
        let size = texture.gpu_size();
        charge(&mut self.vram.tex, size);
        if let Some(counter) = self.vram.texture_hint_counter(texture.desc().profiler_hint) {
            charge(counter, size);
        }
        self.textures.insert(texture)
    }

    pub(crate) fn remove_texture(&mut self, key: TextureKey) -> Option<Texture> {
        let texture = self.textures.remove(key)?;
        let size = texture.gpu_size();
        refund(&mut self.vram.tex, size);
        if let Some(counter) = self.vram.texture_hint_counter(texture.desc().profiler_hint) {
            refund(counter, size);
        }
        Some(texture)
    }

    pub fn texture(&self, key: TextureKey) -> Option<&Texture> {
        self.textures.get(key)
    }

    pub(crate) fn texture_mut(&mut self, key: TextureKey) -> Option<&mut Texture> {
        self.textures.get_mut(key)
    }

    pub fn textures(&self) -> impl Iterator<Item = (TextureKey, &Texture)> {
        self.textures.iter()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    // ===== BUFFERS =====

    pub(crate) fn insert_buffer(&mut self, desc: BufferDesc, data: Option<&[u8]>) -> BufferKey {
        charge(self.vram.buffer_counter(desc.usage), desc.size);
        self.buffers.insert(Buffer::new(desc, data))
    }

    pub(crate) fn remove_buffer(&mut self, key: BufferKey) -> Option<Buffer> {
        let buffer = self.buffers.remove(key)?;
        refund(self.vram.buffer_counter(buffer.usage()), buffer.size());
        Some(buffer)
    }

    pub fn buffer(&self, key: BufferKey) -> Option<&Buffer> {
        self.buffers.get(key)
    }

    pub(crate) fn buffer_mut(&mut self, key: BufferKey) -> Option<&mut Buffer> {
        self.buffers.get_mut(key)
    }

    pub fn buffers(&self) -> impl Iterator<Item = (BufferKey, &Buffer)> {
        self.buffers.iter()
    }

    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    // ===== RENDER TARGETS =====

    pub(crate) fn insert_render_target(&mut self, desc: RenderTargetDesc) -> RenderTargetKey {
        self.render_targets.insert(RenderTarget::new(desc))
    }

    pub(crate) fn remove_render_target(&mut self, key: RenderTargetKey) -> Option<RenderTarget> {
        self.render_targets.remove(key)
    }

    pub fn render_target(&self, key: RenderTargetKey) -> Option<&RenderTarget> {
        self.render_targets.get(key)
    }

    pub(crate) fn render_target_mut(&mut self, key: RenderTargetKey) -> Option<&mut RenderTarget> {
        self.render_targets.get_mut(key)
    }

    pub fn render_target_count(&self) -> usize {
        self.render_targets.len()
    }

    /// Render targets whose framebuffer currently exists
    pub fn initialized_render_target_count(&self) -> usize {
        self.render_targets.values().filter(|t| t.is_initialized()).count()
    }

    // ===== SHADERS =====

    pub(crate) fn insert_shader(&mut self, desc: ShaderDesc) -> ShaderKey {
        self.shaders.insert(Shader::new(desc))
    }

    pub(crate) fn remove_shader(&mut self, key: ShaderKey) -> Option<Shader> {
        self.shaders.remove(key)
    }

    pub fn shader(&self, key: ShaderKey) -> Option<&Shader> {
        self.shaders.get(key)
    }

    pub fn shader_count(&self) -> usize {
        self.shaders.len()
    }

    // ===== CONTEXT LOSS =====

    /// Release the hardware side of every resource, keeping CPU descriptions.
    ///
    /// Resources already marked lost are skipped, so calling this twice is harmless.
    pub(crate) fn lose_context(&mut self, backend: &mut dyn DeviceBackend) {
        for (key, texture) in self.textures.iter_mut().filter(|(_, t)| !t.is_lost()) {
            backend.release_texture(key);
            texture.set_lost(true);
        }
        for (key, buffer) in self.buffers.iter_mut().filter(|(_, b)| !b.is_lost()) {
            backend.release_buffer(key);
            buffer.set_lost(true);
        }
        for (key, target) in self.render_targets.iter_mut().filter(|(_, t)| !t.is_lost()) {
            if target.is_initialized() {
                backend.release_render_target(key);
            }
            target.set_initialized(false);
            target.set_lost(true);
        }
    }

    /// Re-upload every lost buffer and texture from retained data.
    ///
    /// Render targets are only flagged usable again; their framebuffers are
    /// rebuilt by the next `init_render_target`. On error the resources
    /// restored so far stay restored and the rest stay lost.
    pub(crate) fn restore_context(&mut self, backend: &mut dyn DeviceBackend) -> Result<()> {
        for (key, buffer) in self.buffers.iter_mut().filter(|(_, b)| b.is_lost()) {
            backend.upload_buffer(key, buffer)?;
            buffer.set_lost(false);
        }
        for (key, texture) in self.textures.iter_mut().filter(|(_, t)| t.is_lost()) {
            backend.upload_texture(key, texture)?;
            texture.set_lost(false);
        }
        for target in self.render_targets.values_mut() {
            target.set_initialized(false);
            target.set_lost(false);
        }
        Ok(())
    }

    /// Drop every resource and zero the counters
    pub(crate) fn clear(&mut self, backend: &mut dyn DeviceBackend) {
        for (key, texture) in self.textures.drain() {
            if !texture.is_lost() {
                backend.release_texture(key);
            }
        }
        for (key, buffer) in self.buffers.drain() {
            if !buffer.is_lost() {
                backend.release_buffer(key);
            }
        }
        for (key, target) in self.render_targets.drain() {
            if target.is_initialized() {
                backend.release_render_target(key);
            }
        }
        self.shaders.clear();
        self.vram = VramUsage::default();
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
