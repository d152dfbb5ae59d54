/// GraphicsDevice - one per rendering surface
///
/// Owns the backend and everything the backend needs to be driven safely:
/// capability table, logical render state, resource registry with VRAM
/// accounting, frame and pass bracketing, and the context loss/restore state
/// machine.
///
/// Programmer errors (nested passes, draws outside a pass, ending a pass that
/// was never started) panic. Invalid arguments return `Error`. A backend that
/// reports `Error::ContextLost` puts the device into the lost state; the call
/// itself then succeeds as a no-op.

use std::cmp::Reverse;
use std::time::{Duration, Instant};
use glam::Vec2;
use glam::Vec4;
use winit::dpi::{LogicalSize, PhysicalSize};

use crate::error::{Error, Result};
use crate::graphics_device::{
    ActiveComputePass, ActiveRenderPass, AttributeMismatch, AttributeValidator, BlendState,
    BufferDesc, BufferFormat, BufferKey, BufferUsage, Capabilities, CapsDefines, ClearOptions,
    Compute, CullMode, DepthState, DeviceBackend, DeviceConfig, DeviceEvent, DeviceEventKind,
    DeviceType, DisplayFormat, DrawCall, DrawOptions, EventDispatcher, FrameCache, FrameStats,
    GpuProfiler, ListenerKey, PassKind, Primitive, Rect2D, RenderPassDesc, RenderState,
    RenderTargetDesc, RenderTargetKey, ResourceRegistry, ScopeId, ScopeSpace, Semantic,
    ShaderDesc, ShaderKey, StencilParameters, TextureDesc, TextureFormat, TextureKey,
    UniformValue, VertexFormat, Viewport, VramUsage,
};
use crate::utils::SlotAllocator;
use crate::{engine_bail, engine_debug, engine_err, engine_error, engine_info, engine_warn};

const SOURCE: &str = "galaxy3d::Device";

/// Bytes of one indexed indirect draw record (5 x u32)
pub const INDIRECT_DRAW_STRIDE: u64 = 20;

/// Shader, first and second vertex buffer of a validated draw
type ValidationKey = (ShaderKey, Option<BufferKey>, Option<BufferKey>);

pub struct GraphicsDevice {
    backend: Box<dyn DeviceBackend>,
    device_type: DeviceType,
    config: DeviceConfig,

    // Capabilities
    capabilities: Capabilities,
    caps_defines: CapsDefines,

    // Logical state
    render_state: RenderState,
    render_target: Option<RenderTargetKey>,
    vertex_buffers: Vec<BufferKey>,
    shader: Option<ShaderKey>,

    registry: ResourceRegistry,

    // Surface
    canvas_size: PhysicalSize<u32>,
    /// None until created, and after a context loss
    back_buffer_size: Option<PhysicalSize<u32>>,
    back_buffer_format: TextureFormat,
    is_hdr: bool,
    client_rect: LogicalSize<f64>,

    // Frame
    render_version: u64,
    frame_generation: u64,
    render_pass_index: u32,
    active_render_pass: Option<ActiveRenderPass>,
    active_compute_pass: Option<ActiveComputePass>,
    stats: FrameStats,
    indirect_slots: SlotAllocator,

    context_lost: bool,
    destroyed: bool,

    scope: ScopeSpace,
    texture_bias: ScopeId,

    events: EventDispatcher,
    profiler: GpuProfiler,
    validator: AttributeValidator,
    validated: FrameCache<ValidationKey, ()>,
    debug_markers: Vec<String>,

    quad_vertex_buffer: Option<BufferKey>,
    indirect_draw_buffer: Option<BufferKey>,
    render_target_creation_time: Duration,
    default_clear_options: ClearOptions,
}

impl GraphicsDevice {
    /// Create a device on top of `backend`
    ///
    /// Queries capabilities, binds the default render state and creates the
    /// built-in buffers (full-screen quad, indirect draw arguments).
    ///
    /// # Arguments
    ///
    /// * `backend` - Hardware implementation for this surface
    /// * `config` - Creation options
    pub fn new(mut backend: Box<dyn DeviceBackend>, config: DeviceConfig) -> Result<Self> {
        let device_type = backend.device_type();
        let capabilities = backend.query_capabilities().map_err(|e| {
            Error::InitializationFailed(format!("capability query failed: {}", e))
        })?;
        let render_state = RenderState::default();
        backend.initialize_render_state(&render_state).map_err(|e| {
            Error::InitializationFailed(format!("render state initialization failed: {}", e))
        })?;

        let (back_buffer_format, is_hdr) = Self::select_back_buffer_format(device_type, &capabilities, &config);

        let mut scope = ScopeSpace::new("Device");
        let texture_bias = scope.resolve("textureBias");
        scope.set_value(texture_bias, UniformValue::Float(0.0));

        let canvas_size = config.canvas_size;
        let mut device = Self {
            backend,
            device_type,
            caps_defines: CapsDefines::from_capabilities(&capabilities),
            capabilities,
            render_state,
            render_target: None,
            vertex_buffers: Vec::new(),
            shader: None,
            registry: ResourceRegistry::new(),
            canvas_size,
            back_buffer_size: None,
            back_buffer_format,
            is_hdr,
            client_rect: LogicalSize::new(canvas_size.width as f64, canvas_size.height as f64),
            render_version: 0,
            frame_generation: 0,
            render_pass_index: 0,
            active_render_pass: None,
            active_compute_pass: None,
            stats: FrameStats::default(),
            indirect_slots: SlotAllocator::with_limit(config.max_indirect_draw_count),
            context_lost: false,
            destroyed: false,
            scope,
            texture_bias,
            events: EventDispatcher::new(),
            profiler: GpuProfiler::new(config.enable_profiler),
            validator: AttributeValidator::new(),
            validated: FrameCache::new(),
            debug_markers: Vec::new(),
            quad_vertex_buffer: None,
            indirect_draw_buffer: None,
            render_target_creation_time: Duration::ZERO,
            default_clear_options: ClearOptions::default(),
            config,
        };
        device.post_init()?;

        engine_info!(
            SOURCE,
            "{:?} device created ({}x{}, back buffer {:?})",
            device.device_type,
            device.canvas_size.width,
            device.canvas_size.height,
            device.back_buffer_format
        );
        Ok(device)
    }

    fn select_back_buffer_format(
        device_type: DeviceType,
        capabilities: &Capabilities,
        config: &DeviceConfig,
    ) -> (TextureFormat, bool) {
        if config.display_format == DisplayFormat::Hdr {
            let hdr = capabilities.renderable_hdr_format(
                device_type,
                &[TextureFormat::R16G16B16A16_SFLOAT],
                false,
                1,
            );
            if let Some(format) = hdr {
                return (format, true);
            }
            engine_warn!(SOURCE, "HDR display format requested but not renderable, using LDR");
        }

        let ldr = match device_type {
            DeviceType::WebGpu => TextureFormat::B8G8R8A8_UNORM,
            DeviceType::WebGl2 => TextureFormat::R8G8B8A8_UNORM,
        };
        (ldr, false)
    }

    /// Create the built-in buffers
    fn post_init(&mut self) -> Result<()> {
        let quad = [
            Vec2::new(-1.0, -1.0),
            Vec2::new(1.0, -1.0),
            Vec2::new(-1.0, 1.0),
            Vec2::new(1.0, 1.0),
        ];
        let data: &[u8] = bytemuck::cast_slice(&quad);
        let quad_buffer = self.create_buffer(
            BufferDesc {
                name: "QuadVertexBuffer".to_string(),
                usage: BufferUsage::Vertex,
                size: data.len() as u64,
                vertex_format: Some(VertexFormat::new(&[(Semantic::Position, BufferFormat::R32G32_SFLOAT)])),
            },
            Some(data),
        )?;
        self.quad_vertex_buffer = Some(quad_buffer);

        if self.capabilities.supports_indirect_draw {
            let indirect = self.create_buffer(
                BufferDesc {
                    name: "IndirectDrawBuffer".to_string(),
                    usage: BufferUsage::Storage,
                    size: self.config.max_indirect_draw_count as u64 * INDIRECT_DRAW_STRIDE,
                    vertex_format: None,
                },
                None,
            )?;
            self.indirect_draw_buffer = Some(indirect);
        }
        Ok(())
    }

    /// Enter the lost state if `result` reports a context loss.
    fn absorb_context_loss(&mut self, result: Result<()>) -> Result<()> {
        match result {
            Err(Error::ContextLost) => {
                self.lose_context();
                Ok(())
            }
            other => other,
        }
    }

    // ===== CAPABILITIES =====

    pub fn device_type(&self) -> DeviceType {
        self.device_type
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn caps_defines(&self) -> CapsDefines {
        self.caps_defines
    }

    /// First format of `candidates` usable as an HDR render target
    ///
    /// Returns None when no candidate qualifies. An empty slice qualifies nothing.
    pub fn get_renderable_hdr_format(
        &self,
        candidates: &[TextureFormat],
        filterable: bool,
        samples: u32,
    ) -> Option<TextureFormat> {
        self.capabilities.renderable_hdr_format(self.device_type, candidates, filterable, samples)
    }

    /// First usable format of `B10G11R11_UFLOAT`, `R16G16B16A16_SFLOAT`, `R32G32B32A32_SFLOAT`
    pub fn get_default_renderable_hdr_format(&self, filterable: bool, samples: u32) -> Option<TextureFormat> {
        self.capabilities.default_renderable_hdr_format(self.device_type, filterable, samples)
    }

    /// Same as `get_renderable_hdr_format`, failing with `Error::UnsupportedFeature`
    pub fn require_renderable_hdr_format(
        &self,
        candidates: &[TextureFormat],
        filterable: bool,
        samples: u32,
    ) -> Result<TextureFormat> {
        self.get_renderable_hdr_format(candidates, filterable, samples).ok_or_else(|| {
            Error::UnsupportedFeature(format!(
                "no renderable HDR format (filterable: {}, samples: {})",
                filterable, samples
            ))
        })
    }

    // ===== RENDER STATE =====

    pub fn render_state(&self) -> &RenderState {
        &self.render_state
    }

    pub fn set_blend_state(&mut self, blend: BlendState) {
        self.render_state.blend = blend;
        if !self.context_lost {
            self.backend.set_blend_state(&blend);
        }
    }

    pub fn set_depth_state(&mut self, depth: DepthState) {
        self.render_state.depth = depth;
        if !self.context_lost {
            self.backend.set_depth_state(&depth);
        }
    }

    pub fn set_blend_color(&mut self, color: Vec4) {
        self.render_state.blend_color = color;
        if !self.context_lost {
            self.backend.set_blend_color(color);
        }
    }

    /// Set stencil parameters per face
    ///
    /// `(None, None)` disables stencil testing. Any `Some` enables it, the
    /// missing side getting `StencilParameters::default()`.
    pub fn set_stencil_state(&mut self, front: Option<StencilParameters>, back: Option<StencilParameters>) {
        self.render_state.set_stencil(front, back);
        if !self.context_lost {
            self.backend.set_stencil_state(front.as_ref(), back.as_ref());
        }
    }

    pub fn set_cull_mode(&mut self, mode: CullMode) {
        self.render_state.cull_mode = mode;
        if !self.context_lost {
            self.backend.set_cull_mode(mode);
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.render_state.viewport = viewport;
        if !self.context_lost {
            self.backend.set_viewport(&viewport);
        }
    }

    pub fn set_scissor(&mut self, scissor: Rect2D) {
        self.render_state.scissor = scissor;
        if !self.context_lost {
            self.backend.set_scissor(&scissor);
        }
    }

    /// Render target of the next render pass (None = back buffer)
    pub fn set_render_target(&mut self, target: Option<RenderTargetKey>) {
        self.render_target = target;
    }

    pub fn render_target(&self) -> Option<RenderTargetKey> {
        self.render_target
    }

    /// Bind `buffer` to the next vertex stream
    pub fn set_vertex_buffer(&mut self, buffer: BufferKey) -> Result<()> {
        match self.registry.buffer(buffer) {
            Some(b) if b.usage() == BufferUsage::Vertex => {
                self.vertex_buffers.push(buffer);
                Ok(())
            }
            Some(b) => Err(engine_err!(SOURCE, "Buffer '{}' is not a vertex buffer", b.name())),
            None => Err(engine_err!(SOURCE, "Unknown vertex buffer {:?}", buffer)),
        }
    }

    pub fn clear_vertex_buffers(&mut self) {
        self.vertex_buffers.clear();
    }

    pub fn vertex_buffers(&self) -> &[BufferKey] {
        &self.vertex_buffers
    }

    pub fn set_shader(&mut self, shader: ShaderKey) -> Result<()> {
        if self.registry.shader(shader).is_none() {
            engine_bail!(SOURCE, "Unknown shader {:?}", shader);
        }
        if self.shader != Some(shader) {
            self.shader = Some(shader);
            self.stats.shader_switches += 1;
        }
        Ok(())
    }

    pub fn shader(&self) -> Option<ShaderKey> {
        self.shader
    }

    fn initialize_render_state(&mut self) -> Result<()> {
        self.render_state = RenderState::default();
        self.backend.initialize_render_state(&self.render_state)
    }

    fn initialize_context_caches(&mut self) {
        self.vertex_buffers.clear();
        self.shader = None;
        self.render_target = None;
    }

    // ===== RESOURCES =====

    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    /// Bytes of GPU memory per category
    pub fn vram(&self) -> &VramUsage {
        self.registry.vram()
    }

    /// Register a texture and create its hardware counterpart
    ///
    /// While the context is lost the texture is only registered; it gets
    /// uploaded by the next `restore_context`.
    pub fn create_texture(&mut self, desc: TextureDesc) -> Result<TextureKey> {
        if desc.width == 0 || desc.height == 0 {
            engine_bail!(SOURCE, "Texture '{}' has a zero dimension ({}x{})", desc.name, desc.width, desc.height);
        }
        let max = if desc.cubemap {
            self.capabilities.max_cube_map_size
        } else {
            self.capabilities.max_texture_size
        };
        if desc.width > max || desc.height > max {
            engine_bail!(SOURCE, "Texture '{}' exceeds the maximum size {} ({}x{})", desc.name, max, desc.width, desc.height);
        }
        let full_chain = desc.full_mip_chain();
        if desc.mip_levels > full_chain {
            engine_bail!(SOURCE, "Texture '{}' requests {} mip levels, a {}x{} chain has {}", desc.name, desc.mip_levels, desc.width, desc.height, full_chain);
        }
        if desc.array_layers > self.capabilities.max_texture_layers {
            engine_bail!(SOURCE, "Texture '{}' has {} array layers, the limit is {}", desc.name, desc.array_layers, self.capabilities.max_texture_layers);
        }

        let key = self.registry.insert_texture(desc);
        if self.context_lost {
            self.mark_texture_lost(key);
            return Ok(key);
        }

        let result = match self.registry.texture(key) {
            Some(texture) => self.backend.upload_texture(key, texture),
            None => Ok(()),
        };
        match result {
            Ok(()) => Ok(key),
            Err(Error::ContextLost) => {
                self.mark_texture_lost(key);
                self.lose_context();
                Ok(key)
            }
            Err(e) => {
                self.registry.remove_texture(key);
                Err(e)
            }
        }
    }

    fn mark_texture_lost(&mut self, key: TextureKey) {
        if let Some(texture) = self.registry.texture_mut(key) {
            texture.set_lost(true);
        }
    }

    /// Unregister a texture. Returns false if the key is not live.
    pub fn destroy_texture(&mut self, key: TextureKey) -> bool {
        match self.registry.remove_texture(key) {
            Some(texture) => {
                if !texture.is_lost() {
                    self.backend.release_texture(key);
                }
                true
            }
            None => false,
        }
    }

    /// Register a buffer and upload `data` (zero-filled when None)
    pub fn create_buffer(&mut self, desc: BufferDesc, data: Option<&[u8]>) -> Result<BufferKey> {
        if desc.size == 0 {
            engine_bail!(SOURCE, "Buffer '{}' has zero size", desc.name);
        }
        if desc.size > self.capabilities.max_buffer_size {
            engine_error!(SOURCE, "Buffer '{}' of {} bytes exceeds max_buffer_size {}", desc.name, desc.size, self.capabilities.max_buffer_size);
            return Err(Error::OutOfMemory);
        }
        if let Some(bytes) = data {
            if bytes.len() as u64 > desc.size {
                engine_bail!(SOURCE, "Buffer '{}': {} bytes of data for a {} byte buffer", desc.name, bytes.len(), desc.size);
            }
        }

        let key = self.registry.insert_buffer(desc, data);
        if self.context_lost {
            self.mark_buffer_lost(key);
            return Ok(key);
        }

        let result = match self.registry.buffer(key) {
            Some(buffer) => self.backend.upload_buffer(key, buffer),
            None => Ok(()),
        };
        match result {
            Ok(()) => Ok(key),
            Err(Error::ContextLost) => {
                self.mark_buffer_lost(key);
                self.lose_context();
                Ok(key)
            }
            Err(e) => {
                self.registry.remove_buffer(key);
                Err(e)
            }
        }
    }

    fn mark_buffer_lost(&mut self, key: BufferKey) {
        if let Some(buffer) = self.registry.buffer_mut(key) {
            buffer.set_lost(true);
        }
    }

    /// Update part of a buffer
    ///
    /// The retained copy is always updated; the hardware buffer only when the
    /// context is live. A lost buffer picks the new contents up on restore.
    pub fn write_buffer(&mut self, key: BufferKey, offset: u64, data: &[u8]) -> Result<()> {
        let buffer = self
            .registry
            .buffer_mut(key)
            .ok_or_else(|| engine_err!(SOURCE, "Unknown buffer {:?}", key))?;
        if !buffer.write(offset, data) {
            let (name, size) = (buffer.name().to_string(), buffer.size());
            engine_bail!(SOURCE, "Write of {} bytes at offset {} overflows buffer '{}' ({} bytes)", data.len(), offset, name, size);
        }
        if self.context_lost || buffer.is_lost() {
            return Ok(());
        }

        let result = self.backend.write_buffer(key, offset, data);
        self.absorb_context_loss(result)
    }

    /// Unregister a buffer. Returns false if the key is not live.
    pub fn destroy_buffer(&mut self, key: BufferKey) -> bool {
        match self.registry.remove_buffer(key) {
            Some(buffer) => {
                if !buffer.is_lost() {
                    self.backend.release_buffer(key);
                }
                self.vertex_buffers.retain(|b| *b != key);
                true
            }
            None => false,
        }
    }

    /// Register a render target. Its framebuffer is built on first use.
    pub fn create_render_target(&mut self, desc: RenderTargetDesc) -> Result<RenderTargetKey> {
        if desc.width == 0 || desc.height == 0 {
            engine_bail!(SOURCE, "Render target '{}' has a zero dimension ({}x{})", desc.name, desc.width, desc.height);
        }
        if desc.color_format.is_none() && !desc.depth {
            engine_bail!(SOURCE, "Render target '{}' has no attachment", desc.name);
        }
        if desc.samples > self.capabilities.max_samples {
            engine_bail!(SOURCE, "Render target '{}' requests {} samples, device supports {}", desc.name, desc.samples, self.capabilities.max_samples);
        }

        let key = self.registry.insert_render_target(desc);
        if self.context_lost {
            if let Some(target) = self.registry.render_target_mut(key) {
                target.set_lost(true);
            }
        }
        Ok(key)
    }

    /// Unregister a render target. Returns false if the key is not live.
    pub fn destroy_render_target(&mut self, key: RenderTargetKey) -> bool {
        match self.registry.remove_render_target(key) {
            Some(target) => {
                if target.is_initialized() {
                    self.backend.release_render_target(key);
                }
                if self.render_target == Some(key) {
                    self.render_target = None;
                }
                true
            }
            None => false,
        }
    }

    /// Build the framebuffer of `key` if it does not exist yet
    ///
    /// Idempotent. Fires `RenderTargetCreated` and accumulates the time spent
    /// in `render_target_creation_time`. Deferred while the context is lost.
    pub fn init_render_target(&mut self, key: RenderTargetKey) -> Result<()> {
        let target = self
            .registry
            .render_target(key)
            .ok_or_else(|| engine_err!(SOURCE, "Unknown render target {:?}", key))?;
        if target.is_initialized() || self.context_lost {
            return Ok(());
        }

        let start = Instant::now();
        let result = self.backend.init_render_target(key, target);
        match result {
            Ok(()) => {
                let elapsed = start.elapsed();
                if let Some(target) = self.registry.render_target_mut(key) {
                    target.set_initialized(true);
                }
                self.render_target_creation_time += elapsed;
                self.events.fire(&DeviceEvent::RenderTargetCreated { target: key, elapsed });
                Ok(())
            }
            Err(Error::ContextLost) => {
                self.lose_context();
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Total time spent building render target framebuffers
    pub fn render_target_creation_time(&self) -> Duration {
        self.render_target_creation_time
    }

    pub fn create_shader(&mut self, desc: ShaderDesc) -> ShaderKey {
        self.registry.insert_shader(desc)
    }

    /// Unregister a shader and fire `ShaderDestroyed`. Returns false if the key is not live.
    pub fn destroy_shader(&mut self, key: ShaderKey) -> bool {
        if self.registry.remove_shader(key).is_none() {
            return false;
        }
        if self.shader == Some(key) {
            self.shader = None;
        }
        self.events.fire(&DeviceEvent::ShaderDestroyed(key));
        true
    }

    // ===== FRAME =====

    /// Begin a frame
    ///
    /// Resets the pass index, per-frame statistics and indirect draw slots,
    /// bumps the render version and (re)creates the back buffer when its size
    /// does not match the canvas.
    pub fn frame_start(&mut self) -> Result<()> {
        self.render_pass_index = 0;
        self.render_version += 1;
        self.indirect_slots.reset();
        self.stats = FrameStats::default();
        self.profiler.frame_start();

        if !self.context_lost && self.back_buffer_size != Some(self.canvas_size) {
            let result = self.backend.resize_back_buffer(self.canvas_size, self.back_buffer_format);
            if result.is_ok() {
                self.back_buffer_size = Some(self.canvas_size);
                engine_debug!(SOURCE, "Back buffer {}x{}", self.canvas_size.width, self.canvas_size.height);
            }
            self.absorb_context_loss(result)?;
        }

        if self.config.trace_textures {
            self.trace_textures();
        }
        Ok(())
    }

    /// End a frame. Every per-frame cache keyed on `frame_generation` expires.
    pub fn frame_end(&mut self) {
        if let Some(pass) = &self.active_render_pass {
            engine_warn!(SOURCE, "frame_end while render pass '{}' is still open", pass.name);
        }
        if let Some(pass) = &self.active_compute_pass {
            engine_warn!(SOURCE, "frame_end while compute pass '{}' is still open", pass.name);
        }
        self.frame_generation += 1;
    }

    fn trace_textures(&self) {
        let mut textures: Vec<_> = self.registry.textures().map(|(_, t)| t).collect();
        textures.sort_by_key(|t| Reverse(t.gpu_size()));

        engine_debug!(SOURCE, "{} textures, {} bytes", textures.len(), self.vram().tex);
        for texture in textures {
            let desc = texture.desc();
            engine_debug!(
                SOURCE,
                "  {} {}x{} {:?} mips {} {} bytes{}",
                desc.name,
                desc.width,
                desc.height,
                desc.format,
                desc.mip_levels,
                texture.gpu_size(),
                if texture.is_lost() { " (lost)" } else { "" }
            );
        }
    }

    pub fn render_version(&self) -> u64 {
        self.render_version
    }

    /// Incremented by every `frame_end`
    pub fn frame_generation(&self) -> u64 {
        self.frame_generation
    }

    /// Number of render passes started this frame
    pub fn render_pass_index(&self) -> u32 {
        self.render_pass_index
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    pub fn profiler(&self) -> &GpuProfiler {
        &self.profiler
    }

    pub fn profiler_mut(&mut self) -> &mut GpuProfiler {
        &mut self.profiler
    }

    // ===== PASSES =====

    /// Begin a render pass into the current render target
    ///
    /// # Panics
    ///
    /// If a render or compute pass is already open.
    pub fn start_render_pass(&mut self, desc: &RenderPassDesc) -> Result<()> {
        if let Some(active) = &self.active_render_pass {
            panic!("start_render_pass('{}') while render pass '{}' is open", desc.name, active.name);
        }
        if let Some(active) = &self.active_compute_pass {
            panic!("start_render_pass('{}') while compute pass '{}' is open", desc.name, active.name);
        }

        let target = self.render_target;
        if let Some(key) = target {
            self.init_render_target(key)?;
        }

        let pass = ActiveRenderPass {
            name: desc.name.clone(),
            target,
            clear: desc.clear,
            index: self.render_pass_index,
            submitted: !self.context_lost,
        };

        let result = if pass.submitted {
            self.backend.start_render_pass(&pass)
        } else {
            Ok(())
        };
        match result {
            Ok(()) => {
                if pass.submitted {
                    self.profiler.mark(PassKind::Render, &pass.name);
                }
                self.render_pass_index += 1;
                self.active_render_pass = Some(pass);
                Ok(())
            }
            Err(Error::ContextLost) => {
                self.render_pass_index += 1;
                self.active_render_pass = Some(pass);
                self.lose_context();
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// End the current render pass
    ///
    /// # Panics
    ///
    /// If no render pass is open.
    pub fn end_render_pass(&mut self) -> Result<()> {
        let Some(pass) = self.active_render_pass.take() else {
            panic!("end_render_pass called outside of a render pass");
        };
        if !pass.submitted {
            return Ok(());
        }
        let result = self.backend.end_render_pass(&pass);
        self.absorb_context_loss(result)
    }

    /// True strictly between `start_render_pass` and `end_render_pass`
    pub fn inside_render_pass(&self) -> bool {
        self.active_render_pass.is_some()
    }

    pub fn active_render_pass(&self) -> Option<&ActiveRenderPass> {
        self.active_render_pass.as_ref()
    }

    fn require_compute(&self) -> Result<()> {
        if self.capabilities.supports_compute {
            Ok(())
        } else {
            Err(Error::UnsupportedFeature(format!("compute shaders on {:?}", self.device_type)))
        }
    }

    /// Begin a compute pass
    ///
    /// # Panics
    ///
    /// If a render or compute pass is already open.
    pub fn start_compute_pass(&mut self, name: &str) -> Result<()> {
        self.require_compute()?;
        if let Some(active) = &self.active_render_pass {
            panic!("start_compute_pass('{}') inside render pass '{}'", name, active.name);
        }
        if let Some(active) = &self.active_compute_pass {
            panic!("start_compute_pass('{}') while compute pass '{}' is open", name, active.name);
        }

        let submitted = !self.context_lost;
        let result = if submitted {
            self.backend.start_compute_pass(name)
        } else {
            Ok(())
        };
        self.active_compute_pass = Some(ActiveComputePass { name: name.to_string(), submitted });
        match result {
            Ok(()) => {
                if submitted {
                    self.profiler.mark(PassKind::Compute, name);
                }
                Ok(())
            }
            Err(Error::ContextLost) => {
                self.lose_context();
                Ok(())
            }
            Err(e) => {
                self.active_compute_pass = None;
                Err(e)
            }
        }
    }

    /// End the current compute pass
    ///
    /// # Panics
    ///
    /// If no compute pass is open.
    pub fn end_compute_pass(&mut self) -> Result<()> {
        let Some(pass) = self.active_compute_pass.take() else {
            panic!("end_compute_pass called outside of a compute pass");
        };
        if !pass.submitted {
            return Ok(());
        }
        let result = self.backend.end_compute_pass(&pass.name);
        self.absorb_context_loss(result)
    }

    pub fn inside_compute_pass(&self) -> bool {
        self.active_compute_pass.is_some()
    }

    /// Submit a batch of dispatches as one named unit
    ///
    /// Runs inside the current compute pass, or inside a pass opened and
    /// closed around the batch when none is active.
    ///
    /// # Panics
    ///
    /// If called inside a render pass.
    pub fn compute_dispatch(&mut self, computes: &[Compute], name: &str) -> Result<()> {
        self.require_compute()?;
        if let Some(active) = &self.active_render_pass {
            panic!("compute_dispatch('{}') inside render pass '{}'", name, active.name);
        }
        if computes.is_empty() {
            return Ok(());
        }

        let own_pass = self.active_compute_pass.is_none();
        if own_pass {
            self.start_compute_pass(name)?;
        }

        let submitted = self.active_compute_pass.as_ref().is_some_and(|p| p.submitted);
        let mut result = Ok(());
        if submitted {
            let dispatched = self.backend.compute_dispatch(computes, name);
            if dispatched.is_ok() {
                self.profiler.mark(PassKind::Dispatch, name);
            }
            result = self.absorb_context_loss(dispatched);
        }

        // The pass opened here is closed even when the dispatch failed
        if own_pass {
            let closed = self.end_compute_pass();
            result = result.and(closed);
        }
        result
    }

    // ===== DRAW =====

    /// Draw with the current shader, vertex buffers and render state
    ///
    /// No-op while the context is lost.
    ///
    /// # Panics
    ///
    /// If called outside of a render pass.
    pub fn draw(&mut self, primitive: Primitive, options: DrawOptions) -> Result<()> {
        let Some(pass) = &self.active_render_pass else {
            panic!("draw called outside of a render pass");
        };
        if !pass.submitted || self.context_lost {
            return Ok(());
        }

        if self.config.enable_validation {
            self.validate_bound_attributes();
        }

        let result = {
            let shader = self
                .shader
                .and_then(|key| self.registry.shader(key).map(|shader| (key, shader)));
            let vertex_buffers: Vec<(BufferKey, Option<&VertexFormat>)> = self
                .vertex_buffers
                .iter()
                .filter_map(|&key| self.registry.buffer(key).map(|b| (key, b.vertex_format())))
                .collect();
            let call = DrawCall {
                primitive,
                options,
                shader,
                vertex_buffers: &vertex_buffers,
                indirect_buffer: options.indirect_slot.and(self.indirect_draw_buffer),
            };
            self.backend.draw(&call)
        };

        if result.is_ok() {
            self.stats.record_draw(primitive.topology, primitive.count, options.instances);
        }
        self.absorb_context_loss(result)
    }

    // ===== VALIDATION =====

    /// Check the attributes `shader` consumes against two vertex buffers
    ///
    /// Debug builds only. Each distinct mismatch is logged once, with the
    /// current debug-marker path. Never affects rendering.
    pub fn validate_attributes(
        &mut self,
        shader: ShaderKey,
        vb0: Option<BufferKey>,
        vb1: Option<BufferKey>,
    ) -> Vec<AttributeMismatch> {
        let Some(shader) = self.registry.shader(shader) else {
            return Vec::new();
        };
        let context = self.debug_markers.join("/");
        self.validator.validate(
            shader,
            vertex_format_of(&self.registry, vb0),
            vertex_format_of(&self.registry, vb1),
            &context,
        )
    }

    /// Validate the bound shader and vertex buffers, once per combination per frame
    fn validate_bound_attributes(&mut self) {
        let Some(shader) = self.shader else {
            return;
        };
        let key = (shader, self.vertex_buffers.first().copied(), self.vertex_buffers.get(1).copied());
        if self.validated.get(self.frame_generation, &key).is_some() {
            return;
        }
        self.validated.insert(self.frame_generation, key, ());
        self.validate_attributes(key.0, key.1, key.2);
    }

    /// Open a debug marker, reported as context by the attribute validator
    pub fn push_marker(&mut self, name: &str) {
        self.debug_markers.push(name.to_string());
    }

    pub fn pop_marker(&mut self) {
        if self.debug_markers.pop().is_none() {
            engine_warn!(SOURCE, "pop_marker without matching push_marker");
        }
    }

    pub fn debug_markers(&self) -> &[String] {
        &self.debug_markers
    }

    // ===== CONTEXT LOSS =====

    /// Enter the lost state
    ///
    /// Releases the hardware side of every tracked resource and invalidates
    /// the back buffer. An open pass stays open but no longer reaches the
    /// backend. Calling this while already lost does nothing.
    pub fn lose_context(&mut self) {
        if self.context_lost {
            return;
        }
        engine_warn!(SOURCE, "Context lost");

        self.context_lost = true;
        self.back_buffer_size = None;
        if let Some(pass) = &mut self.active_render_pass {
            pass.submitted = false;
        }
        if let Some(pass) = &mut self.active_compute_pass {
            pass.submitted = false;
        }
        self.registry.lose_context(self.backend.as_mut());
        self.profiler.lose_context();
    }

    /// Leave the lost state
    ///
    /// Re-queries capabilities, rebuilds the render state and caps defines,
    /// resets the context caches and re-uploads every buffer and texture.
    /// If the backend fails (typically by losing the context again) the device
    /// is put back into the lost state and the error returned; a later call
    /// retries.
    pub fn restore_context(&mut self) -> Result<()> {
        if !self.context_lost {
            return Ok(());
        }
        engine_info!(SOURCE, "Restoring context");

        self.context_lost = false;
        match self.rebuild_context() {
            Ok(()) => {
                self.profiler.restore_context();
                engine_info!(SOURCE, "Context restored");
                Ok(())
            }
            Err(e) => {
                engine_warn!(SOURCE, "Context restore failed: {}", e);
                self.lose_context();
                Err(e)
            }
        }
    }

    fn rebuild_context(&mut self) -> Result<()> {
        self.capabilities = self.backend.query_capabilities()?;
        self.caps_defines = CapsDefines::from_capabilities(&self.capabilities);
        self.initialize_render_state()?;
        self.initialize_context_caches();
        self.registry.restore_context(self.backend.as_mut())
    }

    pub fn is_context_lost(&self) -> bool {
        self.context_lost
    }

    // ===== SURFACE =====

    /// Resize the canvas from a logical size
    ///
    /// The size is scaled by `min(max_pixel_ratio, device_pixel_ratio)` and
    /// floored. `set_resolution` only runs when the result differs from the
    /// current canvas size.
    pub fn resize_canvas(&mut self, width: u32, height: u32) {
        let ratio = self.config.max_pixel_ratio.min(self.config.device_pixel_ratio) as f64;
        let width = (width as f64 * ratio).floor() as u32;
        let height = (height as f64 * ratio).floor() as u32;
        if width != self.canvas_size.width || height != self.canvas_size.height {
            self.set_resolution(width, height);
        }
    }

    /// Set the canvas size in physical pixels and fire `Resize`
    ///
    /// The back buffer is recreated by the next `frame_start`.
    pub fn set_resolution(&mut self, width: u32, height: u32) {
        self.canvas_size = PhysicalSize::new(width, height);
        self.events.fire(&DeviceEvent::Resize { width, height });
    }

    pub fn canvas_size(&self) -> PhysicalSize<u32> {
        self.canvas_size
    }

    pub fn back_buffer_size(&self) -> Option<PhysicalSize<u32>> {
        self.back_buffer_size
    }

    pub fn back_buffer_format(&self) -> TextureFormat {
        self.back_buffer_format
    }

    pub fn is_hdr(&self) -> bool {
        self.is_hdr
    }

    pub fn max_pixel_ratio(&self) -> f32 {
        self.config.max_pixel_ratio
    }

    pub fn set_max_pixel_ratio(&mut self, ratio: f32) {
        self.config.max_pixel_ratio = ratio;
    }

    pub fn device_pixel_ratio(&self) -> f32 {
        self.config.device_pixel_ratio
    }

    pub fn set_device_pixel_ratio(&mut self, ratio: f32) {
        self.config.device_pixel_ratio = ratio;
    }

    /// Logical size of the surface
    pub fn client_rect(&self) -> LogicalSize<f64> {
        self.client_rect
    }

    pub fn update_client_rect(&mut self, rect: LogicalSize<f64>) {
        self.client_rect = rect;
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    pub fn default_clear_options(&self) -> &ClearOptions {
        &self.default_clear_options
    }

    pub fn set_default_clear_options(&mut self, clear: ClearOptions) {
        self.default_clear_options = clear;
    }

    // ===== SCOPE =====

    pub fn scope(&self) -> &ScopeSpace {
        &self.scope
    }

    pub fn scope_mut(&mut self) -> &mut ScopeSpace {
        &mut self.scope
    }

    /// Id of the `textureBias` scope variable
    pub fn texture_bias(&self) -> ScopeId {
        self.texture_bias
    }

    // ===== EVENTS =====

    pub fn subscribe<F>(&mut self, kind: DeviceEventKind, listener: F) -> ListenerKey
    where
        F: FnMut(&DeviceEvent) + Send + 'static,
    {
        self.events.subscribe(kind, listener)
    }

    pub fn unsubscribe(&mut self, key: ListenerKey) -> bool {
        self.events.unsubscribe(key)
    }

    // ===== INDIRECT DRAW =====

    /// Reserve an argument record in the indirect draw buffer for this frame
    ///
    /// Returns 0 on devices without indirect draw support.
    ///
    /// # Panics
    ///
    /// If more than `max_indirect_draw_count` slots are requested in one frame.
    pub fn get_indirect_draw_slot(&mut self) -> u32 {
        if !self.capabilities.supports_indirect_draw {
            return 0;
        }
        let Some(slot) = self.indirect_slots.alloc() else {
            panic!(
                "indirect draw slot request exceeds max_indirect_draw_count {}",
                self.indirect_slots.limit()
            );
        };
        slot
    }

    /// None on devices without indirect draw support
    pub fn indirect_draw_buffer(&self) -> Option<BufferKey> {
        self.indirect_draw_buffer
    }

    /// Full-screen quad, four `POSITION` vertices as a triangle strip
    pub fn quad_vertex_buffer(&self) -> Option<BufferKey> {
        self.quad_vertex_buffer
    }

    // ===== DESTROY =====

    /// Fire `Destroy` and release every resource
    ///
    /// Runs once; called automatically on drop.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;

        self.events.fire(&DeviceEvent::Destroy);

        self.active_render_pass = None;
        self.active_compute_pass = None;
        self.quad_vertex_buffer = None;
        self.indirect_draw_buffer = None;
        self.initialize_context_caches();
        self.registry.clear(self.backend.as_mut());

        engine_info!(SOURCE, "{:?} device destroyed", self.device_type);
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

impl Drop for GraphicsDevice {
    fn drop(&mut self) {
        self.destroy();
    }
}

fn vertex_format_of(registry: &ResourceRegistry, key: Option<BufferKey>) -> Option<&VertexFormat> {
    key.and_then(|k| registry.buffer(k)).and_then(|b| b.vertex_format())
}

#[cfg(test)]
#[path = "graphics_device_tests.rs"]
mod tests;
