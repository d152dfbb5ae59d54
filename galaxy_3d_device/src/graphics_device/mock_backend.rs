/// Mock backend for unit tests (no GPU required)
///
/// Records every hardware call it would make. State setters diff against the
/// state they consider bound, like a real backend, so redundant sets do not
/// show up in the call log.

use std::sync::{Arc, Mutex};
use glam::Vec4;
use rustc_hash::FxHashMap;
use winit::dpi::PhysicalSize;

use crate::error::{Error, Result};
use crate::graphics_device::{
    ActiveRenderPass, BlendState, Buffer, BufferKey, Capabilities, Compute, CullMode,
    DepthState, DeviceBackend, DeviceType, DrawCall, PrimitiveTopology, Rect2D, RenderState,
    RenderTarget, RenderTargetKey, ShaderKey, ShaderPrecision, StencilParameters, Texture,
    TextureFormat, TextureKey, Viewport,
};

// ============================================================================
// Recorded calls
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    InitializeRenderState,
    SetBlendState(BlendState),
    SetDepthState(DepthState),
    SetBlendColor(Vec4),
    SetStencilState(Option<StencilParameters>, Option<StencilParameters>),
    SetCullMode(CullMode),
    SetViewport(Viewport),
    SetScissor(Rect2D),
    ResizeBackBuffer(u32, u32, TextureFormat),
    UploadTexture(TextureKey),
    ReleaseTexture(TextureKey),
    UploadBuffer(BufferKey),
    WriteBuffer(BufferKey, u64, usize),
    ReleaseBuffer(BufferKey),
    InitRenderTarget(RenderTargetKey),
    ReleaseRenderTarget(RenderTargetKey),
    StartRenderPass(String, Option<RenderTargetKey>),
    EndRenderPass(String),
    StartComputePass(String),
    EndComputePass(String),
    ComputeDispatch(String, usize),
    Draw {
        topology: PrimitiveTopology,
        count: u32,
        shader: Option<ShaderKey>,
        indirect_slot: Option<u32>,
    },
}

/// Pass-level operations that can be told to fail with `Error::BackendError`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockOp {
    StartRenderPass,
    EndRenderPass,
    StartComputePass,
    EndComputePass,
    ComputeDispatch,
    Draw,
}

// ============================================================================
// Shared state
// ============================================================================

#[derive(Debug)]
pub struct MockState {
    pub calls: Vec<MockCall>,
    /// State considered bound on the hardware
    pub bound: RenderState,
    /// Returned by `query_capabilities`
    pub capabilities: Capabilities,
    pub query_count: u32,
    /// Every fallible call fails with `Error::ContextLost` while set
    pub context_lost: bool,
    /// This operation fails with `Error::BackendError` while set, without being recorded
    pub rejects: Option<MockOp>,
    /// Contents of live hardware buffers
    pub buffers: FxHashMap<BufferKey, Vec<u8>>,
}

impl MockState {
    pub fn count(&self, predicate: impl Fn(&MockCall) -> bool) -> usize {
        self.calls.iter().filter(|call| predicate(call)).count()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

// ============================================================================
// Mock Backend
// ============================================================================

pub struct MockBackend {
    device_type: DeviceType,
    state: Arc<Mutex<MockState>>,
}

impl MockBackend {
    pub fn new(device_type: DeviceType, capabilities: Capabilities) -> Self {
        Self {
            device_type,
            state: Arc::new(Mutex::new(MockState {
                calls: Vec::new(),
                bound: RenderState::default(),
                capabilities,
                query_count: 0,
                context_lost: false,
                rejects: None,
                buffers: FxHashMap::default(),
            })),
        }
    }

    pub fn webgl2() -> Self {
        Self::new(DeviceType::WebGl2, webgl2_capabilities())
    }

    pub fn webgpu() -> Self {
        Self::new(DeviceType::WebGpu, webgpu_capabilities())
    }

    /// Handle kept by the test after the backend moves into the device
    pub fn state(&self) -> Arc<Mutex<MockState>> {
        self.state.clone()
    }

    fn record(&self, call: MockCall) {
        self.state.lock().unwrap().calls.push(call);
    }

    fn live(&self) -> Result<()> {
        if self.state.lock().unwrap().context_lost {
            return Err(Error::ContextLost);
        }
        Ok(())
    }

    fn accept(&self, op: MockOp) -> Result<()> {
        self.live()?;
        if self.state.lock().unwrap().rejects == Some(op) {
            return Err(Error::BackendError(format!("{:?} rejected", op)));
        }
        Ok(())
    }
}

/// Immediate-mode profile: no compute, no indirect draw
pub fn webgl2_capabilities() -> Capabilities {
    Capabilities {
        max_texture_size: 4096,
        max_cube_map_size: 4096,
        max_volume_size: 2048,
        max_texture_layers: 256,
        max_buffer_size: 256 << 20,
        max_color_attachments: 8,
        max_samples: 4,
        max_anisotropy: 16.0,
        samples: 4,
        precision: ShaderPrecision::High,
        supports_compute: false,
        supports_storage_texture_read: false,
        supports_uniform_buffers: true,
        supports_clip_distances: false,
        supports_stencil: true,
        supports_indirect_draw: false,
        texture_float_renderable: true,
        texture_half_float_renderable: true,
        texture_rg11b10_renderable: false,
        texture_float_filterable: false,
    }
}

/// Explicit-pass profile: compute and indirect draw
pub fn webgpu_capabilities() -> Capabilities {
    Capabilities {
        max_texture_size: 8192,
        max_cube_map_size: 8192,
        max_volume_size: 2048,
        max_texture_layers: 256,
        max_buffer_size: 256 << 20,
        max_color_attachments: 8,
        max_samples: 4,
        max_anisotropy: 16.0,
        samples: 4,
        precision: ShaderPrecision::High,
        supports_compute: true,
        supports_storage_texture_read: true,
        supports_uniform_buffers: true,
        supports_clip_distances: true,
        supports_stencil: true,
        supports_indirect_draw: true,
        texture_float_renderable: true,
        texture_half_float_renderable: true,
        texture_rg11b10_renderable: true,
        texture_float_filterable: true,
    }
}

impl DeviceBackend for MockBackend {
    fn device_type(&self) -> DeviceType {
        self.device_type
    }

    fn query_capabilities(&mut self) -> Result<Capabilities> {
        self.live()?;
        let mut state = self.state.lock().unwrap();
        state.query_count += 1;
        Ok(state.capabilities.clone())
    }

    fn initialize_render_state(&mut self, render_state: &RenderState) -> Result<()> {
        self.live()?;
        let mut state = self.state.lock().unwrap();
        state.bound = render_state.clone();
        state.calls.push(MockCall::InitializeRenderState);
        Ok(())
    }

    fn set_blend_state(&mut self, blend: &BlendState) {
        let mut state = self.state.lock().unwrap();
        if state.bound.blend != *blend {
            state.bound.blend = *blend;
            state.calls.push(MockCall::SetBlendState(*blend));
        }
    }

    fn set_depth_state(&mut self, depth: &DepthState) {
        let mut state = self.state.lock().unwrap();
        if state.bound.depth != *depth {
            state.bound.depth = *depth;
            state.calls.push(MockCall::SetDepthState(*depth));
        }
    }

    fn set_blend_color(&mut self, color: Vec4) {
        let mut state = self.state.lock().unwrap();
        if state.bound.blend_color != color {
            state.bound.blend_color = color;
            state.calls.push(MockCall::SetBlendColor(color));
        }
    }

    fn set_stencil_state(&mut self, front: Option<&StencilParameters>, back: Option<&StencilParameters>) {
        let mut state = self.state.lock().unwrap();
        let before = state.bound.clone();
        state.bound.set_stencil(front.copied(), back.copied());
        if state.bound != before {
            state.calls.push(MockCall::SetStencilState(front.copied(), back.copied()));
        }
    }

    fn set_cull_mode(&mut self, mode: CullMode) {
        let mut state = self.state.lock().unwrap();
        if state.bound.cull_mode != mode {
            state.bound.cull_mode = mode;
            state.calls.push(MockCall::SetCullMode(mode));
        }
    }

    fn set_viewport(&mut self, viewport: &Viewport) {
        let mut state = self.state.lock().unwrap();
        if state.bound.viewport != *viewport {
            state.bound.viewport = *viewport;
            state.calls.push(MockCall::SetViewport(*viewport));
        }
    }

    fn set_scissor(&mut self, scissor: &Rect2D) {
        let mut state = self.state.lock().unwrap();
        if state.bound.scissor != *scissor {
            state.bound.scissor = *scissor;
            state.calls.push(MockCall::SetScissor(*scissor));
        }
    }

    fn resize_back_buffer(&mut self, size: PhysicalSize<u32>, format: TextureFormat) -> Result<()> {
        self.live()?;
        self.record(MockCall::ResizeBackBuffer(size.width, size.height, format));
        Ok(())
    }

    fn upload_texture(&mut self, key: TextureKey, _texture: &Texture) -> Result<()> {
        self.live()?;
        self.record(MockCall::UploadTexture(key));
        Ok(())
    }

    fn release_texture(&mut self, key: TextureKey) {
        self.record(MockCall::ReleaseTexture(key));
    }

    fn upload_buffer(&mut self, key: BufferKey, buffer: &Buffer) -> Result<()> {
        self.live()?;
        let mut state = self.state.lock().unwrap();
        state.buffers.insert(key, buffer.data().to_vec());
        state.calls.push(MockCall::UploadBuffer(key));
        Ok(())
    }

    fn write_buffer(&mut self, key: BufferKey, offset: u64, data: &[u8]) -> Result<()> {
        self.live()?;
        let mut state = self.state.lock().unwrap();
        if let Some(contents) = state.buffers.get_mut(&key) {
            let start = offset as usize;
            contents[start..start + data.len()].copy_from_slice(data);
        }
        state.calls.push(MockCall::WriteBuffer(key, offset, data.len()));
        Ok(())
    }

    fn release_buffer(&mut self, key: BufferKey) {
        let mut state = self.state.lock().unwrap();
        state.buffers.remove(&key);
        state.calls.push(MockCall::ReleaseBuffer(key));
    }

    fn init_render_target(&mut self, key: RenderTargetKey, _target: &RenderTarget) -> Result<()> {
        self.live()?;
        self.record(MockCall::InitRenderTarget(key));
        Ok(())
    }

    fn release_render_target(&mut self, key: RenderTargetKey) {
        self.record(MockCall::ReleaseRenderTarget(key));
    }

    fn start_render_pass(&mut self, pass: &ActiveRenderPass) -> Result<()> {
        self.accept(MockOp::StartRenderPass)?;
        self.record(MockCall::StartRenderPass(pass.name.clone(), pass.target));
        Ok(())
    }

    fn end_render_pass(&mut self, pass: &ActiveRenderPass) -> Result<()> {
        self.accept(MockOp::EndRenderPass)?;
        self.record(MockCall::EndRenderPass(pass.name.clone()));
        Ok(())
    }

    fn start_compute_pass(&mut self, name: &str) -> Result<()> {
        self.accept(MockOp::StartComputePass)?;
        self.record(MockCall::StartComputePass(name.to_string()));
        Ok(())
    }

    fn end_compute_pass(&mut self, name: &str) -> Result<()> {
        self.accept(MockOp::EndComputePass)?;
        self.record(MockCall::EndComputePass(name.to_string()));
        Ok(())
    }

    fn compute_dispatch(&mut self, computes: &[Compute], name: &str) -> Result<()> {
        self.accept(MockOp::ComputeDispatch)?;
        self.record(MockCall::ComputeDispatch(name.to_string(), computes.len()));
        Ok(())
    }

    fn draw(&mut self, call: &DrawCall) -> Result<()> {
        self.accept(MockOp::Draw)?;
        self.record(MockCall::Draw {
            topology: call.primitive.topology,
            count: call.primitive.count,
            shader: call.shader.map(|(key, _)| key),
            indirect_slot: call.options.indirect_slot,
        });
        Ok(())
    }
}
