/// Backend contract of a GraphicsDevice
///
/// Every backend-specific operation of the device goes through this trait.
/// None of its methods has a default body: a backend that forgets one does
/// not compile.

use glam::Vec4;
use winit::dpi::PhysicalSize;

use crate::error::Result;
use crate::graphics_device::{
    ActiveRenderPass, BlendState, Buffer, BufferKey, Capabilities, Compute, CullMode,
    DepthState, DeviceType, DrawCall, Rect2D, RenderState, RenderTarget, RenderTargetKey,
    StencilParameters, Texture, TextureFormat, TextureKey, Viewport,
};

/// Hardware side of a GraphicsDevice
///
/// Implemented by one type per GPU programming model. State setters receive
/// the requested logical state; implementations compare it with what is bound
/// on the hardware and only issue the calls needed to reach it.
///
/// Any method may return `Error::ContextLost`. The device reacts by entering
/// the lost state instead of surfacing the error.
pub trait DeviceBackend: Send {
    /// Programming model of this backend
    fn device_type(&self) -> DeviceType;

    /// Query limits and feature support
    ///
    /// Called once at device creation and again on every context restore.
    fn query_capabilities(&mut self) -> Result<Capabilities>;

    /// Bind a complete render state, forgetting any cached hardware state
    ///
    /// Called at creation and after a restore.
    fn initialize_render_state(&mut self, state: &RenderState) -> Result<()>;

    // ===== STATE SETTERS =====

    fn set_blend_state(&mut self, state: &BlendState);

    fn set_depth_state(&mut self, state: &DepthState);

    fn set_blend_color(&mut self, color: Vec4);

    /// Set stencil parameters
    ///
    /// # Arguments
    ///
    /// * `front` - Front-face parameters, None together with `back` = stencil disabled
    /// * `back` - Back-face parameters
    fn set_stencil_state(&mut self, front: Option<&StencilParameters>, back: Option<&StencilParameters>);

    fn set_cull_mode(&mut self, mode: CullMode);

    fn set_viewport(&mut self, viewport: &Viewport);

    fn set_scissor(&mut self, scissor: &Rect2D);

    // ===== BACK BUFFER =====

    /// (Re)create the back buffer
    ///
    /// # Arguments
    ///
    /// * `size` - New size in physical pixels
    /// * `format` - Color format of the back buffer
    fn resize_back_buffer(&mut self, size: PhysicalSize<u32>, format: TextureFormat) -> Result<()>;

    // ===== RESOURCES =====

    /// Create the hardware texture for `texture`, uploading its retained data if any
    fn upload_texture(&mut self, key: TextureKey, texture: &Texture) -> Result<()>;

    /// Free the hardware texture. The record stays registered.
    fn release_texture(&mut self, key: TextureKey);

    /// Create the hardware buffer for `buffer` and upload its retained data
    fn upload_buffer(&mut self, key: BufferKey, buffer: &Buffer) -> Result<()>;

    /// Update a range of an uploaded buffer
    ///
    /// # Arguments
    ///
    /// * `key` - Buffer to update
    /// * `offset` - Offset into the buffer in bytes
    /// * `data` - Data to write
    fn write_buffer(&mut self, key: BufferKey, offset: u64, data: &[u8]) -> Result<()>;

    fn release_buffer(&mut self, key: BufferKey);

    /// Build the framebuffer of `target`
    fn init_render_target(&mut self, key: RenderTargetKey, target: &RenderTarget) -> Result<()>;

    fn release_render_target(&mut self, key: RenderTargetKey);

    // ===== PASSES =====

    /// Begin a render pass into `pass.target` (None = back buffer)
    fn start_render_pass(&mut self, pass: &ActiveRenderPass) -> Result<()>;

    fn end_render_pass(&mut self, pass: &ActiveRenderPass) -> Result<()>;

    fn start_compute_pass(&mut self, name: &str) -> Result<()>;

    fn end_compute_pass(&mut self, name: &str) -> Result<()>;

    /// Submit a batch of dispatches as one named unit
    ///
    /// # Arguments
    ///
    /// * `computes` - Dispatches, in submission order
    /// * `name` - Debug name of the batch
    fn compute_dispatch(&mut self, computes: &[Compute], name: &str) -> Result<()>;

    /// Issue one draw inside the current render pass
    fn draw(&mut self, call: &DrawCall) -> Result<()>;
}
