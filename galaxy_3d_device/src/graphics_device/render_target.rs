/// Offscreen render targets
///
/// A render target is created uninitialized. The hardware framebuffer is built
/// lazily by `GraphicsDevice::init_render_target`, normally when the first pass
/// that renders into it starts, and again after every context restore.

use slotmap::new_key_type;
use crate::graphics_device::TextureFormat;

new_key_type! {
    /// Stable handle of a render target registered on a GraphicsDevice
    pub struct RenderTargetKey;
}

/// Descriptor for creating a render target
#[derive(Debug, Clone)]
pub struct RenderTargetDesc {
    /// Debug name
    pub name: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Color attachment format (None = depth-only target)
    pub color_format: Option<TextureFormat>,
    /// Has a depth attachment
    pub depth: bool,
    /// Has a stencil attachment
    pub stencil: bool,
    /// MSAA sample count (1 = no multisampling)
    pub samples: u32,
}

impl Default for RenderTargetDesc {
    fn default() -> Self {
        Self {
            name: "Untitled".to_string(),
            width: 1,
            height: 1,
            color_format: Some(TextureFormat::R8G8B8A8_UNORM),
            depth: true,
            stencil: false,
            samples: 1,
        }
    }
}

#[derive(Debug)]
pub struct RenderTarget {
    desc: RenderTargetDesc,
    initialized: bool,
    lost: bool,
}

impl RenderTarget {
    pub(crate) fn new(desc: RenderTargetDesc) -> Self {
        Self { desc, initialized: false, lost: false }
    }

    pub fn desc(&self) -> &RenderTargetDesc {
        &self.desc
    }

    pub fn name(&self) -> &str {
        &self.desc.name
    }

    pub fn width(&self) -> u32 {
        self.desc.width
    }

    pub fn height(&self) -> u32 {
        self.desc.height
    }

    /// True once the backend framebuffer exists
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_lost(&self) -> bool {
        self.lost
    }

    pub(crate) fn set_initialized(&mut self, initialized: bool) {
        self.initialized = initialized;
    }

    pub(crate) fn set_lost(&mut self, lost: bool) {
        self.lost = lost;
    }
}
