/*!
# Galaxy 3D Device

Device abstraction layer of the Galaxy 3D engine.

A [`GraphicsDevice`](galaxy3d::GraphicsDevice) sits between the renderer and a
GPU programming model. The same device code drives an immediate-mode raster
backend and an explicit-pass backend through the
[`DeviceBackend`](galaxy3d::device::DeviceBackend) trait.

## Architecture

- **GraphicsDevice**: frame and pass lifecycle, render state cache, context loss/restore
- **DeviceBackend**: hardware contract implemented once per backend
- **ResourceRegistry**: live textures, buffers, render targets and shaders, VRAM counters
- **Capabilities**: feature table and HDR format negotiation
- **ScopeSpace**: named shader variables
- **AttributeValidator**: debug check of shader inputs against vertex layouts

Resources are referred to by stable slot-map keys (`TextureKey`, `BufferKey`, ...).
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod graphics_device;
pub mod utils;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine services (logger)
    pub use crate::engine::Engine;

    // The device
    pub use crate::graphics_device::GraphicsDevice;

    // Logging sub-module (types only)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger, format_entry};
    }

    // Device sub-module with all device types
    pub mod device {
        pub use crate::graphics_device::*;
    }
}

// Re-export math and window-size types used in the public API
pub use glam;
pub use winit::dpi;
