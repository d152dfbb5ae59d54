/// Graphics device module - the device, its backend contract and resource types

// Module declarations
pub mod graphics_device;
pub mod backend;
pub mod capabilities;
pub mod config;
pub mod render_state;
pub mod texture;
pub mod buffer;
pub mod vertex_format;
pub mod shader;
pub mod render_target;
pub mod registry;
pub mod pass;
pub mod frame_cache;
pub mod events;
pub mod scope;
pub mod attribute_validator;
pub mod profiler;

// Re-export everything from graphics_device.rs
pub use graphics_device::*;

// Re-export from other modules
pub use backend::*;
pub use capabilities::*;
pub use config::*;
pub use render_state::*;
pub use texture::*;
pub use buffer::*;
pub use vertex_format::*;
pub use shader::*;
pub use render_target::*;
pub use registry::*;
pub use pass::*;
pub use frame_cache::*;
pub use events::*;
pub use scope::*;
pub use attribute_validator::*;
pub use profiler::*;

// Mock backend for tests (no GPU required)
#[cfg(test)]
pub mod mock_backend;
