/// Device creation options

use winit::dpi::PhysicalSize;

/// GPU selection hint passed to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PowerPreference {
    #[default]
    Default,
    LowPower,
    HighPerformance,
}

/// Output range of the back buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayFormat {
    #[default]
    Ldr,
    Hdr,
}

/// Configuration for creating a GraphicsDevice
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// Back buffer has an alpha channel
    pub alpha: bool,
    /// Back buffer has a depth attachment
    pub depth: bool,
    /// Back buffer has a stencil attachment
    pub stencil: bool,
    /// Multisampled back buffer
    pub antialias: bool,
    pub power_preference: PowerPreference,
    /// Requested back buffer range. Falls back to Ldr when no HDR format is renderable.
    pub display_format: DisplayFormat,
    /// Upper bound applied to `device_pixel_ratio` by `resize_canvas`
    pub max_pixel_ratio: f32,
    /// Ratio between physical and logical pixels of the surface
    pub device_pixel_ratio: f32,
    /// Size of the per-frame indirect draw buffer, in draws
    pub max_indirect_draw_count: u32,
    /// Run the attribute validator on draws
    pub enable_validation: bool,
    /// Log every live texture at frame start
    pub trace_textures: bool,
    /// Record pass markers in the GPU profiler
    pub enable_profiler: bool,
    /// Initial canvas size
    pub canvas_size: PhysicalSize<u32>,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            alpha: true,
            depth: true,
            stencil: true,
            antialias: true,
            power_preference: PowerPreference::Default,
            display_format: DisplayFormat::Ldr,
            max_pixel_ratio: 1.0,
            device_pixel_ratio: 1.0,
            max_indirect_draw_count: 1024,
            enable_validation: cfg!(debug_assertions),
            trace_textures: false,
            enable_profiler: false,
            canvas_size: PhysicalSize::new(300, 150),
        }
    }
}
