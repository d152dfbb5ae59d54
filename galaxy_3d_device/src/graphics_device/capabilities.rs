/// Device capability table
///
/// Queried from the backend once at construction and again on every context
/// restore. Never mutated mid-frame.

use bitflags::bitflags;
use crate::graphics_device::TextureFormat;

/// Programming model of the backend behind a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceType {
    /// Immediate-mode raster API
    WebGl2,
    /// Explicit-pass API
    WebGpu,
}

/// Highest float precision available in fragment shaders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShaderPrecision {
    #[default]
    High,
    Medium,
    Low,
}

/// HDR formats tried by `default_renderable_hdr_format`, best first
pub const DEFAULT_HDR_FORMATS: [TextureFormat; 3] = [
    TextureFormat::B10G11R11_UFLOAT,
    TextureFormat::R16G16B16A16_SFLOAT,
    TextureFormat::R32G32B32A32_SFLOAT,
];

/// Capability flags and limits reported by a backend
#[derive(Debug, Clone, PartialEq)]
pub struct Capabilities {
    pub max_texture_size: u32,
    pub max_cube_map_size: u32,
    pub max_volume_size: u32,
    /// Array layers of a 2D array texture
    pub max_texture_layers: u32,
    /// Largest buffer `create_buffer` accepts, in bytes
    pub max_buffer_size: u64,
    pub max_color_attachments: u32,
    /// Maximum MSAA sample count for render targets
    pub max_samples: u32,
    pub max_anisotropy: f32,
    /// Samples of the back buffer
    pub samples: u32,
    pub precision: ShaderPrecision,

    pub supports_compute: bool,
    pub supports_storage_texture_read: bool,
    pub supports_uniform_buffers: bool,
    pub supports_clip_distances: bool,
    pub supports_stencil: bool,
    pub supports_indirect_draw: bool,

    pub texture_float_renderable: bool,
    pub texture_half_float_renderable: bool,
    pub texture_rg11b10_renderable: bool,
    pub texture_float_filterable: bool,
}

impl Default for Capabilities {
    /// Conservative minimum: small limits, no optional feature.
    fn default() -> Self {
        Self {
            max_texture_size: 2048,
            max_cube_map_size: 1024,
            max_volume_size: 256,
            max_texture_layers: 256,
            max_buffer_size: 256 << 20,
            max_color_attachments: 1,
            max_samples: 1,
            max_anisotropy: 1.0,
            samples: 1,
            precision: ShaderPrecision::High,
            supports_compute: false,
            supports_storage_texture_read: false,
            supports_uniform_buffers: false,
            supports_clip_distances: false,
            supports_stencil: false,
            supports_indirect_draw: false,
            texture_float_renderable: false,
            texture_half_float_renderable: false,
            texture_rg11b10_renderable: false,
            texture_float_filterable: false,
        }
    }
}

impl Capabilities {
    /// First candidate that can be rendered to with these capabilities.
    ///
    /// Only 32-bit float has a filterability requirement. On `WebGpu`, 32-bit
    /// float is never returned for multisampled targets. None when no
    /// candidate qualifies, including for an empty `candidates` slice.
    pub fn renderable_hdr_format(
        &self,
        device_type: DeviceType,
        candidates: &[TextureFormat],
        filterable: bool,
        samples: u32,
    ) -> Option<TextureFormat> {
        candidates.iter().copied().find(|format| match format {
            TextureFormat::B10G11R11_UFLOAT => self.texture_rg11b10_renderable,
            TextureFormat::R16G16B16A16_SFLOAT => self.texture_half_float_renderable,
            TextureFormat::R32G32B32A32_SFLOAT => {
                if device_type == DeviceType::WebGpu && samples > 1 {
                    return false;
                }
                self.texture_float_renderable && (!filterable || self.texture_float_filterable)
            }
            _ => false,
        })
    }

    /// `renderable_hdr_format` over [`DEFAULT_HDR_FORMATS`]
    pub fn default_renderable_hdr_format(
        &self,
        device_type: DeviceType,
        filterable: bool,
        samples: u32,
    ) -> Option<TextureFormat> {
        self.renderable_hdr_format(device_type, &DEFAULT_HDR_FORMATS, filterable, samples)
    }
}

bitflags! {
    /// Capability-derived shader defines
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CapsDefines: u32 {
        const CAPS_TEXTURE_FLOAT_FILTERABLE = 1 << 0;
        const CAPS_TEXTURE_FLOAT_RENDERABLE = 1 << 1;
    }
}

impl CapsDefines {
    pub fn from_capabilities(caps: &Capabilities) -> Self {
        let mut defines = CapsDefines::empty();
        defines.set(CapsDefines::CAPS_TEXTURE_FLOAT_FILTERABLE, caps.texture_float_filterable);
        defines.set(CapsDefines::CAPS_TEXTURE_FLOAT_RENDERABLE, caps.texture_float_renderable);
        defines
    }

    /// Define names, as injected into shader sources
    pub fn names(&self) -> Vec<&'static str> {
        self.iter_names().map(|(name, _)| name).collect()
    }
}

#[cfg(test)]
#[path = "capabilities_tests.rs"]
mod tests;
