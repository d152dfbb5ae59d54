/// Texture formats, texture descriptor, and the device-side texture record

use slotmap::new_key_type;

new_key_type! {
    /// Stable handle of a texture registered on a GraphicsDevice.
    ///
    /// The key stays valid until `destroy_texture` is called with it.
    pub struct TextureKey;
}

/// Texture pixel format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum TextureFormat {
    // LDR color formats
    R8G8B8A8_UNORM,
    R8G8B8A8_SRGB,
    B8G8R8A8_UNORM,
    B8G8R8A8_SRGB,
    R8G8B8_UNORM,

    // HDR color formats
    B10G11R11_UFLOAT,
    R16G16B16A16_SFLOAT,
    R32G32B32A32_SFLOAT,
    R32_SFLOAT,

    // Depth / stencil formats
    D16_UNORM,
    D32_FLOAT,
    D24_UNORM_S8_UINT,
}

impl TextureFormat {
    /// Size of one texel in bytes
    pub fn bytes_per_pixel(&self) -> u32 {
        match self {
            TextureFormat::R8G8B8_UNORM => 3,
            TextureFormat::R8G8B8A8_UNORM
            | TextureFormat::R8G8B8A8_SRGB
            | TextureFormat::B8G8R8A8_UNORM
            | TextureFormat::B8G8R8A8_SRGB
            | TextureFormat::B10G11R11_UFLOAT
            | TextureFormat::R32_SFLOAT
            | TextureFormat::D32_FLOAT
            | TextureFormat::D24_UNORM_S8_UINT => 4,
            TextureFormat::R16G16B16A16_SFLOAT => 8,
            TextureFormat::R32G32B32A32_SFLOAT => 16,
            TextureFormat::D16_UNORM => 2,
        }
    }

    /// True for depth and depth/stencil formats
    pub fn is_depth(&self) -> bool {
        matches!(
            self,
            TextureFormat::D16_UNORM | TextureFormat::D32_FLOAT | TextureFormat::D24_UNORM_S8_UINT
        )
    }

    /// True if the format carries a stencil component
    pub fn has_stencil(&self) -> bool {
        matches!(self, TextureFormat::D24_UNORM_S8_UINT)
    }
}

/// Which VRAM sub-counter a texture is charged to, on top of the texture total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextureProfilerHint {
    #[default]
    None,
    /// Loaded from an asset
    Asset,
    /// Shadow map
    Shadow,
    /// Baked lightmap
    Lightmap,
}

// ===== TEXTURE DESC =====

/// Descriptor for creating a texture
///
/// The descriptor and its optional pixel data are retained by the device for
/// the whole lifetime of the texture so it can be rebuilt after a context loss.
#[derive(Debug, Clone)]
pub struct TextureDesc {
    /// Debug name
    pub name: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Number of array layers (1 = simple 2D texture)
    pub array_layers: u32,
    /// Number of mip levels (at least 1)
    pub mip_levels: u32,
    /// Six faces per layer when true
    pub cubemap: bool,
    /// Pixel format
    pub format: TextureFormat,
    /// VRAM profiling category
    pub profiler_hint: TextureProfilerHint,
    /// Optional pixel data for the base level
    pub data: Option<Vec<u8>>,
}

impl Default for TextureDesc {
    fn default() -> Self {
        Self {
            name: "Untitled".to_string(),
            width: 4,
            height: 4,
            array_layers: 1,
            mip_levels: 1,
            cubemap: false,
            format: TextureFormat::R8G8B8A8_UNORM,
            profiler_hint: TextureProfilerHint::None,
            data: None,
        }
    }
}

impl TextureDesc {
    /// Levels down to 1x1: `floor(log2(max(width, height))) + 1`
    pub fn full_mip_chain(&self) -> u32 {
        u32::BITS - self.width.max(self.height).max(1).leading_zeros()
    }

    /// Bytes occupied by the full mip chain of all layers and faces.
    ///
    /// Saturates at `u64::MAX`.
    pub fn gpu_size(&self) -> u64 {
        let faces: u64 = if self.cubemap { 6 } else { 1 };
        let layers = self.array_layers.max(1) as u64;
        let bpp = self.format.bytes_per_pixel() as u64;

        let chain = (0..self.mip_levels.max(1).min(u32::BITS))
            .map(|level| {
                let w = (self.width >> level).max(1) as u64;
                let h = (self.height >> level).max(1) as u64;
                w.saturating_mul(h).saturating_mul(bpp)
            })
            .fold(0u64, u64::saturating_add);

        chain.saturating_mul(layers).saturating_mul(faces)
    }
}

// ===== TEXTURE RECORD =====

/// A texture tracked by the device.
///
/// Application code refers to it through its [`TextureKey`]; the record keeps
/// the CPU-side description needed to recreate the hardware texture.
#[derive(Debug)]
pub struct Texture {
    desc: TextureDesc,
    gpu_size: u64,
    lost: bool,
}

impl Texture {
    pub(crate) fn new(desc: TextureDesc) -> Self {
        let gpu_size = desc.gpu_size();
        Self { desc, gpu_size, lost: false }
    }

    /// Creation descriptor (including retained data)
    pub fn desc(&self) -> &TextureDesc {
        &self.desc
    }

    /// Debug name
    pub fn name(&self) -> &str {
        &self.desc.name
    }

    /// Bytes charged to the VRAM counters
    pub fn gpu_size(&self) -> u64 {
        self.gpu_size
    }

    /// True while the hardware texture is released because of a context loss
    pub fn is_lost(&self) -> bool {
        self.lost
    }

    pub(crate) fn set_lost(&mut self, lost: bool) {
        self.lost = lost;
    }
}

#[cfg(test)]
#[path = "texture_tests.rs"]
mod tests;
