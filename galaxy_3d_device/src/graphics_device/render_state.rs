/// Render state cache
///
/// `RenderState` is the logical fixed-function state of a device: what the
/// application last asked for. Backends keep their own copy of what is bound
/// on the hardware and only issue calls for the differences.

use glam::Vec4;

// ===== RASTERIZATION ENUMS =====

/// Face culling mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullMode {
    /// No culling
    None,
    /// Cull back faces
    Back,
    /// Cull front faces
    Front,
    /// Cull both, only points and lines are rendered
    FrontAndBack,
}

// ===== DEPTH/STENCIL ENUMS =====

/// Comparison operator for depth and stencil tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// Never pass
    Never,
    /// Pass if value < reference
    Less,
    /// Pass if value == reference
    Equal,
    /// Pass if value <= reference
    LessOrEqual,
    /// Pass if value > reference
    Greater,
    /// Pass if value != reference
    NotEqual,
    /// Pass if value >= reference
    GreaterOrEqual,
    /// Always pass
    Always,
}

/// Stencil operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StencilOp {
    /// Keep current value
    Keep,
    /// Set to zero
    Zero,
    /// Replace with reference value
    Replace,
    /// Increment and clamp to max
    IncrementAndClamp,
    /// Decrement and clamp to zero
    DecrementAndClamp,
    /// Bitwise invert
    Invert,
    /// Increment and wrap around
    IncrementAndWrap,
    /// Decrement and wrap around
    DecrementAndWrap,
}

// ===== COLOR BLEND ENUMS =====

/// Blend factor for color blending equations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    DstColor,
    OneMinusDstColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
    ConstantColor,
    OneMinusConstantColor,
    SrcAlphaSaturate,
}

/// Blend operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendOp {
    /// result = src * srcFactor + dst * dstFactor
    Add,
    /// result = src * srcFactor - dst * dstFactor
    Subtract,
    /// result = dst * dstFactor - src * srcFactor
    ReverseSubtract,
    /// result = min(src, dst)
    Min,
    /// result = max(src, dst)
    Max,
}

/// Color write mask
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorWriteMask {
    pub r: bool,
    pub g: bool,
    pub b: bool,
    pub a: bool,
}

impl ColorWriteMask {
    /// All channels enabled
    pub const ALL: Self = Self { r: true, g: true, b: true, a: true };
    /// No channels enabled
    pub const NONE: Self = Self { r: false, g: false, b: false, a: false };
}

impl Default for ColorWriteMask {
    fn default() -> Self {
        Self::ALL
    }
}

// ===== BLEND STATE =====

/// Color blending state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlendState {
    /// Enable blending
    pub blend_enable: bool,
    pub src_color_factor: BlendFactor,
    pub dst_color_factor: BlendFactor,
    pub color_blend_op: BlendOp,
    pub src_alpha_factor: BlendFactor,
    pub dst_alpha_factor: BlendFactor,
    pub alpha_blend_op: BlendOp,
    pub color_write_mask: ColorWriteMask,
}

impl BlendState {
    /// Blending disabled, every channel written
    pub const NO_BLEND: Self = Self {
        blend_enable: false,
        src_color_factor: BlendFactor::One,
        dst_color_factor: BlendFactor::Zero,
        color_blend_op: BlendOp::Add,
        src_alpha_factor: BlendFactor::One,
        dst_alpha_factor: BlendFactor::Zero,
        alpha_blend_op: BlendOp::Add,
        color_write_mask: ColorWriteMask::ALL,
    };

    /// Classic `src * a + dst * (1 - a)`
    pub const ALPHA_BLEND: Self = Self {
        blend_enable: true,
        src_color_factor: BlendFactor::SrcAlpha,
        dst_color_factor: BlendFactor::OneMinusSrcAlpha,
        color_blend_op: BlendOp::Add,
        src_alpha_factor: BlendFactor::One,
        dst_alpha_factor: BlendFactor::OneMinusSrcAlpha,
        alpha_blend_op: BlendOp::Add,
        color_write_mask: ColorWriteMask::ALL,
    };

    /// Additive blending
    pub const ADDITIVE: Self = Self {
        blend_enable: true,
        src_color_factor: BlendFactor::One,
        dst_color_factor: BlendFactor::One,
        color_blend_op: BlendOp::Add,
        src_alpha_factor: BlendFactor::One,
        dst_alpha_factor: BlendFactor::One,
        alpha_blend_op: BlendOp::Add,
        color_write_mask: ColorWriteMask::ALL,
    };
}

impl Default for BlendState {
    fn default() -> Self {
        Self::NO_BLEND
    }
}

// ===== DEPTH STATE =====

/// Depth testing state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthState {
    /// Enable depth testing
    pub test: bool,
    /// Enable writing to depth buffer
    pub write: bool,
    /// Depth comparison operator
    pub func: CompareOp,
}

impl DepthState {
    /// Test and write, `LessOrEqual`
    pub const DEFAULT: Self = Self { test: true, write: true, func: CompareOp::LessOrEqual };
    /// Depth ignored entirely
    pub const NO_DEPTH: Self = Self { test: false, write: false, func: CompareOp::LessOrEqual };
    /// Test without writing
    pub const NO_WRITE: Self = Self { test: true, write: false, func: CompareOp::LessOrEqual };
}

impl Default for DepthState {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ===== STENCIL STATE =====

/// Stencil operation state (per-face)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StencilParameters {
    /// Comparison operator
    pub func: CompareOp,
    /// Reference value for compare/replace
    pub reference: u32,
    /// Bits of stencil buffer read for compare
    pub read_mask: u32,
    /// Bits of stencil buffer written
    pub write_mask: u32,
    /// Action on stencil test fail
    pub fail: StencilOp,
    /// Action on stencil pass + depth fail
    pub depth_fail: StencilOp,
    /// Action on stencil pass + depth pass
    pub pass: StencilOp,
}

impl Default for StencilParameters {
    fn default() -> Self {
        Self {
            func: CompareOp::Always,
            reference: 0,
            read_mask: 0xFF,
            write_mask: 0xFF,
            fail: StencilOp::Keep,
            depth_fail: StencilOp::Keep,
            pass: StencilOp::Keep,
        }
    }
}

// ===== VIEWPORT / SCISSOR =====

/// Viewport
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// 2D rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect2D {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

// ===== RENDER STATE =====

/// Logical fixed-function state of a device
#[derive(Debug, Clone, PartialEq)]
pub struct RenderState {
    pub blend: BlendState,
    pub depth: DepthState,
    pub stencil_enabled: bool,
    pub stencil_front: StencilParameters,
    pub stencil_back: StencilParameters,
    pub cull_mode: CullMode,
    pub viewport: Viewport,
    pub scissor: Rect2D,
    pub blend_color: Vec4,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            blend: BlendState::default(),
            depth: DepthState::default(),
            stencil_enabled: false,
            stencil_front: StencilParameters::default(),
            stencil_back: StencilParameters::default(),
            cull_mode: CullMode::Back,
            viewport: Viewport::default(),
            scissor: Rect2D::default(),
            blend_color: Vec4::ZERO,
        }
    }
}

impl RenderState {
    /// Apply a stencil request.
    ///
    /// Both sides `None` disables stencil testing. Otherwise stencil is enabled
    /// and a missing side falls back to the default parameters.
    pub fn set_stencil(&mut self, front: Option<StencilParameters>, back: Option<StencilParameters>) {
        if front.is_none() && back.is_none() {
            self.stencil_enabled = false;
            return;
        }

        self.stencil_enabled = true;
        self.stencil_front = front.unwrap_or_default();
        self.stencil_back = back.unwrap_or_default();
    }
}

#[cfg(test)]
#[path = "render_state_tests.rs"]
mod tests;
