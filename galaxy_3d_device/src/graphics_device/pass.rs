/// Render pass, compute pass and draw call descriptions

use bitflags::bitflags;
use crate::graphics_device::{BufferKey, RenderTargetKey, Shader, ShaderKey, VertexFormat};

// ===== CLEAR OPTIONS =====

bitflags! {
    /// Attachments cleared at the start of a render pass
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClearFlags: u32 {
        const COLOR = 1 << 0;
        const DEPTH = 1 << 1;
        const STENCIL = 1 << 2;
    }
}

/// Clear values applied when a render pass starts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearOptions {
    pub color: [f32; 4],
    pub depth: f32,
    pub stencil: u32,
    pub flags: ClearFlags,
}

impl Default for ClearOptions {
    fn default() -> Self {
        Self {
            color: [0.0, 0.0, 0.0, 1.0],
            depth: 1.0,
            stencil: 0,
            flags: ClearFlags::COLOR | ClearFlags::DEPTH,
        }
    }
}

// ===== PASSES =====

/// Parameters of `GraphicsDevice::start_render_pass`
#[derive(Debug, Clone, Default)]
pub struct RenderPassDesc {
    /// Debug and profiler name
    pub name: String,
    /// None = load previous contents
    pub clear: Option<ClearOptions>,
}

impl RenderPassDesc {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string(), clear: None }
    }

    pub fn with_clear(mut self, clear: ClearOptions) -> Self {
        self.clear = Some(clear);
        self
    }
}

/// The render pass between `start_render_pass` and `end_render_pass`
#[derive(Debug, Clone)]
pub struct ActiveRenderPass {
    pub name: String,
    /// Render target captured at start (None = back buffer)
    pub target: Option<RenderTargetKey>,
    pub clear: Option<ClearOptions>,
    /// Index of the pass within the frame
    pub index: u32,
    /// False when the pass was opened (or survived) while the context was lost
    pub submitted: bool,
}

#[derive(Debug, Clone)]
pub struct ActiveComputePass {
    pub name: String,
    pub submitted: bool,
}

// ===== DRAW =====

/// Primitive topology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveTopology {
    PointList,
    LineList,
    LineLoop,
    LineStrip,
    TriangleList,
    TriangleStrip,
    TriangleFan,
}

impl PrimitiveTopology {
    pub const COUNT: usize = 7;

    /// Stable index, used by the per-topology statistics
    pub fn index(&self) -> usize {
        match self {
            PrimitiveTopology::PointList => 0,
            PrimitiveTopology::LineList => 1,
            PrimitiveTopology::LineLoop => 2,
            PrimitiveTopology::LineStrip => 3,
            PrimitiveTopology::TriangleList => 4,
            PrimitiveTopology::TriangleStrip => 5,
            PrimitiveTopology::TriangleFan => 6,
        }
    }
}

/// Index buffer element type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexType {
    /// 16-bit indices (max 65535 vertices)
    U16,
    /// 32-bit indices
    U32,
}

impl IndexType {
    /// Size in bytes of one index element
    pub fn size_bytes(&self) -> u32 {
        match self {
            IndexType::U16 => 2,
            IndexType::U32 => 4,
        }
    }
}

/// A range of vertices or indices to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Primitive {
    pub topology: PrimitiveTopology,
    /// First vertex (or first index when indexed)
    pub base: u32,
    pub count: u32,
    pub indexed: bool,
}

impl Primitive {
    pub fn triangles(count: u32) -> Self {
        Self { topology: PrimitiveTopology::TriangleList, base: 0, count, indexed: false }
    }
}

/// Optional parameters of `GraphicsDevice::draw`
#[derive(Debug, Clone, Copy)]
pub struct DrawOptions {
    pub index_buffer: Option<(BufferKey, IndexType)>,
    pub instances: u32,
    /// Slot from `get_indirect_draw_slot`; draw arguments come from the indirect buffer
    pub indirect_slot: Option<u32>,
    /// First draw of a batch sharing the same state
    pub first: bool,
    /// Last draw of a batch sharing the same state
    pub last: bool,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            index_buffer: None,
            instances: 1,
            indirect_slot: None,
            first: true,
            last: true,
        }
    }
}

/// Everything a backend needs to issue one draw
#[derive(Debug, Clone, Copy)]
pub struct DrawCall<'a> {
    pub primitive: Primitive,
    pub options: DrawOptions,
    pub shader: Option<(ShaderKey, &'a Shader)>,
    pub vertex_buffers: &'a [(BufferKey, Option<&'a VertexFormat>)],
    pub indirect_buffer: Option<BufferKey>,
}

// ===== COMPUTE =====

/// One compute dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compute {
    pub name: String,
    pub shader: ShaderKey,
    pub workgroups: [u32; 3],
}

impl Compute {
    pub fn new(name: &str, shader: ShaderKey, workgroups: [u32; 3]) -> Self {
        Self { name: name.to_string(), shader, workgroups }
    }
}

#[cfg(test)]
#[path = "pass_tests.rs"]
mod tests;
