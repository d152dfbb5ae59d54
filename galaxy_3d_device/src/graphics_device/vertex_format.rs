/// Vertex semantics and vertex layouts
///
/// Every semantic maps to a fixed shader attribute location. The attribute
/// validator compares those locations with what a shader consumes.

use std::fmt;
use crate::graphics_device::BufferFormat;

/// Vertex attribute semantic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Semantic {
    Position,
    Normal,
    Tangent,
    BlendWeight,
    BlendIndices,
    Color,
    /// Texture coordinate set 0..=7
    TexCoord(u8),
    /// Generic attribute 0..=15, aliasing the named semantics
    Attr(u8),
}

impl Semantic {
    /// Shader attribute location bound to this semantic
    pub fn location(&self) -> u32 {
        match self {
            Semantic::Position => 0,
            Semantic::Normal => 1,
            Semantic::Tangent => 2,
            Semantic::BlendWeight => 3,
            Semantic::BlendIndices => 4,
            Semantic::Color => 5,
            Semantic::TexCoord(set) => 6 + (*set as u32).min(7),
            Semantic::Attr(index) => (*index as u32).min(15),
        }
    }
}

impl fmt::Display for Semantic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Semantic::Position => write!(f, "POSITION"),
            Semantic::Normal => write!(f, "NORMAL"),
            Semantic::Tangent => write!(f, "TANGENT"),
            Semantic::BlendWeight => write!(f, "BLENDWEIGHT"),
            Semantic::BlendIndices => write!(f, "BLENDINDICES"),
            Semantic::Color => write!(f, "COLOR"),
            Semantic::TexCoord(set) => write!(f, "TEXCOORD{}", set),
            Semantic::Attr(index) => write!(f, "ATTR{}", index),
        }
    }
}

/// One attribute of an interleaved vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexElement {
    pub semantic: Semantic,
    pub format: BufferFormat,
    /// Byte offset inside the vertex
    pub offset: u32,
}

/// Interleaved vertex layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexFormat {
    elements: Vec<VertexElement>,
    stride: u32,
}

impl VertexFormat {
    /// Build a tightly packed layout, elements in declaration order
    pub fn new(attributes: &[(Semantic, BufferFormat)]) -> Self {
        let mut offset = 0;
        let elements = attributes
            .iter()
            .map(|&(semantic, format)| {
                let element = VertexElement { semantic, format, offset };
                offset += format.size_bytes();
                element
            })
            .collect();

        Self { elements, stride: offset }
    }

    pub fn elements(&self) -> &[VertexElement] {
        &self.elements
    }

    /// Size of one vertex in bytes
    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// Attribute locations this layout provides
    pub fn locations(&self) -> impl Iterator<Item = u32> + '_ {
        self.elements.iter().map(|element| element.semantic.location())
    }
}

impl fmt::Display for VertexFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}:{:?}@{}", element.semantic, element.format, element.offset)?;
        }
        write!(f, "] stride {}", self.stride)
    }
}

#[cfg(test)]
#[path = "vertex_format_tests.rs"]
mod tests;
