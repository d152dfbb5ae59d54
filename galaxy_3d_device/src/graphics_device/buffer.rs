/// Buffer usage, buffer formats, buffer descriptor and the device-side buffer record

use slotmap::new_key_type;
use crate::graphics_device::VertexFormat;

new_key_type! {
    /// Stable handle of a buffer registered on a GraphicsDevice
    pub struct BufferKey;
}

/// Buffer usage. Selects the VRAM counter the buffer is charged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferUsage {
    /// Vertex buffer
    Vertex,
    /// Index buffer
    Index,
    /// Uniform/constant buffer
    Uniform,
    /// Storage buffer
    Storage,
}

/// Buffer data format for vertex attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum BufferFormat {
    // Float formats
    R32_SFLOAT,         // float (4 bytes)
    R32G32_SFLOAT,      // vec2 (8 bytes)
    R32G32B32_SFLOAT,   // vec3 (12 bytes)
    R32G32B32A32_SFLOAT, // vec4 (16 bytes)

    // Half formats
    R16G16_SFLOAT,
    R16G16B16A16_SFLOAT,

    // Byte formats
    R8G8B8A8_UNORM,
    R8G8B8A8_UINT,
}

impl BufferFormat {
    /// Returns size in bytes for this format
    pub fn size_bytes(&self) -> u32 {
        match self {
            BufferFormat::R32_SFLOAT => 4,
            BufferFormat::R32G32_SFLOAT => 8,
            BufferFormat::R32G32B32_SFLOAT => 12,
            BufferFormat::R32G32B32A32_SFLOAT => 16,
            BufferFormat::R16G16_SFLOAT => 4,
            BufferFormat::R16G16B16A16_SFLOAT => 8,
            BufferFormat::R8G8B8A8_UNORM | BufferFormat::R8G8B8A8_UINT => 4,
        }
    }
}

/// Descriptor for creating a buffer
#[derive(Debug, Clone)]
pub struct BufferDesc {
    /// Debug name
    pub name: String,
    /// Buffer usage
    pub usage: BufferUsage,
    /// Size in bytes
    pub size: u64,
    /// Vertex layout, only meaningful for `BufferUsage::Vertex`
    pub vertex_format: Option<VertexFormat>,
}

/// A buffer tracked by the device.
///
/// The device keeps a CPU copy of the contents (`data`); that copy is what gets
/// re-uploaded when the context is restored.
#[derive(Debug)]
pub struct Buffer {
    desc: BufferDesc,
    data: Vec<u8>,
    lost: bool,
}

impl Buffer {
    /// Builds the record. `initial` is truncated or zero-padded to `desc.size`.
    pub(crate) fn new(desc: BufferDesc, initial: Option<&[u8]>) -> Self {
        let mut data = vec![0u8; desc.size as usize];
        if let Some(bytes) = initial {
            let len = bytes.len().min(data.len());
            data[..len].copy_from_slice(&bytes[..len]);
        }
        Self { desc, data, lost: false }
    }

    pub fn desc(&self) -> &BufferDesc {
        &self.desc
    }

    pub fn name(&self) -> &str {
        &self.desc.name
    }

    pub fn usage(&self) -> BufferUsage {
        self.desc.usage
    }

    pub fn size(&self) -> u64 {
        self.desc.size
    }

    pub fn vertex_format(&self) -> Option<&VertexFormat> {
        self.desc.vertex_format.as_ref()
    }

    /// Retained CPU copy of the buffer contents
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn is_lost(&self) -> bool {
        self.lost
    }

    pub(crate) fn set_lost(&mut self, lost: bool) {
        self.lost = lost;
    }

    /// Copy `bytes` into the retained data at `offset`.
    ///
    /// Returns false without writing anything when the range does not fit.
    pub(crate) fn write(&mut self, offset: u64, bytes: &[u8]) -> bool {
        let start = offset as usize;
        let end = match start.checked_add(bytes.len()) {
            Some(end) if end <= self.data.len() => end,
            _ => return false,
        };
        self.data[start..end].copy_from_slice(bytes);
        true
    }
}

#[cfg(test)]
#[path = "buffer_tests.rs"]
mod tests;
