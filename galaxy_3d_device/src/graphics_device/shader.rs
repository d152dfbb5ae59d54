/// Shader records as seen by the device
///
/// Shading-language compilation lives in the backend; the device only keeps
/// what it needs for attribute validation and destroy notifications.

use slotmap::new_key_type;

new_key_type! {
    /// Stable handle of a shader registered on a GraphicsDevice
    pub struct ShaderKey;
}

/// A vertex input consumed by a shader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderAttribute {
    pub location: u32,
    pub name: String,
}

impl ShaderAttribute {
    pub fn new(location: u32, name: &str) -> Self {
        Self { location, name: name.to_string() }
    }
}

/// Descriptor for creating a shader
#[derive(Debug, Clone, Default)]
pub struct ShaderDesc {
    pub name: String,
    pub attributes: Vec<ShaderAttribute>,
}

#[derive(Debug)]
pub struct Shader {
    desc: ShaderDesc,
}

impl Shader {
    pub(crate) fn new(desc: ShaderDesc) -> Self {
        Self { desc }
    }

    pub fn name(&self) -> &str {
        &self.desc.name
    }

    /// Vertex inputs, in declaration order
    pub fn attributes(&self) -> &[ShaderAttribute] {
        &self.desc.attributes
    }
}
