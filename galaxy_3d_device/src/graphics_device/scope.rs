/// Named shader-variable namespace
///
/// Names resolve once to a stable `ScopeId`; values are then set through the
/// id. Each variable carries a version bumped on every set, so consumers can
/// tell whether an uploaded copy is stale.

use glam::{Mat4, Vec2, Vec3, Vec4};
use rustc_hash::FxHashMap;
use crate::graphics_device::TextureKey;

/// Handle of a resolved scope variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(u32);

impl ScopeId {
    pub fn index(&self) -> u32 {
        self.0
    }
}

/// Value of a scope variable
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Int(i32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat4(Mat4),
    FloatArray(Vec<f32>),
    Texture(TextureKey),
}

#[derive(Debug)]
struct ScopeVariable {
    name: String,
    value: Option<UniformValue>,
    version: u64,
}

/// Namespace of shader variables
#[derive(Debug)]
pub struct ScopeSpace {
    name: String,
    variables: Vec<ScopeVariable>,
    lookup: FxHashMap<String, ScopeId>,
}

impl ScopeSpace {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            variables: Vec::new(),
            lookup: FxHashMap::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Id of `name`, created on first use. Same name, same id.
    pub fn resolve(&mut self, name: &str) -> ScopeId {
        if let Some(&id) = self.lookup.get(name) {
            return id;
        }

        let id = ScopeId(self.variables.len() as u32);
        self.variables.push(ScopeVariable {
            name: name.to_string(),
            value: None,
            version: 0,
        });
        self.lookup.insert(name.to_string(), id);
        id
    }

    /// Id of `name` if it was resolved before
    pub fn find(&self, name: &str) -> Option<ScopeId> {
        self.lookup.get(name).copied()
    }

    pub fn set_value(&mut self, id: ScopeId, value: UniformValue) {
        if let Some(variable) = self.variables.get_mut(id.0 as usize) {
            variable.value = Some(value);
            variable.version += 1;
        }
    }

    /// Current value (None until first set)
    pub fn value(&self, id: ScopeId) -> Option<&UniformValue> {
        self.variables.get(id.0 as usize).and_then(|v| v.value.as_ref())
    }

    /// Number of sets since resolve
    pub fn version(&self, id: ScopeId) -> u64 {
        self.variables.get(id.0 as usize).map_or(0, |v| v.version)
    }

    pub fn variable_name(&self, id: ScopeId) -> Option<&str> {
        self.variables.get(id.0 as usize).map(|v| v.name.as_str())
    }

    /// Number of resolved variables
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

#[cfg(test)]
#[path = "scope_tests.rs"]
mod tests;
