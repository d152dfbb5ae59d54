/// Debug validation of shader inputs against bound vertex layouts
///
/// Compiled to a no-op in release builds. A mismatch never aborts the draw; it
/// is logged once per distinct report and handed back to the caller.

use rustc_hash::FxHashSet;
use crate::engine_error;
use crate::graphics_device::{Shader, VertexFormat};

/// A shader input with no matching vertex element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeMismatch {
    pub shader: String,
    pub attribute: String,
    pub location: u32,
}

#[derive(Debug, Default)]
pub struct AttributeValidator {
    reported: FxHashSet<String>,
}

impl AttributeValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that every attribute `shader` consumes is provided by `vb0` or `vb1`.
    ///
    /// `context` is the active debug-marker path, included in the log message.
    /// Returns every mismatch of this call, reported or not before.
    pub fn validate(
        &mut self,
        shader: &Shader,
        vb0: Option<&VertexFormat>,
        vb1: Option<&VertexFormat>,
        context: &str,
    ) -> Vec<AttributeMismatch> {
        if !cfg!(debug_assertions) {
            return Vec::new();
        }

        let provided: FxHashSet<u32> = vb0
            .into_iter()
            .chain(vb1)
            .flat_map(|format| format.locations())
            .collect();

        let mut mismatches = Vec::new();
        for attribute in shader.attributes() {
            if provided.contains(&attribute.location) {
                continue;
            }

            let message = format!(
                "Vertex attribute [{}] mapped to location {} in shader [{}] is not present in vertex buffer [{}, {}] ({})",
                attribute.name,
                attribute.location,
                shader.name(),
                describe(vb0),
                describe(vb1),
                context,
            );
            if self.reported.insert(message.clone()) {
                engine_error!("galaxy3d::AttributeValidator", "{}", message);
            }

            mismatches.push(AttributeMismatch {
                shader: shader.name().to_string(),
                attribute: attribute.name.clone(),
                location: attribute.location,
            });
        }
        mismatches
    }

    /// Number of distinct mismatches logged so far
    pub fn reported_count(&self) -> usize {
        self.reported.len()
    }
}

fn describe(format: Option<&VertexFormat>) -> String {
    format.map_or_else(|| "none".to_string(), |f| f.to_string())
}

#[cfg(test)]
#[path = "attribute_validator_tests.rs"]
mod tests;
