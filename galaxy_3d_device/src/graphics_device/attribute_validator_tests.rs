/// Tests for the debug attribute validator
///
/// Assertions on reported mismatches only hold in debug builds.

use super::*;
use crate::graphics_device::{BufferFormat, Semantic, ShaderAttribute, ShaderDesc};

fn shader(name: &str, attributes: &[(u32, &str)]) -> Shader {
    Shader::new(ShaderDesc {
        name: name.to_string(),
        attributes: attributes
            .iter()
            .map(|&(location, name)| ShaderAttribute::new(location, name))
            .collect(),
    })
}

fn position_uv() -> VertexFormat {
    VertexFormat::new(&[
        (Semantic::Position, BufferFormat::R32G32B32_SFLOAT),
        (Semantic::TexCoord(0), BufferFormat::R32G32_SFLOAT),
    ])
}

#[test]
fn test_matching_layout_reports_nothing() {
    let mut validator = AttributeValidator::new();
    let shader = shader("unlit", &[(0, "vertex_position"), (6, "vertex_texCoord0")]);
    let format = position_uv();

    assert!(validator.validate(&shader, Some(&format), None, "").is_empty());
    assert_eq!(validator.reported_count(), 0);
}

#[test]
fn test_second_buffer_provides_locations() {
    let mut validator = AttributeValidator::new();
    let shader = shader("lit", &[(0, "vertex_position"), (1, "vertex_normal")]);
    let vb0 = VertexFormat::new(&[(Semantic::Position, BufferFormat::R32G32B32_SFLOAT)]);
    let vb1 = VertexFormat::new(&[(Semantic::Normal, BufferFormat::R32G32B32_SFLOAT)]);

    assert!(validator.validate(&shader, Some(&vb0), Some(&vb1), "").is_empty());
}

#[test]
fn test_missing_location_is_reported_once() {
    let mut validator = AttributeValidator::new();
    let shader = shader("lit", &[(0, "vertex_position"), (1, "vertex_normal")]);
    let format = position_uv();

    let first = validator.validate(&shader, Some(&format), None, "Forward/Opaque");
    let second = validator.validate(&shader, Some(&format), None, "Forward/Opaque");

    if cfg!(debug_assertions) {
        let expected = vec![AttributeMismatch {
            shader: "lit".to_string(),
            attribute: "vertex_normal".to_string(),
            location: 1,
        }];
        assert_eq!(first, expected);
        assert_eq!(second, expected);
        assert_eq!(validator.reported_count(), 1);
    } else {
        assert!(first.is_empty());
    }
}

#[test]
fn test_distinct_contexts_are_distinct_reports() {
    let mut validator = AttributeValidator::new();
    let shader = shader("lit", &[(1, "vertex_normal")]);
    let format = position_uv();

    validator.validate(&shader, Some(&format), None, "ShadowPass");
    validator.validate(&shader, Some(&format), None, "ForwardPass");

    if cfg!(debug_assertions) {
        assert_eq!(validator.reported_count(), 2);
    }
}

#[test]
fn test_no_vertex_buffer_reports_every_attribute() {
    let mut validator = AttributeValidator::new();
    let shader = shader("fullscreen", &[(0, "vertex_position"), (6, "vertex_texCoord0")]);

    let mismatches = validator.validate(&shader, None, None, "");
    if cfg!(debug_assertions) {
        assert_eq!(mismatches.len(), 2);
    }
}
