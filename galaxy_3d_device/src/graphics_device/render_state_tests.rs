/// Tests for RenderState defaults and stencil semantics

use super::*;

#[test]
fn test_default_render_state() {
    let state = RenderState::default();
    assert_eq!(state.blend, BlendState::NO_BLEND);
    assert!(!state.blend.blend_enable);
    assert_eq!(state.blend.color_write_mask, ColorWriteMask::ALL);
    assert!(state.depth.test);
    assert!(state.depth.write);
    assert_eq!(state.depth.func, CompareOp::LessOrEqual);
    assert_eq!(state.cull_mode, CullMode::Back);
    assert_eq!(state.viewport, Viewport { x: 0.0, y: 0.0, width: 0.0, height: 0.0 });
    assert_eq!(state.scissor, Rect2D { x: 0, y: 0, width: 0, height: 0 });
    assert_eq!(state.blend_color, Vec4::ZERO);
    assert!(!state.stencil_enabled);
}

#[test]
fn test_default_stencil_parameters() {
    let params = StencilParameters::default();
    assert_eq!(params.func, CompareOp::Always);
    assert_eq!(params.reference, 0);
    assert_eq!(params.read_mask, 0xFF);
    assert_eq!(params.write_mask, 0xFF);
    assert_eq!(params.fail, StencilOp::Keep);
    assert_eq!(params.depth_fail, StencilOp::Keep);
    assert_eq!(params.pass, StencilOp::Keep);
}

#[test]
fn test_stencil_none_none_disables() {
    let mut state = RenderState::default();
    state.set_stencil(Some(StencilParameters::default()), None);
    assert!(state.stencil_enabled);

    state.set_stencil(None, None);
    assert!(!state.stencil_enabled);
}

#[test]
fn test_stencil_single_side_enables_with_default_other_side() {
    let front = StencilParameters {
        func: CompareOp::Equal,
        reference: 3,
        pass: StencilOp::Replace,
        ..Default::default()
    };

    let mut state = RenderState::default();
    state.set_stencil(Some(front), None);

    assert!(state.stencil_enabled);
    assert_eq!(state.stencil_front, front);
    assert_eq!(state.stencil_back, StencilParameters::default());

    state.set_stencil(None, Some(front));
    assert!(state.stencil_enabled);
    assert_eq!(state.stencil_front, StencilParameters::default());
    assert_eq!(state.stencil_back, front);
}

#[test]
fn test_blend_presets_differ() {
    assert_ne!(BlendState::ALPHA_BLEND, BlendState::NO_BLEND);
    assert!(BlendState::ADDITIVE.blend_enable);
    assert_eq!(BlendState::ADDITIVE.dst_color_factor, BlendFactor::One);
}

#[test]
fn test_depth_presets() {
    assert_eq!(DepthState::default(), DepthState::DEFAULT);
    assert!(!DepthState::NO_DEPTH.test);
    assert!(DepthState::NO_WRITE.test && !DepthState::NO_WRITE.write);
}
