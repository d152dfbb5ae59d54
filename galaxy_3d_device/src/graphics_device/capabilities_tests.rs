/// Tests for HDR format selection and caps defines

use super::*;

fn caps(rg11b10: bool, half: bool, float: bool, float_filterable: bool) -> Capabilities {
    Capabilities {
        texture_rg11b10_renderable: rg11b10,
        texture_half_float_renderable: half,
        texture_float_renderable: float,
        texture_float_filterable: float_filterable,
        ..Default::default()
    }
}

#[test]
fn test_default_caps_support_nothing_optional() {
    let caps = Capabilities::default();
    assert!(!caps.supports_compute);
    assert!(!caps.supports_indirect_draw);
    assert_eq!(caps.default_renderable_hdr_format(DeviceType::WebGl2, false, 1), None);
}

#[test]
fn test_first_renderable_candidate_wins() {
    let caps = caps(true, true, true, true);
    assert_eq!(
        caps.default_renderable_hdr_format(DeviceType::WebGl2, false, 1),
        Some(TextureFormat::B10G11R11_UFLOAT)
    );

    let caps = caps_without_rg11b10();
    assert_eq!(
        caps.default_renderable_hdr_format(DeviceType::WebGl2, false, 1),
        Some(TextureFormat::R16G16B16A16_SFLOAT)
    );
}

fn caps_without_rg11b10() -> Capabilities {
    caps(false, true, true, true)
}

#[test]
fn test_empty_candidate_list_selects_nothing() {
    let caps = caps(true, true, true, true);
    assert_eq!(caps.renderable_hdr_format(DeviceType::WebGpu, &[], true, 1), None);
    assert_eq!(caps.renderable_hdr_format(DeviceType::WebGl2, &[], false, 1), None);
    assert_eq!(
        caps.default_renderable_hdr_format(DeviceType::WebGpu, true, 1),
        Some(TextureFormat::B10G11R11_UFLOAT)
    );
}

#[test]
fn test_candidate_order_is_respected() {
    let caps = caps(true, true, true, true);
    let order = [TextureFormat::R32G32B32A32_SFLOAT, TextureFormat::B10G11R11_UFLOAT];
    assert_eq!(
        caps.renderable_hdr_format(DeviceType::WebGl2, &order, false, 1),
        Some(TextureFormat::R32G32B32A32_SFLOAT)
    );
}

#[test]
fn test_float_filterable_requirement() {
    let caps = caps(false, false, true, false);
    let only_float = [TextureFormat::R32G32B32A32_SFLOAT];

    assert_eq!(
        caps.renderable_hdr_format(DeviceType::WebGl2, &only_float, false, 1),
        Some(TextureFormat::R32G32B32A32_SFLOAT)
    );
    assert_eq!(caps.renderable_hdr_format(DeviceType::WebGl2, &only_float, true, 1), None);
}

#[test]
fn test_filterable_does_not_constrain_half_float() {
    let caps = caps(false, true, false, false);
    assert_eq!(
        caps.default_renderable_hdr_format(DeviceType::WebGl2, true, 1),
        Some(TextureFormat::R16G16B16A16_SFLOAT)
    );
}

#[test]
fn test_float_excluded_for_msaa_on_webgpu_only() {
    let caps = caps(false, false, true, true);
    let only_float = [TextureFormat::R32G32B32A32_SFLOAT];

    assert_eq!(caps.renderable_hdr_format(DeviceType::WebGpu, &only_float, false, 4), None);
    assert_eq!(
        caps.renderable_hdr_format(DeviceType::WebGpu, &only_float, false, 1),
        Some(TextureFormat::R32G32B32A32_SFLOAT)
    );
    assert_eq!(
        caps.renderable_hdr_format(DeviceType::WebGl2, &only_float, false, 4),
        Some(TextureFormat::R32G32B32A32_SFLOAT)
    );
}

#[test]
fn test_non_hdr_candidates_are_skipped() {
    let caps = caps(true, true, true, true);
    let candidates = [TextureFormat::R8G8B8A8_UNORM, TextureFormat::R16G16B16A16_SFLOAT];
    assert_eq!(
        caps.renderable_hdr_format(DeviceType::WebGl2, &candidates, false, 1),
        Some(TextureFormat::R16G16B16A16_SFLOAT)
    );
}

#[test]
fn test_selection_is_deterministic() {
    let caps = caps(false, true, true, false);
    let first = caps.default_renderable_hdr_format(DeviceType::WebGpu, true, 4);
    for _ in 0..10 {
        assert_eq!(caps.default_renderable_hdr_format(DeviceType::WebGpu, true, 4), first);
    }
}

#[test]
fn test_caps_defines_from_capabilities() {
    assert_eq!(CapsDefines::from_capabilities(&Capabilities::default()), CapsDefines::empty());

    let defines = CapsDefines::from_capabilities(&caps(false, false, true, true));
    assert!(defines.contains(CapsDefines::CAPS_TEXTURE_FLOAT_RENDERABLE));
    assert!(defines.contains(CapsDefines::CAPS_TEXTURE_FLOAT_FILTERABLE));
    assert_eq!(
        defines.names(),
        vec!["CAPS_TEXTURE_FLOAT_FILTERABLE", "CAPS_TEXTURE_FLOAT_RENDERABLE"]
    );
}
