use super::*;

#[test]
fn test_default_clear_options() {
    let clear = ClearOptions::default();
    assert_eq!(clear.color, [0.0, 0.0, 0.0, 1.0]);
    assert_eq!(clear.depth, 1.0);
    assert_eq!(clear.stencil, 0);
    assert_eq!(clear.flags, ClearFlags::COLOR | ClearFlags::DEPTH);
    assert!(!clear.flags.contains(ClearFlags::STENCIL));
}

#[test]
fn test_render_pass_desc_builder() {
    let desc = RenderPassDesc::new("Forward");
    assert_eq!(desc.name, "Forward");
    assert!(desc.clear.is_none());

    let desc = desc.with_clear(ClearOptions::default());
    assert_eq!(desc.clear, Some(ClearOptions::default()));
}

#[test]
fn test_topology_indices_are_unique_and_dense() {
    let all = [
        PrimitiveTopology::PointList,
        PrimitiveTopology::LineList,
        PrimitiveTopology::LineLoop,
        PrimitiveTopology::LineStrip,
        PrimitiveTopology::TriangleList,
        PrimitiveTopology::TriangleStrip,
        PrimitiveTopology::TriangleFan,
    ];
    let mut indices: Vec<usize> = all.iter().map(|t| t.index()).collect();
    indices.sort_unstable();
    assert_eq!(indices, (0..PrimitiveTopology::COUNT).collect::<Vec<_>>());
}

#[test]
fn test_default_draw_options() {
    let options = DrawOptions::default();
    assert_eq!(options.instances, 1);
    assert!(options.index_buffer.is_none());
    assert!(options.indirect_slot.is_none());
    assert!(options.first && options.last);
}

#[test]
fn test_index_type_sizes() {
    assert_eq!(IndexType::U16.size_bytes(), 2);
    assert_eq!(IndexType::U32.size_bytes(), 4);
}
