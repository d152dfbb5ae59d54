/// Tests for buffer formats and the retained buffer record

use super::*;

fn desc(size: u64) -> BufferDesc {
    BufferDesc {
        name: "test".to_string(),
        usage: BufferUsage::Uniform,
        size,
        vertex_format: None,
    }
}

#[test]
fn test_buffer_format_sizes() {
    assert_eq!(BufferFormat::R32_SFLOAT.size_bytes(), 4);
    assert_eq!(BufferFormat::R32G32_SFLOAT.size_bytes(), 8);
    assert_eq!(BufferFormat::R32G32B32_SFLOAT.size_bytes(), 12);
    assert_eq!(BufferFormat::R32G32B32A32_SFLOAT.size_bytes(), 16);
    assert_eq!(BufferFormat::R16G16_SFLOAT.size_bytes(), 4);
    assert_eq!(BufferFormat::R16G16B16A16_SFLOAT.size_bytes(), 8);
    assert_eq!(BufferFormat::R8G8B8A8_UNORM.size_bytes(), 4);
}

#[test]
fn test_new_buffer_is_zeroed() {
    let buffer = Buffer::new(desc(8), None);
    assert_eq!(buffer.data(), &[0u8; 8]);
    assert_eq!(buffer.size(), 8);
    assert!(!buffer.is_lost());
}

#[test]
fn test_initial_data_is_padded_and_truncated() {
    let short = Buffer::new(desc(4), Some(&[1, 2]));
    assert_eq!(short.data(), &[1, 2, 0, 0]);

    let long = Buffer::new(desc(2), Some(&[1, 2, 3, 4]));
    assert_eq!(long.data(), &[1, 2]);
}

#[test]
fn test_write_in_range() {
    let mut buffer = Buffer::new(desc(6), None);
    assert!(buffer.write(2, &[7, 8, 9]));
    assert_eq!(buffer.data(), &[0, 0, 7, 8, 9, 0]);
}

#[test]
fn test_write_out_of_range_is_rejected() {
    let mut buffer = Buffer::new(desc(4), Some(&[1, 1, 1, 1]));
    assert!(!buffer.write(3, &[9, 9]));
    assert!(!buffer.write(u64::MAX, &[9]));
    assert_eq!(buffer.data(), &[1, 1, 1, 1]);
}
