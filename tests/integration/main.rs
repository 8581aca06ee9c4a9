//! Integration tests for BLP1 file decoding and encoding

mod direct_tests;
mod invariant_tests;

/// Read a little-endian `u32` at a byte offset of a produced file.
pub fn u32_at(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

/// Mipmap offset table entry `i` of a produced file.
pub fn offset_entry(data: &[u8], i: usize) -> u32 {
    u32_at(data, 28 + i * 4)
}

/// Mipmap size table entry `i` of a produced file.
pub fn size_entry(data: &[u8], i: usize) -> u32 {
    u32_at(data, 92 + i * 4)
}
