//! Packed alpha plane expansion and packing.
//!
//! DIRECT-mode files store alpha at 0, 1, 4 or 8 bits per pixel in a
//! separate plane after the index plane. The bit ordering is an observable
//! quirk of the format: 1-bit alpha is LSB-first within each byte, and for
//! 4-bit alpha the even pixel of a byte pair takes the high nibble.

/// Byte size of a packed alpha plane.
///
/// Computed in `u64`: the largest header-expressible plane is
/// 65535 * 65535 pixels at 8 bits, which wraps 32-bit math.
pub(crate) fn plane_size(pixels: u64, alpha_bits: u32) -> u64 {
    (pixels * u64::from(alpha_bits)).div_ceil(8)
}

/// Expand a packed alpha plane into one 8-bit alpha value per pixel.
///
/// `alpha_bits` must be one of 0, 1, 4 or 8; with 0 every pixel is opaque
/// and `packed` is ignored.
pub(crate) fn unpack_plane(packed: &[u8], pixels: usize, alpha_bits: u32) -> Vec<u8> {
    let mut out = vec![255u8; pixels];
    match alpha_bits {
        0 => {}
        1 => {
            for (i, a) in out.iter_mut().enumerate() {
                let bit = (packed[i >> 3] >> (i & 7)) & 1;
                *a = if bit != 0 { 255 } else { 0 };
            }
        }
        4 => {
            for (i, a) in out.iter_mut().enumerate() {
                let byte = packed[i >> 1];
                let v = if i & 1 == 0 { byte >> 4 } else { byte & 0x0F };
                *a = (v << 4) | v;
            }
        }
        8 => out.copy_from_slice(&packed[..pixels]),
        _ => debug_assert!(false, "alpha_bits validated by the header parser"),
    }
    out
}

/// Pack 8-bit alpha values into a plane at the given depth.
///
/// 1-bit packing keeps any value >= 128 as set; 4-bit packing keeps the
/// high nibble, so a later unpack yields `(v >> 4) * 0x11`.
pub(crate) fn pack_plane(alphas: &[u8], alpha_bits: u32) -> Vec<u8> {
    let mut out = vec![0u8; plane_size(alphas.len() as u64, alpha_bits) as usize];
    match alpha_bits {
        0 => {}
        1 => {
            for (i, &a) in alphas.iter().enumerate() {
                if a >= 128 {
                    out[i >> 3] |= 1 << (i & 7);
                }
            }
        }
        4 => {
            for (i, &a) in alphas.iter().enumerate() {
                let v = a >> 4;
                if i & 1 == 0 {
                    out[i >> 1] |= v << 4;
                } else {
                    out[i >> 1] |= v;
                }
            }
        }
        8 => out.copy_from_slice(alphas),
        _ => debug_assert!(false, "alpha_bits validated by the encoder options"),
    }
    out
}
