//! DIRECT-mode scenarios: palettes, index planes and packed alpha.

use crate::{offset_entry, size_entry, u32_at};
use blp1::{AlphaBits, DecodedImage, DirectEncodeOptions, encode_direct_blp, parse_blp};
use pretty_assertions::assert_eq;

/// Build a DIRECT-mode file by hand: palette entries are on-disk
/// `(B, G, R, X)` quadruples, payload is indices then packed alpha.
fn direct_file(
    width: u32,
    height: u32,
    alpha_bits: u32,
    palette: &[[u8; 4]],
    indices: &[u8],
    packed_alpha: &[u8],
) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(b"BLP1");
    data.extend_from_slice(&1u32.to_le_bytes());
    data.extend_from_slice(&alpha_bits.to_le_bytes());
    data.extend_from_slice(&width.to_le_bytes());
    data.extend_from_slice(&height.to_le_bytes());
    data.extend_from_slice(&5u32.to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes());
    let offset0 = 156 + palette.len() as u32 * 4;
    data.extend_from_slice(&offset0.to_le_bytes());
    data.extend_from_slice(&[0u8; 60]);
    let size0 = (indices.len() + packed_alpha.len()) as u32;
    data.extend_from_slice(&size0.to_le_bytes());
    data.extend_from_slice(&[0u8; 60]);
    assert_eq!(data.len(), 156);
    for entry in palette {
        data.extend_from_slice(entry);
    }
    data.extend_from_slice(indices);
    data.extend_from_slice(packed_alpha);
    data
}

#[test]
fn test_encode_no_alpha_layout() {
    // 2x2 image over a 4-color palette without alpha: the palette takes
    // 16 bytes, so level 0 starts at 172 and holds the 4 indices.
    let rgba = vec![
        255, 0, 0, 255, //
        0, 255, 0, 255, //
        0, 0, 255, 255, //
        255, 255, 255, 255,
    ];
    let image = DecodedImage::from_rgba(2, 2, rgba.clone()).unwrap();
    let mut buffer = std::io::Cursor::new(Vec::new());
    let options = DirectEncodeOptions {
        alpha_bits: AlphaBits::NoAlpha,
        max_levels: 1,
    };
    encode_direct_blp(&mut buffer, &image, &options).unwrap();
    let data = buffer.into_inner();

    assert_eq!(&data[0..4], b"BLP1");
    assert_eq!(u32_at(&data, 4), 1, "compression");
    assert_eq!(u32_at(&data, 8), 0, "alpha_bits");
    assert_eq!(u32_at(&data, 12), 2, "width");
    assert_eq!(u32_at(&data, 16), 2, "height");
    assert_eq!(offset_entry(&data, 0), 172);
    assert_eq!(size_entry(&data, 0), 4);

    let decoded = parse_blp(&data).unwrap();
    assert_eq!(decoded.rgba(), &rgba[..]);
}

#[test]
fn test_one_bit_alpha_pattern() {
    // 8x1 with alpha bits 1,0,1,0,... packed LSB-first into 0x55.
    let palette = [[0, 0, 200, 0]];
    let data = direct_file(8, 1, 1, &palette, &[0; 8], &[0x55]);
    let decoded = parse_blp(&data).unwrap();
    let alphas: Vec<u8> = decoded.rgba().chunks_exact(4).map(|px| px[3]).collect();
    assert_eq!(alphas, vec![255, 0, 255, 0, 255, 0, 255, 0]);
}

#[test]
fn test_four_bit_alpha_nibble_order() {
    // Packed byte 0xA3: even pixel takes the high nibble.
    let palette = [[0, 0, 0, 0]];
    let data = direct_file(2, 1, 4, &palette, &[0, 0], &[0xA3]);
    let decoded = parse_blp(&data).unwrap();
    let alphas: Vec<u8> = decoded.rgba().chunks_exact(4).map(|px| px[3]).collect();
    assert_eq!(alphas, vec![0xAA, 0x33]);
}

#[test]
fn test_palette_colors_are_bgr() {
    let palette = [[10, 20, 30, 99]]; // B=10, G=20, R=30, fourth byte ignored
    let data = direct_file(1, 1, 0, &palette, &[0], &[]);
    let decoded = parse_blp(&data).unwrap();
    assert_eq!(decoded.rgba(), &[30, 20, 10, 255]);
    assert_eq!(decoded.palette(), Some(&[[10, 20, 30, 99]][..]));
}

#[test]
fn test_eight_bit_alpha_roundtrip_is_exact() {
    // Any raster over at most 256 colors with arbitrary 8-bit alpha
    // round-trips exactly through the DIRECT pipeline.
    let colors: Vec<[u8; 3]> = (0..13).map(|i| [i * 19, 255 - i * 7, i * 3]).collect();
    let mut state = 0x2545F491u32;
    let mut rgba = Vec::new();
    for _ in 0..16 * 16 {
        state = state.wrapping_mul(1664525).wrapping_add(1013904223);
        let color = colors[(state >> 16) as usize % colors.len()];
        rgba.extend_from_slice(&color);
        rgba.push((state >> 8) as u8);
    }
    let image = DecodedImage::from_rgba(16, 16, rgba.clone()).unwrap();

    let mut buffer = std::io::Cursor::new(Vec::new());
    let options = DirectEncodeOptions {
        alpha_bits: AlphaBits::Bit8,
        max_levels: 1,
    };
    encode_direct_blp(&mut buffer, &image, &options).unwrap();
    let decoded = parse_blp(&buffer.into_inner()).unwrap();
    assert_eq!(decoded.rgba(), &rgba[..]);
}

#[test]
fn test_direct_mipmap_chain() {
    let rgba = vec![
        255, 0, 0, 255, //
        255, 0, 0, 255, //
        0, 0, 255, 255, //
        0, 0, 255, 255,
    ];
    let image = DecodedImage::from_rgba(2, 2, rgba).unwrap();
    let mut buffer = std::io::Cursor::new(Vec::new());
    let options = DirectEncodeOptions {
        alpha_bits: AlphaBits::NoAlpha,
        max_levels: 16,
    };
    encode_direct_blp(&mut buffer, &image, &options).unwrap();
    let data = buffer.into_inner();

    // Two levels: 2x2 then 1x1; the 1x1 level is one index byte.
    assert_eq!(size_entry(&data, 0), 4);
    assert_eq!(size_entry(&data, 1), 1);
    assert_eq!(offset_entry(&data, 1), offset_entry(&data, 0) + 4);
    assert_eq!(size_entry(&data, 2), 0);
    assert_eq!(u32_at(&data, 24), 1, "has_mipmaps");
}

#[test]
fn test_quantized_palette_still_decodes() {
    // More than 256 distinct colors forces palette quantization; the
    // result is lossy but structurally valid.
    let mut rgba = Vec::new();
    for y in 0..32u32 {
        for x in 0..32u32 {
            rgba.extend_from_slice(&[(x * 8) as u8, (y * 8) as u8, ((x + y) * 4) as u8, 255]);
        }
    }
    let image = DecodedImage::from_rgba(32, 32, rgba).unwrap();
    let mut buffer = std::io::Cursor::new(Vec::new());
    encode_direct_blp(&mut buffer, &image, &DirectEncodeOptions::default()).unwrap();
    let decoded = parse_blp(&buffer.into_inner()).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (32, 32));
    assert_eq!(decoded.palette().map(|p| p.len()), Some(256));
}

#[test]
fn test_malformed_palette_area_is_rejected() {
    // offsets[0] before the header end leaves no room for a palette.
    let mut data = direct_file(1, 1, 0, &[[0, 0, 0, 0]], &[0], &[]);
    data[28..32].copy_from_slice(&100u32.to_le_bytes());
    let err = parse_blp(&data).unwrap_err();
    assert!(
        matches!(err.root_cause(), blp1::parser::Error::MalformedPalette(100)),
        "unexpected error: {err:?}"
    );
}

#[test]
fn test_maximal_dimensions_are_out_of_bounds_not_a_panic() {
    // A 156-byte file can declare 65535x65535 with 8-bit alpha and pass
    // every header check; the payload byte budget is then larger than
    // u32 and must be computed in wider arithmetic so the bounds check
    // rejects it cleanly.
    let data = direct_file(65535, 65535, 8, &[[0, 0, 0, 0]], &[], &[]);
    let err = parse_blp(&data).unwrap_err();
    assert!(
        matches!(err.root_cause(), blp1::parser::Error::OutOfBounds { .. }),
        "unexpected error: {err:?}"
    );
}

#[test]
fn test_direct_flags_roundtrip_opaquely() {
    let mut image = DecodedImage::from_rgba(1, 1, vec![0, 0, 0, 255]).unwrap();
    image.set_flags(5, 0);
    let mut buffer = std::io::Cursor::new(Vec::new());
    encode_direct_blp(&mut buffer, &image, &DirectEncodeOptions::default()).unwrap();
    let data = buffer.into_inner();
    assert_eq!(u32_at(&data, 20), 5, "extra");
    assert_eq!(u32_at(&data, 24), 0, "has_mipmaps");
}

#[test]
fn test_truncated_payload_is_out_of_bounds() {
    let palette = [[0, 0, 0, 0]];
    let mut data = direct_file(4, 4, 8, &palette, &[0; 16], &[0; 16]);
    data.truncate(170); // cut into the palette area
    let err = parse_blp(&data).unwrap_err();
    assert!(
        matches!(
            err.root_cause(),
            blp1::parser::Error::OutOfBounds { .. } | blp1::parser::Error::Io(_)
        ),
        "unexpected error: {err:?}"
    );
}
