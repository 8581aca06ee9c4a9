//! Container-level invariants every produced file must satisfy.

use crate::{offset_entry, size_entry, u32_at};
use blp1::mipmap::{chain_length, level_dimensions};
use blp1::{DecodedImage, EncodeOptions, encode_blp_to_vec, load_blp, save_blp};
use pretty_assertions::assert_eq;

fn gradient(width: u32, height: u32) -> DecodedImage {
    let mut rgba = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            rgba.extend_from_slice(&[
                (x * 255 / width.max(1)) as u8,
                (y * 255 / height.max(1)) as u8,
                128,
                255,
            ]);
        }
    }
    DecodedImage::from_rgba(width, height, rgba).unwrap()
}

#[test]
fn test_magic_bytes() {
    let data = encode_blp_to_vec(&gradient(2, 2), &EncodeOptions::default()).unwrap();
    assert_eq!(&data[0..4], &[0x42, 0x4C, 0x50, 0x31]);
    assert_eq!(u32_at(&data, 4), 0, "compression is JPEG");
}

#[test]
fn test_offsets_are_monotonic_and_disjoint() {
    let data = encode_blp_to_vec(&gradient(32, 32), &EncodeOptions::default()).unwrap();
    let mut previous_end = 160u64; // header plus shared-length prefix
    for i in 0..16 {
        let offset = u64::from(offset_entry(&data, i));
        let size = u64::from(size_entry(&data, i));
        if size == 0 {
            continue;
        }
        assert!(offset >= previous_end, "level {i} overlaps its predecessor");
        assert!(offset + size <= data.len() as u64, "level {i} out of file");
        previous_end = offset + size;
    }
}

#[test]
fn test_unused_slots_are_zeroed() {
    let data = encode_blp_to_vec(&gradient(4, 4), &EncodeOptions::default()).unwrap();
    for i in 0..16 {
        if size_entry(&data, i) == 0 {
            assert_eq!(offset_entry(&data, i), 0, "slot {i} offset");
        }
    }
}

#[test]
fn test_non_square_chain_terminates_at_one_by_one() {
    // 5x3 narrows to 2x1 then 1x1; only the first three slots populate.
    assert_eq!(chain_length(5, 3), 3);
    assert_eq!(level_dimensions(5, 3, 1), (2, 1));
    assert_eq!(level_dimensions(5, 3, 2), (1, 1));

    let data = encode_blp_to_vec(&gradient(5, 3), &EncodeOptions::default()).unwrap();
    for i in 0..3 {
        assert!(size_entry(&data, i) > 0, "slot {i} must hold a level");
    }
    for i in 3..16 {
        assert_eq!(size_entry(&data, i), 0, "slot {i} must be empty");
        assert_eq!(offset_entry(&data, i), 0, "slot {i} must be empty");
    }
}

#[test]
fn test_max_levels_caps_the_chain() {
    let options = EncodeOptions {
        max_levels: 2,
        quality: 85,
    };
    let data = encode_blp_to_vec(&gradient(16, 16), &options).unwrap();
    assert!(size_entry(&data, 0) > 0);
    assert!(size_entry(&data, 1) > 0);
    assert_eq!(size_entry(&data, 2), 0);
}

#[test]
fn test_save_and_load_through_the_file_system() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gradient.blp");

    let image = gradient(8, 8);
    save_blp(&image, &path).unwrap();
    let loaded = load_blp(&path).unwrap();

    assert_eq!((loaded.width(), loaded.height()), (8, 8));
    assert_eq!(loaded.rgba().len(), 8 * 8 * 4);
}

#[test]
fn test_load_missing_file_reports_path() {
    let err = load_blp("/definitely/not/here.blp").unwrap_err();
    match err {
        blp1::parser::LoadError::FileSystem(path, _) => {
            assert!(path.ends_with("here.blp"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
