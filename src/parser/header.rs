//! Decoding of the fixed 156-byte header.

use super::error::Error;
use super::types::ParseResult;
use crate::cursor::{ByteCursor, read_u32_array};
use crate::types::*;
use log::*;
use std::io::{Read, Seek};

/// Read and validate the header from the start of the stream.
pub fn parse_header<S: Read + Seek>(cursor: &mut ByteCursor<S>) -> ParseResult<BlpHeader> {
    cursor.seek_to(0)?;

    let mut magic = [0u8; 4];
    cursor
        .read_into(&mut magic)
        .map_err(|e| Error::from(e).with_context("magic"))?;
    if magic != BLP1_MAGIC {
        return Err(Error::WrongMagic(magic));
    }

    let compression_field = cursor.read_u32_le().map_err(Error::from)?;
    let compression: Compression = compression_field.try_into().map_err(|v| {
        error!("unsupported compression tag {v}");
        Error::UnsupportedCompression(v)
    })?;

    let alpha_bits = cursor.read_u32_le().map_err(Error::from)?;
    if !matches!(alpha_bits, 0 | 1 | 4 | 8) {
        error!("unsupported alpha depth {alpha_bits}");
        return Err(Error::UnsupportedAlphaBits(alpha_bits));
    }

    let width = cursor.read_u32_le().map_err(Error::from)?;
    let height = cursor.read_u32_le().map_err(Error::from)?;
    if width == 0 || height == 0 || width > BLP_MAX_WIDTH || height > BLP_MAX_HEIGHT {
        return Err(Error::InvalidDimensions(width, height));
    }

    let extra = cursor.read_u32_le().map_err(Error::from)?;
    let has_mipmaps = cursor.read_u32_le().map_err(Error::from)?;

    let mut mipmaps = MipmapTable::default();
    let offsets = read_u32_array(cursor, MIPMAP_SLOTS)
        .map_err(|e| Error::from(e).with_context("mipmap offsets"))?;
    mipmaps.offsets.copy_from_slice(&offsets);
    let sizes = read_u32_array(cursor, MIPMAP_SLOTS)
        .map_err(|e| Error::from(e).with_context("mipmap sizes"))?;
    mipmaps.sizes.copy_from_slice(&sizes);

    trace!(
        "parsed header: {width}x{height}, {compression:?}, alpha {alpha_bits}, {} level(s)",
        mipmaps.level_count()
    );

    Ok(BlpHeader {
        compression,
        alpha_bits,
        width,
        height,
        extra,
        has_mipmaps,
        mipmaps,
    })
}

/// Cheap file-type recognition: true iff the stream starts with `BLP1`.
///
/// Reads exactly the four magic bytes; a stream shorter than that is
/// simply not a BLP file rather than an error.
pub fn probe<S: Read + Seek>(stream: &mut S) -> std::io::Result<bool> {
    stream.seek(std::io::SeekFrom::Start(0))?;
    let mut magic = [0u8; 4];
    match stream.read_exact(&mut magic) {
        Ok(()) => Ok(magic == BLP1_MAGIC),
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(e),
    }
}
