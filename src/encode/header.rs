//! Encoding of the fixed 156-byte header.

use crate::cursor::ByteCursor;
use crate::types::*;
use std::io::{Seek, Write};

/// Write the header at offset 0.
///
/// The pipeline calls this twice: once with a placeholder table before any
/// payload exists, and once more after all levels are written and the
/// offset/size tables are final.
pub(super) fn write_header<S: Write + Seek>(
    cursor: &mut ByteCursor<S>,
    header: &BlpHeader,
) -> std::io::Result<()> {
    cursor.seek_to(0)?;
    cursor.write_bytes(&BLP1_MAGIC)?;
    cursor.write_u32_le(header.compression.into())?;
    cursor.write_u32_le(header.alpha_bits)?;
    cursor.write_u32_le(header.width)?;
    cursor.write_u32_le(header.height)?;
    cursor.write_u32_le(header.extra)?;
    cursor.write_u32_le(header.has_mipmaps)?;
    for offset in header.mipmaps.offsets {
        cursor.write_u32_le(offset)?;
    }
    for size in header.mipmaps.sizes {
        cursor.write_u32_le(size)?;
    }
    Ok(())
}

/// Write 156 zero bytes where the header will go.
pub(super) fn write_placeholder<S: Write + Seek>(
    cursor: &mut ByteCursor<S>,
) -> std::io::Result<()> {
    cursor.seek_to(0)?;
    cursor.write_bytes(&[0u8; BLP_HEADER_SIZE as usize])
}
