//! DIRECT-mode decoding: palette, index plane and packed alpha plane.

use super::error::Error;
use super::types::ParseResult;
use crate::alpha;
use crate::cursor::ByteCursor;
use crate::progress::ProgressSink;
use crate::types::*;
use log::*;
use std::io::{Read, Seek};

/// Palette plus level-0 raster of a DIRECT-mode file.
pub(super) struct DirectContent {
    pub rgba: Vec<u8>,
    pub palette: Vec<[u8; 4]>,
}

/// Decode the palette and level 0 into RGBA.
///
/// The palette sits immediately after the header; its entry count is
/// derived from the gap before the first mipmap payload. The fourth byte
/// of each entry is not alpha — alpha comes from the packed plane.
pub(super) fn parse_direct_content<S: Read + Seek>(
    header: &BlpHeader,
    cursor: &mut ByteCursor<S>,
    progress: &mut dyn ProgressSink,
) -> ParseResult<DirectContent> {
    let offset0 = header.mipmaps.offsets[0];
    if offset0 < BLP_HEADER_SIZE {
        return Err(Error::MalformedPalette(offset0));
    }
    let mut palette_len = ((offset0 - BLP_HEADER_SIZE) / 4) as usize;
    if palette_len > 256 {
        warn!("palette area holds {palette_len} entries, clamping to 256");
        palette_len = 256;
    }

    cursor.seek_to(BLP_HEADER_SIZE as u64)?;
    let palette_bytes = cursor
        .read_bytes(palette_len * 4)
        .map_err(|e| Error::from(e).with_context("color palette"))?;
    let palette: Vec<[u8; 4]> = palette_bytes
        .chunks_exact(4)
        .map(|e| [e[0], e[1], e[2], e[3]])
        .collect();

    let (width, height) = (header.width as usize, header.height as usize);
    let pixels = width * height;
    let alpha_size = header.alpha_plane_size(0);

    let len = cursor.stream_len()?;
    let needed = pixels as u64 + alpha_size;
    if u64::from(offset0) + needed > len {
        error!("level 0 payload exceeds file bounds: {offset0}+{needed} > {len}");
        return Err(Error::OutOfBounds {
            offset: offset0.into(),
            size: needed,
            len,
        });
    }

    cursor.seek_to(offset0.into())?;
    let indices = cursor
        .read_bytes(pixels)
        .map_err(|e| Error::from(e).with_context("index plane"))?;
    let packed_alpha = cursor
        .read_bytes(alpha_size as usize)
        .map_err(|e| Error::from(e).with_context("packed alpha plane"))?;
    let alphas = alpha::unpack_plane(&packed_alpha, pixels, header.alpha_bits);

    let mut rgba = vec![0u8; pixels * 4];
    for y in 0..height {
        for x in 0..width {
            let i = y * width + x;
            // Indices past the palette end resolve to black, the entry an
            // undersized palette area leaves undefined.
            let entry = palette
                .get(indices[i] as usize)
                .copied()
                .unwrap_or([0, 0, 0, 0]);
            let o = i * 4;
            rgba[o] = entry[2];
            rgba[o + 1] = entry[1];
            rgba[o + 2] = entry[0];
            rgba[o + 3] = alphas[i];
        }
        if !progress.on_progress(y as u32 + 1, height as u32) {
            return Err(Error::Cancelled);
        }
    }

    Ok(DirectContent { rgba, palette })
}
