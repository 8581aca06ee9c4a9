//! JPEG-mode decoding: shared header blob plus the level-0 body.

use super::error::Error;
use super::types::ParseResult;
use crate::cursor::ByteCursor;
use crate::jpeg;
use crate::progress::ProgressSink;
use crate::types::*;
use log::*;
use std::io::{Read, Seek};

/// Decode level 0 of a JPEG-mode file into RGBA.
///
/// The effective bitstream is the shared header blob (stored once after
/// the container header, length-prefixed) concatenated with the level
/// body. Encoders that write self-contained bitstreams store a zero
/// shared-header length; both conventions are accepted.
pub(super) fn parse_jpeg_content<S: Read + Seek>(
    header: &BlpHeader,
    cursor: &mut ByteCursor<S>,
    progress: &mut dyn ProgressSink,
) -> ParseResult<Vec<u8>> {
    let len = cursor.stream_len()?;

    cursor.seek_to(BLP_HEADER_SIZE as u64)?;
    let shared_len = cursor
        .read_u32_le()
        .map_err(|e| Error::from(e).with_context("shared header length"))?;
    if u64::from(BLP_HEADER_SIZE) + 4 + u64::from(shared_len) > len {
        return Err(Error::OutOfBounds {
            offset: (BLP_HEADER_SIZE + 4).into(),
            size: shared_len.into(),
            len,
        });
    }
    let shared = cursor
        .read_bytes(shared_len as usize)
        .map_err(|e| Error::from(e).with_context("shared jpeg header"))?;

    let offset0 = header.mipmaps.offsets[0];
    let size0 = header.mipmaps.sizes[0];
    if u64::from(offset0) + u64::from(size0) > len || offset0 < BLP_HEADER_SIZE {
        error!("level 0 body out of bounds: offset {offset0}, size {size0}, file length {len}");
        return Err(Error::OutOfBounds {
            offset: offset0.into(),
            size: size0.into(),
            len,
        });
    }

    cursor.seek_to(offset0.into())?;
    let body = cursor
        .read_bytes(size0 as usize)
        .map_err(|e| Error::from(e).with_context("level 0 body"))?;

    let mut bitstream = Vec::with_capacity(shared.len() + body.len());
    bitstream.extend_from_slice(&shared);
    bitstream.extend_from_slice(&body);

    let decoded = jpeg::decompress(&bitstream, header.alpha_bits == 0)?;

    let (width, height) = (header.width as usize, header.height as usize);
    if decoded.width as usize == width && decoded.height as usize == height {
        // Report per composed row even on the direct path so hosts can
        // cancel between rows.
        for y in 0..height {
            if !progress.on_progress(y as u32 + 1, height as u32) {
                return Err(Error::Cancelled);
            }
        }
        return Ok(decoded.rgba);
    }

    // Frame dimensions disagreeing with the container header happen in the
    // wild; compose the overlap onto a zeroed canvas of the declared size.
    warn!(
        "jpeg frame is {}x{} but header declares {}x{}",
        decoded.width, decoded.height, header.width, header.height
    );
    let mut rgba = vec![0u8; width * height * 4];
    let copy_w = width.min(decoded.width as usize);
    let copy_h = height.min(decoded.height as usize);
    for y in 0..height {
        if y < copy_h {
            let src = y * decoded.width as usize * 4;
            let dst = y * width * 4;
            rgba[dst..dst + copy_w * 4].copy_from_slice(&decoded.rgba[src..src + copy_w * 4]);
        }
        if !progress.on_progress(y as u32 + 1, height as u32) {
            return Err(Error::Cancelled);
        }
    }
    Ok(rgba)
}
