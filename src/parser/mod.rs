//! Decoding pipeline: header, palette or JPEG branch, RGBA composition.

mod direct;
/// Error types for BLP decoding operations
pub mod error;
mod header;
mod jpeg;
/// Type definitions used by the BLP decoder
pub mod types;

use crate::cursor::ByteCursor;
use crate::progress::{NoProgress, ProgressSink};
use crate::types::*;
use direct::parse_direct_content;
pub use error::{Error, LoadError};
pub use header::probe;
use header::parse_header;
use jpeg::parse_jpeg_content;
use std::io::{Read, Seek};
use std::path::Path;
use types::ParseResult;

/// Read a BLP file from the file system.
pub fn load_blp<Q>(path: Q) -> Result<DecodedImage, LoadError>
where
    Q: AsRef<Path>,
{
    let file = std::fs::File::open(&path)
        .map_err(|e| LoadError::FileSystem(path.as_ref().to_owned(), e))?;
    let image = decode_blp(std::io::BufReader::new(file))?;
    Ok(image)
}

/// Decode a BLP file held entirely in memory.
pub fn parse_blp(input: &[u8]) -> ParseResult<DecodedImage> {
    decode_blp(std::io::Cursor::new(input))
}

/// Decode a BLP file from a seekable stream.
///
/// Only mipmap level 0 is materialized; higher levels are downsampled
/// copies a renderer regenerates anyway.
pub fn decode_blp<S: Read + Seek>(stream: S) -> ParseResult<DecodedImage> {
    decode_blp_with_progress(stream, &mut NoProgress)
}

/// Decode with per-row progress reporting and cooperative cancellation.
///
/// The sink is called after every composed row with `(rows_done, height)`;
/// returning `false` aborts with [`Error::Cancelled`].
pub fn decode_blp_with_progress<S: Read + Seek>(
    stream: S,
    progress: &mut dyn ProgressSink,
) -> ParseResult<DecodedImage> {
    let mut cursor = ByteCursor::new(stream);

    let header = parse_header(&mut cursor).map_err(|e| e.with_context("header"))?;

    let (rgba, palette) = match header.compression {
        Compression::Direct => {
            let content = parse_direct_content(&header, &mut cursor, progress)
                .map_err(|e| e.with_context("direct content"))?;
            (content.rgba, Some(content.palette))
        }
        Compression::Jpeg => {
            let rgba = parse_jpeg_content(&header, &mut cursor, progress)
                .map_err(|e| e.with_context("jpeg content"))?;
            (rgba, None)
        }
    };

    Ok(DecodedImage::from_parts(
        header.width,
        header.height,
        rgba,
        palette,
        header.extra,
        header.has_mipmaps,
    ))
}
