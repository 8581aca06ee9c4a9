//! Encoding pipeline: mipmap generation, per-level compression, two-pass
//! header write.

/// Error types for BLP encoding operations
pub mod error;
mod header;

use crate::alpha;
use crate::cursor::ByteCursor;
use crate::jpeg;
use crate::mipmap::{self, MipLevel};
use crate::progress::{NoProgress, ProgressSink};
use crate::types::*;
use color_quant::NeuQuant;
use header::{write_header, write_placeholder};
use log::*;
use std::collections::HashMap;
use std::io::{Seek, Write};
use std::path::Path;

pub use error::Error;

/// Alpha depth selection for the DIRECT-mode encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlphaBits {
    /// No alpha plane, every pixel opaque.
    NoAlpha,
    /// 1-bit alpha, LSB-first within each byte.
    Bit1,
    /// 4-bit alpha, even pixel in the high nibble.
    Bit4,
    /// One alpha byte per pixel.
    #[default]
    Bit8,
}

impl AlphaBits {
    /// The header's `alpha_bits` value for this depth.
    pub fn bits(self) -> u32 {
        match self {
            AlphaBits::NoAlpha => 0,
            AlphaBits::Bit1 => 1,
            AlphaBits::Bit4 => 4,
            AlphaBits::Bit8 => 8,
        }
    }
}

/// Options for the JPEG-mode encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Upper bound on generated mipmap levels, `1..=16`. The natural chain
    /// may be shorter.
    pub max_levels: usize,
    /// JPEG quality, `1..=100`.
    pub quality: u8,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            max_levels: MIPMAP_SLOTS,
            quality: 85,
        }
    }
}

/// Options for the DIRECT-mode encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectEncodeOptions {
    /// Alpha plane depth.
    pub alpha_bits: AlphaBits,
    /// Upper bound on mipmap levels, `1..=16`.
    pub max_levels: usize,
}

impl Default for DirectEncodeOptions {
    fn default() -> Self {
        Self {
            alpha_bits: AlphaBits::Bit8,
            max_levels: 1,
        }
    }
}

/// Encode an image as a JPEG-mode BLP1 file onto a seekable stream.
///
/// Writes a placeholder header, a zero-length shared JPEG header, then
/// each mipmap level as a self-contained bare bitstream, and finally
/// rewinds to write the real header with the filled offset/size tables.
pub fn encode_blp<S: Write + Seek>(
    stream: S,
    image: &DecodedImage,
    options: &EncodeOptions,
) -> Result<(), Error> {
    encode_blp_with_progress(stream, image, options, &mut NoProgress)
}

/// [`encode_blp`] with per-level progress reporting and cancellation.
pub fn encode_blp_with_progress<S: Write + Seek>(
    stream: S,
    image: &DecodedImage,
    options: &EncodeOptions,
    progress: &mut dyn ProgressSink,
) -> Result<(), Error> {
    validate_dimensions(image)?;
    if !(1..=MIPMAP_SLOTS).contains(&options.max_levels) {
        return Err(Error::InvalidMaxLevels(options.max_levels));
    }
    if !(1..=100).contains(&options.quality) {
        return Err(Error::InvalidQuality(options.quality));
    }

    let mut cursor = ByteCursor::new(stream);
    write_placeholder(&mut cursor)?;
    // Zero-length shared header sentinel; every level carries a complete
    // bitstream of its own.
    cursor.write_u32_le(0)?;

    let levels = mipmap::generate_chain(
        image.rgba(),
        image.width(),
        image.height(),
        options.max_levels,
    );
    trace!("encoding {} jpeg level(s)", levels.len());

    let mut table = MipmapTable::default();
    let mut current = BLP_HEADER_SIZE + 4;
    for (i, level) in levels.iter().enumerate() {
        let bitstream = jpeg::compress(&level.rgba, level.width, level.height, options.quality)?;
        table.offsets[i] = current;
        table.sizes[i] = bitstream.len() as u32;
        cursor.write_bytes(&bitstream)?;
        current += bitstream.len() as u32;
        if !progress.on_progress(i as u32 + 1, levels.len() as u32) {
            return Err(Error::Cancelled);
        }
    }

    let header = BlpHeader {
        compression: Compression::Jpeg,
        alpha_bits: if image.has_nontrivial_alpha() { 8 } else { 0 },
        width: image.width(),
        height: image.height(),
        extra: image.extra(),
        has_mipmaps: image.has_mipmaps(),
        mipmaps: table,
    };
    write_header(&mut cursor, &header)?;
    Ok(())
}

/// Encode an image as a DIRECT-mode BLP1 file onto a seekable stream.
///
/// The palette holds the image's distinct colors in first-seen order;
/// images with more than 256 distinct colors are quantized first. Only the
/// used palette prefix is written, so `offsets[0] = 156 + 4 * palette_len`.
pub fn encode_direct_blp<S: Write + Seek>(
    stream: S,
    image: &DecodedImage,
    options: &DirectEncodeOptions,
) -> Result<(), Error> {
    validate_dimensions(image)?;
    if !(1..=MIPMAP_SLOTS).contains(&options.max_levels) {
        return Err(Error::InvalidMaxLevels(options.max_levels));
    }

    let palette = build_palette(image.rgba());
    let mut lookup = HashMap::new();
    for (i, entry) in palette.iter().enumerate() {
        // First-seen entry wins for duplicate colors.
        lookup.entry([entry[2], entry[1], entry[0]]).or_insert(i as u8);
    }

    let levels = mipmap::generate_chain(
        image.rgba(),
        image.width(),
        image.height(),
        options.max_levels,
    );

    let mut cursor = ByteCursor::new(stream);
    write_placeholder(&mut cursor)?;
    for entry in &palette {
        cursor.write_bytes(entry)?;
    }

    let mut table = MipmapTable::default();
    let mut current = BLP_HEADER_SIZE + palette.len() as u32 * 4;
    for (i, level) in levels.iter().enumerate() {
        let (indices, alphas) = map_level(level, &palette, &lookup);
        let packed = alpha::pack_plane(&alphas, options.alpha_bits.bits());
        table.offsets[i] = current;
        table.sizes[i] = (indices.len() + packed.len()) as u32;
        cursor.write_bytes(&indices)?;
        cursor.write_bytes(&packed)?;
        current += table.sizes[i];
    }

    let header = BlpHeader {
        compression: Compression::Direct,
        alpha_bits: options.alpha_bits.bits(),
        width: image.width(),
        height: image.height(),
        extra: image.extra(),
        has_mipmaps: image.has_mipmaps(),
        mipmaps: table,
    };
    write_header(&mut cursor, &header)?;
    Ok(())
}

/// Encode into a memory buffer with the JPEG-mode pipeline.
pub fn encode_blp_to_vec(image: &DecodedImage, options: &EncodeOptions) -> Result<Vec<u8>, Error> {
    let mut buffer = std::io::Cursor::new(Vec::new());
    encode_blp(&mut buffer, image, options)?;
    Ok(buffer.into_inner())
}

/// Save an image as a JPEG-mode BLP file with default options.
pub fn save_blp<Q>(image: &DecodedImage, path: Q) -> Result<(), Error>
where
    Q: AsRef<Path>,
{
    let file = std::fs::File::create(&path)
        .map_err(|e| Error::FileSystem(path.as_ref().to_owned(), e))?;
    encode_blp(
        std::io::BufWriter::new(file),
        image,
        &EncodeOptions::default(),
    )
}

fn validate_dimensions(image: &DecodedImage) -> Result<(), Error> {
    if image.width() > BLP_MAX_WIDTH {
        return Err(Error::WidthTooLarge(image.width()));
    }
    if image.height() > BLP_MAX_HEIGHT {
        return Err(Error::HeightTooLarge(image.height()));
    }
    Ok(())
}

/// Palette of distinct colors as on-disk `(B, G, R, 0)` quadruples, in
/// first-seen order, quantized when the image has more than 256.
fn build_palette(rgba: &[u8]) -> Vec<[u8; 4]> {
    let mut seen = HashMap::new();
    let mut palette = Vec::new();
    for px in rgba.chunks_exact(4) {
        let key = [px[0], px[1], px[2]];
        if seen.insert(key, ()).is_none() {
            palette.push([px[2], px[1], px[0], 0]);
            if palette.len() > 256 {
                break;
            }
        }
    }
    if palette.len() <= 256 {
        return palette;
    }

    warn!("image has more than 256 distinct colors, quantizing palette");
    let quant = NeuQuant::new(10, 256, rgba);
    quant
        .color_map_rgba()
        .chunks_exact(4)
        .map(|c| [c[2], c[1], c[0], 0])
        .collect()
}

/// Map one mipmap level onto the palette, returning the index plane and
/// the per-pixel alpha values.
fn map_level(
    level: &MipLevel,
    palette: &[[u8; 4]],
    lookup: &HashMap<[u8; 3], u8>,
) -> (Vec<u8>, Vec<u8>) {
    let pixels = level.width as usize * level.height as usize;
    let mut indices = Vec::with_capacity(pixels);
    let mut alphas = Vec::with_capacity(pixels);
    for px in level.rgba.chunks_exact(4) {
        let index = lookup
            .get(&[px[0], px[1], px[2]])
            .copied()
            .unwrap_or_else(|| nearest_index(palette, px[0], px[1], px[2]));
        indices.push(index);
        alphas.push(px[3]);
    }
    (indices, alphas)
}

/// Index of the palette entry closest to the color, squared RGB distance.
fn nearest_index(palette: &[[u8; 4]], r: u8, g: u8, b: u8) -> u8 {
    let mut best = 0usize;
    let mut best_dist = u32::MAX;
    for (i, entry) in palette.iter().enumerate() {
        let dr = entry[2] as i32 - r as i32;
        let dg = entry[1] as i32 - g as i32;
        let db = entry[0] as i32 - b as i32;
        let dist = (dr * dr + dg * dg + db * db) as u32;
        if dist < best_dist {
            best_dist = dist;
            best = i;
        }
    }
    best as u8
}
