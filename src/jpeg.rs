//! JPEG adapter for BLP payloads.
//!
//! BLP1 JPEG levels are not JFIF images: the four component slots carry raw
//! B, G, R, A. Some producers still attach markers that would make a
//! standard decoder run a YCCK conversion, so the decode path pins the
//! color transform to plain CMYK before decompressing and undoes the
//! Adobe-style sample inversion the decoder applies to 4-component output.
//! The encode path mirrors this, and a final pass strips every
//! application/comment segment so the emitted bitstream carries neither a
//! JFIF APP0 nor an Adobe APP14 marker.

use jpeg_decoder::{ColorTransform, Decoder, PixelFormat};
use jpeg_encoder::{ColorType, Encoder, EncodingError, SamplingFactor};
use log::*;
use std::io::Cursor;

/// JPEG end-of-image marker.
const EOI: [u8; 2] = [0xFF, 0xD9];
/// Start-of-scan marker byte; entropy-coded data follows it.
const SOS: u8 = 0xDA;

/// A decompressed level, already converted to RGBA.
#[derive(Debug)]
pub(crate) struct DecodedJpeg {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Decompress one level's bitstream (shared header already prepended).
///
/// `opaque` forces alpha to 255, used when the container header declares
/// `alpha_bits == 0`.
pub(crate) fn decompress(data: &[u8], opaque: bool) -> Result<DecodedJpeg, jpeg_decoder::Error> {
    // Truncated streams get a synthetic end-of-image marker so the decoder
    // terminates cleanly instead of failing on the missing tail.
    let mut owned;
    let data = if data.ends_with(&EOI) {
        data
    } else {
        trace!("bitstream lacks EOI, appending synthetic marker");
        owned = Vec::with_capacity(data.len() + 2);
        owned.extend_from_slice(data);
        owned.extend_from_slice(&EOI);
        &owned
    };

    let mut decoder = Decoder::new(Cursor::new(data));
    decoder.read_info()?;
    let info = decoder
        .info()
        .ok_or_else(|| jpeg_decoder::Error::Format("missing frame info".to_owned()))?;

    if info.pixel_format == PixelFormat::CMYK32 {
        // Pin the transform so a stray JFIF/Adobe marker cannot trigger a
        // YCCK conversion; the components are raw BGRA.
        decoder.set_color_transform(ColorTransform::CMYK);
    }

    let pixels = decoder.decode()?;
    let (width, height) = (info.width as u32, info.height as u32);
    let n = width as usize * height as usize;
    let mut rgba = vec![0u8; n * 4];

    match info.pixel_format {
        PixelFormat::CMYK32 => {
            if pixels.len() < n * 4 {
                return Err(jpeg_decoder::Error::Format(
                    "CMYK32 output shorter than frame".to_owned(),
                ));
            }
            // The decoder hands 4-component output back inverted per the
            // Adobe convention; undoing that and swapping slots 0 and 2
            // turns the stored B,G,R,A into RGBA.
            for (out, px) in rgba.chunks_exact_mut(4).zip(pixels.chunks_exact(4)) {
                out[0] = 255 - px[2];
                out[1] = 255 - px[1];
                out[2] = 255 - px[0];
                out[3] = if opaque { 255 } else { 255 - px[3] };
            }
        }
        PixelFormat::RGB24 => {
            if pixels.len() < n * 3 {
                return Err(jpeg_decoder::Error::Format(
                    "RGB24 output shorter than frame".to_owned(),
                ));
            }
            // Rare 3-component payloads also store reversed component
            // order; opaque by definition.
            for (out, px) in rgba.chunks_exact_mut(4).zip(pixels.chunks_exact(3)) {
                out[0] = px[2];
                out[1] = px[1];
                out[2] = px[0];
                out[3] = 255;
            }
        }
        PixelFormat::L8 => {
            for (out, &l) in rgba.chunks_exact_mut(4).zip(pixels.iter()) {
                out[0] = l;
                out[1] = l;
                out[2] = l;
                out[3] = 255;
            }
        }
        PixelFormat::L16 => {
            for (out, px) in rgba.chunks_exact_mut(4).zip(pixels.chunks_exact(2)) {
                out[0] = px[0];
                out[1] = px[0];
                out[2] = px[0];
                out[3] = 255;
            }
        }
    }

    Ok(DecodedJpeg {
        width,
        height,
        rgba,
    })
}

/// Compress one RGBA level into a bare BLP JPEG bitstream.
///
/// Components are written in B,G,R,A order into the four CMYK slots at 1:1
/// sampling, baseline non-progressive. The encoder pre-inverts each sample
/// so the entropy-coded bytes on disk are the raw values, matching what
/// the format's decoders expect.
pub(crate) fn compress(
    rgba: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodingError> {
    debug_assert_eq!(rgba.len(), width as usize * height as usize * 4);

    let mut bgra = Vec::with_capacity(rgba.len());
    for px in rgba.chunks_exact(4) {
        bgra.push(255 - px[2]);
        bgra.push(255 - px[1]);
        bgra.push(255 - px[0]);
        bgra.push(255 - px[3]);
    }

    let mut out = Vec::new();
    let mut encoder = Encoder::new(&mut out, quality);
    encoder.set_sampling_factor(SamplingFactor::F_1_1);
    encoder.encode(&bgra, width as u16, height as u16, ColorType::Cmyk)?;

    Ok(strip_app_segments(&out))
}

/// Remove every APPn and COM segment from a JPEG bitstream.
///
/// Application segments before the start-of-scan are metadata only, so
/// dropping them cannot change decoded pixels; everything from the SOS
/// marker on is copied verbatim.
pub(crate) fn strip_app_segments(data: &[u8]) -> Vec<u8> {
    if data.len() < 2 || data[0] != 0xFF || data[1] != 0xD8 {
        return data.to_vec();
    }
    let mut out = Vec::with_capacity(data.len());
    out.extend_from_slice(&data[..2]);
    let mut pos = 2;
    while pos + 4 <= data.len() && data[pos] == 0xFF {
        let marker = data[pos + 1];
        if marker == SOS {
            out.extend_from_slice(&data[pos..]);
            return out;
        }
        let len = u16::from_be_bytes([data[pos + 2], data[pos + 3]]) as usize;
        let end = pos + 2 + len;
        if len < 2 || end > data.len() {
            break;
        }
        let skippable = (0xE0..=0xEF).contains(&marker) || marker == 0xFE;
        if !skippable {
            out.extend_from_slice(&data[pos..end]);
        }
        pos = end;
    }
    out.extend_from_slice(&data[pos..]);
    out
}

/// True when the bitstream contains the given marker byte at segment level
/// before the start of scan.
#[cfg(test)]
fn has_marker(data: &[u8], wanted: u8) -> bool {
    let mut pos = 2;
    while pos + 4 <= data.len() && data[pos] == 0xFF {
        let marker = data[pos + 1];
        if marker == wanted {
            return true;
        }
        if marker == SOS {
            return false;
        }
        let len = u16::from_be_bytes([data[pos + 2], data[pos + 3]]) as usize;
        pos += 2 + len;
    }
    false
}
