//! The canonical in-memory image the codec decodes to and encodes from.

use super::header::{BLP_MAX_HEIGHT, BLP_MAX_WIDTH};

/// Default `extra` flag for freshly built images, matching what common
/// producers write.
pub const DEFAULT_EXTRA: u32 = 4;
/// Default `has_mipmaps` flag for freshly built images.
pub const DEFAULT_HAS_MIPMAPS: u32 = 1;

/// An 8-bit-per-channel interleaved RGBA raster plus container metadata.
///
/// The raster is `width * height * 4` bytes, row-major top-to-bottom, with
/// alpha forced to 255 where the source carried none. The image exclusively
/// owns its raster. For DIRECT-mode files the palette that was read is kept
/// for informational round-trip; its entries are the on-disk
/// `(B, G, R, ignored)` quadruples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
    palette: Option<Vec<[u8; 4]>>,
    extra: u32,
    has_mipmaps: u32,
}

impl DecodedImage {
    /// Build an image from a raw RGBA raster.
    ///
    /// Returns `None` when a dimension is zero or beyond the container
    /// limit, or when the raster length is not `width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Option<Self> {
        if width == 0 || height == 0 || width > BLP_MAX_WIDTH || height > BLP_MAX_HEIGHT {
            return None;
        }
        if rgba.len() != width as usize * height as usize * 4 {
            return None;
        }
        Some(Self {
            width,
            height,
            rgba,
            palette: None,
            extra: DEFAULT_EXTRA,
            has_mipmaps: DEFAULT_HAS_MIPMAPS,
        })
    }

    pub(crate) fn from_parts(
        width: u32,
        height: u32,
        rgba: Vec<u8>,
        palette: Option<Vec<[u8; 4]>>,
        extra: u32,
        has_mipmaps: u32,
    ) -> Self {
        debug_assert_eq!(rgba.len(), width as usize * height as usize * 4);
        Self {
            width,
            height,
            rgba,
            palette,
            extra,
            has_mipmaps,
        }
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Interleaved RGBA raster, `width * height * 4` bytes.
    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    /// Consume the image, returning the raster.
    pub fn into_rgba(self) -> Vec<u8> {
        self.rgba
    }

    /// RGBA quadruple of the pixel at `(x, y)`.
    ///
    /// Returns `None` outside the raster.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([self.rgba[i], self.rgba[i + 1], self.rgba[i + 2], self.rgba[i + 3]])
    }

    /// The palette read from a DIRECT-mode file, if any.
    pub fn palette(&self) -> Option<&[[u8; 4]]> {
        self.palette.as_deref()
    }

    /// The `extra` header flag, preserved verbatim from decode.
    pub fn extra(&self) -> u32 {
        self.extra
    }

    /// The `has_mipmaps` header flag, preserved verbatim from decode.
    pub fn has_mipmaps(&self) -> u32 {
        self.has_mipmaps
    }

    /// Override the opaque header flags carried into the next encode.
    pub fn set_flags(&mut self, extra: u32, has_mipmaps: u32) {
        self.extra = extra;
        self.has_mipmaps = has_mipmaps;
    }

    /// True when at least one pixel has an alpha value other than 255.
    pub fn has_nontrivial_alpha(&self) -> bool {
        self.rgba.chunks_exact(4).any(|px| px[3] != 255)
    }
}
