//! The fixed 156-byte BLP1 header and its mipmap table.

/// Magic bytes every BLP1 file starts with.
pub const BLP1_MAGIC: [u8; 4] = *b"BLP1";

/// Size of the fixed header in bytes. Payloads never start before this.
pub const BLP_HEADER_SIZE: u32 = 156;

/// Number of mipmap slots in the header tables.
pub const MIPMAP_SLOTS: usize = 16;

/// Maximum width that a BLP image can have due to the limitation
/// of mipmap storage.
pub const BLP_MAX_WIDTH: u32 = 65535;
/// Maximum height that a BLP image can have due to the limitation
/// of mipmap storage.
pub const BLP_MAX_HEIGHT: u32 = 65535;

/// How the mipmap payloads are compressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Compression {
    /// Each level is a bare JPEG bitstream carrying raw B,G,R,A in its
    /// four component slots.
    Jpeg,
    /// Palette plus index plane plus optional packed alpha plane.
    Direct,
}

impl TryFrom<u32> for Compression {
    type Error = u32;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Compression::Jpeg),
            1 => Ok(Compression::Direct),
            other => Err(other),
        }
    }
}

impl From<Compression> for u32 {
    fn from(value: Compression) -> u32 {
        match value {
            Compression::Jpeg => 0,
            Compression::Direct => 1,
        }
    }
}

/// Parallel offset/size tables locating each mipmap level's payload.
///
/// Unused slots are zero in both arrays; populated slots start at index 0
/// and are contiguous until the first zero size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MipmapTable {
    /// Byte offsets to each mipmap level (up to 16)
    pub offsets: [u32; MIPMAP_SLOTS],
    /// Byte sizes of each mipmap level (up to 16)
    pub sizes: [u32; MIPMAP_SLOTS],
}

impl MipmapTable {
    /// Number of populated levels, counting from slot 0 until the first
    /// zero size.
    pub fn level_count(&self) -> usize {
        self.sizes.iter().take_while(|&&s| s > 0).count()
    }
}

/// Parsed BLP1 header. The field order strictly follows the on-disk
/// little-endian layout for easy encoding and decoding.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlpHeader {
    /// Compression tag for every mipmap payload.
    pub compression: Compression,
    /// Alpha channel depth: 0, 1, 4 or 8 bits per pixel.
    pub alpha_bits: u32,
    /// Image width in pixels, at least 1.
    pub width: u32,
    /// Image height in pixels, at least 1.
    pub height: u32,
    /// Opaque flag, round-tripped verbatim. Producers usually write 4 or 5.
    pub extra: u32,
    /// Opaque flag, round-tripped verbatim.
    pub has_mipmaps: u32,
    /// Offset/size tables for up to 16 mipmap levels.
    pub mipmaps: MipmapTable,
}

impl BlpHeader {
    /// Dimensions of mipmap level `i`: each axis halves per level and
    /// bottoms out at 1.
    pub fn mipmap_dimensions(&self, level: usize) -> (u32, u32) {
        (
            (self.width >> level).max(1),
            (self.height >> level).max(1),
        )
    }

    /// Pixel count of mipmap level `i`.
    pub fn mipmap_pixels(&self, level: usize) -> u32 {
        let (w, h) = self.mipmap_dimensions(level);
        w * h
    }

    /// Byte size of the packed alpha plane of mipmap level `i`.
    ///
    /// Returns `u64` because the maximal 65535x65535 plane at 8 bits
    /// does not fit 32-bit bit-count arithmetic.
    pub fn alpha_plane_size(&self, level: usize) -> u64 {
        crate::alpha::plane_size(u64::from(self.mipmap_pixels(level)), self.alpha_bits)
    }
}
