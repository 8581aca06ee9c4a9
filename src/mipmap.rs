//! Mipmap chain generation by area-box averaging.

use crate::types::MIPMAP_SLOTS;

/// One generated mipmap level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MipLevel {
    /// Level width in pixels.
    pub width: u32,
    /// Level height in pixels.
    pub height: u32,
    /// Interleaved RGBA raster.
    pub rgba: Vec<u8>,
}

/// Number of levels in the natural chain for the given root dimensions:
/// each axis halves until both reach 1, capped at the 16 container slots.
pub fn chain_length(width: u32, height: u32) -> usize {
    let mut levels = 1;
    let mut max_dim = width.max(height);
    while max_dim > 1 && levels < MIPMAP_SLOTS {
        max_dim /= 2;
        levels += 1;
    }
    levels
}

/// Dimensions of level `i` below a `width x height` root.
pub fn level_dimensions(width: u32, height: u32, level: usize) -> (u32, u32) {
    ((width >> level).max(1), (height >> level).max(1))
}

/// Downsample an RGBA raster with an area box filter.
///
/// For output pixel `(x, y)` the source window is
/// `[x*sw/dw, (x+1)*sw/dw) x [y*sh/dh, (y+1)*sh/dh)`, widened to at least
/// one source pixel per axis; each channel is the truncating integer mean
/// over the window, channels averaged independently.
pub fn downsample(src: &[u8], src_w: u32, src_h: u32, dst_w: u32, dst_h: u32) -> Vec<u8> {
    let (src_w, src_h) = (src_w as usize, src_h as usize);
    let (dst_w, dst_h) = (dst_w as usize, dst_h as usize);
    let mut dst = vec![0u8; dst_w * dst_h * 4];

    for y in 0..dst_h {
        let start_y = y * src_h / dst_h;
        let mut end_y = (y + 1) * src_h / dst_h;
        if end_y <= start_y {
            end_y = start_y + 1;
        }
        for x in 0..dst_w {
            let start_x = x * src_w / dst_w;
            let mut end_x = (x + 1) * src_w / dst_w;
            if end_x <= start_x {
                end_x = start_x + 1;
            }

            let mut sums = [0u64; 4];
            let mut count = 0u64;
            for sy in start_y..end_y.min(src_h) {
                for sx in start_x..end_x.min(src_w) {
                    let i = (sy * src_w + sx) * 4;
                    sums[0] += src[i] as u64;
                    sums[1] += src[i + 1] as u64;
                    sums[2] += src[i + 2] as u64;
                    sums[3] += src[i + 3] as u64;
                    count += 1;
                }
            }

            if count > 0 {
                let o = (y * dst_w + x) * 4;
                dst[o] = (sums[0] / count) as u8;
                dst[o + 1] = (sums[1] / count) as u8;
                dst[o + 2] = (sums[2] / count) as u8;
                dst[o + 3] = (sums[3] / count) as u8;
            }
        }
    }
    dst
}

/// Generate the mipmap pyramid for a level-0 raster.
///
/// Produces `min(chain_length, max_levels)` levels, level 0 being a copy of
/// the input. `max_levels` is clamped to `1..=16` by the caller.
pub fn generate_chain(rgba: &[u8], width: u32, height: u32, max_levels: usize) -> Vec<MipLevel> {
    let count = chain_length(width, height).min(max_levels).max(1);
    let mut levels = Vec::with_capacity(count);
    levels.push(MipLevel {
        width,
        height,
        rgba: rgba.to_vec(),
    });
    for i in 1..count {
        let (w, h) = level_dimensions(width, height, i);
        let prev = &levels[i - 1];
        let rgba = downsample(&prev.rgba, prev.width, prev.height, w, h);
        levels.push(MipLevel {
            width: w,
            height: h,
            rgba,
        });
    }
    levels
}
