//! Encoder and decoder for BLP1 texture files.
//!
//! BLP1 is a mipmapped texture container with two payload flavors: JPEG
//! compressed levels whose four component slots carry raw B,G,R,A, and
//! DIRECT levels made of a palette, an index plane and an optional packed
//! alpha plane. This crate decodes either flavor into an 8-bit RGBA
//! raster and encodes rasters back, generating the mipmap chain.
//!
//! # Decoding
//!
//! ```no_run
//! let image = blp1::load_blp("war3mapMap.blp").unwrap();
//! println!("{}x{}", image.width(), image.height());
//! let rgba: &[u8] = image.rgba();
//! # let _ = rgba;
//! ```
//!
//! # Encoding
//!
//! ```no_run
//! use blp1::{DecodedImage, EncodeOptions, encode_blp};
//!
//! let image = DecodedImage::from_rgba(2, 2, vec![255u8; 16]).unwrap();
//! let mut file = std::fs::File::create("out.blp").unwrap();
//! encode_blp(&mut file, &image, &EncodeOptions::default()).unwrap();
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod alpha;
/// Seekable stream reading and writing utilities
pub mod cursor;
/// Encoding pipeline for producing BLP files
pub mod encode;
mod jpeg;
/// Mipmap chain generation
pub mod mipmap;
/// Decoding pipeline for reading BLP files
pub mod parser;
/// Progress reporting and cooperative cancellation
pub mod progress;
/// Type definitions shared by both pipelines
pub mod types;

pub use encode::{
    AlphaBits, DirectEncodeOptions, EncodeOptions, encode_blp, encode_blp_to_vec,
    encode_blp_with_progress, encode_direct_blp, save_blp,
};
pub use parser::{decode_blp, decode_blp_with_progress, load_blp, parse_blp, probe};
pub use progress::{NoProgress, ProgressSink};
pub use types::{BlpHeader, Compression, DecodedImage, MipmapTable};
