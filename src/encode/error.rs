use thiserror::Error;

/// Errors that can occur during BLP encoding operations
#[derive(Debug, Error)]
pub enum Error {
    /// Image width exceeds the BLP format maximum of 65,535 pixels
    #[error("BLP supports width up to 65,535, the width: {0}")]
    WidthTooLarge(u32),
    /// Image height exceeds the BLP format maximum of 65,535 pixels
    #[error("BLP supports height up to 65,535, the height: {0}")]
    HeightTooLarge(u32),
    /// The requested mipmap level count is outside the 16 container slots
    #[error("Requested {0} mipmap levels, expected 1..=16")]
    InvalidMaxLevels(usize),
    /// JPEG quality outside the valid range
    #[error("JPEG quality {0} is outside 1..=100")]
    InvalidQuality(u8),
    /// The underlying JPEG library reported an unrecoverable condition
    #[error("JPEG codec failure: {0}")]
    Jpeg(#[from] jpeg_encoder::EncodingError),
    /// Disk-full or other I/O failure while writing
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The progress sink requested termination
    #[error("Encoding cancelled by the progress callback")]
    Cancelled,
    /// Filesystem operation failed
    #[error("Failed to proceed {0}, due: {1}")]
    FileSystem(std::path::PathBuf, std::io::Error),
}
