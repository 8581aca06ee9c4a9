use thiserror::Error;

/// Errors that appear when loading from the filesystem
#[derive(Debug, Error)]
pub enum LoadError {
    /// Parsing error with description
    #[error("{0}")]
    Parsing(#[from] Error),
    /// File system error when reading the BLP file
    #[error("File system error with file {0}, due: {1}")]
    FileSystem(std::path::PathBuf, std::io::Error),
}

/// Errors that the BLP decoder can produce
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid magic bytes in the BLP header
    #[error("Unexpected magic value {0:?}. The file format is not BLP1.")]
    WrongMagic([u8; 4]),
    /// Unsupported compression tag in the header
    #[error("Unsupported compression tag: {0}, expected 0 (jpeg) or 1 (direct)")]
    UnsupportedCompression(u32),
    /// Unsupported alpha channel depth in the header
    #[error("Unsupported alpha depth: {0}, expected 0, 1, 4 or 8")]
    UnsupportedAlphaBits(u32),
    /// Dimensions outside the range the container can carry
    #[error("Image dimensions {0}x{1} are outside the supported range")]
    InvalidDimensions(u32, u32),
    /// Image data extends beyond file boundaries
    #[error("Part of image exceeds bounds of file at offset {offset} with size {size}, file length {len}")]
    OutOfBounds {
        /// Offset where the out of bounds access occurred
        offset: u64,
        /// Size of data that was attempted to be read
        size: u64,
        /// Total length of the file
        len: u64,
    },
    /// The palette area between header and first mipmap is malformed
    #[error("Malformed palette area, first mipmap offset {0} lies before the header end")]
    MalformedPalette(u32),
    /// The underlying JPEG library reported an unrecoverable condition
    #[error("JPEG codec failure: {0}")]
    Jpeg(#[from] jpeg_decoder::Error),
    /// Unexpected end of file or other I/O failure while reading
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The progress sink requested termination
    #[error("Decoding cancelled by the progress callback")]
    Cancelled,
    /// Decoder error with context information
    #[error("Context: {0}. Error: {1}")]
    Context(String, Box<Self>),
}

impl Error {
    /// Add context information to an error
    pub fn with_context(self, context: &str) -> Self {
        Error::Context(context.to_owned(), Box::new(self))
    }

    /// The innermost error, unwrapping any context layers.
    pub fn root_cause(&self) -> &Self {
        match self {
            Error::Context(_, inner) => inner.root_cause(),
            other => other,
        }
    }
}
