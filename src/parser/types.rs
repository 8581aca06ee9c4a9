pub use super::error::Error;

/// Result type for BLP decoding operations
pub type ParseResult<T> = Result<T, Error>;
