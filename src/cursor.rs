//! Endian-aware reads and writes over a seekable byte stream.
//!
//! The whole container is little-endian, so only `u32` little-endian
//! primitives are provided besides raw byte transfers. Short reads surface
//! as [`std::io::ErrorKind::UnexpectedEof`] and short writes as
//! [`std::io::ErrorKind::WriteZero`], which the pipelines map onto the
//! short-read / short-write error kinds.

use std::io::{Read, Result, Seek, SeekFrom, Write};

/// A cursor wrapping an opaque seekable stream.
///
/// Both pipelines address the file in absolute offsets, so the cursor only
/// exposes absolute seeks.
pub struct ByteCursor<S> {
    inner: S,
}

impl<S> ByteCursor<S> {
    /// Wrap a stream. The stream position is taken as-is.
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    /// Unwrap the cursor, returning the underlying stream.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Seek> ByteCursor<S> {
    /// Seek to an absolute byte offset.
    pub fn seek_to(&mut self, offset: u64) -> Result<()> {
        self.inner.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    /// Total stream length in bytes. Restores the current position.
    pub fn stream_len(&mut self) -> Result<u64> {
        let pos = self.inner.stream_position()?;
        let len = self.inner.seek(SeekFrom::End(0))?;
        self.inner.seek(SeekFrom::Start(pos))?;
        Ok(len)
    }

    /// Current absolute position.
    pub fn position(&mut self) -> Result<u64> {
        self.inner.stream_position()
    }
}

impl<S: Read> ByteCursor<S> {
    /// Read exactly `buf.len()` bytes into a pre-allocated buffer.
    pub fn read_into(&mut self, buf: &mut [u8]) -> Result<()> {
        self.inner.read_exact(buf)
    }

    /// Read exactly `n` bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; n];
        self.inner.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Read a single unsigned 32-bit integer in little-endian format.
    pub fn read_u32_le(&mut self) -> Result<u32> {
        let mut bytes = [0u8; 4];
        self.inner.read_exact(&mut bytes)?;
        Ok(u32::from_le_bytes(bytes))
    }
}

impl<S: Write> ByteCursor<S> {
    /// Write all of `buf`.
    pub fn write_bytes(&mut self, buf: &[u8]) -> Result<()> {
        self.inner.write_all(buf)
    }

    /// Write a single unsigned 32-bit integer in little-endian format.
    pub fn write_u32_le(&mut self, value: u32) -> Result<()> {
        self.inner.write_all(&value.to_le_bytes())
    }
}

/// Helper to read an array of `u32` values.
pub fn read_u32_array<S: Read>(cursor: &mut ByteCursor<S>, count: usize) -> Result<Vec<u32>> {
    let mut values = Vec::with_capacity(count);
    for _ in 0..count {
        values.push(cursor.read_u32_le()?);
    }
    Ok(values)
}
