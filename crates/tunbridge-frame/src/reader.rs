use std::io::Read;

use tracing::trace;

use crate::codec::{decode_prefix, FrameConfig, PREFIX_SIZE};
use crate::error::{FrameError, Result};

/// Outcome of [`read_exact`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    /// The buffer was filled completely.
    Complete,
    /// The stream reported end-of-stream after `received` bytes.
    EndOfStream { received: usize },
}

/// Fill `buf` completely from `src`, issuing as many reads as it takes.
///
/// A zero-byte read is end-of-stream, reported together with how far the
/// buffer got. An empty `buf` is complete without touching the stream.
/// Read errors are returned as-is; nothing is retried here.
pub fn read_exact<R: Read + ?Sized>(src: &mut R, buf: &mut [u8]) -> std::io::Result<Fill> {
    let mut filled = 0usize;
    while filled < buf.len() {
        let n = src.read(&mut buf[filled..])?;
        if n == 0 {
            return Ok(Fill::EndOfStream { received: filled });
        }
        filled += n;
    }
    Ok(Fill::Complete)
}

/// Reads complete frames from any `Read` stream.
///
/// Handles partial reads internally; callers always get complete payloads.
/// The payload buffer is owned by the reader and reused for every frame.
pub struct FrameReader<T> {
    inner: T,
    buf: Vec<u8>,
    config: FrameConfig,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            buf: Vec::new(),
            config,
        }
    }

    /// Read the next complete frame payload (blocking).
    ///
    /// Returns `Err(FrameError::ConnectionClosed)` when the stream ends
    /// before the first prefix byte, and `Err(FrameError::Truncated)` when
    /// it ends anywhere after that but before the payload is complete.
    pub fn read_frame(&mut self) -> Result<&[u8]> {
        let mut prefix = [0u8; PREFIX_SIZE];
        match read_exact(&mut self.inner, &mut prefix)? {
            Fill::Complete => {}
            Fill::EndOfStream { received: 0 } => return Err(FrameError::ConnectionClosed),
            Fill::EndOfStream { received } => {
                return Err(FrameError::Truncated {
                    expected: PREFIX_SIZE,
                    received,
                })
            }
        }

        let len = decode_prefix(prefix) as usize;
        if len > self.config.max_payload_size {
            return Err(FrameError::PayloadTooLarge {
                size: len,
                max: self.config.max_payload_size,
            });
        }

        if self.buf.len() < len {
            self.buf.resize(len, 0);
        }
        match read_exact(&mut self.inner, &mut self.buf[..len])? {
            Fill::Complete => {
                trace!(len, "frame received");
                Ok(&self.buf[..len])
            }
            Fill::EndOfStream { received } => Err(FrameError::Truncated {
                expected: len,
                received,
            }),
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }
}
