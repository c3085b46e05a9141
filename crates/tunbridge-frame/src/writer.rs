use std::io::{ErrorKind, Write};

use bytes::BytesMut;
use tracing::trace;

use crate::codec::{encode_frame, FrameConfig, PREFIX_SIZE};
use crate::error::{FrameError, Result};

/// Write all of `buf`, looping over short writes.
///
/// A write that accepts zero bytes fails with `ErrorKind::WriteZero`.
/// Write errors are returned as-is; nothing is retried here.
pub fn write_all<W: Write + ?Sized>(dst: &mut W, buf: &[u8]) -> std::io::Result<usize> {
    let mut offset = 0usize;
    while offset < buf.len() {
        match dst.write(&buf[offset..])? {
            0 => {
                return Err(std::io::Error::new(
                    ErrorKind::WriteZero,
                    format!("wrote {offset} of {} bytes", buf.len()),
                ))
            }
            n => offset += n,
        }
    }
    Ok(offset)
}

/// Writes complete frames to any `Write` stream.
///
/// The prefix and payload are assembled in one reusable buffer and leave in
/// a single [`write_all`], so a frame is never half-written on success.
pub struct FrameWriter<T> {
    inner: T,
    buf: BytesMut,
    config: FrameConfig,
}

impl<T: Write> FrameWriter<T> {
    /// Create a new frame writer with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame writer with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(PREFIX_SIZE + config.max_payload_size),
            config,
        }
    }

    /// Encode and send one payload (blocking).
    ///
    /// Returns the number of bytes put on the wire, prefix included.
    pub fn send(&mut self, payload: &[u8]) -> Result<usize> {
        if payload.len() > self.config.max_payload_size {
            return Err(FrameError::PayloadTooLarge {
                size: payload.len(),
                max: self.config.max_payload_size,
            });
        }

        self.buf.clear();
        encode_frame(payload, &mut self.buf)?;
        let written = write_all(&mut self.inner, &self.buf)?;
        self.inner.flush()?;

        trace!(len = payload.len(), written, "frame sent");
        Ok(written)
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }
}
