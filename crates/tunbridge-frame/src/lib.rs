//! Length-prefixed packet framing over a byte stream.
//!
//! Every packet taken from the virtual interface travels as:
//! - A 2-byte big-endian payload length
//! - The payload, exactly as read from the interface
//!
//! Stream reads may come back short; the reader assembles exact byte counts
//! and tells a clean close at a frame boundary apart from a close mid-frame.

pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

pub use codec::{
    decode_frame, decode_prefix, encode_frame, FrameConfig, DEFAULT_MTU, MAX_PAYLOAD, MIN_MTU,
    PREFIX_SIZE,
};
pub use error::{FrameError, Result};
pub use reader::{read_exact, Fill, FrameReader};
pub use writer::{write_all, FrameWriter};
