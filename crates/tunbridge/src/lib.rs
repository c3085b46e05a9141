//! Point-to-point tunnel between two virtual network interfaces.
//!
//! Packets read from a local TUN/TAP interface are length-prefixed and sent
//! over one TCP connection; frames arriving on that connection are written
//! back to the interface. One peer, one connection, one thread.
//!
//! # Crate Structure
//!
//! - [`transport`] — TUN/TAP and TCP ports, readiness wait
//! - [`frame`] — 2-byte length-prefix framing over a byte stream
//! - [`session`] — The multiplexing loop that joins a device and a wire

/// Re-export transport types.
pub mod transport {
    pub use tunbridge_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use tunbridge_frame::*;
}

/// Re-export session types.
pub mod session {
    pub use tunbridge_session::*;
}
