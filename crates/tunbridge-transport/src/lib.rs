//! Ports for the tunnel: the virtual interface and the peer connection.
//!
//! Provides a uniform duplex byte channel over two different handle kinds:
//! - TUN/TAP devices (Linux, opened in "no packet information" mode)
//! - TCP streams (outbound connect or inbound accept)
//!
//! plus the blocking readiness wait that the session loop multiplexes on.
//! This is the lowest layer of tunbridge. Everything else builds on top of
//! the [`Port`] type provided here.

pub mod error;
pub mod port;
#[cfg(unix)]
pub mod readiness;
pub mod tcp;
pub mod tun;

pub use error::{Result, TransportError};
pub use port::{Port, PortRole};
#[cfg(unix)]
pub use readiness::wait_readable;
pub use tcp::{connect, TcpAcceptor, DEFAULT_BIND_ADDR, DEFAULT_PORT};
pub use tun::{TunDevice, TunMode, TUN_CLONE_DEVICE};
