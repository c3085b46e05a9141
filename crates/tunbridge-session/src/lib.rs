//! The tunnel session: one device port, one wire port, one loop.
//!
//! This is the "just works" layer. Establish the wire (connect or accept),
//! pair it with an open virtual interface, and run until the peer hangs up.

pub mod config;
pub mod endpoint;
pub mod error;
pub mod observer;
pub mod session;

pub use config::SessionConfig;
pub use endpoint::{establish, Endpoint, Role};
pub use error::{Result, SessionError};
pub use observer::{Direction, NoopObserver, Transfer, TracingObserver, TransferObserver};
pub use session::{Session, SessionStats};
