/// Errors that can occur while acquiring or waiting on tunnel ports.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The interface name does not fit in `IFNAMSIZ`.
    #[error("interface name too long ({len} bytes, max {max}): {name}")]
    NameTooLong {
        name: String,
        len: usize,
        max: usize,
    },

    /// Failed to open the TUN/TAP clone device.
    #[error("failed to open {path}: {source}")]
    OpenDevice {
        path: &'static str,
        source: std::io::Error,
    },

    /// The `TUNSETIFF` ioctl was refused.
    #[error("failed to attach to interface {name:?}: {source}")]
    Attach {
        name: String,
        source: std::io::Error,
    },

    /// Host name resolution failed.
    #[error("failed to resolve {target}: {source}")]
    Resolve {
        target: String,
        source: std::io::Error,
    },

    /// Failed to bind the listening socket.
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    /// No resolved address accepted the connection.
    #[error("failed to connect to {target}: {source}")]
    Connect {
        target: String,
        source: std::io::Error,
    },

    /// Failed to accept an incoming connection.
    #[error("failed to accept connection: {0}")]
    Accept(std::io::Error),

    /// The readiness wait failed for a reason other than interruption.
    #[error("readiness wait failed: {0}")]
    Poll(std::io::Error),

    /// An I/O error occurred on a port.
    #[error("port I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    /// The underlying OS error, when there is one.
    pub fn io_source(&self) -> Option<&std::io::Error> {
        match self {
            TransportError::NameTooLong { .. } => None,
            TransportError::OpenDevice { source, .. }
            | TransportError::Attach { source, .. }
            | TransportError::Resolve { source, .. }
            | TransportError::Bind { source, .. }
            | TransportError::Connect { source, .. } => Some(source),
            TransportError::Accept(source)
            | TransportError::Poll(source)
            | TransportError::Io(source) => Some(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;
