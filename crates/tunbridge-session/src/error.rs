use tunbridge_transport::PortRole;

/// Errors that end a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Transport-level error (establishment or readiness wait).
    #[error("transport error: {0}")]
    Transport(#[from] tunbridge_transport::TransportError),

    /// Reading from a port failed.
    #[error("reading from {port} failed: {source}")]
    Read {
        port: PortRole,
        source: std::io::Error,
    },

    /// Writing to a port failed.
    #[error("writing to {port} failed: {source}")]
    Write {
        port: PortRole,
        source: std::io::Error,
    },

    /// The peer closed the connection part-way through a frame.
    #[error("protocol violation: peer closed mid-frame ({received} of {expected} bytes)")]
    Truncated { expected: usize, received: usize },

    /// A frame exceeded the size this side accepts.
    #[error("protocol violation: frame of {size} bytes exceeds limit of {max}")]
    FrameTooLarge { size: usize, max: usize },

    /// The session configuration is unusable.
    #[error("invalid session config: {0}")]
    Config(String),
}

impl SessionError {
    /// True when the peer broke framing rather than an operation failing.
    pub fn is_protocol_violation(&self) -> bool {
        matches!(
            self,
            SessionError::Truncated { .. } | SessionError::FrameTooLarge { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
