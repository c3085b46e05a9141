use std::fmt;
use std::io;

use tunbridge_session::SessionError;
use tunbridge_transport::TransportError;

// Exit codes: sysexits-style usage (64), plus transport/permission/data classes.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

fn code_for_kind(kind: io::ErrorKind) -> i32 {
    match kind {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::ConnectionRefused
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::BrokenPipe => TRANSPORT_ERROR,
        io::ErrorKind::NotFound | io::ErrorKind::AddrInUse => FAILURE,
        _ => INTERNAL,
    }
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::NameTooLong { .. } => CliError::new(USAGE, format!("{context}: {err}")),
        TransportError::Resolve { .. } | TransportError::Connect { .. } => {
            CliError::new(TRANSPORT_ERROR, format!("{context}: {err}"))
        }
        other => {
            let code = other
                .io_source()
                .map(|source| code_for_kind(source.kind()))
                .unwrap_or(INTERNAL);
            CliError::new(code, format!("{context}: {other}"))
        }
    }
}

pub fn session_error(context: &str, err: SessionError) -> CliError {
    match err {
        SessionError::Transport(err) => transport_error(context, err),
        SessionError::Config(_) => CliError::new(USAGE, format!("{context}: {err}")),
        ref violation if violation.is_protocol_violation() => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        SessionError::Read { ref source, .. } | SessionError::Write { ref source, .. } => {
            CliError::new(code_for_kind(source.kind()), format!("{context}: {err}"))
        }
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use tunbridge_transport::PortRole;

    use super::*;

    #[test]
    fn permission_denied_on_device_open() {
        let err = transport_error(
            "open interface failed",
            TransportError::OpenDevice {
                path: "/dev/net/tun",
                source: io::Error::from(io::ErrorKind::PermissionDenied),
            },
        );
        assert_eq!(err.code, PERMISSION_DENIED);
        assert!(err.message.starts_with("open interface failed: failed to open /dev/net/tun"));
    }

    #[test]
    fn long_interface_name_is_usage() {
        let err = transport_error(
            "open interface failed",
            TransportError::NameTooLong {
                name: "x".repeat(20),
                len: 20,
                max: 15,
            },
        );
        assert_eq!(err.code, USAGE);
    }

    #[test]
    fn protocol_violation_is_data_invalid() {
        let err = session_error(
            "session failed",
            SessionError::Truncated {
                expected: 100,
                received: 3,
            },
        );
        assert_eq!(err.code, DATA_INVALID);
        assert!(err.message.contains("3 of 100 bytes"));
    }

    #[test]
    fn wire_reset_names_operation_and_cause() {
        let err = session_error(
            "session failed",
            SessionError::Read {
                port: PortRole::Wire,
                source: io::Error::from(io::ErrorKind::ConnectionReset),
            },
        );
        assert_eq!(err.code, TRANSPORT_ERROR);
        assert!(err.message.contains("reading from wire failed"));
    }

    #[test]
    fn bad_config_is_usage() {
        let err = session_error(
            "invalid options",
            SessionError::Config("mtu 10 is below the minimum of 1500".to_string()),
        );
        assert_eq!(err.code, USAGE);
    }
}
