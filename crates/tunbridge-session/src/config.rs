use tunbridge_frame::{DEFAULT_MTU, MAX_PAYLOAD, MIN_MTU};

use crate::error::{Result, SessionError};

/// Session behavior configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Largest single read taken from the device. Default: 2000.
    pub mtu: usize,
    /// Largest frame accepted from the wire. Default: 65535.
    pub max_frame: usize,
    /// Report every completed transfer through the observer.
    pub trace_transfers: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mtu: DEFAULT_MTU,
            max_frame: MAX_PAYLOAD,
            trace_transfers: false,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.mtu < MIN_MTU {
            return Err(SessionError::Config(format!(
                "mtu {} is below the minimum of {MIN_MTU}",
                self.mtu
            )));
        }
        if self.mtu > MAX_PAYLOAD {
            return Err(SessionError::Config(format!(
                "mtu {} does not fit a 16-bit length prefix",
                self.mtu
            )));
        }
        if self.max_frame > MAX_PAYLOAD {
            return Err(SessionError::Config(format!(
                "max_frame {} does not fit a 16-bit length prefix",
                self.max_frame
            )));
        }
        Ok(())
    }
}
