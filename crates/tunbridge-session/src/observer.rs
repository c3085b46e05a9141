//! Per-transfer reporting.
//!
//! The session never formats anything itself. When transfer tracing is
//! configured, it hands a [`Transfer`] to its observer after every completed
//! transfer.

use serde::Serialize;
use tracing::debug;


/// Direction of one transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    DeviceToWire,
    WireToDevice,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::DeviceToWire => "device_to_wire",
            Direction::WireToDevice => "wire_to_device",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One completed transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transfer {
    pub direction: Direction,
    /// Running count for this direction, starting at 1.
    pub sequence: u64,
    /// Packet size.
    pub payload_len: usize,
    /// Bytes handed to the destination port (prefix included on the wire).
    pub written: usize,
}

/// Receives a report after each completed transfer.
pub trait TransferObserver {
    fn on_transfer(&mut self, transfer: &Transfer);
}

impl<F> TransferObserver for F
where
    F: FnMut(&Transfer),
{
    fn on_transfer(&mut self, transfer: &Transfer) {
        self(transfer)
    }
}

/// Discards every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl TransferObserver for NoopObserver {
    fn on_transfer(&mut self, _transfer: &Transfer) {}
}

/// Emits one `debug` event per transfer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl TransferObserver for TracingObserver {
    fn on_transfer(&mut self, transfer: &Transfer) {
        debug!(
            direction = %transfer.direction,
            sequence = transfer.sequence,
            payload_len = transfer.payload_len,
            written = transfer.written,
            "transfer complete"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Transfer {
        Transfer {
            direction: Direction::WireToDevice,
            sequence: 3,
            payload_len: 84,
            written: 84,
        }
    }

    #[test]
    fn closures_are_observers() {
        let mut seen = Vec::new();
        {
            let mut observer = |t: &Transfer| seen.push(t.clone());
            observer.on_transfer(&sample());
        }
        assert_eq!(seen, vec![sample()]);
    }

    #[test]
    fn builtin_observers_accept_reports() {
        TracingObserver.on_transfer(&sample());
        NoopObserver.on_transfer(&sample());
    }

    #[test]
    fn transfer_serializes_with_snake_case_direction() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["direction"], "wire_to_device");
        assert_eq!(json["sequence"], 3);
    }
}
