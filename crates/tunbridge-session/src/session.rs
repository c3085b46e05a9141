use std::io::{Read, Write};
use std::os::fd::AsRawFd;

use serde::Serialize;
use tracing::{debug, info};
use tunbridge_frame::{write_all, FrameConfig, FrameError, FrameReader, FrameWriter};
use tunbridge_transport::{wait_readable, Port, PortRole};

use crate::config::SessionConfig;
use crate::error::{Result, SessionError};
use crate::observer::{Direction, Transfer, TransferObserver};

/// Transfer counters for one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    /// Packets read from the device and framed onto the wire.
    pub device_to_wire: u64,
    /// Frames read from the wire and written to the device.
    pub wire_to_device: u64,
    /// Bytes put on the wire, prefixes included.
    pub bytes_to_wire: u64,
    /// Bytes written to the device.
    pub bytes_to_device: u64,
}

enum Flow {
    Continue,
    PeerClosed,
}

/// One device port paired with one wire port.
///
/// The wire is split into a read half and a write half (two handles on the
/// same connection). Everything is driven from [`Session::run`] on a single
/// thread; each wake of the readiness wait completes whole transfers only, so
/// no partial frame is ever carried from one iteration to the next.
pub struct Session<D, R, W, O> {
    device: D,
    reader: FrameReader<R>,
    writer: FrameWriter<W>,
    device_buf: Vec<u8>,
    observer: O,
    report_transfers: bool,
    stats: SessionStats,
}

impl<O: TransferObserver> Session<Port, Port, Port, O> {
    /// Build a session from an open device port and an established wire port.
    pub fn over_ports(
        device: Port,
        wire: Port,
        config: SessionConfig,
        observer: O,
    ) -> Result<Self> {
        let wire_tx = wire.try_clone()?;
        Self::new(device, wire, wire_tx, config, observer)
    }
}

impl<D, R, W, O> Session<D, R, W, O>
where
    D: Read + Write + AsRawFd,
    R: Read + AsRawFd,
    W: Write,
    O: TransferObserver,
{
    /// Create a session. `wire_rx` is what the readiness wait watches.
    ///
    /// `observer` only hears about transfers when `config.trace_transfers`
    /// is set.
    pub fn new(
        device: D,
        wire_rx: R,
        wire_tx: W,
        config: SessionConfig,
        observer: O,
    ) -> Result<Self> {
        config.validate()?;

        let reader = FrameReader::with_config(
            wire_rx,
            FrameConfig {
                max_payload_size: config.max_frame,
            },
        );
        let writer = FrameWriter::with_config(
            wire_tx,
            FrameConfig {
                max_payload_size: config.mtu,
            },
        );

        Ok(Self {
            device,
            reader,
            writer,
            device_buf: vec![0u8; config.mtu],
            observer,
            report_transfers: config.trace_transfers,
            stats: SessionStats::default(),
        })
    }

    /// Shuttle packets both ways until the peer closes the connection.
    ///
    /// Returns the final counters on an orderly close at a frame boundary.
    /// Any other ending is an error.
    pub fn run(mut self) -> Result<SessionStats> {
        let fds = [self.device.as_raw_fd(), self.reader.get_ref().as_raw_fd()];
        info!(mtu = self.device_buf.len(), "session running");

        loop {
            let [device_ready, wire_ready] = wait_readable(fds)?;

            if device_ready {
                self.device_to_wire()?;
            }

            if wire_ready {
                if let Flow::PeerClosed = self.wire_to_device()? {
                    break;
                }
            }
        }

        info!(
            device_to_wire = self.stats.device_to_wire,
            wire_to_device = self.stats.wire_to_device,
            "peer closed the connection"
        );
        Ok(self.stats)
    }

    fn device_to_wire(&mut self) -> Result<()> {
        let n = self
            .device
            .read(&mut self.device_buf)
            .map_err(|source| SessionError::Read {
                port: PortRole::Device,
                source,
            })?;

        let written = self
            .writer
            .send(&self.device_buf[..n])
            .map_err(|err| write_error(PortRole::Wire, err))?;

        self.stats.device_to_wire += 1;
        self.stats.bytes_to_wire += written as u64;
        if self.report_transfers {
            self.observer.on_transfer(&Transfer {
                direction: Direction::DeviceToWire,
                sequence: self.stats.device_to_wire,
                payload_len: n,
                written,
            });
        }
        Ok(())
    }

    fn wire_to_device(&mut self) -> Result<Flow> {
        let payload = match self.reader.read_frame() {
            Ok(payload) => payload,
            Err(FrameError::ConnectionClosed) => {
                debug!("end of stream at frame boundary");
                return Ok(Flow::PeerClosed);
            }
            Err(FrameError::Truncated { expected, received }) => {
                return Err(SessionError::Truncated { expected, received })
            }
            Err(FrameError::PayloadTooLarge { size, max }) => {
                return Err(SessionError::FrameTooLarge { size, max })
            }
            Err(FrameError::Io(source)) => {
                return Err(SessionError::Read {
                    port: PortRole::Wire,
                    source,
                })
            }
        };

        let written = write_all(&mut self.device, payload).map_err(|source| {
            SessionError::Write {
                port: PortRole::Device,
                source,
            }
        })?;

        self.stats.wire_to_device += 1;
        self.stats.bytes_to_device += written as u64;
        if self.report_transfers {
            self.observer.on_transfer(&Transfer {
                direction: Direction::WireToDevice,
                sequence: self.stats.wire_to_device,
                payload_len: payload.len(),
                written,
            });
        }
        Ok(Flow::Continue)
    }
}

fn write_error(port: PortRole, err: FrameError) -> SessionError {
    match err {
        FrameError::Io(source) => SessionError::Write { port, source },
        FrameError::PayloadTooLarge { size, max } => SessionError::FrameTooLarge { size, max },
        other => SessionError::Write {
            port,
            source: std::io::Error::other(other.to_string()),
        },
    }
}
