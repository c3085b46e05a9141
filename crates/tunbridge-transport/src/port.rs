use std::io::{Read, Write};
use std::net::TcpStream;

use crate::error::Result;
use crate::tun::TunDevice;

/// Which side of the tunnel a port sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortRole {
    /// The virtual interface. Preserves packet boundaries per read.
    Device,
    /// The peer connection. A plain byte stream.
    Wire,
}

impl std::fmt::Display for PortRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PortRole::Device => f.write_str("device"),
            PortRole::Wire => f.write_str("wire"),
        }
    }
}

/// A duplex byte channel bound to one tunnel handle. Implements Read + Write.
///
/// `read` is a single underlying read (`read_some`); callers that need an
/// exact byte count or a complete write loop on top of it.
pub struct Port {
    role: PortRole,
    inner: PortInner,
}

enum PortInner {
    Tun(TunDevice),
    Tcp(TcpStream),
}

impl Port {
    /// Wrap a TUN/TAP device as the device port.
    pub fn device(dev: TunDevice) -> Self {
        Self {
            role: PortRole::Device,
            inner: PortInner::Tun(dev),
        }
    }

    /// Wrap an established connection as the wire port.
    pub fn wire(stream: TcpStream) -> Self {
        Self {
            role: PortRole::Wire,
            inner: PortInner::Tcp(stream),
        }
    }

    pub fn role(&self) -> PortRole {
        self.role
    }

    /// Try to clone this port (creates a new file descriptor).
    pub fn try_clone(&self) -> Result<Self> {
        let inner = match &self.inner {
            PortInner::Tun(dev) => PortInner::Tun(dev.try_clone()?),
            PortInner::Tcp(stream) => PortInner::Tcp(stream.try_clone()?),
        };
        Ok(Self {
            role: self.role,
            inner,
        })
    }
}

impl Read for Port {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            PortInner::Tun(dev) => dev.read(buf),
            PortInner::Tcp(stream) => stream.read(buf),
        }
    }
}

impl Write for Port {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            PortInner::Tun(dev) => dev.write(buf),
            PortInner::Tcp(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.inner {
            PortInner::Tun(dev) => dev.flush(),
            PortInner::Tcp(stream) => stream.flush(),
        }
    }
}

#[cfg(unix)]
impl std::os::fd::AsRawFd for Port {
    fn as_raw_fd(&self) -> std::os::fd::RawFd {
        match &self.inner {
            PortInner::Tun(dev) => dev.as_raw_fd(),
            PortInner::Tcp(stream) => stream.as_raw_fd(),
        }
    }
}

impl std::fmt::Debug for Port {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut dbg = f.debug_struct("Port");
        dbg.field("role", &self.role);
        match &self.inner {
            PortInner::Tun(dev) => dbg.field("interface", &dev.name()),
            PortInner::Tcp(stream) => dbg.field("peer", &stream.peer_addr().ok()),
        };
        dbg.finish()
    }
}
