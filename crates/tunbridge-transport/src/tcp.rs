use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};

use tracing::{debug, info, warn};

use crate::error::{Result, TransportError};

/// Port used by both roles when none is given.
pub const DEFAULT_PORT: u16 = 1234;

/// Address the responder listens on when none is given.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";

/// Connect to `host:port` as the initiator.
///
/// Every resolved address (IPv4 and IPv6) is tried in order; the first one
/// that accepts wins.
pub fn connect(host: &str, port: u16) -> Result<TcpStream> {
    let target = format!("{host}:{port}");
    let addrs: Vec<SocketAddr> = (host, port)
        .to_socket_addrs()
        .map_err(|source| TransportError::Resolve {
            target: target.clone(),
            source,
        })?
        .collect();

    let mut last_err = std::io::Error::new(
        std::io::ErrorKind::AddrNotAvailable,
        "no addresses resolved",
    );
    for addr in addrs {
        match TcpStream::connect(addr) {
            Ok(stream) => {
                stream.set_nodelay(true)?;
                debug!(%addr, "connection established");
                return Ok(stream);
            }
            Err(err) => {
                warn!(%addr, error = %err, "connect attempt failed");
                last_err = err;
            }
        }
    }

    Err(TransportError::Connect {
        target,
        source: last_err,
    })
}

/// Listening socket for the responder role.
///
/// Accepts exactly the connections it is asked for; the tunnel only ever
/// asks for one.
pub struct TcpAcceptor {
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl TcpAcceptor {
    /// Bind and listen on `addr:port`.
    pub fn bind(addr: &str, port: u16) -> Result<Self> {
        let display = format!("{addr}:{port}");
        let listener = TcpListener::bind((addr, port)).map_err(|source| TransportError::Bind {
            addr: display.clone(),
            source,
        })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| TransportError::Bind {
                addr: display,
                source,
            })?;

        info!(%local_addr, "listening for peer");
        Ok(Self {
            listener,
            local_addr,
        })
    }

    /// Accept an incoming connection (blocking).
    ///
    /// Returns the stream together with the peer address reported by accept.
    pub fn accept(&self) -> Result<(TcpStream, SocketAddr)> {
        let (stream, peer) = self.listener.accept().map_err(TransportError::Accept)?;
        stream.set_nodelay(true)?;
        debug!(%peer, "accepted connection");
        Ok((stream, peer))
    }

    /// The address actually bound (useful with port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

impl std::fmt::Debug for TcpAcceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TcpAcceptor")
            .field("local_addr", &self.local_addr)
            .finish()
    }
}
