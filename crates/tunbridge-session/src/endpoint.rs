use tracing::info;
use tunbridge_transport::{connect, Port, TcpAcceptor};

use crate::error::Result;

/// Which side opens the connection. The session loop itself is symmetric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Connects out to the peer.
    Initiator,
    /// Waits for the peer to connect in.
    Responder,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Initiator => f.write_str("initiator"),
            Role::Responder => f.write_str("responder"),
        }
    }
}

/// Where the wire port comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Connect to `host:port`.
    Connect { host: String, port: u16 },
    /// Listen on `bind:port` and accept one peer.
    Listen { bind: String, port: u16 },
}

impl Endpoint {
    pub fn role(&self) -> Role {
        match self {
            Endpoint::Connect { .. } => Role::Initiator,
            Endpoint::Listen { .. } => Role::Responder,
        }
    }
}

/// Open the wire port for `endpoint` (blocking until a peer is there).
pub fn establish(endpoint: &Endpoint) -> Result<Port> {
    let stream = match endpoint {
        Endpoint::Connect { host, port } => {
            let stream = connect(host, *port)?;
            info!(role = %endpoint.role(), %host, port, "connected to peer");
            stream
        }
        Endpoint::Listen { bind, port } => {
            let acceptor = TcpAcceptor::bind(bind, *port)?;
            let (stream, peer) = acceptor.accept()?;
            info!(role = %endpoint.role(), %peer, "peer connected");
            stream
        }
    };
    Ok(Port::wire(stream))
}
