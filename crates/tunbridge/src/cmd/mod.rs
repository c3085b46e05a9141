use clap::{Args, Subcommand};
use tunbridge_frame::DEFAULT_MTU;
use tunbridge_transport::{DEFAULT_BIND_ADDR, DEFAULT_PORT};

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod connect;
pub mod listen;
pub mod tunnel;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Wait for the peer to connect, then run the tunnel (responder).
    Listen(ListenArgs),
    /// Connect to the peer, then run the tunnel (initiator).
    Connect(ConnectArgs),
    /// Show version information.
    Version(VersionArgs),
}

impl Command {
    /// Whether per-transfer debug reporting was requested.
    pub fn debug(&self) -> bool {
        match self {
            Command::Listen(args) => args.tunnel.debug,
            Command::Connect(args) => args.tunnel.debug,
            Command::Version(_) => false,
        }
    }
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Listen(args) => listen::run(args, format),
        Command::Connect(args) => connect::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Options shared by both roles.
#[derive(Args, Debug)]
pub struct TunnelArgs {
    /// Name of the TUN/TAP interface to attach to.
    #[arg(long, short = 'i', env = "TUNBRIDGE_IFACE", value_name = "IFACE")]
    pub interface: String,
    /// TCP port to listen on or connect to.
    #[arg(long, short = 'p', env = "TUNBRIDGE_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,
    /// Use a TAP (layer 2) interface instead of TUN (layer 3).
    #[arg(long, short = 'a')]
    pub tap: bool,
    /// Largest packet read from the interface in one go.
    #[arg(long, default_value_t = DEFAULT_MTU)]
    pub mtu: usize,
    /// Report every transfer (implies --log-level debug).
    #[arg(long, short = 'd')]
    pub debug: bool,
}

#[derive(Args, Debug)]
pub struct ListenArgs {
    #[command(flatten)]
    pub tunnel: TunnelArgs,
    /// Local address to listen on.
    #[arg(long, default_value = DEFAULT_BIND_ADDR)]
    pub bind: String,
}

#[derive(Args, Debug)]
pub struct ConnectArgs {
    #[command(flatten)]
    pub tunnel: TunnelArgs,
    /// Peer host name or address.
    pub host: String,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
