use tracing::info;
use tunbridge_session::{establish, Endpoint, Session, SessionConfig, TracingObserver};
use tunbridge_transport::{Port, TunDevice, TunMode};

use crate::cmd::TunnelArgs;
use crate::exit::{session_error, transport_error, CliResult, SUCCESS};
use crate::output::{print_summary, OutputFormat};

/// Open the interface, establish the wire, and run one session to its end.
pub fn run(endpoint: &Endpoint, args: &TunnelArgs, format: OutputFormat) -> CliResult<i32> {
    let config = session_config(args);
    config
        .validate()
        .map_err(|err| session_error("invalid options", err))?;

    let device = TunDevice::open(&args.interface, tun_mode(args))
        .map_err(|err| transport_error("open interface failed", err))?;
    let interface = device.name().to_string();

    let wire = establish(endpoint).map_err(|err| session_error("connection failed", err))?;

    let session = Session::over_ports(Port::device(device), wire, config, TracingObserver)
        .map_err(|err| session_error("session setup failed", err))?;

    let stats = session
        .run()
        .map_err(|err| session_error("session failed", err))?;

    info!(%interface, "peer disconnected; tunnel closed");
    print_summary(endpoint.role(), &interface, &stats, format);
    Ok(SUCCESS)
}

fn session_config(args: &TunnelArgs) -> SessionConfig {
    SessionConfig {
        mtu: args.mtu,
        trace_transfers: args.debug,
        ..SessionConfig::default()
    }
}

fn tun_mode(args: &TunnelArgs) -> TunMode {
    if args.tap {
        TunMode::Tap
    } else {
        TunMode::Tun
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(tap: bool, debug: bool, mtu: usize) -> TunnelArgs {
        TunnelArgs {
            interface: "tb0".to_string(),
            port: 1234,
            tap,
            mtu,
            debug,
        }
    }

    #[test]
    fn flags_thread_into_session_config() {
        let config = session_config(&args(false, true, 1500));
        assert_eq!(config.mtu, 1500);
        assert!(config.trace_transfers);
        assert_eq!(config.max_frame, tunbridge_frame::MAX_PAYLOAD);
    }

    #[test]
    fn tap_flag_selects_layer_two() {
        assert_eq!(tun_mode(&args(true, false, 2000)), TunMode::Tap);
        assert_eq!(tun_mode(&args(false, false, 2000)), TunMode::Tun);
    }

    #[test]
    fn bad_mtu_fails_before_touching_the_device() {
        let endpoint = Endpoint::Connect {
            host: "127.0.0.1".to_string(),
            port: 1,
        };
        let err = run(&endpoint, &args(false, false, 100), OutputFormat::Json).unwrap_err();
        assert_eq!(err.code, crate::exit::USAGE);
        assert!(err.message.contains("mtu 100"));
    }
}
