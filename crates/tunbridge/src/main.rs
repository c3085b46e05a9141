mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "tunbridge",
    version,
    about = "Point-to-point TUN/TAP tunnel over one TCP connection"
)]
struct Cli {
    /// End-of-session summary format (stdout).
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level.with_debug(cli.command.debug()));

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_listen_subcommand() {
        let cli = Cli::try_parse_from(["tunbridge", "listen", "-i", "tun0", "--port", "5555"])
            .expect("listen args should parse");

        match cli.command {
            Command::Listen(args) => {
                assert_eq!(args.tunnel.interface, "tun0");
                assert_eq!(args.tunnel.port, 5555);
                assert_eq!(args.bind, "0.0.0.0");
                assert_eq!(args.tunnel.mtu, 2000);
                assert!(!args.tunnel.tap);
            }
            other => panic!("expected listen, got {other:?}"),
        }
    }

    #[test]
    fn parses_connect_subcommand() {
        let cli = Cli::try_parse_from([
            "tunbridge",
            "connect",
            "-i",
            "tap3",
            "--tap",
            "-d",
            "192.0.2.10",
        ])
        .expect("connect args should parse");

        assert!(cli.command.debug());
        match cli.command {
            Command::Connect(args) => {
                assert_eq!(args.host, "192.0.2.10");
                assert_eq!(args.tunnel.port, 1234);
                assert!(args.tunnel.tap);
            }
            other => panic!("expected connect, got {other:?}"),
        }
    }

    #[test]
    fn connect_requires_host() {
        let err = Cli::try_parse_from(["tunbridge", "connect", "-i", "tun0"])
            .expect_err("missing host should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn rejects_unknown_subcommand() {
        let err = Cli::try_parse_from(["tunbridge", "serve", "-i", "tun0"])
            .expect_err("unknown subcommand should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidSubcommand);
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "tunbridge",
            "listen",
            "-i",
            "tun0",
            "--log-format",
            "json",
            "--format",
            "pretty",
        ])
        .expect("global flags should parse");
        assert!(matches!(cli.log_format, LogFormat::Json));
        assert!(matches!(cli.format, Some(OutputFormat::Pretty)));
    }
}
