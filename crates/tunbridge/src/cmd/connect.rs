use tunbridge_session::Endpoint;

use crate::cmd::{tunnel, ConnectArgs};
use crate::exit::CliResult;
use crate::output::OutputFormat;

pub fn run(args: ConnectArgs, format: OutputFormat) -> CliResult<i32> {
    let endpoint = Endpoint::Connect {
        host: args.host,
        port: args.tunnel.port,
    };
    tunnel::run(&endpoint, &args.tunnel, format)
}
