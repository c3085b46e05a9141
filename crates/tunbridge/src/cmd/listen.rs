use tunbridge_session::Endpoint;

use crate::cmd::{tunnel, ListenArgs};
use crate::exit::CliResult;
use crate::output::OutputFormat;

pub fn run(args: ListenArgs, format: OutputFormat) -> CliResult<i32> {
    let endpoint = Endpoint::Listen {
        bind: args.bind,
        port: args.tunnel.port,
    };
    tunnel::run(&endpoint, &args.tunnel, format)
}
