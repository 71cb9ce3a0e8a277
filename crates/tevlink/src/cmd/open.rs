use tracing::info;

use crate::cmd::{Globals, OpenArgs};
use crate::exit::{client_error, CliResult, SUCCESS};

pub fn run(args: OpenArgs, globals: &Globals) -> CliResult<i32> {
    let mut client = globals.connect()?;
    client
        .open_image(&args.path, &args.channel_selector, !args.no_focus)
        .map_err(|err| client_error("open failed", err))?;
    info!(path = %args.path, selector = %args.channel_selector, "image opened");
    Ok(SUCCESS)
}
