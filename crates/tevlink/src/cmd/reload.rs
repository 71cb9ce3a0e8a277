use crate::cmd::{Globals, ReloadArgs};
use crate::exit::{client_error, CliResult, SUCCESS};

pub fn run(args: ReloadArgs, globals: &Globals) -> CliResult<i32> {
    let mut client = globals.connect()?;
    client
        .reload_image(&args.name, !args.no_focus)
        .map_err(|err| client_error("reload failed", err))?;
    Ok(SUCCESS)
}
