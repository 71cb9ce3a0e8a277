use crate::cmd::{CloseArgs, Globals};
use crate::exit::{client_error, CliResult, SUCCESS};

pub fn run(args: CloseArgs, globals: &Globals) -> CliResult<i32> {
    let mut client = globals.connect()?;
    client
        .close_image(&args.name)
        .map_err(|err| client_error("close failed", err))?;
    Ok(SUCCESS)
}
