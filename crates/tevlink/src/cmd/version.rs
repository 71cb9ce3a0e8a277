use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("tevlink {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: tevlink");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "build_target: {}",
        option_env!("TEVLINK_BUILD_TARGET").unwrap_or("unknown")
    );
    println!(
        "build_profile: {}",
        option_env!("TEVLINK_BUILD_PROFILE").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!(
        "byte_order: {}",
        if cfg!(target_endian = "little") {
            "little"
        } else {
            "big"
        }
    );
    println!("default_viewer: {}:{}", tevlink_transport::DEFAULT_HOST, tevlink_transport::DEFAULT_PORT);
    println!("features: client=true, cli=true");

    Ok(SUCCESS)
}
