use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("ringpipe {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: ringpipe");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "target: {}",
        option_env!("RINGPIPE_BUILD_TARGET").unwrap_or("unknown")
    );
    println!(
        "profile: {}",
        option_env!("RINGPIPE_BUILD_PROFILE").unwrap_or("unknown")
    );
    println!(
        "default_capacity: {}",
        ringpipe_buffer::DEFAULT_CAPACITY
    );
    println!(
        "native_delimiter: {}",
        ringpipe_frame::delimiter_name(ringpipe_frame::NATIVE)
    );

    Ok(SUCCESS)
}
