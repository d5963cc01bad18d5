use anomaly_client::{Channel, Platform};
use anomaly_frame::{DEFAULT_MAX_PAYLOAD, HEADER_SIZE};

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("anomaly {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: anomaly");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "target: {}",
        option_env!("ANOMALY_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!("default_platform: {}", Platform::detect());
    println!("frame_header: {HEADER_SIZE} bytes");
    println!("max_payload: {DEFAULT_MAX_PAYLOAD} bytes");
    let channels: Vec<String> = Channel::ALL
        .iter()
        .map(|c| format!("{}={}", c.name(), c.id()))
        .collect();
    println!("channels: {}", channels.join(", "));

    Ok(SUCCESS)
}
