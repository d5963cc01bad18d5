use std::path::PathBuf;
use std::time::Duration;

use anomaly_client::Platform;
use clap::{Args, Subcommand, ValueEnum};

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod connect;
pub mod decode;
pub mod version;

/// Port used when none is given.
pub const DEFAULT_PORT: u16 = 17899;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Connect to a server and run the session headless.
    Connect(ConnectArgs),
    /// Decode captured messages and print their records.
    Decode(DecodeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Connect(args) => connect::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ConnectArgs {
    /// Server hostname or address.
    pub host: String,
    /// Server port.
    #[arg(long, short = 'p', env = "ANOMALY_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,
    /// Platform announced at login (desktop or mobile). Defaults to the build target.
    #[arg(long, env = "ANOMALY_PLATFORM")]
    pub platform: Option<Platform>,
    /// Give up connecting after this long (e.g. 5s, 500ms).
    #[arg(long, env = "ANOMALY_CONNECT_TIMEOUT", default_value = "5s")]
    pub connect_timeout: String,
    /// End the session when the server sends nothing for this long.
    #[arg(long, env = "ANOMALY_PEER_TIMEOUT")]
    pub peer_timeout: Option<String>,
    /// Ticks per second.
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=1000))]
    pub tick_rate: u32,
    /// Stop after this many ticks.
    #[arg(long)]
    pub max_ticks: Option<u64>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ChannelArg {
    Sprite,
    Command,
    Audio,
    Content,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// File holding one message payload, or a framed capture when
    /// `--channel` is omitted.
    pub file: PathBuf,
    /// Decode the file as a single payload for this channel.
    #[arg(long, short = 'c')]
    pub channel: Option<ChannelArg>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Parse `150ms`, `2s` or a bare number of seconds.
pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, millis) = if let Some(num) = input.strip_suffix("ms") {
        (num, true)
    } else if let Some(num) = input.strip_suffix('s') {
        (num, false)
    } else {
        (input, false)
    };

    let value: u64 = number
        .trim()
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    Ok(if millis {
        Duration::from_millis(value)
    } else {
        Duration::from_secs(value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_seconds_and_millis() {
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("150ms").unwrap(), Duration::from_millis(150));
        assert_eq!(parse_duration("3").unwrap(), Duration::from_secs(3));
    }

    #[test]
    fn parse_duration_rejects_invalid_values() {
        assert_eq!(parse_duration("0s").unwrap_err().code, USAGE);
        assert!(parse_duration("bad").is_err());
        assert!(parse_duration("").is_err());
    }
}
