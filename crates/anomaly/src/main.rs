mod cmd;
mod exit;
mod headless;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "anomaly", version, about = "Anomaly presentation client")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(
        long,
        value_name = "FORMAT",
        env = "ANOMALY_LOG_FORMAT",
        default_value = "text",
        global = true
    )]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        env = "ANOMALY_LOG_LEVEL",
        default_value = "info",
        global = true
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if err.use_stderr() => {
            let _ = err.print();
            std::process::exit(exit::USAGE);
        }
        Err(err) => err.exit(),
    };
    init_logging(cli.log_format, cli.log_level);

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
    use crate::cmd::ChannelArg;

    #[test]
    fn parses_connect_subcommand() {
        let cli = Cli::try_parse_from([
            "anomaly",
            "connect",
            "play.example.org",
            "--port",
            "4000",
            "--platform",
            "mobile",
            "--peer-timeout",
            "10s",
            "--max-ticks",
            "5",
        ])
        .expect("connect args should parse");

        let Command::Connect(args) = cli.command else {
            panic!("expected connect");
        };
        assert_eq!(args.host, "play.example.org");
        assert_eq!(args.port, 4000);
        assert_eq!(args.platform, Some(anomaly_client::Platform::Mobile));
        assert_eq!(args.peer_timeout.as_deref(), Some("10s"));
        assert_eq!(args.max_ticks, Some(5));
    }

    #[test]
    fn rejects_unknown_platform() {
        let err = Cli::try_parse_from(["anomaly", "connect", "localhost", "--platform", "tv"])
            .expect_err("unknown platform should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn rejects_zero_tick_rate() {
        let err = Cli::try_parse_from(["anomaly", "connect", "localhost", "--tick-rate", "0"])
            .expect_err("zero tick rate should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn parses_decode_with_channel_and_global_format() {
        let cli = Cli::try_parse_from([
            "anomaly",
            "decode",
            "scene.bin",
            "--channel",
            "sprite",
            "--format",
            "json",
        ])
        .expect("decode args should parse");

        assert_eq!(cli.format, Some(OutputFormat::Json));
        let Command::Decode(args) = cli.command else {
            panic!("expected decode");
        };
        assert_eq!(args.channel, Some(ChannelArg::Sprite));
    }
}
