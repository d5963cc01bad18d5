use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anomaly_client::{Client, ClientConfig, Platform, Renderer, Window};
use tracing::info;

use crate::cmd::{parse_duration, ConnectArgs};
use crate::exit::{client_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::headless::{HeadlessAudio, HeadlessRenderer};
use crate::output::{print_session, OutputFormat, SessionOutput};

pub fn run(args: ConnectArgs, format: OutputFormat) -> CliResult<i32> {
    let config = build_config(&args)?;
    let platform = config.platform;

    let mut renderer = HeadlessRenderer::default();
    let mut audio = HeadlessAudio::default();
    let mut client = Client::init(renderer.window(), config)
        .map_err(|err| client_error("client setup failed", err))?;

    if let Err(err) = client.try_connect(&args.host, args.port) {
        renderer.window().show_error(&err.to_string());
        return Err(client_error("connect failed", err));
    }

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let period = Duration::from_secs(1) / args.tick_rate;
    let ended = loop {
        if !running.load(Ordering::SeqCst) {
            client.disconnect();
            break "interrupted";
        }
        if args
            .max_ticks
            .is_some_and(|max| client.stats().ticks >= max)
        {
            client.disconnect();
            break "max_ticks";
        }

        let started = Instant::now();
        let open = client
            .tick(&mut renderer, &mut audio)
            .map_err(|err| client_error("session failed", err))?;
        if !open {
            break "server";
        }
        if let Some(rest) = period.checked_sub(started.elapsed()) {
            thread::sleep(rest);
        }
    };

    info!(ended, frames = renderer.frames(), "session finished");
    let out = SessionOutput::new(
        &args.host,
        args.port,
        platform.to_string(),
        ended,
        client.stats(),
    );
    print_session(&out, format);

    Ok(SUCCESS)
}

fn build_config(args: &ConnectArgs) -> CliResult<ClientConfig> {
    let peer_timeout = args
        .peer_timeout
        .as_deref()
        .map(parse_duration)
        .transpose()?;

    Ok(ClientConfig {
        platform: args.platform.unwrap_or_else(Platform::detect),
        connect_timeout: parse_duration(&args.connect_timeout)?,
        peer_timeout,
        ..ClientConfig::default()
    })
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}
