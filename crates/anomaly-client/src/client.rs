use anomaly_frame::{Channel, FrameError};
use anomaly_protocol::Platform;
use tracing::{debug, info, warn};

use crate::collaborator::{Audio, Renderer, Window};
use crate::config::ClientConfig;
use crate::dispatch;
use crate::error::{ClientError, Result};
use crate::session::{NetEvent, TcpSession, Transport};

/// Counters for the current client, across sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Completed calls to [`Client::tick`] while connected.
    pub ticks: u64,
    /// Messages received, indexed by channel id.
    pub received: [u64; Channel::COUNT],
    /// Messages dropped because they did not decode.
    pub dropped: u64,
}

impl SessionStats {
    pub fn received_on(&self, channel: Channel) -> u64 {
        self.received[channel.id() as usize]
    }
}

/// A presentation client: one session at a time, driven by [`tick`](Self::tick).
pub struct Client {
    config: ClientConfig,
    session: Option<Box<dyn Transport>>,
    stats: SessionStats,
}

impl Client {
    /// Create a client with no session.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate().map_err(ClientError::Init)?;
        debug!(platform = %config.platform, "client initialized");
        Ok(Self {
            config,
            session: None,
            stats: SessionStats::default(),
        })
    }

    /// Like [`new`](Self::new), showing a failure on `window` first.
    pub fn init<W: Window>(window: &mut W, config: ClientConfig) -> Result<Self> {
        Self::new(config).inspect_err(|err| window.show_error(&err.to_string()))
    }

    /// Create a client around an already connected transport and log in.
    pub fn with_transport(config: ClientConfig, transport: Box<dyn Transport>) -> Result<Self> {
        let mut client = Self::new(config)?;
        client.attach(transport)?;
        Ok(client)
    }

    /// Connect to `host:port`, reporting any failure through `window`.
    pub fn connect<W: Window>(&mut self, window: &mut W, host: &str, port: u16) -> bool {
        match self.try_connect(host, port) {
            Ok(()) => true,
            Err(err) => {
                warn!(host, port, error = %err, "connect failed");
                window.show_error(&err.to_string());
                false
            }
        }
    }

    /// Connect to `host:port` and send the login record.
    ///
    /// Blocks for at most the configured connect timeout. On failure the
    /// current session, if any, is kept.
    pub fn try_connect(&mut self, host: &str, port: u16) -> Result<()> {
        let session = TcpSession::connect(host, port, &self.config)
            .map_err(|err| ClientError::from_connect(host, port, err))?;
        self.attach(Box::new(session))?;
        info!(host, port, platform = %self.config.platform, "connected");
        Ok(())
    }

    /// Install `transport` as the session and send the login record on it.
    pub fn attach(&mut self, mut transport: Box<dyn Transport>) -> Result<()> {
        transport.send(Channel::Input, &self.config.platform.login_record())?;
        self.disconnect();
        self.session = Some(transport);
        Ok(())
    }

    /// Run one frame of network work.
    ///
    /// Never waits on the network. Pushes out input the server could not
    /// take on earlier ticks and sends the window's pending input snapshot,
    /// then applies every
    /// message already queued, in arrival order. Returns `Ok(false)` once
    /// the session has ended; messages queued behind a disconnect are not
    /// applied.
    pub fn tick<R: Renderer, A: Audio>(&mut self, renderer: &mut R, audio: &mut A) -> Result<bool> {
        let Some(session) = self.session.as_deref_mut() else {
            return Ok(false);
        };

        match pump(session, &mut self.stats, renderer, audio) {
            Ok(None) => {
                self.stats.ticks += 1;
                Ok(true)
            }
            Ok(Some(event)) => {
                if event == NetEvent::DisconnectTimeout {
                    info!("disconnected: server timed out");
                } else {
                    info!("disconnected by server");
                }
                self.disconnect();
                Ok(false)
            }
            Err(err) => {
                self.disconnect();
                Err(err)
            }
        }
    }

    /// Drop the session immediately.
    pub fn disconnect(&mut self) {
        if let Some(mut session) = self.session.take() {
            debug!("closing session");
            session.disconnect_now();
        }
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    pub fn platform(&self) -> Platform {
        self.config.platform
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }
}

/// Outbound backlog and input, then inbound drain. Returns the event that
/// ended the session, if any.
fn pump<R: Renderer, A: Audio>(
    session: &mut dyn Transport,
    stats: &mut SessionStats,
    renderer: &mut R,
    audio: &mut A,
) -> Result<Option<NetEvent>> {
    let mut outbound = session.flush();
    if outbound.is_ok() {
        if let Some(packet) = renderer.window().create_input_packet() {
            outbound = session.send(Channel::Input, &packet);
        }
    }
    match outbound {
        Ok(()) => {}
        Err(ClientError::Frame(FrameError::ConnectionClosed)) => {
            return Ok(Some(NetEvent::Disconnect));
        }
        Err(ClientError::Frame(err @ FrameError::BacklogFull { .. })) => {
            warn!(error = %err, "server stopped reading");
            return Ok(Some(NetEvent::Disconnect));
        }
        Err(err) => return Err(err),
    }

    while let Some(event) = session.poll()? {
        let frame = match event {
            NetEvent::Receive(frame) => frame,
            ended => return Ok(Some(ended)),
        };

        stats.received[frame.channel.id() as usize] += 1;
        if let Err(err) = dispatch::route(&frame, renderer, audio) {
            stats.dropped += 1;
            warn!(channel = %frame.channel, error = %err, "dropping malformed message");
        }
    }

    Ok(None)
}

impl Drop for Client {
    fn drop(&mut self) {
        self.disconnect();
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .field("connected", &self.is_connected())
            .field("stats", &self.stats)
            .finish()
    }
}
