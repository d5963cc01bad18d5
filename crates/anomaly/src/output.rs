use std::collections::BTreeMap;
use std::io::IsTerminal;

use anomaly_client::{Channel, SessionStats};
use anomaly_protocol::{AudioCommand, Command, ContentPush, DrawRecord};
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// One decoded record, flattened for printing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordOutput {
    Sprite {
        id: u32,
        x: f32,
        y: f32,
        scale: f32,
    },
    Text {
        font_id: u32,
        x: f32,
        y: f32,
        scale: f32,
        color: [u8; 3],
        text: String,
    },
    Command {
        code: u8,
        name: &'static str,
    },
    Audio {
        sound_id: u32,
        channel: u16,
        volume: u8,
        command: String,
    },
    Content {
        content_kind: &'static str,
        id: u32,
        size: usize,
    },
}

impl From<&DrawRecord> for RecordOutput {
    fn from(record: &DrawRecord) -> Self {
        match record {
            DrawRecord::Sprite(s) => RecordOutput::Sprite {
                id: s.id,
                x: s.x,
                y: s.y,
                scale: s.scale,
            },
            DrawRecord::Text(t) => RecordOutput::Text {
                font_id: t.font_id,
                x: t.x,
                y: t.y,
                scale: t.scale,
                color: [t.color.r, t.color.g, t.color.b],
                text: t.text_lossy().into_owned(),
            },
        }
    }
}

impl From<Command> for RecordOutput {
    fn from(command: Command) -> Self {
        let name = match command {
            Command::StartTextInput => "start_text_input",
            Command::StopTextInput => "stop_text_input",
            Command::Unknown(_) => "unknown",
        };
        RecordOutput::Command {
            code: command.code(),
            name,
        }
    }
}

impl From<&AudioCommand> for RecordOutput {
    fn from(command: &AudioCommand) -> Self {
        RecordOutput::Audio {
            sound_id: command.sound_id,
            channel: command.channel,
            volume: command.volume,
            command: command.kind.to_string(),
        }
    }
}

impl From<&ContentPush> for RecordOutput {
    fn from(push: &ContentPush) -> Self {
        RecordOutput::Content {
            content_kind: push.kind.name(),
            id: push.id,
            size: push.data.len(),
        }
    }
}

impl RecordOutput {
    fn kind(&self) -> &'static str {
        match self {
            RecordOutput::Sprite { .. } => "sprite",
            RecordOutput::Text { .. } => "text",
            RecordOutput::Command { .. } => "command",
            RecordOutput::Audio { .. } => "audio",
            RecordOutput::Content { .. } => "content",
        }
    }

    fn id(&self) -> String {
        match self {
            RecordOutput::Sprite { id, .. }
            | RecordOutput::Content { id, .. } => id.to_string(),
            RecordOutput::Text { font_id, .. } => font_id.to_string(),
            RecordOutput::Audio { sound_id, .. } => sound_id.to_string(),
            RecordOutput::Command { code, .. } => code.to_string(),
        }
    }

    fn detail(&self) -> String {
        match self {
            RecordOutput::Sprite { x, y, scale, .. } => {
                format!("at ({x}, {y}) scale {scale}")
            }
            RecordOutput::Text {
                x,
                y,
                scale,
                color,
                text,
                ..
            } => format!(
                "at ({x}, {y}) scale {scale} rgb({}, {}, {}) {text:?}",
                color[0], color[1], color[2]
            ),
            RecordOutput::Command { name, .. } => name.to_string(),
            RecordOutput::Audio {
                channel,
                volume,
                command,
                ..
            } => format!("{command} on channel {channel} volume {volume}"),
            RecordOutput::Content {
                content_kind, size, ..
            } => format!("{content_kind}, {size} bytes"),
        }
    }
}

/// Records decoded from one message.
#[derive(Debug, Serialize)]
pub struct MessageOutput {
    pub channel: &'static str,
    pub payload_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub records: Vec<RecordOutput>,
}

pub fn print_messages(messages: &[MessageOutput], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            for message in messages {
                println!(
                    "{}",
                    serde_json::to_string(message).unwrap_or_else(|_| "{}".to_string())
                );
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["MSG", "CHANNEL", "#", "KIND", "ID", "DETAIL"]);
            for (n, message) in messages.iter().enumerate() {
                if let Some(error) = &message.error {
                    table.add_row(vec![
                        n.to_string(),
                        message.channel.to_string(),
                        "-".to_string(),
                        "error".to_string(),
                        "-".to_string(),
                        error.clone(),
                    ]);
                }
                for (i, record) in message.records.iter().enumerate() {
                    table.add_row(vec![
                        n.to_string(),
                        message.channel.to_string(),
                        i.to_string(),
                        record.kind().to_string(),
                        record.id(),
                        record.detail(),
                    ]);
                }
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for message in messages {
                println!(
                    "{} message, {} bytes, {} records",
                    message.channel,
                    message.payload_size,
                    message.records.len()
                );
                if let Some(error) = &message.error {
                    println!("  error: {error}");
                }
                for record in &message.records {
                    println!("  {} {} {}", record.kind(), record.id(), record.detail());
                }
            }
        }
    }
}

/// End-of-session report for `connect`.
#[derive(Debug, Serialize)]
pub struct SessionOutput {
    pub host: String,
    pub port: u16,
    pub platform: String,
    pub ended: &'static str,
    pub ticks: u64,
    pub dropped: u64,
    pub received: BTreeMap<&'static str, u64>,
}

impl SessionOutput {
    pub fn new(
        host: &str,
        port: u16,
        platform: String,
        ended: &'static str,
        stats: &SessionStats,
    ) -> Self {
        let received = Channel::ALL
            .iter()
            .map(|channel| (channel.name(), stats.received_on(*channel)))
            .collect();
        Self {
            host: host.to_string(),
            port,
            platform,
            ended,
            ticks: stats.ticks,
            dropped: stats.dropped,
            received,
        }
    }
}

pub fn print_session(out: &SessionOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "VALUE"])
                .add_row(vec!["server".to_string(), format!("{}:{}", out.host, out.port)])
                .add_row(vec!["platform".to_string(), out.platform.clone()])
                .add_row(vec!["ended".to_string(), out.ended.to_string()])
                .add_row(vec!["ticks".to_string(), out.ticks.to_string()])
                .add_row(vec!["dropped".to_string(), out.dropped.to_string()]);
            for (channel, count) in &out.received {
                table.add_row(vec![format!("received {channel}"), count.to_string()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            let received: Vec<String> = out
                .received
                .iter()
                .map(|(channel, count)| format!("{channel}={count}"))
                .collect();
            println!(
                "{}:{} ({}) ended={} ticks={} dropped={} received: {}",
                out.host,
                out.port,
                out.platform,
                out.ended,
                out.ticks,
                out.dropped,
                received.join(" ")
            );
        }
    }
}
