use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use anomaly_client::Channel;
use anomaly_frame::{FrameError, FrameReader};
use anomaly_protocol::{decode_audio, decode_commands, decode_content, decode_scene, DecodeError};
use bytes::Bytes;
use tracing::{debug, warn};

use crate::cmd::{ChannelArg, DecodeArgs};
use crate::exit::{decode_error, frame_error, io_error, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_messages, MessageOutput, OutputFormat, RecordOutput};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let messages = match args.channel {
        Some(channel) => vec![decode_payload_file(&args.file, channel.into())?],
        None => decode_capture(&args.file)?,
    };

    print_messages(&messages, format);

    if messages.iter().any(|m| m.error.is_some()) {
        return Ok(DATA_INVALID);
    }
    Ok(SUCCESS)
}

impl From<ChannelArg> for Channel {
    fn from(arg: ChannelArg) -> Self {
        match arg {
            ChannelArg::Sprite => Channel::Sprite,
            ChannelArg::Command => Channel::Command,
            ChannelArg::Audio => Channel::Audio,
            ChannelArg::Content => Channel::Content,
        }
    }
}

/// Decode a file holding exactly one message body.
fn decode_payload_file(path: &Path, channel: Channel) -> CliResult<MessageOutput> {
    let payload = Bytes::from(
        fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?,
    );
    let records = decode_records(channel, &payload)
        .map_err(|err| decode_error(&format!("invalid {channel} message"), err))?;

    Ok(MessageOutput {
        channel: channel.name(),
        payload_size: payload.len(),
        error: None,
        records,
    })
}

/// Decode every frame of a recorded session stream. Malformed messages are
/// reported and skipped, as the client would.
fn decode_capture(path: &Path) -> CliResult<Vec<MessageOutput>> {
    let file = File::open(path)
        .map_err(|err| io_error(&format!("failed opening {}", path.display()), err))?;
    let mut reader = FrameReader::new(BufReader::new(file));
    let mut messages = Vec::new();

    loop {
        let frame = match reader.read_frame() {
            Ok(frame) => frame,
            Err(FrameError::ConnectionClosed) => break,
            Err(FrameError::UnknownChannel(id)) => {
                warn!(channel = id, "skipping frame on unknown channel");
                continue;
            }
            Err(err) => return Err(frame_error("invalid capture", err)),
        };

        let (records, error) = match decode_records(frame.channel, &frame.payload) {
            Ok(records) => (records, None),
            Err(err) => (Vec::new(), Some(err.to_string())),
        };
        messages.push(MessageOutput {
            channel: frame.channel.name(),
            payload_size: frame.payload.len(),
            error,
            records,
        });
    }

    if reader.buffered() > 0 {
        warn!(bytes = reader.buffered(), "capture ends inside a frame");
    }
    debug!(messages = messages.len(), "capture decoded");
    Ok(messages)
}

fn decode_records(channel: Channel, payload: &Bytes) -> Result<Vec<RecordOutput>, DecodeError> {
    Ok(match channel {
        Channel::Sprite => decode_scene(payload)?.iter().map(RecordOutput::from).collect(),
        Channel::Command => decode_commands(payload)?
            .into_iter()
            .map(RecordOutput::from)
            .collect(),
        Channel::Audio => decode_audio(payload)?.iter().map(RecordOutput::from).collect(),
        Channel::Content => vec![RecordOutput::from(&decode_content(payload)?)],
        // Input snapshots are opaque to the client.
        Channel::Input => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use anomaly_frame::encode_frame;
    use anomaly_protocol::{ContentKind, ContentPush};
    use bytes::BytesMut;

    use super::*;

    fn temp_file(tag: &str, contents: &[u8]) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "anomaly-decode-{tag}-{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .expect("time should be after epoch")
                .as_nanos()
        ));
        fs::write(&path, contents).expect("temp file should be writable");
        path
    }

    #[test]
    fn single_sprite_payload() {
        let path = temp_file(
            "sprite",
            &[
                0x01, 0x00, 0x00, 0x00, 0x05, 0x00, 0x00, 0x00, 0x00, 0x00, 0x80, 0x3F, 0x00,
                0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            ],
        );

        let message = decode_payload_file(&path, Channel::Sprite).unwrap();

        assert_eq!(message.payload_size, 20);
        assert_eq!(
            message.records,
            vec![RecordOutput::Sprite {
                id: 5,
                x: 1.0,
                y: 0.0,
                scale: 0.0
            }]
        );
        let _ = fs::remove_file(path);
    }

    #[test]
    fn truncated_payload_is_data_invalid() {
        let path = temp_file("truncated", &[3, 0, 0, 0, 1]);
        let err = decode_payload_file(&path, Channel::Command).unwrap_err();
        assert_eq!(err.code, DATA_INVALID);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn capture_keeps_going_past_bad_messages() {
        let mut wire = BytesMut::new();
        let mut push = BytesMut::new();
        ContentPush {
            kind: ContentKind::Image,
            id: 7,
            data: Bytes::from_static(&[0xAA, 0xBB, 0xCC]),
        }
        .encode(&mut push).unwrap();
        encode_frame(Channel::Content, &push, &mut wire).unwrap();
        encode_frame(Channel::Audio, &[9, 0, 0, 0], &mut wire).unwrap();
        wire.extend_from_slice(&[b'A', b'N', 1, 0, 0, 0, 42, 0]);
        encode_frame(Channel::Command, &[1, 0, 0, 0, 0], &mut wire).unwrap();
        let path = temp_file("capture", &wire);

        let messages = decode_capture(&path).unwrap();

        assert_eq!(messages.len(), 3);
        assert_eq!(
            messages[0].records,
            vec![RecordOutput::Content {
                content_kind: "image",
                id: 7,
                size: 3
            }]
        );
        assert!(messages[1].error.is_some());
        assert_eq!(messages[2].channel, "COMMAND");
        assert_eq!(
            messages[2].records,
            vec![RecordOutput::Command {
                code: 0,
                name: "start_text_input"
            }]
        );
        let _ = fs::remove_file(path);
    }
}
