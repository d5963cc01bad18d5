//! Routes one inbound frame to the decoder for its channel and applies the
//! decoded records to the collaborators.
//!
//! Every decoder runs to completion before the first collaborator call, so
//! a malformed message has no visible effect.

use anomaly_frame::{Channel, Frame};
use anomaly_protocol::{
    decode_audio, decode_commands, decode_content, decode_scene, Command, ContentKind,
    DecodeError, DrawRecord,
};
use bytes::Bytes;
use tracing::{debug, info};

use crate::collaborator::{Audio, Renderer, Window};

/// Apply one inbound frame.
pub fn route<R: Renderer, A: Audio>(
    frame: &Frame,
    renderer: &mut R,
    audio: &mut A,
) -> Result<(), DecodeError> {
    debug!(channel = %frame.channel, size = frame.payload.len(), "dispatching message");
    match frame.channel {
        Channel::Sprite => draw_scene(renderer, &frame.payload).map(drop),
        Channel::Command => apply_commands(renderer.window(), &frame.payload).map(drop),
        Channel::Content => load_content(renderer, audio, &frame.payload).map(drop),
        Channel::Audio => play_audio(audio, &frame.payload).map(drop),
        Channel::Input => {
            debug!("ignoring inbound message on input channel");
            Ok(())
        }
    }
}

/// Submit a SPRITE message as one frame: clear, every draw in order,
/// present. Returns the number of draw calls.
pub fn draw_scene<R: Renderer>(renderer: &mut R, payload: &Bytes) -> Result<usize, DecodeError> {
    let records = decode_scene(payload)?;

    renderer.clear(0.0, 0.0, 0.0);
    for record in &records {
        match record {
            DrawRecord::Sprite(sprite) => renderer.draw_sprite(sprite),
            DrawRecord::Text(text) => renderer.draw_text(text),
        }
    }
    renderer.present();

    Ok(records.len())
}

/// Apply a COMMAND message to the window. Returns the number of commands
/// that had an effect.
pub fn apply_commands<W: Window>(window: &mut W, payload: &Bytes) -> Result<usize, DecodeError> {
    let commands = decode_commands(payload)?;
    let mut applied = 0;

    for command in commands {
        match command {
            Command::StartTextInput => {
                if window.is_text_input_active() {
                    continue;
                }
                window.start_text_input();
            }
            Command::StopTextInput => window.stop_text_input(),
            Command::Unknown(code) => {
                debug!(code, "skipping unknown command");
                continue;
            }
        }
        applied += 1;
    }

    Ok(applied)
}

/// Forward every record of an AUDIO message, in order.
pub fn play_audio<A: Audio>(audio: &mut A, payload: &Bytes) -> Result<usize, DecodeError> {
    let commands = decode_audio(payload)?;
    for command in &commands {
        audio.perform_command(command);
    }
    Ok(commands.len())
}

/// Hand a CONTENT push to the loader that owns its kind.
pub fn load_content<R: Renderer, A: Audio>(
    renderer: &mut R,
    audio: &mut A,
    payload: &Bytes,
) -> Result<ContentKind, DecodeError> {
    let push = decode_content(payload)?;
    info!(kind = %push.kind, id = push.id, size = push.data.len(), "received content update");

    match push.kind {
        ContentKind::Image => renderer.load_image(push.id, &push.data),
        ContentKind::Font => renderer.load_font(push.id, &push.data),
        ContentKind::Sound => audio.load_sound(push.id, &push.data),
    }

    Ok(push.kind)
}
