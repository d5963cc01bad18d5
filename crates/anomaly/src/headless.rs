//! Collaborators for running a session without a display or sound device.
//! Every call is logged; assets are counted, not decoded.

use std::collections::HashMap;

use anomaly_client::{Audio, AudioCommand, ContentKind, Renderer, SpriteDraw, TextDraw, Window};
use bytes::Bytes;
use tracing::{debug, error, info, trace};

#[derive(Debug, Default)]
pub struct HeadlessWindow {
    text_input: bool,
    errors: Vec<String>,
}

impl Window for HeadlessWindow {
    fn show_error(&mut self, message: &str) {
        error!(message, "client error");
        self.errors.push(message.to_string());
    }

    fn is_text_input_active(&self) -> bool {
        self.text_input
    }

    fn start_text_input(&mut self) {
        info!("text input started");
        self.text_input = true;
    }

    fn stop_text_input(&mut self) {
        info!("text input stopped");
        self.text_input = false;
    }

    fn create_input_packet(&mut self) -> Option<Bytes> {
        None
    }
}

#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    window: HeadlessWindow,
    frames: u64,
    draws: usize,
    assets: HashMap<(ContentKind, u32), usize>,
}

impl HeadlessRenderer {
    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn store(&mut self, kind: ContentKind, id: u32, data: &[u8]) {
        if let Some(previous) = self.assets.insert((kind, id), data.len()) {
            debug!(%kind, id, previous, size = data.len(), "replaced asset");
        }
    }
}

impl Renderer for HeadlessRenderer {
    type Window = HeadlessWindow;

    fn window(&mut self) -> &mut HeadlessWindow {
        &mut self.window
    }

    fn clear(&mut self, r: f32, g: f32, b: f32) {
        trace!(r, g, b, "clear");
        self.draws = 0;
    }

    fn draw_sprite(&mut self, sprite: &SpriteDraw) {
        trace!(id = sprite.id, x = sprite.x, y = sprite.y, scale = sprite.scale, "sprite");
        self.draws += 1;
    }

    fn draw_text(&mut self, text: &TextDraw) {
        trace!(font = text.font_id, x = text.x, y = text.y, text = %text.text_lossy(), "text");
        self.draws += 1;
    }

    fn present(&mut self) {
        self.frames += 1;
        debug!(frame = self.frames, draws = self.draws, "present");
    }

    fn load_image(&mut self, id: u32, data: &[u8]) {
        self.store(ContentKind::Image, id, data);
    }

    fn load_font(&mut self, id: u32, data: &[u8]) {
        self.store(ContentKind::Font, id, data);
    }
}

#[derive(Debug, Default)]
pub struct HeadlessAudio {
    sounds: HashMap<u32, usize>,
}

impl Audio for HeadlessAudio {
    fn perform_command(&mut self, command: &AudioCommand) {
        let loaded = self.sounds.contains_key(&command.sound_id);
        debug!(
            sound = command.sound_id,
            channel = command.channel,
            volume = command.volume,
            command = %command.kind,
            loaded,
            "audio command"
        );
    }

    fn load_sound(&mut self, id: u32, data: &[u8]) {
        self.sounds.insert(id, data.len());
    }
}
