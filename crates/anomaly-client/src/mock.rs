//! Recording collaborators and a scripted transport for unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use anomaly_frame::{Channel, FrameError};
use anomaly_protocol::{AudioCommand, SpriteDraw, TextDraw};
use bytes::Bytes;

use crate::collaborator::{Audio, Renderer, Window};
use crate::error::Result;
use crate::session::{NetEvent, Transport};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Clear,
    Sprite(SpriteDraw),
    Text(TextDraw),
    Present,
    LoadImage(u32, Vec<u8>),
    LoadFont(u32, Vec<u8>),
}

#[derive(Debug, Default)]
pub struct MockWindow {
    pub errors: Vec<String>,
    pub text_input_active: bool,
    pub activations: usize,
    pub composition: String,
    pub pending_input: VecDeque<Bytes>,
}

impl Window for MockWindow {
    fn show_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    fn is_text_input_active(&self) -> bool {
        self.text_input_active
    }

    fn start_text_input(&mut self) {
        self.text_input_active = true;
        self.activations += 1;
    }

    fn stop_text_input(&mut self) {
        self.text_input_active = false;
        self.composition.clear();
    }

    fn create_input_packet(&mut self) -> Option<Bytes> {
        self.pending_input.pop_front()
    }
}

#[derive(Debug, Default)]
pub struct MockRenderer {
    pub window: MockWindow,
    pub calls: Vec<Call>,
}

impl MockRenderer {
    pub fn frames_presented(&self) -> usize {
        self.calls.iter().filter(|c| **c == Call::Present).count()
    }
}

impl Renderer for MockRenderer {
    type Window = MockWindow;

    fn window(&mut self) -> &mut MockWindow {
        &mut self.window
    }

    fn clear(&mut self, _r: f32, _g: f32, _b: f32) {
        self.calls.push(Call::Clear);
    }

    fn draw_sprite(&mut self, sprite: &SpriteDraw) {
        self.calls.push(Call::Sprite(*sprite));
    }

    fn draw_text(&mut self, text: &TextDraw) {
        self.calls.push(Call::Text(text.clone()));
    }

    fn present(&mut self) {
        self.calls.push(Call::Present);
    }

    fn load_image(&mut self, id: u32, data: &[u8]) {
        self.calls.push(Call::LoadImage(id, data.to_vec()));
    }

    fn load_font(&mut self, id: u32, data: &[u8]) {
        self.calls.push(Call::LoadFont(id, data.to_vec()));
    }
}

#[derive(Debug, Default)]
pub struct MockAudio {
    pub commands: Vec<AudioCommand>,
    pub sounds: Vec<(u32, Vec<u8>)>,
}

impl Audio for MockAudio {
    fn perform_command(&mut self, command: &AudioCommand) {
        self.commands.push(*command);
    }

    fn load_sound(&mut self, id: u32, data: &[u8]) {
        self.sounds.push((id, data.to_vec()));
    }
}

pub type SentLog = Rc<RefCell<Vec<(Channel, Vec<u8>)>>>;

/// Replays queued events; records everything sent.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    pub events: VecDeque<NetEvent>,
    pub sent: SentLog,
    pub closed: Rc<RefCell<bool>>,
    pub refuse_sends: bool,
    /// Fail input sends as if the server had stopped reading.
    pub backlog_full: bool,
}

impl ScriptedTransport {
    pub fn new(events: impl IntoIterator<Item = NetEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
            ..Self::default()
        }
    }
}

impl Transport for ScriptedTransport {
    fn send(&mut self, channel: Channel, payload: &[u8]) -> Result<()> {
        if self.refuse_sends || *self.closed.borrow() {
            return Err(FrameError::ConnectionClosed.into());
        }
        if self.backlog_full && channel == Channel::Input && !self.sent.borrow().is_empty() {
            return Err(FrameError::BacklogFull { queued: 1, max: 1 }.into());
        }
        self.sent.borrow_mut().push((channel, payload.to_vec()));
        Ok(())
    }

    fn poll(&mut self) -> Result<Option<NetEvent>> {
        Ok(self.events.pop_front())
    }

    fn disconnect_now(&mut self) {
        *self.closed.borrow_mut() = true;
    }
}
