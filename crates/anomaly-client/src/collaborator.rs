//! Interfaces the client drives. Windowing, GPU work, mixing and asset
//! decoding all live behind these.

use anomaly_protocol::{AudioCommand, SpriteDraw, TextDraw};
use bytes::Bytes;

/// Platform window: error display, text input and input capture.
pub trait Window {
    /// Show an error to the user (message box, or log if that fails).
    fn show_error(&mut self, message: &str);

    fn is_text_input_active(&self) -> bool;

    /// Begin platform text composition.
    fn start_text_input(&mut self);

    /// End text composition and clear any composed text.
    fn stop_text_input(&mut self);

    /// Input snapshot accumulated since the last call, if any.
    fn create_input_packet(&mut self) -> Option<Bytes>;
}

/// Draws frames and owns the image and font caches.
///
/// Draw calls may reference ids whose content has not arrived yet; the
/// renderer decides what to show for them.
pub trait Renderer {
    type Window: Window;

    fn window(&mut self) -> &mut Self::Window;

    fn clear(&mut self, r: f32, g: f32, b: f32);

    fn draw_sprite(&mut self, sprite: &SpriteDraw);

    fn draw_text(&mut self, text: &TextDraw);

    fn present(&mut self);

    /// Replace the image stored under `id` with the encoded bytes.
    fn load_image(&mut self, id: u32, data: &[u8]);

    /// Replace the font stored under `id` with the encoded bytes.
    fn load_font(&mut self, id: u32, data: &[u8]);
}

/// Plays sounds and owns the sound cache.
pub trait Audio {
    fn perform_command(&mut self, command: &AudioCommand);

    /// Replace the sound stored under `id` with the encoded bytes.
    fn load_sound(&mut self, id: u32, data: &[u8]);
}
