//! View module - UI rendering
//!
//! Renders the control surface using ratatui.
//!
//! - `utils`: Shared formatting helpers
//! - `layout`: Header and key help footer
//! - `now_playing`: Playback status block
//! - `queue`: Request queue list
//! - `overlays`: Callback URL prompt

mod utils;
mod layout;
mod now_playing;
mod queue;
mod overlays;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::control::{ControlSurface, InputMode};

pub struct AppView;

impl AppView {
    pub fn render(frame: &mut Frame, surface: &ControlSurface) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title + auth
                Constraint::Length(5), // Now playing + controls
                Constraint::Min(0),    // Queue
                Constraint::Length(1), // Key help
            ])
            .split(frame.area());

        layout::render_header(frame, chunks[0], surface);
        now_playing::render_now_playing(frame, chunks[1], surface);
        queue::render_queue(frame, chunks[2], surface);
        layout::render_footer(frame, chunks[3]);

        if let InputMode::CallbackPrompt(buffer) = &surface.input_mode {
            overlays::render_callback_prompt(frame, buffer);
        }
    }
}
