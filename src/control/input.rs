//! Key event handling

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::auth;
use crate::model::ControlCommand;

use super::{ControlSurface, InputMode};

impl ControlSurface {
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if let InputMode::CallbackPrompt(buffer) = &mut self.input_mode {
            match key.code {
                KeyCode::Esc => self.input_mode = InputMode::Normal,
                KeyCode::Enter => {
                    let url = buffer.trim().to_string();
                    self.input_mode = InputMode::Normal;
                    if auth::is_callback_url(&url) {
                        self.dispatch(ControlCommand::AuthCallback(url));
                    } else if !url.is_empty() {
                        tracing::warn!("Ignoring pasted text that is not a callback URL");
                    }
                }
                KeyCode::Backspace => {
                    buffer.pop();
                }
                KeyCode::Char(c) => buffer.push(c),
                _ => {}
            }
            return;
        }

        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char(' ') => self.dispatch(ControlCommand::Toggle),
            KeyCode::Char('s') => self.dispatch(ControlCommand::Stop),
            KeyCode::Char('n') => self.dispatch(ControlCommand::Next),
            KeyCode::Char('l') => self.dispatch(ControlCommand::OpenLogin),
            KeyCode::Char('L') => self.dispatch(ControlCommand::Logout),
            KeyCode::Char('u') => self.input_mode = InputMode::CallbackPrompt(String::new()),
            KeyCode::Up if shift => self.move_selected_up(),
            KeyCode::Down if shift => self.move_selected_down(),
            KeyCode::Char('K') => self.move_selected_up(),
            KeyCode::Char('J') => self.move_selected_down(),
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.queue.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Enter => {
                if let Some(item) = self.selected_item() {
                    let id = item.id.clone();
                    self.dispatch(ControlCommand::PlayItem(id));
                }
            }
            KeyCode::Delete | KeyCode::Char('d') => {
                if let Some(item) = self.selected_item() {
                    let id = item.id.clone();
                    self.dispatch(ControlCommand::Remove(id));
                }
            }
            _ => {}
        }
    }

    fn move_selected_up(&mut self) {
        if self.selected > 0 {
            self.move_item(self.selected, self.selected - 1);
        }
    }

    fn move_selected_down(&mut self) {
        self.move_item(self.selected, self.selected + 1);
    }
}
