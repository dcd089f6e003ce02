//! Control module - the visible control surface
//!
//! Holds read-only copies of the orchestrator's broadcasts and turns key
//! presses into [`ControlCommand`]s. It never owns canonical state.
//!
//! - `input`: Key event handling

mod input;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crate::model::{
    AppEvent, AuthStatus, ControlCommand, PlaybackState, PlaybackStatus, QueueItem, SurfaceUpdate,
};

/// What the keyboard is currently feeding
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing or pasting a `wizbot://` callback URL
    CallbackPrompt(String),
}

pub struct ControlSurface {
    pub queue: Vec<QueueItem>,
    pub playback: PlaybackState,
    pub auth: AuthStatus,
    pub selected: usize,
    pub input_mode: InputMode,
    pending_title: Option<String>,
    should_quit: bool,
    commands: UnboundedSender<AppEvent>,
}

impl ControlSurface {
    pub fn new(commands: UnboundedSender<AppEvent>) -> Self {
        Self {
            queue: Vec::new(),
            playback: PlaybackState::default(),
            auth: AuthStatus::default(),
            selected: 0,
            input_mode: InputMode::Normal,
            pending_title: None,
            should_quit: false,
            commands,
        }
    }

    pub fn dispatch(&self, command: ControlCommand) {
        if self.commands.send(AppEvent::Command(command)).is_err() {
            tracing::warn!("Orchestrator is gone, dropping command");
        }
    }

    /// Apply every update waiting in the channel
    pub fn drain_updates(&mut self, updates: &mut UnboundedReceiver<SurfaceUpdate>) {
        while let Ok(update) = updates.try_recv() {
            self.apply(update);
        }
    }

    pub fn apply(&mut self, update: SurfaceUpdate) {
        match update {
            SurfaceUpdate::Snapshot(snapshot) => {
                self.queue = snapshot.queue;
                self.playback = snapshot.playback;
                self.auth = snapshot.auth;
            }
            SurfaceUpdate::Queue { items, current_id } => {
                self.queue = items;
                self.playback.current_id = current_id;
            }
            SurfaceUpdate::Playback(playback) => self.playback = playback,
            SurfaceUpdate::Auth(auth) => self.auth = auth,
            SurfaceUpdate::Tooltip(title) => self.pending_title = Some(title),
        }
        self.clamp_selection();
    }

    /// New window title, if one arrived since the last call
    pub fn take_title(&mut self) -> Option<String> {
        self.pending_title.take()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn selected_item(&self) -> Option<&QueueItem> {
        self.queue.get(self.selected)
    }

    pub fn is_active(&self, item: &QueueItem) -> bool {
        self.playback.current_id.as_deref() == Some(item.id.as_str())
    }

    pub fn status_label(&self) -> &'static str {
        match self.playback.status {
            PlaybackStatus::Playing if self.auth.authenticated => "Playing",
            PlaybackStatus::Playing => "Playing (login required)",
            PlaybackStatus::Paused => "Paused",
            PlaybackStatus::Loading => "Loading",
            PlaybackStatus::Stopped => "Idle",
        }
    }

    /// Title line for the now-playing block; empty while idle
    pub fn now_playing_title(&self) -> &str {
        if self.playback.status == PlaybackStatus::Stopped {
            ""
        } else {
            &self.playback.title
        }
    }

    /// Optimistic local move, mirrored to the orchestrator. The next queue
    /// broadcast overrides whatever we did here.
    pub fn move_item(&mut self, from: usize, to: usize) {
        let len = self.queue.len();
        if from == to || from >= len || to >= len {
            return;
        }
        let item = self.queue.remove(from);
        self.queue.insert(to, item);
        self.selected = to;
        self.dispatch(ControlCommand::Reorder { from, to });
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.queue.len().saturating_sub(1));
    }
}
