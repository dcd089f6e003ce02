//! Messages exchanged between the orchestrator and the two surfaces

use super::queue_client::QueueError;
use super::types::{AuthStatus, PlaybackState, PlaybackStatus, QueueItem, StateSnapshot};

/// Everything the orchestrator reacts to
#[derive(Debug)]
pub enum AppEvent {
    Command(ControlCommand),
    PlayerReport(PlayerReport),
    PollTick,
    QueueFetched(Result<Vec<QueueItem>, QueueError>),
    Shutdown,
}

/// User-initiated commands from the control surface
#[derive(Clone, Debug, PartialEq)]
pub enum ControlCommand {
    RequestSnapshot,
    PlayItem(String),
    Remove(String),
    Reorder { from: usize, to: usize },
    Toggle,
    Stop,
    Next,
    OpenLogin,
    Logout,
    AuthCallback(String),
}

/// Pushes from the orchestrator to the control surface
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceUpdate {
    Snapshot(StateSnapshot),
    Queue {
        items: Vec<QueueItem>,
        current_id: Option<String>,
    },
    Playback(PlaybackState),
    Auth(AuthStatus),
    /// Tray affordance text; rendered as the terminal title
    Tooltip(String),
}

/// Imperative instructions for the playback surface
#[derive(Clone, Debug, PartialEq)]
pub enum PlayerDirective {
    PlayItem(QueueItem),
    Pause,
    Resume,
    Stop,
}

/// Status report from the playback surface. Absent fields leave the
/// orchestrator's value untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlayerReport {
    pub status: Option<PlaybackStatus>,
    pub current_id: Option<String>,
    pub buffering: Option<bool>,
    pub title: Option<String>,
    pub ended: bool,
}

#[cfg(test)]
impl PlayerReport {
    pub fn status(status: PlaybackStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn ended() -> Self {
        Self {
            ended: true,
            ..Default::default()
        }
    }
}
