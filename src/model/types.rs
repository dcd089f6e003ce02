//! Core type definitions shared by the orchestrator and both surfaces

use serde::{Deserialize, Serialize};

/// One request entry in the queue
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueItem {
    pub id: String,
    pub title: String,
    pub video_id: String,
    pub requested_by: Option<String>,
    /// Length in seconds, when the API knows it
    pub duration: Option<f64>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackStatus {
    #[default]
    Stopped,
    Playing,
    Paused,
    Loading,
}

impl PlaybackStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Loading => "loading",
        }
    }
}

/// Canonical playback state, owned by the orchestrator
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
    pub status: PlaybackStatus,
    /// Weak reference into the queue, by id
    pub current_id: Option<String>,
    pub buffering: bool,
    pub title: String,
}

/// What the control surface is told about the login session
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthStatus {
    pub authenticated: bool,
    pub username: Option<String>,
}

/// Everything a freshly attached control surface needs to render
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    pub queue: Vec<QueueItem>,
    pub playback: PlaybackState,
    pub auth: AuthStatus,
}
