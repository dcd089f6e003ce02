//! Canonical session state held by the orchestrator

use crate::auth::AuthSession;

use super::messages::PlayerReport;
use super::types::{AuthStatus, PlaybackState, PlaybackStatus, QueueItem, StateSnapshot};

/// Queue, playback and auth state. Owned by exactly one orchestrator, so
/// every mutation is a plain `&mut self` call.
#[derive(Debug, Default)]
pub struct AppModel {
    queue: Vec<QueueItem>,
    playback: PlaybackState,
    auth: Option<AuthSession>,
}

impl AppModel {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Queue
    // ========================================================================

    pub fn queue(&self) -> &[QueueItem] {
        &self.queue
    }

    pub fn replace_queue(&mut self, items: Vec<QueueItem>) {
        self.queue = items;
    }

    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.queue.iter().position(|item| item.id == id)
    }

    pub fn item_at(&self, index: usize) -> Option<&QueueItem> {
        self.queue.get(index)
    }

    pub fn find_item(&self, id: &str) -> Option<&QueueItem> {
        self.queue.iter().find(|item| item.id == id)
    }

    /// Remove by id, returning the index it occupied
    pub fn remove_item(&mut self, id: &str) -> Option<usize> {
        let index = self.position_of(id)?;
        self.queue.remove(index);
        Some(index)
    }

    /// Move an item; returns false and leaves the order untouched when the
    /// indices are equal or out of range.
    pub fn move_item(&mut self, from: usize, to: usize) -> bool {
        let len = self.queue.len();
        if from == to || from >= len || to >= len {
            return false;
        }
        let item = self.queue.remove(from);
        self.queue.insert(to, item);
        true
    }

    // ========================================================================
    // Playback
    // ========================================================================

    pub fn playback(&self) -> &PlaybackState {
        &self.playback
    }

    pub fn current_id(&self) -> Option<&str> {
        self.playback.current_id.as_deref()
    }

    pub fn set_loading(&mut self, item: &QueueItem) {
        self.playback.current_id = Some(item.id.clone());
        self.playback.title = item.title.clone();
        self.playback.status = PlaybackStatus::Loading;
    }

    pub fn set_status(&mut self, status: PlaybackStatus) {
        self.playback.status = status;
    }

    pub fn set_stopped(&mut self) {
        self.playback.status = PlaybackStatus::Stopped;
        self.playback.current_id = None;
        self.playback.title.clear();
    }

    /// Overwrite only the fields the report carries
    pub fn merge_report(&mut self, report: &PlayerReport) {
        if let Some(status) = report.status {
            self.playback.status = status;
        }
        if let Some(id) = &report.current_id {
            self.playback.current_id = Some(id.clone());
        }
        if let Some(buffering) = report.buffering {
            self.playback.buffering = buffering;
        }
        if let Some(title) = &report.title {
            self.playback.title = title.clone();
        }
    }

    // ========================================================================
    // Auth
    // ========================================================================

    #[cfg(test)]
    pub fn auth(&self) -> Option<&AuthSession> {
        self.auth.as_ref()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.auth
            .as_ref()
            .map(|session| session.access_token.as_str())
            .filter(|token| !token.is_empty())
    }

    pub fn set_auth(&mut self, session: AuthSession) {
        self.auth = Some(session);
    }

    pub fn clear_auth(&mut self) {
        self.auth = None;
    }

    pub fn auth_status(&self) -> AuthStatus {
        AuthStatus {
            authenticated: self.access_token().is_some(),
            username: self.auth.as_ref().and_then(|s| s.username.clone()),
        }
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            queue: self.queue.clone(),
            playback: self.playback.clone(),
            auth: self.auth_status(),
        }
    }
}
