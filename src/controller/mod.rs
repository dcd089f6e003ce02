//! Controller module - the orchestrator
//!
//! Owns the canonical [`AppModel`] and consumes one [`AppEvent`] stream.
//! Each event runs to completion before the next is read, so the model needs
//! no locking. It is organized into submodules by responsibility:
//!
//! - `playback`: Playback transitions and queue mutations
//! - `player_events`: Merging status reports from the playback surface
//! - `polling`: Remote queue refresh and the poll timer
//! - `session`: Login callback, logout and credential persistence

mod playback;
mod player_events;
mod polling;
mod session;

pub use polling::start_polling;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crate::auth::CredentialStore;
use crate::model::{
    AppEvent, AppModel, ControlCommand, PlaybackStatus, PlayerDirective, QueueClient, SurfaceUpdate,
};

pub const APP_TITLE: &str = "Wizbot Player";

pub struct AppController {
    pub(crate) model: AppModel,
    queue_client: QueueClient,
    credentials: CredentialStore,
    login_url: String,
    surface: UnboundedSender<SurfaceUpdate>,
    player: UnboundedSender<PlayerDirective>,
    events: UnboundedSender<AppEvent>,
}

impl AppController {
    pub fn new(
        queue_client: QueueClient,
        credentials: CredentialStore,
        login_url: String,
        surface: UnboundedSender<SurfaceUpdate>,
        player: UnboundedSender<PlayerDirective>,
        events: UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            model: AppModel::new(),
            queue_client,
            credentials,
            login_url,
            surface,
            player,
            events,
        }
    }

    pub async fn run(mut self, mut events: UnboundedReceiver<AppEvent>) {
        tracing::info!("Orchestrator started");
        while let Some(event) = events.recv().await {
            if !self.handle_event(event) {
                break;
            }
        }
        tracing::info!("Orchestrator stopped");
    }

    /// Apply one event. Returns false once the orchestrator should stop.
    pub fn handle_event(&mut self, event: AppEvent) -> bool {
        match event {
            AppEvent::Command(command) => self.handle_command(command),
            AppEvent::PlayerReport(report) => self.apply_player_report(report),
            AppEvent::PollTick => self.refresh(),
            AppEvent::QueueFetched(result) => self.apply_queue_result(result),
            AppEvent::Shutdown => return false,
        }
        true
    }

    fn handle_command(&mut self, command: ControlCommand) {
        tracing::debug!(?command, "Control command");
        match command {
            ControlCommand::RequestSnapshot => {
                self.send_surface(SurfaceUpdate::Snapshot(self.model.snapshot()));
            }
            ControlCommand::PlayItem(id) => self.play_item_by_id(&id),
            ControlCommand::Remove(id) => self.remove_item(&id),
            ControlCommand::Reorder { from, to } => self.reorder(from, to),
            ControlCommand::Toggle => self.toggle_playback(),
            ControlCommand::Stop => self.stop_playback(),
            ControlCommand::Next => self.play_next(),
            ControlCommand::OpenLogin => self.open_login(),
            ControlCommand::Logout => self.logout(),
            ControlCommand::AuthCallback(url) => {
                // Rejections are only logged
                let _ = self.handle_auth_callback(&url);
            }
        }
    }

    // ========================================================================
    // Broadcasts
    // ========================================================================

    fn send_surface(&self, update: SurfaceUpdate) {
        if self.surface.send(update).is_err() {
            tracing::trace!("Control surface is gone, dropping update");
        }
    }

    pub(crate) fn send_player(&self, directive: PlayerDirective) {
        if self.player.send(directive).is_err() {
            tracing::warn!("Playback surface is gone, dropping directive");
        }
    }

    pub(crate) fn broadcast_queue(&self) {
        self.send_surface(SurfaceUpdate::Queue {
            items: self.model.queue().to_vec(),
            current_id: self.model.current_id().map(str::to_string),
        });
    }

    pub(crate) fn broadcast_playback(&self) {
        let playback = self.model.playback();
        tracing::debug!(
            status = playback.status.as_str(),
            current = ?playback.current_id,
            buffering = playback.buffering,
            "Playback state"
        );
        self.send_surface(SurfaceUpdate::Playback(self.model.playback().clone()));
        self.send_surface(SurfaceUpdate::Tooltip(self.tooltip()));
    }

    pub(crate) fn broadcast_auth(&self) {
        self.send_surface(SurfaceUpdate::Auth(self.model.auth_status()));
    }

    fn tooltip(&self) -> String {
        let playback = self.model.playback();
        if playback.status == PlaybackStatus::Playing && !playback.title.is_empty() {
            format!("{} - {}", APP_TITLE, playback.title)
        } else {
            APP_TITLE.to_string()
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    use super::*;
    use crate::model::{PlaybackState, QueueItem};

    pub struct Harness {
        pub controller: AppController,
        pub surface: UnboundedReceiver<SurfaceUpdate>,
        pub player: UnboundedReceiver<PlayerDirective>,
        pub events: UnboundedReceiver<AppEvent>,
        _dir: tempfile::TempDir,
    }

    impl Harness {
        pub fn new() -> Self {
            Self::with_api("http://127.0.0.1:9")
        }

        pub fn with_api(api_base: &str) -> Self {
            let dir = tempfile::tempdir().unwrap();
            let credentials = CredentialStore::new(dir.path().join("wizbot-auth.json"));
            let (surface_tx, surface) = mpsc::unbounded_channel();
            let (player_tx, player) = mpsc::unbounded_channel();
            let (events_tx, events) = mpsc::unbounded_channel();
            let controller = AppController::new(
                QueueClient::new(api_base),
                credentials,
                "http://localhost/login".to_string(),
                surface_tx,
                player_tx,
                events_tx,
            );
            Self {
                controller,
                surface,
                player,
                events,
                _dir: dir,
            }
        }

        pub fn with_queue(ids: &[&str]) -> Self {
            let mut harness = Self::new();
            harness.controller.model.replace_queue(ids.iter().map(|id| item(id)).collect());
            harness
        }

        pub fn playback(&self) -> &PlaybackState {
            self.controller.model.playback()
        }

        pub fn current(&self) -> Option<&str> {
            self.controller.model.current_id()
        }

        pub fn queue_ids(&self) -> Vec<String> {
            self.controller.model.queue().iter().map(|i| i.id.clone()).collect()
        }

        pub fn drain_player(&mut self) -> Vec<PlayerDirective> {
            let mut out = Vec::new();
            while let Ok(d) = self.player.try_recv() {
                out.push(d);
            }
            out
        }

        pub fn drain_surface(&mut self) -> Vec<SurfaceUpdate> {
            let mut out = Vec::new();
            while let Ok(u) = self.surface.try_recv() {
                out.push(u);
            }
            out
        }
    }

    pub fn item(id: &str) -> QueueItem {
        QueueItem {
            id: id.to_string(),
            title: format!("Title {id}"),
            video_id: format!("vid-{id}"),
            requested_by: None,
            duration: None,
        }
    }
}
