//! Player module - the headless playback surface
//!
//! Hosts a [`VideoWidget`], applies [`PlayerDirective`]s to it and turns its
//! numeric state callbacks into [`PlayerReport`]s for the orchestrator. This
//! is the only place widget state codes are interpreted.
//!
//! - `widget`: Widget trait, events and state codes
//! - `mpv`: Widget backed by an mpv child process

mod widget;
#[cfg(unix)]
mod mpv;

pub(crate) use widget::{VideoWidget, WidgetEvent};
#[cfg(unix)]
pub use mpv::MpvWidget;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crate::model::{AppEvent, PlaybackStatus, PlayerDirective, PlayerReport, QueueItem};
use widget::{STATE_BUFFERING, STATE_ENDED, STATE_PAUSED, STATE_PLAYING};

const DEFAULT_VOLUME: u8 = 100;

pub struct PlayerSurface<W: VideoWidget> {
    widget: W,
    ready: bool,
    current: Option<QueueItem>,
    /// Single slot; a newer load before the widget is ready replaces it
    pending: Option<QueueItem>,
    reports: UnboundedSender<AppEvent>,
}

impl<W: VideoWidget> PlayerSurface<W> {
    pub fn new(widget: W, reports: UnboundedSender<AppEvent>) -> Self {
        Self {
            widget,
            ready: false,
            current: None,
            pending: None,
            reports,
        }
    }

    pub async fn run(
        mut self,
        mut directives: UnboundedReceiver<PlayerDirective>,
        mut widget_events: UnboundedReceiver<WidgetEvent>,
    ) {
        tracing::info!("Playback surface started");
        let mut widget_alive = true;

        loop {
            tokio::select! {
                directive = directives.recv() => match directive {
                    Some(directive) => self.handle_directive(directive),
                    None => break,
                },
                event = widget_events.recv(), if widget_alive => match event {
                    Some(event) => self.handle_widget_event(event),
                    None => {
                        tracing::warn!("Widget event stream closed");
                        widget_alive = false;
                    }
                },
            }
        }

        tracing::info!("Playback surface stopped");
    }

    pub fn handle_directive(&mut self, directive: PlayerDirective) {
        match directive {
            PlayerDirective::PlayItem(item) => {
                self.current = Some(item.clone());
                if !self.ready {
                    tracing::debug!(id = %item.id, "Widget not ready, holding item");
                    self.pending = Some(item);
                    return;
                }
                self.load_item(item);
            }
            PlayerDirective::Pause => {
                if self.ready {
                    self.widget.pause_video();
                }
                self.report_current(PlaybackStatus::Paused, false);
            }
            PlayerDirective::Resume => {
                if !self.ready {
                    if let Some(item) = &self.current {
                        self.pending = Some(item.clone());
                    }
                    return;
                }
                self.widget.play_video();
                self.report_current(PlaybackStatus::Playing, false);
            }
            PlayerDirective::Stop => {
                if self.ready {
                    self.widget.stop_video();
                }
                self.current = None;
                self.report(PlayerReport {
                    status: Some(PlaybackStatus::Stopped),
                    current_id: None,
                    buffering: Some(false),
                    title: Some(String::new()),
                    ended: false,
                });
            }
        }
    }

    pub fn handle_widget_event(&mut self, event: WidgetEvent) {
        match event {
            WidgetEvent::Ready => {
                tracing::info!("Widget ready");
                self.ready = true;
                self.widget.set_volume(DEFAULT_VOLUME);
                self.widget.un_mute();
                if let Some(item) = self.pending.take() {
                    self.load_item(item);
                }
            }
            WidgetEvent::StateChange(code) => self.handle_state_code(code),
            WidgetEvent::Error(message) => {
                tracing::warn!(error = %message, "Widget reported an error");
                if let Some(item) = &self.current {
                    let id = item.id.clone();
                    self.report(PlayerReport {
                        status: Some(PlaybackStatus::Stopped),
                        current_id: Some(id),
                        ..Default::default()
                    });
                }
            }
        }
    }

    fn handle_state_code(&mut self, code: i32) {
        match code {
            STATE_ENDED => {
                let current_id = self.current.as_ref().map(|item| item.id.clone());
                self.report(PlayerReport {
                    status: Some(PlaybackStatus::Stopped),
                    current_id,
                    buffering: Some(false),
                    title: Some(String::new()),
                    ended: true,
                });
            }
            STATE_PLAYING => self.report_current(PlaybackStatus::Playing, false),
            STATE_PAUSED => self.report_current(PlaybackStatus::Paused, false),
            STATE_BUFFERING => self.report_current(PlaybackStatus::Loading, true),
            other => tracing::trace!(code = other, "Ignoring widget state"),
        }
    }

    fn load_item(&mut self, item: QueueItem) {
        self.report(PlayerReport {
            status: Some(PlaybackStatus::Loading),
            current_id: Some(item.id.clone()),
            buffering: Some(true),
            title: Some(item.title.clone()),
            ended: false,
        });

        if let Err(e) = self.widget.load_video_by_id(&item.video_id) {
            tracing::error!(error = %e, id = %item.id, video_id = %item.video_id, "Failed to load video");
            self.report(PlayerReport {
                status: Some(PlaybackStatus::Stopped),
                current_id: Some(item.id),
                buffering: Some(false),
                ..Default::default()
            });
        }
    }

    fn report_current(&self, status: PlaybackStatus, buffering: bool) {
        self.report(PlayerReport {
            status: Some(status),
            current_id: self.current.as_ref().map(|item| item.id.clone()),
            buffering: Some(buffering),
            title: Some(
                self.current
                    .as_ref()
                    .map(|item| item.title.clone())
                    .unwrap_or_default(),
            ),
            ended: false,
        });
    }

    fn report(&self, report: PlayerReport) {
        if self.reports.send(AppEvent::PlayerReport(report)).is_err() {
            tracing::trace!("Orchestrator is gone, dropping report");
        }
    }
}
