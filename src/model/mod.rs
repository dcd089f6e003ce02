//! Model module - Application state and data types
//!
//! - `types`: Queue items, playback state and snapshots
//! - `messages`: Events and commands passed between orchestrator and surfaces
//! - `queue_client`: Remote queue API client
//! - `app_model`: Canonical session state owned by the orchestrator

mod types;
mod messages;
mod queue_client;
mod app_model;

pub use types::{AuthStatus, PlaybackState, PlaybackStatus, QueueItem, StateSnapshot};

pub use messages::{AppEvent, ControlCommand, PlayerDirective, PlayerReport, SurfaceUpdate};

pub use queue_client::{QueueClient, QueueError};

pub use app_model::AppModel;
