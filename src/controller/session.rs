//! Login callback, logout and credential persistence

use std::process::{Command, Stdio};

use chrono::Utc;

use crate::auth::{self, AuthCallbackError, AuthSession};

use super::AppController;

impl AppController {
    /// Load persisted credentials at startup. When present, announce the
    /// session and refresh right away instead of waiting for the first tick.
    pub fn restore_session(&mut self) {
        match self.credentials.load() {
            Ok(Some(session)) => {
                tracing::info!(username = ?session.username, "Restored persisted credentials");
                self.model.set_auth(session);
                self.broadcast_auth();
                self.refresh();
            }
            Ok(None) => tracing::info!(path = %self.credentials.path().display(), "No stored credentials found"),
            Err(e) => tracing::error!(error = ?e, "Failed to load persisted credentials"),
        }
    }

    pub fn handle_auth_callback(&mut self, url: &str) -> Result<(), AuthCallbackError> {
        let session = match auth::parse_callback_url(url, Utc::now()) {
            Ok(session) => session,
            Err(e) => {
                tracing::error!(error = %e, "Failed to parse auth callback");
                return Err(e);
            }
        };

        tracing::info!(username = ?session.username, "Login callback accepted");
        self.persist(&session);
        self.model.set_auth(session);
        self.broadcast_auth();
        self.refresh();
        Ok(())
    }

    pub fn logout(&mut self) {
        tracing::info!("Clearing credentials");
        self.model.clear_auth();
        if let Err(e) = self.credentials.clear() {
            tracing::error!(error = ?e, "Failed to remove persisted credentials");
        }
        self.broadcast_auth();
    }

    pub fn open_login(&self) {
        tracing::info!(url = %self.login_url, "Opening login page");
        if let Err(e) = open_external(&self.login_url) {
            tracing::error!(error = %e, url = %self.login_url, "Failed to open browser");
        }
    }

    fn persist(&self, session: &AuthSession) {
        if let Err(e) = self.credentials.save(session) {
            tracing::error!(error = ?e, "Failed to persist credentials");
        }
    }
}

fn open_external(target: &str) -> std::io::Result<()> {
    let mut command = if cfg!(target_os = "macos") {
        let mut c = Command::new("open");
        c.arg(target);
        c
    } else if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", "", target]);
        c
    } else {
        let mut c = Command::new("xdg-open");
        c.arg(target);
        c
    };

    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
}
