use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

pub const LOGIN_PROTOCOL: &str = "wizbot";

const CREDENTIALS_DIR: &str = "wizbot-player";
const CREDENTIALS_FILE: &str = "wizbot-auth.json";
const FALLBACK_CREDENTIALS_FILE: &str = ".cache/wizbot-auth.json";

/// Bearer credentials for the queue API. A present token is treated as valid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Error)]
pub enum AuthCallbackError {
    #[error("invalid callback url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("unexpected callback scheme `{0}`")]
    WrongScheme(String),
    #[error("missing access token in callback")]
    MissingToken,
}

pub fn is_callback_url(value: &str) -> bool {
    value.starts_with(&format!("{}://", LOGIN_PROTOCOL))
}

/// Parse a `wizbot://...?token=...` login callback.
///
/// `token` wins over `access_token` when both are present, even if empty.
pub fn parse_callback_url(raw: &str, now: DateTime<Utc>) -> Result<AuthSession, AuthCallbackError> {
    let url = Url::parse(raw)?;
    if url.scheme() != LOGIN_PROTOCOL {
        return Err(AuthCallbackError::WrongScheme(url.scheme().to_string()));
    }

    let param = |key: &str| {
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    };

    let access_token = param("token")
        .or_else(|| param("access_token"))
        .filter(|token| !token.is_empty())
        .ok_or(AuthCallbackError::MissingToken)?;

    let expires_at = param("expires_in")
        .filter(|raw| !raw.is_empty())
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .and_then(|secs| expiry_after(now, secs));

    Ok(AuthSession {
        access_token,
        refresh_token: param("refresh_token"),
        expires_at,
        username: param("username"),
    })
}

/// `now + secs`, or `None` when the offset leaves chrono's range
fn expiry_after(now: DateTime<Utc>, secs: f64) -> Option<DateTime<Utc>> {
    let millis = (secs * 1000.0).trunc();
    if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
        return None;
    }
    let offset = TimeDelta::try_milliseconds(millis as i64)?;
    now.checked_add_signed(offset)
}

/// Flat JSON file holding the last successful login
#[derive(Clone, Debug)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Per-user location, falling back to the working directory when the
    /// platform has no config dir.
    pub fn user_default() -> Self {
        let path = dirs::config_dir()
            .map(|dir| dir.join(CREDENTIALS_DIR).join(CREDENTIALS_FILE))
            .unwrap_or_else(|| PathBuf::from(FALLBACK_CREDENTIALS_FILE));
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `None` when no file exists or it holds no access token.
    pub fn load(&self) -> Result<Option<AuthSession>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let session: AuthSession = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", self.path.display()))?;

        if session.access_token.is_empty() {
            tracing::debug!(path = %self.path.display(), "Stored credentials have no access token");
            return Ok(None);
        }

        Ok(Some(session))
    }

    pub fn save(&self, session: &AuthSession) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string(session)?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), "Saved credentials to disk");
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove {}", self.path.display()))?;
            tracing::debug!(path = %self.path.display(), "Removed stored credentials");
        }
        Ok(())
    }
}
