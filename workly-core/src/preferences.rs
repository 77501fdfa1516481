//! Local key-value preferences: the signed-in session and UI state.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{WorklyError, WorklyResult};
use crate::user::User;

const PREFERENCES_FILE: &str = "preferences.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub email: String,
    pub signed_in_at: DateTime<Utc>,
}

impl Session {
    pub fn for_user(user: &User) -> Self {
        Session {
            user_id: user.id.clone(),
            email: user.email.clone(),
            signed_in_at: Utc::now(),
        }
    }
}

/// Stored at ~/.config/workly/preferences.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<Session>,

    /// Calendar id used when a command doesn't name one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_calendar: Option<String>,
}

impl Preferences {
    pub fn default_path() -> WorklyResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| WorklyError::Config("Could not determine config directory".into()))?
            .join("workly");

        Ok(config_dir.join(PREFERENCES_FILE))
    }

    /// Load preferences, falling back to defaults when the file is missing.
    pub fn load_from(path: &Path) -> WorklyResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| WorklyError::Config(e.to_string()))
    }

    pub fn save_to(&self, path: &Path) -> WorklyResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| WorklyError::Config(e.to_string()))?;

        let temp = path.with_extension("toml.tmp");
        std::fs::write(&temp, content)?;
        std::fs::rename(&temp, path)?;
        Ok(())
    }

    pub fn sign_in(&mut self, user: &User) {
        // A different user shouldn't inherit the previous calendar choice
        if self.session.as_ref().is_some_and(|s| s.user_id != user.id) {
            self.last_calendar = None;
        }
        self.session = Some(Session::for_user(user));
    }

    pub fn sign_out(&mut self) -> Option<Session> {
        self.last_calendar = None;
        self.session.take()
    }

    pub fn require_session(&self) -> WorklyResult<&Session> {
        self.session.as_ref().ok_or(WorklyError::NotSignedIn)
    }
}
