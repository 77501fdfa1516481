pub mod auth;
pub mod calendar;
pub mod config;
pub mod event;
pub mod member;
pub mod month;
pub mod team;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use workly_core::{Workly, WorklyError};
use workly_core::calendar::Calendar;
use workly_core::preferences::Preferences;
use workly_core::user::User;
use workly_core::workly_config::WorklyConfig;

/// Everything a command needs, loaded once per invocation.
pub struct App {
    pub config: WorklyConfig,
    pub workly: Workly,
    pub prefs: Preferences,
    prefs_path: PathBuf,
}

impl App {
    pub fn load() -> Result<Self> {
        let config = WorklyConfig::load().context("Failed to load config")?;
        let prefs_path = Preferences::default_path()?;
        let prefs = Preferences::load_from(&prefs_path)
            .with_context(|| format!("Failed to read {}", prefs_path.display()))?;
        let workly = Workly::new(config.open_backend());

        if !config.backend.persists_across_runs() {
            tracing::warn!(
                "the memory backend keeps nothing between runs; set backend = \"file\" to keep accounts and calendars"
            );
        }

        tracing::debug!(data_dir = %config.data_path().display(), "loaded app");

        Ok(App {
            config,
            workly,
            prefs,
            prefs_path,
        })
    }

    pub fn save_prefs(&self) -> Result<()> {
        self.prefs
            .save_to(&self.prefs_path)
            .with_context(|| format!("Failed to write {}", self.prefs_path.display()))
    }

    /// The signed-in user, or a hint to sign in.
    pub async fn require_user(&self) -> Result<User> {
        let Some(session) = self.prefs.session.as_ref() else {
            anyhow::bail!(
                "Not signed in.\n\n\
                Sign in with:\n  \
                workly login --email <email>\n\n\
                Or create an account:\n  \
                workly signup"
            );
        };

        self.workly
            .current_user(session)
            .await
            .context("Your session is no longer valid. Run `workly login` again")
    }

    /// Resolve `--calendar` (id or name), falling back to the calendar in use.
    ///
    /// A calendar in use that was deleted, or that the user was removed from,
    /// is forgotten and resolution continues as if none was set.
    pub async fn resolve_calendar(&mut self, user: &User, filter: Option<&str>) -> Result<Calendar> {
        if let Some(id_or_name) = filter {
            return Ok(self.workly.find_calendar(user, id_or_name).await?);
        }

        if let Some(last) = self.prefs.last_calendar.clone() {
            match self.workly.find_calendar(user, &last).await {
                Ok(calendar) => return Ok(calendar),
                Err(WorklyError::NotFound { .. } | WorklyError::PermissionDenied(_)) => {
                    tracing::warn!(calendar = %last, "calendar in use is no longer available");
                    self.prefs.last_calendar = None;
                    self.save_prefs()?;
                }
                Err(e) => return Err(e.into()),
            }
        }

        let mut calendars = self.workly.calendars(user).await?;
        match calendars.len() {
            0 => anyhow::bail!(
                "No calendars found.\n\n\
                Create your first calendar with:\n  \
                workly calendar new <name>"
            ),
            1 => Ok(calendars.remove(0)),
            _ => {
                let available: Vec<_> = calendars.iter().map(|c| c.name.clone()).collect();
                anyhow::bail!(
                    "Several calendars found. Pick one with --calendar or `workly calendar use`.\nAvailable: {}",
                    available.join(", ")
                );
            }
        }
    }
}

/// Short form of an id for display and prefix lookup.
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// Parse a user-entered date/time in `tz`.
///
/// Accepts "2025-03-20T15:00", "2025-03-20 15:00" and "2025-03-20" (midnight).
/// Returns the instant and whether only a date was given.
pub fn parse_datetime<Tz: TimeZone>(input: &str, tz: &Tz) -> Result<(DateTime<Utc>, bool)> {
    let input = input.trim();

    let (naive, date_only) = if let Ok(dt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M") {
        (dt, false)
    } else if let Ok(dt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M") {
        (dt, false)
    } else if let Ok(d) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        (d.and_time(chrono::NaiveTime::MIN), true)
    } else {
        anyhow::bail!(
            "Invalid date/time '{}'. Expected YYYY-MM-DD or YYYY-MM-DDTHH:MM",
            input
        );
    };

    let local = tz
        .from_local_datetime(&naive)
        .earliest()
        .with_context(|| format!("'{}' does not exist in the local time zone", input))?;

    Ok((local.with_timezone(&Utc), date_only))
}
