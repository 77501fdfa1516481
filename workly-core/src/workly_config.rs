//! Global Workly configuration.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use chrono::Weekday;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::backend::{Backend, FileBackend, MemoryBackend};
use crate::error::{WorklyError, WorklyResult};

static DEFAULT_FIRST_WEEKDAY: &str = "monday";

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("workly"))
        .unwrap_or_else(|| PathBuf::from("~/.workly"))
}

fn default_first_weekday() -> String {
    DEFAULT_FIRST_WEEKDAY.to_string()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    File,
    /// Nothing outlives the process. For tests and embedding the library,
    /// not for the CLI.
    Memory,
}

impl BackendKind {
    pub fn persists_across_runs(&self) -> bool {
        matches!(self, BackendKind::File)
    }
}

/// Global configuration at ~/.config/workly/config.toml, overridable with
/// `WORKLY_*` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorklyConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Day the month grid starts on, e.g. "monday" or "sun"
    #[serde(default = "default_first_weekday")]
    pub first_weekday: String,

    #[serde(default)]
    pub backend: BackendKind,
}

impl Default for WorklyConfig {
    fn default() -> Self {
        WorklyConfig {
            data_dir: default_data_dir(),
            first_weekday: default_first_weekday(),
            backend: BackendKind::default(),
        }
    }
}

impl WorklyConfig {
    pub fn config_path() -> WorklyResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| WorklyError::Config("Could not determine config directory".into()))?
            .join("workly");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default path, creating a commented config file first
    /// if none exists.
    pub fn load() -> WorklyResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> WorklyResult<Self> {
        let config: WorklyConfig = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("WORKLY"))
            .build()
            .map_err(|e| WorklyError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| WorklyError::Config(e.to_string()))?;

        // Surface a bad weekday at load time rather than on first render
        config.first_weekday()?;
        Ok(config)
    }

    /// `data_dir` with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned();
        PathBuf::from(full_path_str)
    }

    pub fn first_weekday(&self) -> WorklyResult<Weekday> {
        Weekday::from_str(self.first_weekday.trim()).map_err(|_| {
            WorklyError::Config(format!(
                "Invalid first_weekday '{}'. Expected a day name like \"monday\"",
                self.first_weekday
            ))
        })
    }

    pub fn open_backend(&self) -> Arc<dyn Backend> {
        match self.backend {
            BackendKind::File => Arc::new(FileBackend::new(self.data_path())),
            BackendKind::Memory => Arc::new(MemoryBackend::new()),
        }
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> WorklyResult<()> {
        let contents = format!(
            "\
# workly configuration

# Where calendars, events and accounts are stored:
# data_dir = \"{}\"

# First day of the week in month views:
# first_weekday = \"{}\"

# Storage backend (\"file\" or \"memory\"). \"memory\" keeps nothing
# between runs and is only useful when embedding the library:
# backend = \"file\"
",
            default_data_dir().display(),
            DEFAULT_FIRST_WEEKDAY
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                WorklyError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| WorklyError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
