//! Settings loading: defaults, then an optional TOML file, then `TASKLANE_*`
//! environment variables.
//!
//! Only the outer layer reads these. Flags reach the domain as constructor
//! arguments through [`crate::app::AppBuilder::settings`].

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_DATABASE_URL: &str = "TASKLANE_DATABASE_URL";
pub const ENV_AUTO_COMPLETE_PROJECTS: &str = "TASKLANE_AUTO_COMPLETE_PROJECTS";
pub const ENV_AUTO_ADJUST_TASK_DEADLINES: &str = "TASKLANE_AUTO_ADJUST_TASK_DEADLINES";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value `{value}` for {key}: expected a boolean")]
    InvalidBool { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub database_url: String,
    /// Complete a project when its last open task completes.
    pub auto_complete_projects: bool,
    /// Clamp task deadlines instead of rejecting an earlier project deadline.
    pub auto_adjust_task_deadlines: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: "sqlite://tasklane.db".to_string(),
            auto_complete_projects: true,
            auto_adjust_task_deadlines: true,
        }
    }
}

impl Settings {
    /// Load with all layers applied. A missing file is skipped.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut settings = match path {
            Some(path) if path.exists() => Self::from_file(path)?,
            _ => Self::default(),
        };
        settings.apply_env(|key| env::var(key).ok())?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overlay variables returned by `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_DATABASE_URL) {
            self.database_url = url;
        }
        if let Some(raw) = lookup(ENV_AUTO_COMPLETE_PROJECTS) {
            self.auto_complete_projects = parse_bool(ENV_AUTO_COMPLETE_PROJECTS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_AUTO_ADJUST_TASK_DEADLINES) {
            self.auto_adjust_task_deadlines = parse_bool(ENV_AUTO_ADJUST_TASK_DEADLINES, &raw)?;
        }
        Ok(())
    }
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            key,
            value: raw.to_string(),
        }),
    }
}
