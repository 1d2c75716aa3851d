//! Runtime configuration for the campus core.
//!
//! # Responsibility
//! - Describe where records live, which backend stores them, and which
//!   administrator pair (if any) is accepted.
//! - Load from a JSON file and apply `CAMPUS_*` environment overrides.
//!
//! # Invariants
//! - No administrator credential is compiled in. Without a configured pair
//!   every admin login is rejected.

use crate::logging::default_log_level;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_DATA_FILE: &str = "database.json";

/// Persistence backend selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// One pretty-printed JSON file.
    #[default]
    Json,
    /// Embedded SQLite database keyed by record id.
    Sqlite,
}

impl StorageBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "sqlite" => Some(Self::Sqlite),
            _ => None,
        }
    }
}

/// The single administrator username/password pair.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl Debug for AdminCredentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Core configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub data_file: PathBuf,
    pub backend: StorageBackend,
    pub admin: Option<AdminCredentials>,
    /// Session lifetime in seconds; `None` keeps sessions until logout.
    pub session_ttl_secs: Option<u64>,
    pub log_level: String,
    /// Absolute directory for rolling log files; `None` disables file logging.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            backend: StorageBackend::default(),
            admin: None,
            session_ttl_secs: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
    InvalidValue { key: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read config: {err}"),
            Self::Json(err) => write!(f, "invalid config JSON: {err}"),
            Self::InvalidValue { key, value } => write!(f, "invalid value `{value}` for {key}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::InvalidValue { .. } => None,
        }
    }
}

impl CoreConfig {
    /// Parses a JSON config file. Absent keys take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&raw).map_err(ConfigError::Json)
    }

    /// Applies `CAMPUS_*` overrides from the process environment.
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary key lookup.
    ///
    /// The administrator pair is only replaced when both halves are present.
    pub fn apply_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(value) = lookup("CAMPUS_DATA_FILE") {
            self.data_file = PathBuf::from(value);
        }
        if let Some(value) = lookup("CAMPUS_BACKEND") {
            self.backend = StorageBackend::parse(&value).ok_or(ConfigError::InvalidValue {
                key: "CAMPUS_BACKEND",
                value,
            })?;
        }
        if let (Some(username), Some(password)) = (
            lookup("CAMPUS_ADMIN_USERNAME"),
            lookup("CAMPUS_ADMIN_PASSWORD"),
        ) {
            self.admin = Some(AdminCredentials { username, password });
        }
        if let Some(value) = lookup("CAMPUS_SESSION_TTL_SECS") {
            let secs = value
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue {
                    key: "CAMPUS_SESSION_TTL_SECS",
                    value: value.clone(),
                })?;
            self.session_ttl_secs = Some(secs);
        }
        if let Some(value) = lookup("CAMPUS_LOG_LEVEL") {
            self.log_level = value;
        }
        if let Some(value) = lookup("CAMPUS_LOG_DIR") {
            self.log_dir = Some(PathBuf::from(value));
        }
        Ok(self)
    }

    pub fn session_ttl(&self) -> Option<Duration> {
        self.session_ttl_secs.map(Duration::from_secs)
    }
}
