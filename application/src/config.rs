//! [`Config`]-related definitions.

use std::{path::PathBuf, time};

use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use serde::Deserialize;
use service::infra::{api, storage};
use smart_default::SmartDefault;

/// Application configuration.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    /// Authentication API configuration.
    #[serde(default)]
    pub api: Api,

    /// Session storage configuration.
    #[serde(default)]
    pub storage: Storage,

    /// Log configuration.
    #[serde(default)]
    pub log: Log,
}

impl Config {
    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the environment variables (if any);
    /// - using default values for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("CONF").separator("."))
            .build()?
            .try_deserialize()
    }
}

/// Authentication API configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Api {
    /// Base URL of the backend.
    #[default("http://127.0.0.1:8000".to_owned())]
    pub base_url: String,

    /// Path of the login endpoint.
    #[default("/api/v1/auth/login".to_owned())]
    pub login_path: String,

    /// Path of the endpoint resolving a token into its identity.
    #[default("/api/v1/auth/me".to_owned())]
    pub me_path: String,

    /// Timeout of a single request.
    #[default(time::Duration::from_secs(30))]
    #[serde(with = "humantime_serde")]
    pub timeout: time::Duration,
}

impl From<Api> for api::http::Config {
    fn from(value: Api) -> Self {
        let Api {
            base_url,
            login_path,
            me_path,
            timeout,
        } = value;
        Self {
            base_url,
            login_path,
            me_path,
            timeout,
        }
    }
}

/// Session storage configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Storage {
    /// Kind of the storage backend.
    pub backend: StorageBackend,

    /// Directory the [`StorageBackend::File`] storage writes into.
    #[default(PathBuf::from(".session"))]
    pub dir: PathBuf,

    /// Key the session is persisted under.
    #[default(storage::Key::DEFAULT.to_owned())]
    pub key: String,
}

/// Kind of a session storage backend.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One file per key in a directory, surviving restarts.
    #[default]
    File,

    /// Process memory, lost on exit.
    Memory,
}

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// Designates lower priority information.
    Debug,

    /// Designates useful information.
    #[default]
    Info,

    /// Designates hazardous situations.
    Warn,

    /// Designates very serious errors.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}
