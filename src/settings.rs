//! Runtime settings for the backend connection.
//!
//! Settings are layered: built-in defaults, then an optional settings file,
//! then `INFLUXWATCH_*` environment variables
//! (e.g. `INFLUXWATCH_REQUEST_TIMEOUT_SECS=5`).

use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;

use influxwatch_adapters::influxdb::InfluxDbAdapter;
use influxwatch_adapters::AdapterError;

use crate::CheckError;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "INFLUXWATCH";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Per-query HTTP timeout.
    pub request_timeout_secs: u64,
    /// `http` or `https`.
    pub scheme: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Timestamp precision requested from InfluxDB.
    pub epoch: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            request_timeout_secs: 10,
            scheme: "http".to_string(),
            username: None,
            password: None,
            epoch: "s".to_string(),
        }
    }
}

impl Settings {
    /// Load settings, reading `path` if given.
    pub fn load(path: Option<&Path>) -> Result<Self, CheckError> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("request_timeout_secs", defaults.request_timeout_secs)?
            .set_default("scheme", defaults.scheme)?
            .set_default("epoch", defaults.epoch)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let config = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Build the InfluxDB adapter these settings describe.
    pub fn adapter(&self) -> Result<InfluxDbAdapter, AdapterError> {
        let mut builder = InfluxDbAdapter::builder()
            .scheme(self.scheme.as_str())
            .epoch(self.epoch.as_str())
            .timeout(self.request_timeout());
        if let Some(username) = &self.username {
            builder = builder.credentials(
                username.as_str(),
                self.password.clone().unwrap_or_default(),
            );
        }
        builder.build()
    }
}
