//! User configuration for client apps.
//!
//! `SpotsConfig` is read from a JSON file and then overridden from the
//! environment. Every field is optional; accessors supply the defaults.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::geocode::DEFAULT_NOMINATIM_URL;
use crate::maps::MapApp;
use crate::util::{is_http_url, normalize_text_option};
use crate::{Error, Result};

/// File name of the config file inside the platform config directory
pub const CONFIG_FILE_NAME: &str = "spots-config.json";

pub const ENV_DB_PATH: &str = "SPOTS_DB_PATH";
pub const ENV_GEOCODER_URL: &str = "SPOTS_GEOCODER_URL";
pub const ENV_GEOCODER_ENABLED: &str = "SPOTS_GEOCODER_ENABLED";

const DEFAULT_GEOCODER_TIMEOUT_SECS: u64 = 5;
const DEFAULT_ENRICHMENT_WAIT_SECS: u64 = 3;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SpotsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geocoder_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geocoder_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geocoder_timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_app: Option<MapApp>,
    /// How long the CLI waits for the address lookup after marking a spot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrichment_wait_secs: Option<u64>,
}

impl SpotsConfig {
    /// Read the config file at `path`; a missing file yields the defaults.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Self = serde_json::from_str(&raw).map_err(|error| {
            Error::Config(format!(
                "failed to parse config file {}: {error}",
                path.display()
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config as pretty JSON, creating parent directories.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, format!("{json}\n"))?;
        Ok(())
    }

    /// Apply `SPOTS_*` variables from the process environment.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| env::var(key).ok())
    }

    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(db_path) = normalize_text_option(lookup(ENV_DB_PATH)) {
            self.db_path = Some(PathBuf::from(db_path));
        }
        if let Some(url) = normalize_text_option(lookup(ENV_GEOCODER_URL)) {
            self.geocoder_url = Some(url);
        }
        if let Some(raw) = normalize_text_option(lookup(ENV_GEOCODER_ENABLED)) {
            self.geocoder_enabled = Some(parse_bool(ENV_GEOCODER_ENABLED, &raw)?);
        }

        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if let Some(url) = normalize_text_option(self.geocoder_url.clone()) {
            if !is_http_url(&url) {
                return Err(Error::Config(format!(
                    "geocoder_url must include http:// or https://, got '{url}'"
                )));
            }
        }
        if self.geocoder_timeout_secs == Some(0) {
            return Err(Error::Config(
                "geocoder_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn geocoder_url(&self) -> String {
        normalize_text_option(self.geocoder_url.clone())
            .unwrap_or_else(|| DEFAULT_NOMINATIM_URL.to_string())
    }

    pub fn geocoder_enabled(&self) -> bool {
        self.geocoder_enabled.unwrap_or(true)
    }

    pub fn geocoder_timeout(&self) -> Duration {
        Duration::from_secs(
            self.geocoder_timeout_secs
                .unwrap_or(DEFAULT_GEOCODER_TIMEOUT_SECS),
        )
    }

    pub fn map_app(&self) -> MapApp {
        self.map_app.unwrap_or_default()
    }

    pub fn enrichment_wait(&self) -> Duration {
        Duration::from_secs(
            self.enrichment_wait_secs
                .unwrap_or(DEFAULT_ENRICHMENT_WAIT_SECS),
        )
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::Config(format!(
            "{key} must be true or false, got '{raw}'"
        ))),
    }
}
