use serde::Deserialize;
use std::time::Duration;

use crate::error::ConfigError;

/// Value by which the backend scales pitch unless the user overrides it.
pub const DEFAULT_PITCH_SCALER: f64 = 1.25;

/// Value by which the backend scales tempo unless the user overrides it.
pub const DEFAULT_TEMPO_SCALER: f64 = 1.10;

/// Largest upload the service accepts. Mirrors the backend artifact limit.
pub const MAX_FILE_SIZE: u64 = 20 * 1024 * 1024;

/// Upper bound the backend places on both scale factors.
pub const MAX_SCALE: f64 = 10.0;

/// Conversion targets: ogg (Vorbis) and m4a (AAC).
pub const ALLOWED_FORMATS: [&str; 2] = ["ogg", "m4a"];

/// Fixed delay between status checks.
pub const POLL_INTERVAL: Duration = Duration::from_millis(1250);

const BASE_URL_ENV: &str = "NIGHTCONV_BASE_URL";
const TIMEOUT_ENV: &str = "NIGHTCONV_TIMEOUT_SECS";

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout", with = "secs")]
    pub request_timeout: Duration,
    #[serde(skip, default = "default_poll_interval")]
    pub poll_interval: Duration,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout: default_request_timeout(),
            poll_interval: default_poll_interval(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl ClientConfig {
    /// Builds a config from `NIGHTCONV_BASE_URL` and `NIGHTCONV_TIMEOUT_SECS`,
    /// falling back to defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(BASE_URL_ENV) {
            let url = url.trim().trim_end_matches('/').to_string();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::Invalid {
                    key: BASE_URL_ENV,
                    value: url,
                });
            }
            config.base_url = url;
        }

        if let Some(raw) = lookup(TIMEOUT_ENV) {
            let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                key: TIMEOUT_ENV,
                value: raw.clone(),
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_poll_interval() -> Duration {
    POLL_INTERVAL
}

fn default_max_upload_bytes() -> u64 {
    MAX_FILE_SIZE
}

mod secs {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
