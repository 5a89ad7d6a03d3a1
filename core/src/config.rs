//! Client configuration.
//!
//! Values come from [`ClientConfig::default`] or from the environment via
//! [`ClientConfig::from_env`]. Unset variables fall back to the defaults and
//! are logged; set but unparsable ones are an error.

use std::env;
use std::time::Duration;

use tracing::info;

use crate::error::ConfigError;

pub const DEFAULT_ORIGIN: &str = "http://127.0.0.1:5000";
pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_millis(3000);
/// Length of the exit transition between dismissal and removal.
pub const DEFAULT_DISMISS_DELAY: Duration = Duration::from_millis(300);
pub const DEFAULT_CONNECTIVITY_MESSAGE: &str = "Erreur de connexion à l'API";

pub const ORIGIN_VAR: &str = "SMART_DELIVERY_URL";
pub const NOTIFICATION_TTL_VAR: &str = "SMART_DELIVERY_NOTIFICATION_TTL_MS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Scheme, host and port of the backend, without a trailing slash.
    pub origin: String,
    pub notification_ttl: Duration,
    pub dismiss_delay: Duration,
    /// Shown as an error notification whenever a request fails.
    pub connectivity_message: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            notification_ttl: DEFAULT_NOTIFICATION_TTL,
            dismiss_delay: DEFAULT_DISMISS_DELAY,
            connectivity_message: DEFAULT_CONNECTIVITY_MESSAGE.to_string(),
        }
    }
}

impl ClientConfig {
    /// Default settings against `origin`.
    pub fn new(origin: &str) -> Self {
        Self {
            origin: normalize_origin(origin),
            ..Self::default()
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        match lookup(ORIGIN_VAR) {
            Some(origin) => config.origin = normalize_origin(&origin),
            None => info!("{ORIGIN_VAR} not set, using default: {DEFAULT_ORIGIN}"),
        }

        if let Some(raw) = lookup(NOTIFICATION_TTL_VAR) {
            let millis: u64 = raw.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::Invalid {
                    key: NOTIFICATION_TTL_VAR,
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?;
            config.notification_ttl = Duration::from_millis(millis);
        }

        Ok(config)
    }
}

fn normalize_origin(origin: &str) -> String {
    origin.trim().trim_end_matches('/').to_string()
}
