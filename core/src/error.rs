//! Error types for the SmartDelivery API client.
//!
//! # Design
//! Every failed call surfaces as one [`RequestError`] carrying an optional
//! status code and a message. `Transport` covers exchanges that never produced
//! a usable response (connection refused, DNS, unreadable or malformed body)
//! and has no status. `Application` covers responses whose status failed the
//! success predicate. The two remaining variants are raised before any I/O
//! happens.
//!
//! Backends report their own failures as [`TransportError`], which the client
//! folds into `RequestError::Transport`.

use thiserror::Error;

/// The failure returned by `HttpClient::request` and every `DeliveryApi` call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// No usable response was received.
    #[error("{message}")]
    Transport { message: String },

    /// A response arrived but its status was not a success.
    #[error("{message}")]
    Application { status: u16, message: String },

    /// The descriptor's path was empty or did not start with `/`.
    #[error("invalid request path {0:?}: expected a non-empty path starting with '/'")]
    InvalidPath(String),

    /// The request payload could not be encoded.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl RequestError {
    /// Build the failure for a non-success status, e.g. `HTTP 404: Not Found`.
    pub fn from_status(status: u16, status_text: &str) -> Self {
        let message = if status_text.is_empty() {
            format!("HTTP {status}")
        } else {
            format!("HTTP {status}: {status_text}")
        };
        RequestError::Application { status, message }
    }

    pub(crate) fn malformed(err: serde_json::Error) -> Self {
        RequestError::Transport {
            message: format!("malformed response body: {err}"),
        }
    }

    /// The HTTP status, absent when no response was received.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            RequestError::Application { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Whether the failure came from the exchange itself (and was therefore
    /// reported to the notifier) rather than from descriptor validation.
    pub fn is_exchange_failure(&self) -> bool {
        matches!(
            self,
            RequestError::Transport { .. } | RequestError::Application { .. }
        )
    }
}

impl From<TransportError> for RequestError {
    fn from(err: TransportError) -> Self {
        RequestError::Transport {
            message: err.to_string(),
        }
    }
}

/// Failures reported by a transport backend.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The connection could not be established or was dropped.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("transport error: {0}")]
    Other(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors raised while loading [`ClientConfig`](crate::config::ClientConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}
