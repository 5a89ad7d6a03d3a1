//! Client core for the SmartDelivery REST API.
//!
//! # Overview
//! [`HttpClient`] performs single-attempt JSON exchanges against the fixed
//! `/api` base path and normalizes every failure into a [`RequestError`].
//! Failures are also surfaced to the user through a [`Notifier`], a queue of
//! short-lived status messages that dismiss themselves on independent timers.
//! [`DeliveryApi`] maps the domain endpoints (livreurs, commandes, trajets,
//! ...) onto the client.
//!
//! # Design
//! - Components are wired explicitly: the notifier is handed to the client,
//!   the client to the API. Nothing lives in global state.
//! - The network sits behind the [`Transport`] trait, with reqwest and ureq
//!   backends selected by cargo features.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod backends;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod notifier;
pub mod request;
mod scheduler;
pub mod transport;
pub mod types;

#[cfg(test)]
mod test_support;

pub use api::DeliveryApi;
#[cfg(feature = "reqwest-transport")]
pub use backends::ReqwestTransport;
#[cfg(feature = "ureq-transport")]
pub use backends::UreqTransport;
pub use client::HttpClient;
pub use config::ClientConfig;
pub use error::{ConfigError, RequestError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use notifier::{
    Level, NoopSink, Notification, NotificationHandle, NotificationSink, NotificationState,
    Notifier, TracingSink,
};
pub use request::{Request, API_BASE_PATH};
pub use transport::Transport;
pub use types::{
    ApiStatus, Commande, CommandeFilters, Livreur, OptimisationParams, ServerNotification,
    StatutCommande, Trajet,
};
