//! Single-attempt JSON HTTP client for the SmartDelivery API.
//!
//! # Design
//! `HttpClient` holds its origin, a [`Transport`], and the [`Notifier`] it
//! reports failures to. It carries no mutable state between calls, so any
//! number of `request`s can run concurrently and complete in whatever order
//! the network answers.
//!
//! A call lowers the [`Request`] descriptor to an `HttpRequest`, sends it
//! once, checks the status against the success predicate, and parses the body
//! as JSON. Any failure of the exchange is logged, raises exactly one error
//! notification, and is then returned to the caller unchanged. Descriptor
//! validation errors are returned without a notification since nothing was
//! sent.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::error;

use crate::config::ClientConfig;
use crate::error::RequestError;
use crate::http::{is_success_status, HttpMethod, HttpRequest};
use crate::notifier::{Level, Notifier};
use crate::request::Request;
use crate::transport::Transport;

#[derive(Debug, Clone)]
pub struct HttpClient<T> {
    origin: String,
    transport: T,
    notifier: Notifier,
    connectivity_message: String,
    is_success: fn(u16) -> bool,
}

impl<T: Transport> HttpClient<T> {
    pub fn new(config: &ClientConfig, transport: T, notifier: Notifier) -> Self {
        Self {
            origin: config.origin.clone(),
            transport,
            notifier,
            connectivity_message: config.connectivity_message.clone(),
            is_success: is_success_status,
        }
    }

    /// Replace the default 2xx success check.
    pub fn with_success_predicate(mut self, is_success: fn(u16) -> bool) -> Self {
        self.is_success = is_success;
        self
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Perform one exchange and return the response body as parsed JSON.
    pub async fn request(&self, request: &Request) -> Result<Value, RequestError> {
        self.request_as(request).await
    }

    /// Perform one exchange and decode the body into `D`.
    ///
    /// A body that does not fit `D` counts as a malformed response.
    pub async fn request_as<D: DeserializeOwned>(
        &self,
        request: &Request,
    ) -> Result<D, RequestError> {
        let http_request = request.to_http(&self.origin)?;
        let method = http_request.method;
        let url = http_request.url.clone();

        let outcome = match self.exchange(http_request).await {
            Ok(value) => serde_json::from_value(value).map_err(RequestError::malformed),
            Err(err) => Err(err),
        };
        outcome.inspect_err(|err| {
            if err.is_exchange_failure() {
                self.report(method, &url, err)
            }
        })
    }

    async fn exchange(&self, request: HttpRequest) -> Result<Value, RequestError> {
        let response = self.transport.send(request).await?;
        if !(self.is_success)(response.status) {
            return Err(RequestError::from_status(
                response.status,
                &response.status_text,
            ));
        }
        parse_body(&response.body)
    }

    fn report(&self, method: HttpMethod, url: &str, err: &RequestError) {
        error!(%method, url, status = ?err.status_code(), "API request failed: {err}");
        self.notifier
            .show(self.connectivity_message.clone(), Level::Error);
    }
}

/// Parse a success body. An empty body is not JSON and fails like any other
/// malformed body.
fn parse_body(body: &str) -> Result<Value, RequestError> {
    serde_json::from_str(body).map_err(RequestError::malformed)
}
