//! Pluggable transport seam between `HttpClient` and the network.

use std::future::Future;

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};

/// Executes one HTTP exchange.
///
/// A backend returns whatever response arrives, whatever its status; only
/// failures to obtain a response are errors. Implementations must not retry.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}
