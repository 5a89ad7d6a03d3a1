//! Ureq-based transport.
//!
//! ureq is blocking, so each exchange runs on tokio's blocking pool and the
//! calling task only suspends while it waits for the result.

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;

/// A [`Transport`] backed by [`ureq`].
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            // Status codes are interpreted by the client, not the backend.
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || execute(&agent, request))
            .await
            .map_err(|e| TransportError::Other(Box::new(e)))?
    }
}

fn execute(agent: &ureq::Agent, request: HttpRequest) -> Result<HttpResponse, TransportError> {
    let mut builder = ureq::http::Request::builder()
        .method(request.method.as_str())
        .uri(request.url.as_str());
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    let result = match request.body {
        Some(body) => {
            let req = builder
                .body(body.into_bytes())
                .map_err(|e| TransportError::Other(Box::new(e)))?;
            agent.run(req)
        }
        None => {
            let req = builder
                .body(())
                .map_err(|e| TransportError::Other(Box::new(e)))?;
            agent.run(req)
        }
    };

    match result {
        Ok(response) => convert_response(response),
        Err(ureq::Error::HostNotFound) => {
            Err(TransportError::Connection("host not found".to_owned()))
        }
        Err(ureq::Error::Io(e)) => Err(TransportError::Connection(e.to_string())),
        Err(e) => Err(TransportError::Other(Box::new(e))),
    }
}

fn convert_response(
    response: ureq::http::Response<ureq::Body>,
) -> Result<HttpResponse, TransportError> {
    let (parts, mut body) = response.into_parts();
    let body = body
        .read_to_string()
        .map_err(|e| TransportError::Body(e.to_string()))?;

    let headers = parts
        .headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_owned(), v.to_owned()))
        })
        .collect();

    Ok(HttpResponse {
        status: parts.status.as_u16(),
        status_text: parts.status.canonical_reason().unwrap_or_default().to_owned(),
        headers,
        body,
    })
}
