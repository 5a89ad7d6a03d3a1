//! Shared fixtures for unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};
use crate::notifier::{Notification, NotificationSink};
use crate::transport::Transport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkEvent {
    Shown,
    Dismissing,
    Removed,
}

/// Records every sink callback in order.
#[derive(Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<(SinkEvent, Notification)>>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<(SinkEvent, Notification)> {
        self.events.lock().unwrap().clone()
    }

    fn record(&self, event: SinkEvent, notification: &Notification) {
        self.events.lock().unwrap().push((event, notification.clone()));
    }
}

impl NotificationSink for RecordingSink {
    fn shown(&self, notification: &Notification) {
        self.record(SinkEvent::Shown, notification);
    }

    fn dismissing(&self, notification: &Notification) {
        self.record(SinkEvent::Dismissing, notification);
    }

    fn removed(&self, notification: &Notification) {
        self.record(SinkEvent::Removed, notification);
    }
}

enum Scripted {
    Respond { status: u16, body: String },
    Fail(TransportError),
}

/// A transport that replays canned responses and records what was sent.
///
/// Per-path responses (`respond_to`) are reusable and take precedence; the
/// FIFO queue (`respond`, `fail`) is consumed one entry per request. With
/// nothing scripted the send fails as a connection error.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    routes: Arc<Mutex<HashMap<String, (u16, String, Duration)>>>,
    queue: Arc<Mutex<VecDeque<Scripted>>>,
    sent: Arc<Mutex<Vec<HttpRequest>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, status: u16, body: &str) {
        self.queue.lock().unwrap().push_back(Scripted::Respond {
            status,
            body: body.to_string(),
        });
    }

    pub fn fail(&self, err: TransportError) {
        self.queue.lock().unwrap().push_back(Scripted::Fail(err));
    }

    /// Answer every request whose URL ends with `path`.
    pub fn respond_to(&self, path: &str, status: u16, body: &str) {
        self.respond_to_after(path, status, body, Duration::ZERO);
    }

    /// Like `respond_to`, but the answer arrives after `delay`.
    pub fn respond_to_after(&self, path: &str, status: u16, body: &str, delay: Duration) {
        self.routes
            .lock()
            .unwrap()
            .insert(path.to_string(), (status, body.to_string(), delay));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.sent.lock().unwrap().clone()
    }

    fn next(&self, url: &str) -> (Scripted, Duration) {
        let routed = self
            .routes
            .lock()
            .unwrap()
            .iter()
            .find(|(path, _)| url.ends_with(path.as_str()))
            .map(|(_, (status, body, delay))| {
                let scripted = Scripted::Respond {
                    status: *status,
                    body: body.clone(),
                };
                (scripted, *delay)
            });
        routed.unwrap_or_else(|| {
            let scripted = self
                .queue
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Scripted::Fail(TransportError::Connection("nothing scripted".into())));
            (scripted, Duration::ZERO)
        })
    }
}

impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let (scripted, delay) = self.next(&request.url);
        self.sent.lock().unwrap().push(request);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        match scripted {
            Scripted::Respond { status, body } => Ok(HttpResponse {
                status,
                status_text: reason(status).to_string(),
                headers: vec![("content-type".to_string(), "application/json".to_string())],
                body,
            }),
            Scripted::Fail(err) => Err(err),
        }
    }
}

pub fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        304 => "Not Modified",
        400 => "Bad Request",
        404 => "Not Found",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "",
    }
}
