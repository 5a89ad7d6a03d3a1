//! Wire-level HTTP types exchanged with a [`Transport`](crate::transport::Transport).
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The
//! `HttpClient` turns a caller's [`Request`](crate::request::Request)
//! descriptor into an `HttpRequest`, hands it to a transport backend, and
//! interprets the `HttpResponse` that comes back. Status interpretation and
//! JSON decoding never happen inside a backend, so the client logic can be
//! exercised against scripted responses without a network.
//!
//! All fields use owned types (`String`, `Vec`) so values can move into a
//! blocking task or across an `await` without lifetime concerns.

use std::fmt;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data, with a fully-qualified URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// An HTTP response described as plain data.
///
/// `status_text` is the reason phrase (`"Not Found"`); backends fill it from
/// the canonical reason for the status code and leave it empty when the code
/// has none.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// The default success predicate: any 2xx status, the same range `fetch`
/// reports as `ok`.
pub fn is_success_status(status: u16) -> bool {
    (200..300).contains(&status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let response = HttpResponse {
            status: 200,
            status_text: "OK".to_string(),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: String::new(),
        };
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert_eq!(response.header("x-missing"), None);
    }

    #[test]
    fn success_range_is_2xx_only() {
        assert!(is_success_status(200));
        assert!(is_success_status(204));
        assert!(!is_success_status(199));
        assert!(!is_success_status(304));
        assert!(!is_success_status(404));
    }
}
