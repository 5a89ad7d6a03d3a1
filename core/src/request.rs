//! Per-call request descriptors.

use serde::Serialize;
use serde_json::Value;

use crate::error::RequestError;
use crate::http::{HttpMethod, HttpRequest};

/// Fixed prefix every endpoint path is appended to.
pub const API_BASE_PATH: &str = "/api";

/// Headers sent with every request unless the caller overrides them.
pub const DEFAULT_HEADERS: [(&str, &str); 1] = [("Content-Type", "application/json")];

/// One JSON exchange against the API, built per call and dropped afterwards.
///
/// `path` is relative to [`API_BASE_PATH`] and is appended verbatim: no
/// normalization, no escaping.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl Request {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Add a caller header. It replaces any default or earlier header with
    /// the same name, compared case-insensitively.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attach a JSON body.
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Serialize `payload` and attach it as the body.
    pub fn json<T: Serialize + ?Sized>(self, payload: &T) -> Result<Self, RequestError> {
        let value =
            serde_json::to_value(payload).map_err(|e| RequestError::Serialization(e.to_string()))?;
        Ok(self.body(value))
    }

    pub fn validate(&self) -> Result<(), RequestError> {
        if self.path.is_empty() || !self.path.starts_with('/') {
            return Err(RequestError::InvalidPath(self.path.clone()));
        }
        Ok(())
    }

    /// Defaults merged with caller headers. Later entries win and every name
    /// appears once, regardless of case.
    pub fn effective_headers(&self) -> Vec<(String, String)> {
        let defaults = DEFAULT_HEADERS
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()));

        let mut merged: Vec<(String, String)> = Vec::new();
        for (name, value) in defaults.chain(self.headers.iter().cloned()) {
            merged.retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
            merged.push((name, value));
        }
        merged
    }

    /// The URL this descriptor resolves to under `origin`.
    pub fn url(&self, origin: &str) -> String {
        format!("{origin}{API_BASE_PATH}{}", self.path)
    }

    /// Validate the descriptor and lower it into a wire request.
    pub fn to_http(&self, origin: &str) -> Result<HttpRequest, RequestError> {
        self.validate()?;
        let body = self
            .body
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| RequestError::Serialization(e.to_string()))?;

        Ok(HttpRequest {
            method: self.method,
            url: self.url(origin),
            headers: self.effective_headers(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const ORIGIN: &str = "http://localhost:5000";

    #[test]
    fn get_request_carries_default_content_type() {
        let req = Request::get("/livreurs").to_http(ORIGIN).unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:5000/api/livreurs");
        assert_eq!(
            req.headers,
            vec![("Content-Type".to_string(), "application/json".to_string())]
        );
        assert!(req.body.is_none());
    }

    #[test]
    fn caller_header_overrides_default_case_insensitively() {
        let req = Request::get("/livreurs").header("content-type", "application/vnd.api+json");
        let headers = req.effective_headers();
        assert_eq!(
            headers,
            vec![("content-type".to_string(), "application/vnd.api+json".to_string())]
        );
    }

    #[test]
    fn duplicate_caller_headers_collapse_to_last() {
        let req = Request::get("/livreurs")
            .header("X-Trace", "a")
            .header("x-trace", "b");
        let headers = req.effective_headers();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers[1], ("x-trace".to_string(), "b".to_string()));
    }

    #[test]
    fn path_is_appended_unmodified() {
        let req = Request::get("/commandes?statut=en_attente&x=a b");
        assert_eq!(
            req.url(ORIGIN),
            "http://localhost:5000/api/commandes?statut=en_attente&x=a b"
        );
    }

    #[test]
    fn empty_path_is_rejected() {
        let err = Request::get("").to_http(ORIGIN).unwrap_err();
        assert!(matches!(err, RequestError::InvalidPath(p) if p.is_empty()));
    }

    #[test]
    fn relative_path_is_rejected() {
        let err = Request::get("livreurs").to_http(ORIGIN).unwrap_err();
        assert!(matches!(err, RequestError::InvalidPath(_)));
    }

    #[test]
    fn json_body_is_serialized_to_text() {
        #[derive(Serialize)]
        struct Params {
            scenario: &'static str,
            nb_livreurs: u32,
        }

        let req = Request::post("/optimiser")
            .json(&Params {
                scenario: "normal",
                nb_livreurs: 3,
            })
            .unwrap()
            .to_http(ORIGIN)
            .unwrap();

        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"scenario": "normal", "nb_livreurs": 3}));
    }
}
