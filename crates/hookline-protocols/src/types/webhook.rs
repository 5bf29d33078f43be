//! Inbound webhook requests and the acknowledgments returned to senders.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::TriggerDispatchError;

/// An inbound HTTP call to a subscription endpoint.
///
/// Header names are stored lowercased.
#[derive(Debug, Clone, Default)]
pub struct WebhookRequest {
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub query: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl WebhookRequest {
    /// Create a POST request with the given body.
    pub fn new(body: impl Into<Vec<u8>>) -> Self {
        Self {
            method: "POST".to_string(),
            path: "/".to_string(),
            headers: HashMap::new(),
            query: HashMap::new(),
            body: body.into(),
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_header(mut self, key: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(key.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Parse an HTTP/1.1 request message: request line, headers, a blank
    /// line, then the body. `Content-Length`, when present, bounds the body.
    pub fn from_raw(raw: &str) -> Result<Self, TriggerDispatchError> {
        let (head, body) = split_head(raw);

        let mut lines = head.lines().map(|l| l.trim_end_matches('\r'));
        let request_line = lines
            .next()
            .filter(|l| !l.trim().is_empty())
            .ok_or_else(|| TriggerDispatchError::MalformedRequest("missing request line".into()))?;

        let mut parts = request_line.split_whitespace();
        let method = parts
            .next()
            .ok_or_else(|| TriggerDispatchError::MalformedRequest("missing method".into()))?;
        let target = parts
            .next()
            .ok_or_else(|| TriggerDispatchError::MalformedRequest("missing request target".into()))?;

        let (path, query_str) = target.split_once('?').unwrap_or((target, ""));
        let query = url::form_urlencoded::parse(query_str.as_bytes())
            .into_owned()
            .collect();

        let mut headers = HashMap::new();
        for line in lines {
            if line.is_empty() {
                continue;
            }
            let (name, value) = line.split_once(':').ok_or_else(|| {
                TriggerDispatchError::MalformedRequest(format!("invalid header line: {line}"))
            })?;
            headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
        }

        let mut body = body.as_bytes().to_vec();
        if let Some(len) = headers
            .get("content-length")
            .and_then(|v| v.parse::<usize>().ok())
        {
            body.truncate(len);
        }

        Ok(Self {
            method: method.to_ascii_uppercase(),
            path: path.to_string(),
            headers,
            query,
            body,
        })
    }
}

fn split_head(raw: &str) -> (&str, &str) {
    if let Some(idx) = raw.find("\r\n\r\n") {
        (&raw[..idx], &raw[idx + 4..])
    } else if let Some(idx) = raw.find("\n\n") {
        (&raw[..idx], &raw[idx + 2..])
    } else {
        (raw, "")
    }
}

/// The HTTP response relayed verbatim to the webhook sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookResponse {
    pub status: u16,
    pub content_type: String,
    pub body: String,
}

impl WebhookResponse {
    /// A JSON response with the given status.
    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        Self {
            status,
            content_type: "application/json".to_string(),
            body: body.to_string(),
        }
    }

    /// The default acknowledgment: `200 {"status": "ok"}`.
    pub fn acknowledged() -> Self {
        Self::json(200, &serde_json::json!({ "status": "ok" }))
    }

    /// A JSON error body with the given status.
    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self::json(
            status,
            &serde_json::json!({ "status": "error", "message": message.into() }),
        )
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl Default for WebhookResponse {
    fn default() -> Self {
        Self::acknowledged()
    }
}

#[cfg(test)]
#[path = "webhook_tests.rs"]
mod tests;
