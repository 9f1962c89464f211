//! Tolerant response body decoding.
//!
//! A body declared as JSON is decoded as JSON. Anything else is read as text
//! and decoded as JSON anyway, because some backend endpoints answer JSON
//! with a `text/plain` content type; when that fails the raw text is kept.

use serde_json::Value;

use crate::http::HttpResponse;

/// A decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Text(String),
}

impl Payload {
    /// Decode a successful response body.
    ///
    /// An empty body is `Text("")` whatever the declared content type.
    pub fn decode(response: &HttpResponse) -> Payload {
        let body = response.body.as_str();
        if body.trim().is_empty() {
            return Payload::Text(body.to_string());
        }
        let declared_json = response
            .header("content-type")
            .is_some_and(|ct| ct.contains("application/json"));
        match serde_json::from_str::<Value>(body) {
            Ok(value) => Payload::Json(value),
            Err(err) => {
                if declared_json {
                    tracing::warn!(error = %err, "body declared as JSON failed to decode, keeping text");
                }
                Payload::Text(body.to_string())
            }
        }
    }

    /// Whether the payload counts as "nothing returned": empty text, `null`,
    /// `false`, `0` or `""`.
    pub fn is_empty(&self) -> bool {
        match self {
            Payload::Text(text) => text.is_empty(),
            Payload::Json(Value::Null) => true,
            Payload::Json(Value::Bool(b)) => !b,
            Payload::Json(Value::Number(n)) => n.as_f64() == Some(0.0),
            Payload::Json(Value::String(s)) => s.is_empty(),
            Payload::Json(_) => false,
        }
    }

    /// The payload as a JSON value; text becomes a JSON string.
    pub fn into_value(self) -> Value {
        match self {
            Payload::Json(value) => value,
            Payload::Text(text) => Value::String(text),
        }
    }

    /// List semantics: arrays pass through unchanged, a bare object becomes a
    /// one-element list, and anything else (including nothing) is empty.
    pub fn into_list(self) -> Vec<Value> {
        if self.is_empty() {
            return Vec::new();
        }
        match self {
            Payload::Json(Value::Array(items)) => items,
            Payload::Json(object @ Value::Object(_)) => vec![object],
            _ => Vec::new(),
        }
    }

    /// Single-record semantics: only a JSON object is a record. Empty,
    /// scalar, array and text payloads are `None`.
    pub fn into_record(self) -> Option<Value> {
        match self {
            Payload::Json(object @ Value::Object(_)) => Some(object),
            _ => None,
        }
    }
}
