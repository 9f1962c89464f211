//! Stateless HTTP request builder and response parser for the recycling API.
//!
//! # Design
//! `ApiClient` holds only a `base_url` and carries no mutable state between
//! calls. Each CRUD operation is split into a `build_*` method that produces
//! an `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The caller executes the actual HTTP round-trip, keeping the core
//! deterministic and free of I/O dependencies.
//!
//! Operations take the full endpoint (`Usuarios/Lista`, `Usuarios/Nuevo`,
//! ...). The backend identifies the record of an update by the id inside the
//! body and the record of a delete by an `id` query parameter; both travel
//! as `POST`.

use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::normalize::normalize;
use crate::payload::Payload;
use crate::types::Record;

/// Synchronous, stateless client for the recycling API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    pub fn build_list(&self, endpoint: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: self.url(endpoint),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_get(&self, endpoint: &str, id: i64) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/{id}", self.url(endpoint)),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create<T: Serialize>(&self, endpoint: &str, input: &T) -> Result<HttpRequest, ApiError> {
        self.json_post(endpoint, input)
    }

    /// The record identity is carried inside `input`, never in the URL.
    pub fn build_update<T: Serialize>(&self, endpoint: &str, input: &T) -> Result<HttpRequest, ApiError> {
        self.json_post(endpoint, input)
    }

    pub fn build_delete(&self, endpoint: &str, id: i64) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}?id={id}", self.url(endpoint)),
            headers: Vec::new(),
            body: None,
        }
    }

    fn json_post<T: Serialize>(&self, endpoint: &str, input: &T) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: self.url(endpoint),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    /// Status check plus tolerant body decoding.
    pub fn parse_payload(&self, response: HttpResponse) -> Result<Payload, ApiError> {
        check_status(&response)?;
        Ok(Payload::decode(&response))
    }

    pub fn parse_list<T: Record>(&self, response: HttpResponse) -> Result<Vec<T>, ApiError> {
        records_from_list(self.parse_payload(response)?)
    }

    pub fn parse_get<T: Record>(&self, response: HttpResponse) -> Result<Option<T>, ApiError> {
        record_from_payload(self.parse_payload(response)?)
    }

    pub fn parse_create<T: Record>(&self, response: HttpResponse) -> Result<Option<T>, ApiError> {
        record_from_payload(self.parse_payload(response)?)
    }

    /// A 409 is reported as `DuplicateEmail` before any generic handling.
    pub fn parse_update<T: Record>(&self, response: HttpResponse) -> Result<Option<T>, ApiError> {
        if response.status == 409 {
            return Err(ApiError::DuplicateEmail);
        }
        record_from_payload(self.parse_payload(response)?)
    }

    pub fn parse_delete(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }
}

/// Map non-success status codes to `ApiError::Http`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::Http {
        status: response.status,
        status_text: response.status_text().to_string(),
        body: response.body.clone(),
    })
}

pub(crate) fn records_from_list<T: Record>(payload: Payload) -> Result<Vec<T>, ApiError> {
    payload.into_list().into_iter().map(decode_record).collect()
}

pub(crate) fn record_from_payload<T: Record>(payload: Payload) -> Result<Option<T>, ApiError> {
    payload.into_record().map(decode_record).transpose()
}

fn decode_record<T: Record>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(normalize(T::FIELDS, value)).map_err(|e| ApiError::Deserialization(e.to_string()))
}
