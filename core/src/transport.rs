//! Async execution of `HttpRequest` values.
//!
//! `Transport` is the I/O seam: `Dashboard` builds requests with `ApiClient`,
//! hands them to a transport and parses whatever comes back. Non-2xx
//! statuses are responses, not errors; only failures to obtain a response
//! at all are `ApiError::Transport`.

use std::future::Future;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

pub trait Transport {
    fn execute(&self, request: HttpRequest) -> impl Future<Output = Result<HttpResponse, ApiError>> + Send;
}

/// `reqwest`-backed transport. No timeout is configured.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        };
        let mut builder = self.client.request(method, request.path.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
