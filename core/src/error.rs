//! Error types for the recycling API client.
//!
//! # Design
//! `DuplicateEmail` gets a dedicated variant because the update screen shows
//! a specific message for a 409 instead of the generic failure text. All
//! other non-2xx responses land in `Http` with the status, its reason phrase
//! and the raw body. The `Display` texts are the user-facing messages that
//! end up inside notifications, so they stay in Spanish where the backend
//! contract fixed them.

use thiserror::Error;

/// Errors produced by the client layer.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, DNS, ...).
    #[error("{0}")]
    Transport(String),

    /// The server returned a non-2xx status.
    #[error("Error: {status_text} - {body}")]
    Http {
        status: u16,
        status_text: String,
        body: String,
    },

    /// An update was rejected with 409 because the email already exists.
    #[error("El correo electrónico ya está registrado")]
    DuplicateEmail,

    /// The response payload could not be mapped onto the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The client configuration is unusable.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::DuplicateEmail => Some(409),
            _ => None,
        }
    }
}
