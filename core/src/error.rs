//! Error types for the portal client.
//!
//! # Design
//! `ApiError` is the application-level failure: the server answered with a
//! status outside 200-299. It keeps the numeric status and the parsed body so
//! UI code can classify it (see `messages`). Everything else that can go wrong
//! around a call (the network, a body that will not serialize, a success body
//! of the wrong shape) lands in `ClientError` next to it.

use serde_json::Value;
use thiserror::Error as ThisError;

/// A non-success HTTP response, normalized.
#[derive(Debug, Clone, PartialEq, ThisError)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
    pub status: u16,
    pub body: Option<Value>,
}

impl ApiError {
    /// Build from a status and the (possibly absent) parsed body.
    ///
    /// Message precedence: `body.error`, then `body.message`, then
    /// `HTTP <status>`.
    pub fn from_response(status: u16, body: Option<Value>) -> Self {
        let message = body
            .as_ref()
            .and_then(|b| string_field(b, "error").or_else(|| string_field(b, "message")))
            .map(str::to_owned)
            .unwrap_or_else(|| format!("HTTP {status}"));
        Self {
            message,
            status,
            body,
        }
    }

    /// The machine-readable error code carried in `body.error`, if any.
    pub fn code(&self) -> Option<&str> {
        self.body.as_ref().and_then(|b| string_field(b, "error"))
    }
}

fn string_field<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body.get(key).and_then(Value::as_str)
}

/// Network-level failure reported by a `Transport`.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[error("transport failed: {0}")]
pub struct TransportError(pub String);

/// Errors returned by `RequestClient` and the typed `Api` calls.
#[derive(Debug, ThisError)]
pub enum ClientError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// A success body did not have the shape the caller expected.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

impl ClientError {
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            ClientError::Api(err) => Some(err),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        self.as_api().map(|err| err.status)
    }
}
