//! Request building, response normalization, and the blocking client that
//! ties them to a `Transport`.
//!
//! # Design
//! `RequestClient` holds a base URL and a shared transport, nothing else.
//! Each call is split into `build_request` (options to `HttpRequest`) and
//! `parse_response` (`HttpResponse` to JSON value or `ApiError`); `request`
//! runs the round-trip in between. No retries, no caching, no timeouts beyond
//! the transport's own: every call yields one value or one error.

use std::fmt;
use std::sync::Arc;

use log::{debug, warn};
use serde::Serialize;
use serde_json::Value;

use crate::error::{ApiError, ClientError};
use crate::http::{find_header, HttpMethod, HttpRequest, HttpResponse};
use crate::transport::Transport;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const APPLICATION_JSON: &str = "application/json";

/// Payload attached to a request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Already serialized; sent verbatim.
    Text(String),
    /// Serialized to JSON text when the request is built.
    Json(Value),
}

/// Per-call options: method, extra headers, optional body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

impl RequestOptions {
    pub fn new(method: HttpMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.body = Some(RequestBody::Text(body.into()));
        self
    }

    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ClientError> {
        let value =
            serde_json::to_value(body).map_err(|e| ClientError::Serialization(e.to_string()))?;
        self.body = Some(RequestBody::Json(value));
        Ok(self)
    }
}

/// Blocking JSON client for a single origin.
#[derive(Clone)]
pub struct RequestClient {
    base_url: String,
    transport: Arc<dyn Transport + Send + Sync>,
}

impl fmt::Debug for RequestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl RequestClient {
    pub fn new(base_url: &str, transport: impl Transport + Send + Sync + 'static) -> Self {
        Self::with_shared_transport(base_url, Arc::new(transport))
    }

    pub fn with_shared_transport(
        base_url: &str,
        transport: Arc<dyn Transport + Send + Sync>,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve `options` into a wire request for `path`.
    ///
    /// A JSON body is serialized here. `Content-Type: application/json` is
    /// sent unless the caller passed its own `Content-Type`.
    pub fn build_request(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<HttpRequest, ClientError> {
        let RequestOptions {
            method,
            headers: extra,
            body,
        } = options;

        let body = match body {
            None => None,
            Some(RequestBody::Text(text)) => Some(text),
            Some(RequestBody::Json(value)) => Some(
                serde_json::to_string(&value)
                    .map_err(|e| ClientError::Serialization(e.to_string()))?,
            ),
        };

        let mut headers = Vec::with_capacity(extra.len() + 1);
        if find_header(&extra, CONTENT_TYPE).is_none() {
            headers.push((CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string()));
        }
        headers.extend(extra);

        Ok(HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers,
            body,
        })
    }

    /// Execute a request and return the parsed JSON body.
    pub fn request(&self, path: &str, options: RequestOptions) -> Result<Value, ClientError> {
        let request = self.build_request(path, options)?;
        debug!("{} {}", request.method, request.path);
        let response = self.transport.execute(&request)?;
        parse_response(response).map_err(|err| {
            warn!(
                "{} {} failed with status {}: {}",
                request.method, request.path, err.status, err.message
            );
            ClientError::Api(err)
        })
    }

    pub fn get(&self, path: &str) -> Result<Value, ClientError> {
        self.request(path, RequestOptions::new(HttpMethod::Get))
    }

    pub fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Value, ClientError> {
        self.request(path, RequestOptions::new(HttpMethod::Post).json(body)?)
    }

    pub fn put<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Value, ClientError> {
        self.request(path, RequestOptions::new(HttpMethod::Put).json(body)?)
    }

    pub fn delete(&self, path: &str) -> Result<Value, ClientError> {
        self.request(path, RequestOptions::new(HttpMethod::Delete))
    }
}

/// Normalize a response: parse the body as JSON (anything unparsable or
/// empty becomes `Null`), then fail with `ApiError` unless the status is 2xx.
pub fn parse_response(response: HttpResponse) -> Result<Value, ApiError> {
    let parsed = serde_json::from_str::<Value>(&response.body)
        .ok()
        .filter(|value| !value.is_null());
    if !response.is_success() {
        return Err(ApiError::from_response(response.status, parsed));
    }
    Ok(parsed.unwrap_or(Value::Null))
}
