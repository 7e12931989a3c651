//! The black-box HTTP transport seam.
//!
//! The invoker builds a [`TransportRequest`] and hands it to whatever
//! [`Transport`] implementation it was constructed with. Production uses
//! the reqwest implementation in `callwire-runtime`; tests use the mock in
//! `callwire-testing`. Implementations return statuses rather than failing
//! on non-2xx so the invoker owns the status mapping.

use crate::descriptor::Method;
use serde_json::{Map, Value};
use std::future::Future;
use thiserror::Error;

/// A transport-level failure (connection refused, DNS, body read, ...)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request could not be performed
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// The response body could not be read
    #[error("invalid response body: {0}")]
    InvalidBody(String),
}

/// One fully-shaped outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute URL including path segments and query string
    pub url: String,
    /// Fully merged headers, in application order
    pub headers: Vec<(String, String)>,
    /// JSON body; `None` for bodiless methods
    pub body: Option<Value>,
    /// Opaque transport options (merged params/config for write methods);
    /// honored per implementation
    pub config: Map<String, Value>,
}

impl TransportRequest {
    /// Look a header up by name (case-insensitive)
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A returned response: status plus decoded payload.
///
/// The payload is parsed JSON when the body is valid JSON, otherwise the
/// raw body as a string — an empty body decodes to `""`, which the
/// external-call success exception depends on.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Decoded response payload
    pub payload: Value,
}

impl TransportResponse {
    /// A 200 response with the given payload
    #[must_use]
    pub const fn ok(payload: Value) -> Self {
        Self {
            status: 200,
            payload,
        }
    }

    /// A response with an explicit status
    #[must_use]
    pub const fn with_status(status: u16, payload: Value) -> Self {
        Self { status, payload }
    }
}

/// The black-box HTTP client.
pub trait Transport: Send + Sync {
    /// Perform one request.
    fn call(
        &self,
        request: TransportRequest,
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send;
}
