//! The generic HTTP invocation routine.
//!
//! [`HttpInvoker`] turns an [`ApiRequest`] into one transport call: it
//! assembles the URL from the base URL, endpoint, filtered path segments
//! and encoded query string, merges headers in increasing precedence,
//! sanitizes the body, and maps the transport result to a structured
//! [`Outcome`]. Transport failures never escape as errors — they become
//! `Outcome::Error`. Only request construction can fail.

use callwire_core::context::AuthContext;
use callwire_core::descriptor::{Body, Method};
use callwire_core::error::ApiError;
use callwire_core::normalize::{Identity, Normalize};
use callwire_core::transport::{Transport, TransportRequest};
use callwire_core::value::is_truthy;
use serde_json::{Map, Value};
use thiserror::Error;

/// Request construction failed before any network activity.
#[derive(Debug, Error)]
pub enum InvokeError {
    /// The query parameters could not be encoded
    #[error("failed to encode query string: {0}")]
    Query(String),
}

/// The mapped result of one invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A 200 response; payload already normalized when a schema was given
    Response(Value),
    /// A structured failure: transport error or non-200 status
    Error(ApiError),
}

/// Inputs for one invocation, extracted from a call descriptor.
#[derive(Debug, Default)]
pub struct ApiRequest {
    /// Request path relative to the base URL (or absolute for external calls)
    pub endpoint: String,
    /// HTTP method
    pub method: Method,
    /// Opaque normalization schema
    pub schema: Option<Value>,
    /// Caller-supplied headers
    pub headers: Vec<(String, String)>,
    /// Body fields; `None` entries are dropped before sending
    pub body: Option<Body>,
    /// Query parameters
    pub params: Map<String, Value>,
    /// Transport options
    pub config: Map<String, Value>,
    /// Ordered path segments
    pub path: Vec<Value>,
    /// Resolved user token, if any
    pub user_token: Option<String>,
    /// Skip the base URL
    pub external_call: bool,
}

/// The HTTP invocation routine.
///
/// Holds the ambient [`AuthContext`], the transport, and the normalization
/// routine, all injected at construction.
#[derive(Debug, Clone)]
pub struct HttpInvoker<T, N = Identity> {
    context: AuthContext,
    transport: T,
    normalizer: N,
}

impl<T: Transport> HttpInvoker<T> {
    /// Create an invoker without response normalization
    #[must_use]
    pub const fn new(context: AuthContext, transport: T) -> Self {
        Self {
            context,
            transport,
            normalizer: Identity,
        }
    }
}

impl<T: Transport, N: Normalize> HttpInvoker<T, N> {
    /// Create an invoker with a normalization routine
    #[must_use]
    pub const fn with_normalizer(context: AuthContext, transport: T, normalizer: N) -> Self {
        Self {
            context,
            transport,
            normalizer,
        }
    }

    /// Perform one invocation.
    ///
    /// Maps the transport result to an [`Outcome`]:
    /// - status 200 → `Outcome::Response`, normalized when a schema is given
    /// - any other status → `Outcome::Error` carrying the status
    /// - transport failure → `Outcome::Error` with the failure message
    ///
    /// # Errors
    ///
    /// Returns [`InvokeError`] only when the request could not be built
    /// (query encoding); nothing has been sent at that point.
    pub async fn invoke(&self, request: ApiRequest) -> Result<Outcome, InvokeError> {
        let url = self.build_url(&request)?;
        let headers = self.merge_headers(&request);
        let body = request
            .body
            .filter(|_| request.method.sends_body())
            .map(|body| Value::Object(sanitize_body(body)));
        let config = if request.method.sends_body() {
            let mut merged = request.params.clone();
            merged.extend(request.config);
            merged
        } else {
            request.config
        };

        tracing::debug!(method = %request.method, url = %url, "invoking transport");
        metrics::counter!("callwire.request").increment(1);

        let transport_request = TransportRequest {
            method: request.method,
            url,
            headers,
            body,
            config,
        };

        match self.transport.call(transport_request).await {
            Ok(response) if response.status == 200 => {
                let payload = match &request.schema {
                    Some(schema) => self.normalizer.normalize(response.payload, schema),
                    None => response.payload,
                };
                Ok(Outcome::Response(payload))
            }
            Ok(response) => {
                // Defensive branch for transports that report a status
                // rather than failing on non-2xx (the reqwest transport
                // and the test mock both do).
                tracing::warn!(status = response.status, "non-200 response");
                Ok(Outcome::Error(ApiError::with_status(
                    render_text(&response.payload),
                    response.status,
                )))
            }
            Err(err) => {
                tracing::warn!(error = %err, "transport failure");
                Ok(Outcome::Error(ApiError::new(err.to_string())))
            }
        }
    }

    fn build_url(&self, request: &ApiRequest) -> Result<String, InvokeError> {
        let base = if request.external_call {
            ""
        } else {
            self.context.base_url()
        };

        let mut url = format!("{base}{}", request.endpoint);

        if !request.path.is_empty() {
            // Numeric segments always survive, so an id of 0 is kept;
            // falsy strings, nulls and false are dropped.
            let segments: Vec<String> = request
                .path
                .iter()
                .filter(|segment| segment.is_number() || is_truthy(segment))
                .map(render_segment)
                .collect();
            url.push('/');
            url.push_str(&segments.join("/"));
        }

        if !request.params.is_empty() {
            let encoded = serde_urlencoded::to_string(&request.params)
                .map_err(|err| InvokeError::Query(err.to_string()))?;
            if !encoded.is_empty() {
                url.push('?');
                url.push_str(&encoded);
            }
        }

        Ok(url)
    }

    fn merge_headers(&self, request: &ApiRequest) -> Vec<(String, String)> {
        let mut headers: Vec<(String, String)> = vec![(
            "Content-Type".to_owned(),
            "application/json".to_owned(),
        )];

        for (name, value) in &request.headers {
            set_header(&mut headers, name, value);
        }
        if let Some(token) = self.context.auth_token() {
            set_header(&mut headers, "Authorization", &format!("Basic {token}"));
        }
        if let Some(token) = &request.user_token {
            set_header(&mut headers, "User-Token", token);
        }

        headers
    }
}

/// Insert or replace a header by name (case-insensitive).
fn set_header(headers: &mut Vec<(String, String)>, name: &str, value: &str) {
    match headers
        .iter_mut()
        .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
    {
        Some((_, existing)) => value.clone_into(existing),
        None => headers.push((name.to_owned(), value.to_owned())),
    }
}

/// Drop fields marked for removal; real nulls are kept.
fn sanitize_body(body: Body) -> Map<String, Value> {
    body.into_iter()
        .filter_map(|(name, value)| value.map(|value| (name, value)))
        .collect()
}

fn render_segment(segment: &Value) -> String {
    match segment {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn render_text(payload: &Value) -> String {
    match payload {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
