//! The reqwest-backed production transport.

use callwire_core::descriptor::Method;
use callwire_core::transport::{Transport, TransportError, TransportRequest, TransportResponse};
use serde_json::Value;
use std::future::Future;

/// [`Transport`] implementation over a shared [`reqwest::Client`].
///
/// Returns statuses rather than failing on non-2xx, so the invoker owns
/// the status mapping. The response body is decoded as JSON when it parses,
/// otherwise carried as a raw string (an empty body becomes `""`).
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with a fresh client
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport over an existing client (shared pools, proxies)
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

impl Transport for ReqwestTransport {
    fn call(
        &self,
        request: TransportRequest,
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send {
        let client = self.client.clone();

        async move {
            let mut builder = client.request(reqwest_method(request.method), &request.url);
            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }
            if let Some(body) = &request.body {
                builder = builder.json(body);
            }

            let response = builder
                .send()
                .await
                .map_err(|err| TransportError::RequestFailed(err.to_string()))?;
            let status = response.status().as_u16();
            let text = response
                .text()
                .await
                .map_err(|err| TransportError::InvalidBody(err.to_string()))?;

            let payload = serde_json::from_str(&text).unwrap_or(Value::String(text));

            Ok(TransportResponse { status, payload })
        }
    }
}
