//! Base URL and ambient auth token configuration.
//!
//! Constructed once at startup and handed to the invoker. There is no
//! process-wide mutable state: set-once semantics fall out of construction,
//! and concurrent readers need no coordination.

use thiserror::Error;

/// Errors constructing an [`AuthContext`] from the environment
#[derive(Debug, Error)]
pub enum ContextError {
    /// Missing `CALLWIRE_BASE_URL` environment variable
    #[error("Missing CALLWIRE_BASE_URL environment variable")]
    MissingBaseUrl,
}

/// Base URL and ambient auth token for every managed call.
#[derive(Debug, Clone)]
pub struct AuthContext {
    base_url: String,
    auth_token: Option<String>,
}

impl AuthContext {
    /// Create a context with an explicit base URL and optional token
    #[must_use]
    pub fn new(base_url: impl Into<String>, auth_token: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            auth_token,
        }
    }

    /// Create a context from `CALLWIRE_BASE_URL` and `CALLWIRE_AUTH_TOKEN`
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::MissingBaseUrl`] if `CALLWIRE_BASE_URL` is
    /// not set. The token is optional.
    pub fn from_env() -> Result<Self, ContextError> {
        let base_url =
            std::env::var("CALLWIRE_BASE_URL").map_err(|_| ContextError::MissingBaseUrl)?;
        let auth_token = std::env::var("CALLWIRE_AUTH_TOKEN").ok();

        Ok(Self::new(base_url, auth_token))
    }

    /// The configured base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The ambient auth token, if one is configured
    #[must_use]
    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }
}
