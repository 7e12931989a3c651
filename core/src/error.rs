//! Error types shared across the workspace.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// A malformed call descriptor.
///
/// These are programmer errors: they surface synchronously to the dispatch
/// caller and never become dispatched failure actions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    /// A lifecycle action type slot holds a non-string value
    #[error("expected lifecycle action type `{slot}` to be a string")]
    NonStringType {
        /// Which of the request/success/failure slots was malformed
        slot: &'static str,
    },
}

/// A structured request failure.
///
/// Carried inside failure lifecycle actions and handed to `on_failure`
/// hooks. `status` is present only when a transport reported a non-200
/// status on an otherwise successful call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct ApiError {
    /// Human-readable failure description
    pub message: String,

    /// HTTP status, when the failure came from a returned response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ApiError {
    /// Create an error with a message only
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }

    /// Create an error carrying an HTTP status
    #[must_use]
    pub fn with_status(message: impl Into<String>, status: u16) -> Self {
        Self {
            message: message.into(),
            status: Some(status),
        }
    }

    /// Render as the `{message, status?}` record dispatched in failure
    /// actions and passed to `on_failure` hooks.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut record = Map::new();
        record.insert("message".to_owned(), Value::String(self.message.clone()));
        if let Some(status) = self.status {
            record.insert("status".to_owned(), Value::from(status));
        }
        Value::Object(record)
    }
}
