//! Response-shape normalization seam.
//!
//! Normalization reshapes nested JSON into a flat entity map. The schema is
//! opaque to this workspace; callers provide the routine, and the invoker
//! applies it only when the descriptor carries a schema.

use serde_json::Value;

/// A pure `normalize(payload, schema) -> reshaped payload` routine.
pub trait Normalize: Send + Sync {
    /// Reshape a response payload according to an opaque schema.
    fn normalize(&self, payload: Value, schema: &Value) -> Value;
}

/// The no-op normalizer: returns the payload untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Normalize for Identity {
    fn normalize(&self, payload: Value, _schema: &Value) -> Value {
        payload
    }
}
