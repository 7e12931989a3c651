//! JavaScript-style truthiness over JSON values.
//!
//! The middleware's cache resolution, URL path filtering, and success check
//! all follow the truthiness rules of the dynamic dispatch payloads they
//! operate on: `null`, `false`, `0`, and `""` are falsy; everything else —
//! including empty arrays and empty objects — is truthy.

use serde_json::Value;

/// Whether a JSON value is truthy under JavaScript coercion rules.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
