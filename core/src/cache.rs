//! Dotted-path cache resolution.
//!
//! The cache short-circuit looks data up inside an opaque state slice using
//! a `.`-delimited key. Resolution mirrors optional chaining: the walk
//! yields `None` the instant a segment is missing or the accumulator turns
//! falsy, and it never panics regardless of the slice's shape.

use crate::value::is_truthy;
use serde_json::Value;

/// Resolve a dotted key path inside a state slice.
///
/// Folds over the `.`-split segments starting from `slice`. A missing
/// segment, a non-object accumulator, or a falsy intermediate or final
/// value all resolve to `None`. A `Some` result is always truthy, so a
/// resolved empty string or zero never masquerades as cached data.
#[must_use]
pub fn resolve<'a>(slice: &'a Value, dotted_key: &str) -> Option<&'a Value> {
    let mut current = slice;
    for segment in dotted_key.split('.') {
        if !is_truthy(current) {
            return None;
        }
        current = current.get(segment)?;
    }
    is_truthy(current).then_some(current)
}
