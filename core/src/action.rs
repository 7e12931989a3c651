//! The action sum type.
//!
//! Managed calls are discriminated by an explicit variant tag rather than a
//! sentinel key inside a record: an [`Action`] is either a plain record the
//! middleware forwards untouched, or a call carrying a
//! [`CallDescriptor`](crate::descriptor::CallDescriptor) plus the base
//! action fields that get spread into every lifecycle action.

use crate::descriptor::CallDescriptor;
use serde_json::{Map, Value};

/// The dispatch capability handed to side-effect hooks.
pub type Dispatch<'a> = &'a (dyn Fn(Action) + Send + Sync);

/// A dispatched action.
#[derive(Debug)]
pub enum Action {
    /// A plain record; the middleware forwards it unchanged
    Plain(Value),

    /// A managed API call
    Call {
        /// The call descriptor, consumed exactly once
        descriptor: Box<CallDescriptor>,
        /// Base action fields carried into every derived lifecycle action
        base: Map<String, Value>,
    },
}

impl Action {
    /// Wrap a plain record
    #[must_use]
    pub const fn plain(value: Value) -> Self {
        Self::Plain(value)
    }

    /// Wrap a call descriptor with no base action fields
    #[must_use]
    pub fn call(descriptor: CallDescriptor) -> Self {
        Self::Call {
            descriptor: Box::new(descriptor),
            base: Map::new(),
        }
    }

    /// Wrap a call descriptor together with base action fields
    #[must_use]
    pub fn call_with_base(descriptor: CallDescriptor, base: Map<String, Value>) -> Self {
        Self::Call {
            descriptor: Box::new(descriptor),
            base,
        }
    }

    /// Whether this is a managed call
    #[must_use]
    pub const fn is_call(&self) -> bool {
        matches!(self, Self::Call { .. })
    }
}

/// Start a lifecycle record: the base action fields (descriptor already
/// stripped by construction) plus the lifecycle `type`.
#[must_use]
pub fn lifecycle_record(base: &Map<String, Value>, kind: &str) -> Map<String, Value> {
    let mut record = base.clone();
    record.insert("type".to_owned(), Value::String(kind.to_owned()));
    record
}
