//! The API-call descriptor.
//!
//! A [`CallDescriptor`] is everything the middleware needs to shape one
//! request: endpoint and method, request-shaping inputs, lifecycle action
//! type names, an optional cache lookup spec, and caller-supplied
//! side-effect hooks. Descriptors are built per dispatch and consumed
//! exactly once.

use crate::action::Dispatch;
use crate::error::DescriptorError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// HTTP method for a managed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// HTTP GET (the default)
    #[default]
    Get,
    /// HTTP POST
    Post,
    /// HTTP PUT
    Put,
    /// HTTP PATCH
    Patch,
    /// HTTP DELETE
    Delete,
}

impl Method {
    /// Lower-case wire name of the method
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Patch => "patch",
            Self::Delete => "delete",
        }
    }

    /// Whether the transport call carries a body argument.
    ///
    /// Write methods (including DELETE) send `(body, merged params/config)`;
    /// GET sends only the config argument.
    #[must_use]
    pub const fn sends_body(self) -> bool {
        !matches!(self, Self::Get)
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle action type names for a managed call.
///
/// Slots hold raw values so descriptors assembled from dynamic payloads can
/// be validated rather than silently coerced: every present slot must be a
/// string, and [`LifecycleTypes::validate`] is the single place that check
/// happens.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LifecycleTypes {
    /// Type name dispatched before the network call
    pub request: Option<Value>,
    /// Type name dispatched on success
    pub success: Option<Value>,
    /// Type name dispatched on failure
    pub failure: Option<Value>,
}

/// Validated lifecycle type names, produced by [`LifecycleTypes::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedTypes {
    /// Type name dispatched before the network call
    pub request: Option<String>,
    /// Type name dispatched on success
    pub success: Option<String>,
    /// Type name dispatched on failure
    pub failure: Option<String>,
}

impl LifecycleTypes {
    /// Build from already-typed names.
    #[must_use]
    pub fn named(
        request: Option<impl Into<String>>,
        success: Option<impl Into<String>>,
        failure: Option<impl Into<String>>,
    ) -> Self {
        Self {
            request: request.map(|s| Value::String(s.into())),
            success: success.map(|s| Value::String(s.into())),
            failure: failure.map(|s| Value::String(s.into())),
        }
    }

    /// Check that every present slot is a string.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError::NonStringType`] naming the first
    /// malformed slot. This is a programmer error; the middleware surfaces
    /// it synchronously before dispatching anything.
    pub fn validate(&self) -> Result<ResolvedTypes, DescriptorError> {
        fn slot(
            value: &Option<Value>,
            name: &'static str,
        ) -> Result<Option<String>, DescriptorError> {
            match value {
                None => Ok(None),
                Some(Value::String(s)) => Ok(Some(s.clone())),
                Some(_) => Err(DescriptorError::NonStringType { slot: name }),
            }
        }

        Ok(ResolvedTypes {
            request: slot(&self.request, "request")?,
            success: slot(&self.success, "success")?,
            failure: slot(&self.failure, "failure")?,
        })
    }
}

/// Cache lookup spec: `store` names a top-level state slice, `key` is a
/// `.`-delimited path into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSpec {
    /// Top-level state slice key
    pub store: String,
    /// Dotted path inside the slice
    pub key: String,
}

impl CacheSpec {
    /// Create a cache spec
    #[must_use]
    pub fn new(store: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            store: store.into(),
            key: key.into(),
        }
    }
}

/// A hook receiving a payload and the dispatch capability.
pub type Hook = Box<dyn Fn(&Value, Dispatch<'_>) + Send + Sync>;

/// A hook receiving only the dispatch capability.
pub type Callback = Box<dyn Fn(Dispatch<'_>) + Send + Sync>;

/// Side-effect hooks attached to a managed call.
///
/// Four optional capability slots. `on_before_success` and `on_success`
/// receive the (possibly synthetic) success payload, `on_failure` receives
/// the `{message, status?}` error record, and `callback` runs once at the
/// end of every managed path regardless of outcome.
#[derive(Default)]
pub struct Hooks {
    /// Runs before the success lifecycle action is dispatched
    pub on_before_success: Option<Hook>,
    /// Runs after the success lifecycle action is dispatched
    pub on_success: Option<Hook>,
    /// Runs after the failure lifecycle action is dispatched
    pub on_failure: Option<Hook>,
    /// Always runs last, on every managed path
    pub callback: Option<Callback>,
}

// Manual Debug since hook closures don't implement it
impl std::fmt::Debug for Hooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn present(slot: &Option<impl Sized>) -> &'static str {
            if slot.is_some() { "Some(<hook>)" } else { "None" }
        }

        f.debug_struct("Hooks")
            .field("on_before_success", &present(&self.on_before_success))
            .field("on_success", &present(&self.on_success))
            .field("on_failure", &present(&self.on_failure))
            .field("callback", &present(&self.callback))
            .finish()
    }
}

/// Request body: field name to optional value.
///
/// A `None` entry models a field a dynamic caller set conditionally; it is
/// removed before the call. `Some(Value::Null)` is a real null and is sent.
pub type Body = BTreeMap<String, Option<Value>>;

/// Declarative description of one API call.
#[derive(Debug, Default)]
pub struct CallDescriptor {
    /// Request path relative to the base URL; absence means no-op success
    pub endpoint: Option<String>,
    /// HTTP method, defaults to GET
    pub method: Method,
    /// Opaque normalization schema; when present, the response payload is
    /// run through the configured [`crate::normalize::Normalize`] impl
    pub schema: Option<Value>,
    /// Caller-supplied headers, merged over the defaults
    pub headers: Vec<(String, String)>,
    /// Request body fields
    pub body: Option<Body>,
    /// Query parameters, serialized with a leading `?`
    pub params: Map<String, Value>,
    /// Transport-specific options, passed through as the positional config
    /// argument (merged with `params` for write methods)
    pub config: Map<String, Value>,
    /// Ordered path segments appended after the endpoint; falsy non-numeric
    /// entries are dropped (numeric `0` survives). An empty vector means no
    /// path component at all: absent and empty are the same shape here, so
    /// a bare trailing `/` cannot be requested.
    pub path: Vec<Value>,
    /// Lifecycle action type names
    pub types: LifecycleTypes,
    /// Cache short-circuit lookup spec
    pub cache: Option<CacheSpec>,
    /// Side-effect hooks
    pub hooks: Hooks,
    /// Bypass the cache short-circuit
    pub refresh: bool,
    /// Fallback user token when the state holds none
    pub token: Option<String>,
    /// Opaque extra data echoed into every lifecycle action
    pub additional_data: Option<Value>,
    /// Skip the base URL (the endpoint is already absolute)
    pub external_call: bool,
}

impl CallDescriptor {
    /// Create an empty descriptor (GET, no endpoint, no hooks)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the endpoint
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the HTTP method
    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Set the normalization schema
    #[must_use]
    pub fn with_schema(mut self, schema: Value) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Add a request header
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set a body field. `None` marks the field for removal before the
    /// call; `Some(Value::Null)` is sent as a real null.
    #[must_use]
    pub fn with_body_field(mut self, name: impl Into<String>, value: Option<Value>) -> Self {
        self.body.get_or_insert_with(Body::new).insert(name.into(), value);
        self
    }

    /// Add a query parameter
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: Value) -> Self {
        self.params.insert(name.into(), value);
        self
    }

    /// Add a transport config entry
    #[must_use]
    pub fn with_config(mut self, name: impl Into<String>, value: Value) -> Self {
        self.config.insert(name.into(), value);
        self
    }

    /// Set the ordered path segments
    #[must_use]
    pub fn with_path(mut self, path: Vec<Value>) -> Self {
        self.path = path;
        self
    }

    /// Set the lifecycle action type names
    #[must_use]
    pub fn with_types(mut self, types: LifecycleTypes) -> Self {
        self.types = types;
        self
    }

    /// Set the cache lookup spec
    #[must_use]
    pub fn with_cache(mut self, store: impl Into<String>, key: impl Into<String>) -> Self {
        self.cache = Some(CacheSpec::new(store, key));
        self
    }

    /// Bypass the cache short-circuit
    #[must_use]
    pub const fn with_refresh(mut self, refresh: bool) -> Self {
        self.refresh = refresh;
        self
    }

    /// Set the fallback user token
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set opaque data echoed into every lifecycle action
    #[must_use]
    pub fn with_additional_data(mut self, data: Value) -> Self {
        self.additional_data = Some(data);
        self
    }

    /// Mark the endpoint as absolute (skip the base URL)
    #[must_use]
    pub const fn with_external_call(mut self, external: bool) -> Self {
        self.external_call = external;
        self
    }

    /// Attach an `on_before_success` hook
    #[must_use]
    pub fn on_before_success<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Value, Dispatch<'_>) + Send + Sync + 'static,
    {
        self.hooks.on_before_success = Some(Box::new(hook));
        self
    }

    /// Attach an `on_success` hook
    #[must_use]
    pub fn on_success<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Value, Dispatch<'_>) + Send + Sync + 'static,
    {
        self.hooks.on_success = Some(Box::new(hook));
        self
    }

    /// Attach an `on_failure` hook
    #[must_use]
    pub fn on_failure<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Value, Dispatch<'_>) + Send + Sync + 'static,
    {
        self.hooks.on_failure = Some(Box::new(hook));
        self
    }

    /// Attach the final callback, run on every managed path
    #[must_use]
    pub fn callback<F>(mut self, hook: F) -> Self
    where
        F: Fn(Dispatch<'_>) + Send + Sync + 'static,
    {
        self.hooks.callback = Some(Box::new(hook));
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults() {
        let descriptor = CallDescriptor::new();
        assert_eq!(descriptor.method, Method::Get);
        assert!(!descriptor.refresh);
        assert!(!descriptor.external_call);
        assert!(descriptor.endpoint.is_none());
    }

    #[test]
    fn validate_accepts_string_slots() {
        let types = LifecycleTypes::named(Some("REQ"), Some("OK"), None::<&str>);
        let resolved = types.validate().unwrap();
        assert_eq!(resolved.request.as_deref(), Some("REQ"));
        assert_eq!(resolved.success.as_deref(), Some("OK"));
        assert_eq!(resolved.failure, None);
    }

    #[test]
    fn validate_rejects_non_string_slot() {
        let types = LifecycleTypes {
            request: Some(json!("REQ")),
            success: Some(json!(5)),
            failure: None,
        };
        assert_eq!(
            types.validate(),
            Err(DescriptorError::NonStringType { slot: "success" })
        );
    }

    #[test]
    fn method_serde_is_lowercase() {
        assert_eq!(serde_json::to_value(Method::Patch).unwrap(), json!("patch"));
        assert_eq!(
            serde_json::from_value::<Method>(json!("delete")).unwrap(),
            Method::Delete
        );
    }

    #[test]
    fn hooks_debug_skips_closures() {
        let descriptor = CallDescriptor::new().on_success(|_, _| {});
        let rendered = format!("{:?}", descriptor.hooks);
        assert!(rendered.contains("on_success: \"Some(<hook>)\""));
        assert!(rendered.contains("callback: \"None\""));
    }
}
