//! # Callwire Runtime
//!
//! The interception state machine and the HTTP invocation routine.
//!
//! [`ApiMiddleware`] sits between an application's action-dispatch
//! mechanism and the network: it forwards plain actions untouched,
//! recognizes managed calls by their variant tag, resolves the cache
//! short-circuit, emits request/success/failure lifecycle actions, drives
//! [`HttpInvoker`], and invokes caller-supplied hooks.
//!
//! ## Example
//!
//! ```ignore
//! use callwire_core::{Action, AuthContext, CallDescriptor, LifecycleTypes};
//! use callwire_runtime::{ApiMiddleware, HttpInvoker, ReqwestTransport};
//!
//! let context = AuthContext::from_env()?;
//! let middleware = ApiMiddleware::new(HttpInvoker::new(context, ReqwestTransport::new()));
//!
//! let handled = middleware
//!     .handle(action, &mut next, &get_state, &dispatch)
//!     .await?;
//! ```

/// The generic HTTP invocation routine
pub mod invoker;

/// The action-interception middleware
pub mod middleware;

/// The reqwest-backed production transport
pub mod transport;

/// Error types for managed dispatch
pub mod error {
    use callwire_core::error::DescriptorError;
    use thiserror::Error;

    /// Errors a managed dispatch can surface to the caller.
    ///
    /// Recoverable failures (transport errors, non-200 statuses) never
    /// appear here — they become failure lifecycle actions and hook calls.
    /// Only programmer errors escape `handle`.
    #[derive(Debug, Error)]
    pub enum DispatchError {
        /// The call descriptor is malformed
        #[error(transparent)]
        InvalidDescriptor(#[from] DescriptorError),
    }
}

pub use invoker::{ApiRequest, HttpInvoker, InvokeError, Outcome};
pub use middleware::{ApiMiddleware, Handled};
pub use transport::ReqwestTransport;
