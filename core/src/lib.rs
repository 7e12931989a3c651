//! # Callwire Core
//!
//! Core types and traits for the callwire API-call middleware.
//!
//! Callwire turns declarative API-call descriptors carried inside dispatched
//! actions into asynchronous HTTP requests, with a response-cache
//! short-circuit, request/success/failure lifecycle actions, and optional
//! response-shape normalization.
//!
//! This crate holds the data model and the seams; the interception state
//! machine and the HTTP invocation routine live in `callwire-runtime`.
//!
//! ## Core Concepts
//!
//! - **Action**: a tagged sum type — either a plain record forwarded
//!   untouched, or a managed call carrying a [`CallDescriptor`]
//! - **CallDescriptor**: everything needed to shape one request, including
//!   lifecycle action type names, cache lookup spec, and side-effect hooks
//! - **AuthContext**: base URL and ambient auth token, constructed once at
//!   startup and threaded into the invoker (no process-wide mutable state)
//! - **Transport**: the black-box HTTP client seam
//! - **Normalize**: the pure response-reshaping collaborator seam
//!
//! ## Example
//!
//! ```ignore
//! use callwire_core::{Action, CallDescriptor, LifecycleTypes, Method};
//!
//! let action = Action::call(
//!     CallDescriptor::new()
//!         .with_endpoint("/videos")
//!         .with_method(Method::Get)
//!         .with_types(LifecycleTypes::named(
//!             Some("VIDEOS_REQUEST"),
//!             Some("VIDEOS_SUCCESS"),
//!             Some("VIDEOS_FAILURE"),
//!         ))
//!         .with_cache("videos", "list.items"),
//! );
//! ```

/// Action sum type and the dispatch capability handed to hooks
pub mod action;

/// Dotted-path cache resolution over opaque state slices
pub mod cache;

/// Base URL and ambient auth token configuration
pub mod context;

/// The API-call descriptor and its constituent parts
pub mod descriptor;

/// Error types shared across the workspace
pub mod error;

/// Response-shape normalization seam
pub mod normalize;

/// Black-box HTTP transport seam
pub mod transport;

/// JavaScript-style truthiness over JSON values
pub mod value;

pub use action::{Action, Dispatch};
pub use cache::resolve;
pub use context::AuthContext;
pub use descriptor::{CacheSpec, CallDescriptor, Hooks, LifecycleTypes, Method};
pub use error::{ApiError, DescriptorError};
pub use normalize::{Identity, Normalize};
pub use transport::{Transport, TransportError, TransportRequest, TransportResponse};
pub use value::is_truthy;
