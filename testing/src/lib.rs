//! Testing utilities for the callwire middleware.
//!
//! Provides a scripted [`MockTransport`], an [`ActionLog`] that records
//! dispatched actions, and a fluent [`DispatchTest`] harness with
//! Given-When-Then syntax for exercising [`ApiMiddleware`] end to end
//! without a network.

#![allow(clippy::module_name_repetitions)]

use callwire_core::action::Action;
use callwire_core::transport::{Transport, TransportError, TransportRequest, TransportResponse};
use callwire_runtime::error::DispatchError;
use callwire_runtime::middleware::{ApiMiddleware, Handled};
use callwire_core::normalize::Normalize;
use serde_json::Value;
use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

/// A scripted transport.
///
/// Responses are consumed in order; once the script is exhausted every
/// call returns a 200 with a `null` payload. Clones share the script and
/// the recorded requests, so a test can keep a handle while the invoker
/// owns another.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    script: Arc<Mutex<VecDeque<Result<TransportResponse, TransportError>>>>,
    requests: Arc<Mutex<Vec<TransportRequest>>>,
}

impl MockTransport {
    /// Create a transport with an empty script
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response
    #[must_use]
    pub fn respond_with(self, response: TransportResponse) -> Self {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Ok(response));
        self
    }

    /// Queue a transport failure
    #[must_use]
    pub fn fail_with(self, error: TransportError) -> Self {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Err(error));
        self
    }

    /// Every request the transport has seen, in order
    #[must_use]
    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// How many requests the transport has seen
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Transport for MockTransport {
    fn call(
        &self,
        request: TransportRequest,
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        let next = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| Ok(TransportResponse::ok(Value::Null)));

        async move { next }
    }
}

/// Records every action a closure receives.
///
/// Clones share storage; hand `log.recorder()` to the middleware as `next`
/// or build a dispatch capability from a clone.
#[derive(Debug, Clone, Default)]
pub struct ActionLog {
    actions: Arc<Mutex<Vec<Value>>>,
}

impl ActionLog {
    /// Create an empty log
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one action. Plain records are stored as-is; a managed call
    /// is stored as a `"<managed>"` marker (the middleware never emits one).
    pub fn record(&self, action: &Action) {
        let value = match action {
            Action::Plain(value) => value.clone(),
            Action::Call { .. } => Value::String("<managed>".to_owned()),
        };
        self.actions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(value);
    }

    /// A `next`-shaped closure recording into this log
    #[must_use]
    pub fn recorder(&self) -> impl FnMut(Action) + use<> {
        let log = self.clone();
        move |action| log.record(&action)
    }

    /// All recorded actions
    #[must_use]
    pub fn actions(&self) -> Vec<Value> {
        self.actions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The `type` field of each recorded action, in order
    #[must_use]
    pub fn kinds(&self) -> Vec<String> {
        self.actions()
            .iter()
            .filter_map(|action| action.get("type").and_then(Value::as_str).map(str::to_owned))
            .collect()
    }

    /// Number of recorded actions
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing has been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Fluent harness for exercising the middleware with Given-When-Then syntax.
///
/// # Example
///
/// ```no_run
/// use callwire_core::action::Action;
/// use callwire_core::context::AuthContext;
/// use callwire_core::descriptor::CallDescriptor;
/// use callwire_runtime::{ApiMiddleware, HttpInvoker};
/// use callwire_testing::{DispatchTest, MockTransport};
/// use serde_json::json;
///
/// # async fn example() {
/// let context = AuthContext::new("https://api.example.com", None);
/// let middleware = ApiMiddleware::new(HttpInvoker::new(context, MockTransport::new()));
///
/// let result = DispatchTest::new(middleware)
///     .given_state(json!({"auth": {"token": "abc"}}))
///     .when_dispatched(Action::call(CallDescriptor::new().with_endpoint("/items")))
///     .then_next(|actions| assert!(actions.is_empty()))
///     .run()
///     .await;
/// assert!(result.is_ok());
/// # }
/// ```
pub struct DispatchTest<T: Transport, N: Normalize> {
    middleware: ApiMiddleware<T, N>,
    state: Value,
    action: Option<Action>,
    next_assertions: Vec<Box<dyn FnOnce(&[Value])>>,
}

impl<T: Transport, N: Normalize> DispatchTest<T, N> {
    /// Create a harness around a middleware
    #[must_use]
    pub fn new(middleware: ApiMiddleware<T, N>) -> Self {
        Self {
            middleware,
            state: Value::Object(serde_json::Map::new()),
            action: None,
            next_assertions: Vec::new(),
        }
    }

    /// Set the store state the middleware will observe (Given)
    #[must_use]
    pub fn given_state(mut self, state: Value) -> Self {
        self.state = state;
        self
    }

    /// Set the action to dispatch (When)
    #[must_use]
    pub fn when_dispatched(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    /// Assert over the actions forwarded to `next` (Then)
    #[must_use]
    pub fn then_next<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&[Value]) + 'static,
    {
        self.next_assertions.push(Box::new(assertion));
        self
    }

    /// Dispatch the action and run all assertions.
    ///
    /// Returns the middleware's result so tests can assert on
    /// [`Handled`] or on a validation error.
    ///
    /// # Panics
    ///
    /// Panics if no action was set, or if an assertion fails.
    #[allow(clippy::expect_used)] // Test code can use expect
    pub async fn run(self) -> Result<Handled, DispatchError> {
        let action = self
            .action
            .expect("Action must be set with when_dispatched()");

        let next_log = ActionLog::new();
        let dispatch_log = ActionLog::new();
        let mut next = next_log.recorder();
        let state = self.state;
        let get_state = move || state.clone();
        let dispatch = {
            let log = dispatch_log.clone();
            move |action: Action| log.record(&action)
        };

        let result = self
            .middleware
            .handle(action, &mut next, &get_state, &dispatch)
            .await;

        let actions = next_log.actions();
        for assertion in self.next_assertions {
            assertion(&actions);
        }

        result
    }
}
