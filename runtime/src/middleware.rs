//! The action-interception middleware.
//!
//! [`ApiMiddleware::handle`] is the dispatch protocol: plain actions pass
//! through untouched; managed calls are validated, satisfied from cache
//! when possible, or turned into one transport call with lifecycle actions
//! emitted around it. Recoverable failures become failure actions and hook
//! calls — the dispatch caller only ever sees descriptor validation errors.

use crate::error::DispatchError;
use crate::invoker::{ApiRequest, HttpInvoker, Outcome};
use callwire_core::action::{Action, Dispatch, lifecycle_record};
use callwire_core::cache::resolve;
use callwire_core::descriptor::{CallDescriptor, Hook, Hooks};
use callwire_core::error::ApiError;
use callwire_core::normalize::{Identity, Normalize};
use callwire_core::transport::Transport;
use callwire_core::value::is_truthy;
use serde_json::{Map, Value, json};

/// How `handle` disposed of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    /// Not a managed call; forwarded to `next` untouched
    Forwarded,
    /// A managed call, processed to completion
    Completed,
}

/// The dispatch-layer middleware.
pub struct ApiMiddleware<T, N = Identity> {
    invoker: HttpInvoker<T, N>,
}

impl<T: Transport, N: Normalize> ApiMiddleware<T, N> {
    /// Create the middleware around a configured invoker
    #[must_use]
    pub const fn new(invoker: HttpInvoker<T, N>) -> Self {
        Self { invoker }
    }

    /// Process one dispatched action.
    ///
    /// - `next` forwards actions down the dispatch chain (pass-through and
    ///   lifecycle actions both go through it)
    /// - `get_state` reads the enclosing store's state as an opaque record
    /// - `dispatch` is the capability handed to side-effect hooks
    ///
    /// One managed action produces at most one network request; the caller
    /// suspends at the transport boundary and resumes with the mapped
    /// outcome. There is no deduplication of concurrent dispatches — the
    /// cache short-circuit only prevents re-fetching data already
    /// materialized in state.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::InvalidDescriptor`] synchronously when a
    /// lifecycle type slot holds a non-string value — a programmer error,
    /// surfaced before anything is dispatched. Every runtime failure is
    /// converted to a failure lifecycle action and/or an `on_failure` call.
    pub async fn handle<F, G>(
        &self,
        action: Action,
        next: &mut F,
        get_state: &G,
        dispatch: Dispatch<'_>,
    ) -> Result<Handled, DispatchError>
    where
        F: FnMut(Action),
        G: Fn() -> Value,
    {
        let (descriptor, base) = match action {
            Action::Plain(_) => {
                next(action);
                return Ok(Handled::Forwarded);
            }
            Action::Call { descriptor, base } => (*descriptor, base),
        };

        metrics::counter!("callwire.dispatch").increment(1);

        let CallDescriptor {
            endpoint,
            method,
            schema,
            headers,
            body,
            params,
            config,
            path,
            types,
            cache,
            hooks,
            refresh,
            token,
            additional_data,
            external_call,
        } = descriptor;

        let types = types.validate()?;

        let state = get_state();
        let user_token = resolve(&state, "auth.token")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .or(token);

        // Cache short-circuit: only when the caller did not ask for a
        // refresh and both store and key are given.
        if !refresh {
            if let Some(cached) = cache
                .as_ref()
                .filter(|spec| !spec.store.is_empty() && !spec.key.is_empty())
                .and_then(|spec| state.get(&spec.store).and_then(|slice| resolve(slice, &spec.key)))
            {
                // A resolved value is always truthy; only an empty
                // sequence fails the hit test and falls through to the
                // network.
                let hit = match cached {
                    Value::Array(items) => !items.is_empty(),
                    _ => true,
                };
                if hit {
                    metrics::counter!("callwire.cache_hit").increment(1);
                    tracing::debug!("cache hit, skipping network call");

                    let mut payload = Map::new();
                    payload.insert("data".to_owned(), cached.clone());
                    if let Value::Array(items) = cached {
                        payload.insert("length".to_owned(), Value::from(items.len()));
                    }

                    run_hook(&hooks.on_success, &Value::Object(payload), dispatch);
                    run_callback(&hooks, dispatch);
                    return Ok(Handled::Completed);
                }
            }
        }

        if let Some(kind) = &types.request {
            next(lifecycle_action(&base, kind, None, None, additional_data.as_ref()));
        }

        // Deliberate no-op path: conditional calls leave the endpoint
        // unset and still get their hooks.
        let Some(endpoint) = endpoint.filter(|e| !e.is_empty()) else {
            run_hook(
                &hooks.on_success,
                &json!({"code": "200", "entity": null}),
                dispatch,
            );
            run_callback(&hooks, dispatch);
            return Ok(Handled::Completed);
        };

        let outcome = self
            .invoker
            .invoke(ApiRequest {
                endpoint,
                method,
                schema,
                headers,
                body,
                params,
                config,
                path,
                user_token,
                external_call,
            })
            .await;

        match outcome {
            Ok(Outcome::Response(response))
                if is_truthy(&response)
                    || (external_call && response == Value::String(String::new())) =>
            {
                run_hook(&hooks.on_before_success, &response, dispatch);
                if let Some(kind) = &types.success {
                    next(lifecycle_action(
                        &base,
                        kind,
                        Some(&response),
                        None,
                        additional_data.as_ref(),
                    ));
                }
                run_hook(&hooks.on_success, &response, dispatch);
            }
            Ok(Outcome::Error(error)) => {
                metrics::counter!("callwire.failure").increment(1);
                if let Some(kind) = &types.failure {
                    next(lifecycle_action(
                        &base,
                        kind,
                        None,
                        Some(&error),
                        additional_data.as_ref(),
                    ));
                }
                run_hook(&hooks.on_failure, &error.to_value(), dispatch);
            }
            Ok(Outcome::Response(_)) => {
                // Falsy payload without the external-call exemption:
                // neither success nor failure; only the callback runs.
                tracing::debug!("falsy response payload, nothing dispatched");
            }
            Err(err) => {
                metrics::counter!("callwire.failure").increment(1);
                let error = ApiError::new(err.to_string());
                if let Some(kind) = &types.failure {
                    next(lifecycle_action(
                        &base,
                        kind,
                        None,
                        Some(&error),
                        additional_data.as_ref(),
                    ));
                }
                run_hook(&hooks.on_failure, &error.to_value(), dispatch);
            }
        }

        run_callback(&hooks, dispatch);
        Ok(Handled::Completed)
    }
}

/// Build a lifecycle action: base fields spread first, then `type`,
/// `response`/`error`, and `additionalData`.
fn lifecycle_action(
    base: &Map<String, Value>,
    kind: &str,
    response: Option<&Value>,
    error: Option<&ApiError>,
    additional_data: Option<&Value>,
) -> Action {
    let mut record = lifecycle_record(base, kind);
    if let Some(response) = response {
        record.insert("response".to_owned(), response.clone());
    }
    if let Some(error) = error {
        record.insert("error".to_owned(), error.to_value());
    }
    if let Some(data) = additional_data {
        record.insert("additionalData".to_owned(), data.clone());
    }
    Action::Plain(Value::Object(record))
}

fn run_hook(hook: &Option<Hook>, payload: &Value, dispatch: Dispatch<'_>) {
    if let Some(hook) = hook {
        hook(payload, dispatch);
    }
}

fn run_callback(hooks: &Hooks, dispatch: Dispatch<'_>) {
    if let Some(callback) = &hooks.callback {
        callback(dispatch);
    }
}
