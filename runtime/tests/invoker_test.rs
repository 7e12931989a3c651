//! Integration tests for the HTTP invoker over the reqwest transport.
//!
//! Runs against a local wiremock server to verify the URL grammar, header
//! emission, method argument shape, and outcome mapping end to end.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use callwire_core::context::AuthContext;
use callwire_core::descriptor::Method;
use callwire_core::error::ApiError;
use callwire_runtime::{ApiRequest, HttpInvoker, Outcome, ReqwestTransport};
use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn invoker(server: &MockServer) -> HttpInvoker<ReqwestTransport> {
    let context = AuthContext::new(server.uri(), Some("ambient-token".to_owned()));
    HttpInvoker::new(context, ReqwestTransport::new())
}

#[tokio::test]
async fn get_builds_url_from_path_segments_and_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/videos/0/clips"))
        .and(query_param("page", "2"))
        .and(header("Authorization", "Basic ambient-token"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": [1]})))
        .mount(&server)
        .await;

    let outcome = invoker(&server)
        .invoke(ApiRequest {
            endpoint: "/videos".to_owned(),
            path: vec![json!(0), json!(null), json!("clips")],
            params: json!({"page": 2}).as_object().unwrap().clone(),
            ..ApiRequest::default()
        })
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Response(json!({"items": [1]})));
}

#[tokio::test]
async fn post_sends_the_json_body_and_user_token_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/items"))
        .and(body_json(json!({"name": "clip", "tag": null})))
        .and(header("User-Token", "user-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 9})))
        .mount(&server)
        .await;

    let mut body = callwire_core::descriptor::Body::new();
    body.insert("name".to_owned(), Some(json!("clip")));
    body.insert("dropped".to_owned(), None);
    body.insert("tag".to_owned(), Some(Value::Null));

    let outcome = invoker(&server)
        .invoke(ApiRequest {
            endpoint: "/items".to_owned(),
            method: Method::Post,
            body: Some(body),
            user_token: Some("user-token".to_owned()),
            ..ApiRequest::default()
        })
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Response(json!({"id": 9})));
}

#[tokio::test]
async fn non_200_status_maps_to_an_error_outcome() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let outcome = invoker(&server)
        .invoke(ApiRequest {
            endpoint: "/missing".to_owned(),
            ..ApiRequest::default()
        })
        .await
        .unwrap();

    assert_eq!(
        outcome,
        Outcome::Error(ApiError::with_status("not found", 404))
    );
}

#[tokio::test]
async fn empty_body_decodes_to_an_empty_string_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let outcome = invoker(&server)
        .invoke(ApiRequest {
            endpoint: "/ping".to_owned(),
            ..ApiRequest::default()
        })
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Response(json!("")));
}

#[tokio::test]
async fn connection_failure_maps_to_an_error_outcome() {
    // Nothing is listening on this port.
    let context = AuthContext::new("http://127.0.0.1:1", None);
    let invoker = HttpInvoker::new(context, ReqwestTransport::new());

    let outcome = invoker
        .invoke(ApiRequest {
            endpoint: "/anything".to_owned(),
            ..ApiRequest::default()
        })
        .await
        .unwrap();

    match outcome {
        Outcome::Error(error) => {
            assert!(error.status.is_none());
            assert!(error.message.starts_with("request failed:"));
        }
        Outcome::Response(_) => panic!("expected an error outcome"),
    }
}
