use super::*;
use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode},
    response::Response,
};
use serde_json::{Value, json};
use tower::ServiceExt;

use hookline_protocols::types::Subscription;

use crate::store::StoredSubscription;
use crate::test_support::{EVENT, PROVIDER, test_state};

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn create(app: &Router, body: Value) -> Value {
    let response = app
        .clone()
        .oneshot(post_json("/subscriptions", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

#[tokio::test]
async fn test_health_endpoint() {
    let (state, _) = test_state();
    let app = create_router(state);

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["providers"], 1);
}

#[tokio::test]
async fn test_providers_endpoint() {
    let (state, _) = test_state();
    let app = create_router(state);

    let response = app.oneshot(get("/providers")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["providers"][0]["identity"]["name"], PROVIDER);
}

#[tokio::test]
async fn test_subscription_crud() {
    let (state, _) = test_state();
    let app = create_router(state);

    let created = create(&app, json!({ "id": "orders", "events": ["my-event-type.created"] })).await;
    assert_eq!(created["id"], "orders");
    assert_eq!(created["state"], "active");
    assert_eq!(
        created["subscription"]["endpoint"],
        "https://hooks.test/triggers/orders"
    );

    let response = app.clone().oneshot(get("/subscriptions/orders")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(get("/subscriptions")).await.unwrap();
    assert_eq!(body_json(response).await["count"], 1);

    let response = app
        .clone()
        .oneshot(post_json("/subscriptions/orders/refresh", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let refreshed = body_json(response).await;
    assert!(
        refreshed["subscription"]["expires_at"].as_i64() > created["subscription"]["expires_at"].as_i64()
    );

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/subscriptions/orders")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["success"], true);

    let response = app.oneshot(get("/subscriptions/orders")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_duplicate_conflicts() {
    let (state, _) = test_state();
    let app = create_router(state);
    create(&app, json!({ "id": "dup" })).await;

    let response = app
        .oneshot(post_json("/subscriptions", json!({ "id": "dup" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_webhook_emits_event() {
    let (state, _) = test_state();
    let mut rx = state.subscribe_events();
    let app = create_router(state);
    create(&app, json!({ "id": "hook" })).await;

    let response = app
        .oneshot(post_json("/triggers/hook", json!({ "type": "my-event-type.created", "n": 1 })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/json"
    );
    assert_eq!(body_json(response).await, json!({ "status": "ok" }));

    let emitted = rx.try_recv().unwrap();
    assert_eq!(emitted.subscription_id, "hook");
    assert_eq!(emitted.event, EVENT);
    assert_eq!(emitted.variables["message"], "Hello from Mock!");
    assert_eq!(emitted.variables["raw_event"]["n"], 1);
}

#[tokio::test]
async fn test_webhook_no_match_acknowledges() {
    let (state, _) = test_state();
    let mut rx = state.subscribe_events();
    let app = create_router(state);
    create(&app, json!({ "id": "quiet" })).await;

    let response = app
        .oneshot(post_json("/triggers/quiet", json!({ "type": "something-else" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_webhook_filtered_event_ignored() {
    let (state, _) = test_state();
    let mut rx = state.subscribe_events();
    let app = create_router(state);
    create(
        &app,
        json!({
            "id": "filtered",
            "event_parameters": { EVENT: { "sample_filter": "urgent" } }
        }),
    )
    .await;

    let response = app
        .clone()
        .oneshot(post_json("/triggers/filtered", json!({ "type": "my-event-type.low" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(rx.try_recv().is_err());

    let response = app
        .oneshot(post_json(
            "/triggers/filtered",
            json!({ "type": "my-event-type.urgent" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(rx.try_recv().unwrap().event, EVENT);
}

#[tokio::test]
async fn test_webhook_event_without_handler() {
    let (state, _) = test_state();
    let mut rx = state.subscribe_events();
    let app = create_router(state);
    create(&app, json!({ "id": "plain" })).await;

    let response = app
        .oneshot(post_json("/triggers/plain", json!({ "type": "unhandled" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_webhook_empty_body_rejected() {
    let (state, _) = test_state();
    let app = create_router(state);
    create(&app, json!({ "id": "empty" })).await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/triggers/empty")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Empty request body");
}

#[tokio::test]
async fn test_webhook_unknown_subscription() {
    let (state, _) = test_state();
    let app = create_router(state);

    let response = app
        .oneshot(post_json("/triggers/nope", json!({ "type": "x" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_webhook_expired_subscription() {
    let (state, _) = test_state();
    state
        .store
        .insert(StoredSubscription::new(
            "old",
            PROVIDER,
            Subscription::new("https://hooks.test/triggers/old", 1),
        ))
        .unwrap();
    let app = create_router(state);

    let response = app
        .oneshot(post_json("/triggers/old", json!({ "type": "my-event-type.x" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::GONE);
}

#[tokio::test]
async fn test_plugin_validate_credentials() {
    let (state, _) = test_state();
    let app = create_router(state);

    let response = app
        .clone()
        .oneshot(post_json(
            "/plugin/trigger/validate_credentials",
            json!({ "provider": PROVIDER, "credentials": { "api_key": "k" } }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["result"], true);

    let response = app
        .oneshot(post_json(
            "/plugin/trigger/validate_credentials",
            json!({ "provider": PROVIDER }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["result"], false);
    assert!(body["message"].as_str().unwrap().contains("api_key"));
}

#[tokio::test]
async fn test_plugin_unknown_provider() {
    let (state, _) = test_state();
    let app = create_router(state);

    let response = app
        .oneshot(post_json(
            "/plugin/trigger/validate_credentials",
            json!({ "provider": "ghost" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_plugin_subscribe_and_unsubscribe() {
    let (state, _) = test_state();
    let app = create_router(state);

    let response = app
        .clone()
        .oneshot(post_json(
            "/plugin/trigger/subscribe",
            json!({
                "provider": PROVIDER,
                "endpoint": "https://hooks.test/triggers/x",
                "parameters": { "events": ["a"] }
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let subscription = body_json(response).await["subscription"].clone();
    assert_eq!(subscription["properties"]["external_id"], "ext-1");

    let response = app
        .oneshot(post_json(
            "/plugin/trigger/unsubscribe",
            json!({ "provider": PROVIDER, "subscription": subscription }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["result"]["success"], true);
    assert_eq!(body["subscription"]["properties"]["external_id"], "ext-1");
}

#[tokio::test]
async fn test_plugin_unsubscribe_missing_property() {
    let (state, _) = test_state();
    let app = create_router(state);

    let response = app
        .oneshot(post_json(
            "/plugin/trigger/unsubscribe",
            json!({
                "provider": PROVIDER,
                "subscription": { "endpoint": "https://hooks.test/triggers/x", "expires_at": 10 }
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_plugin_dispatch_event() {
    let (state, _) = test_state();
    let app = create_router(state);

    let raw = "POST /triggers/x HTTP/1.1\r\nContent-Type: application/json\r\n\r\n{\"type\":\"my-event-type.created\"}";
    let response = app
        .oneshot(post_json(
            "/plugin/trigger/dispatch_event",
            json!({
                "provider": PROVIDER,
                "subscription": { "endpoint": "https://hooks.test/triggers/x", "expires_at": 10 },
                "raw_http_request": raw
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["events"], json!([EVENT]));
    assert_eq!(body["response"]["status"], 200);
    assert_eq!(body["payload"]["type"], "my-event-type.created");
}

#[tokio::test]
async fn test_plugin_invoke_event() {
    let (state, _) = test_state();
    let app = create_router(state);

    let raw = "POST /triggers/x HTTP/1.1\r\n\r\n{\"type\":\"bar\"}";
    let response = app
        .clone()
        .oneshot(post_json(
            "/plugin/trigger/invoke_event",
            json!({
                "provider": PROVIDER,
                "event": EVENT,
                "raw_http_request": raw,
                "parameters": { "sample_filter": "foo" }
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "ignored": true }));

    let response = app
        .clone()
        .oneshot(post_json(
            "/plugin/trigger/invoke_event",
            json!({
                "provider": PROVIDER,
                "event": EVENT,
                "raw_http_request": raw,
                "payload": { "type": "foo-event" },
                "parameters": { "sample_filter": "foo" }
            }),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["variables"]["raw_event"]["type"], "foo-event");

    let response = app
        .oneshot(post_json(
            "/plugin/trigger/invoke_event",
            json!({ "provider": PROVIDER, "event": "missing", "raw_http_request": raw }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delivery_reaches_returned_endpoint() {
    let (state, _) = test_state();
    let mut rx = state.subscribe_events();
    let app = create_router(state);

    let created = create(&app, json!({})).await;
    let endpoint = created["subscription"]["endpoint"].as_str().unwrap();
    let path = endpoint.strip_prefix("https://hooks.test").unwrap();

    let response = app
        .oneshot(post_json(path, json!({ "type": "my-event-type.created" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(rx.try_recv().unwrap().subscription_id, created["id"]);
}

#[tokio::test]
async fn test_create_rejects_unroutable_id() {
    let (state, _) = test_state();
    let app = create_router(state);

    let response = app
        .oneshot(post_json("/subscriptions", json!({ "id": "a?b" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
