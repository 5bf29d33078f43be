use super::*;

use std::sync::atomic::Ordering;

use crate::test_support::{EVENT, PROVIDER, test_state};

fn request(id: &str) -> CreateSubscriptionRequest {
    CreateSubscriptionRequest {
        id: Some(id.to_string()),
        events: vec!["my-event-type.created".to_string()],
        ..Default::default()
    }
}

#[tokio::test]
async fn test_create_stores_subscription() {
    let (state, constructor) = test_state();

    let stored = create(&state, request("orders")).await.unwrap();
    assert_eq!(stored.provider, PROVIDER);
    assert_eq!(stored.subscription.endpoint, "https://hooks.test/triggers/orders");
    assert_eq!(stored.subscription.external_id(), Some("ext-1"));
    assert_eq!(stored.subscription.events(), vec!["my-event-type.created"]);
    assert!(state.store.contains("orders"));
    assert_eq!(constructor.created.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_create_generates_id() {
    let (state, _) = test_state();
    let stored = create(&state, CreateSubscriptionRequest::default()).await.unwrap();
    assert!(!stored.id.is_empty());
    assert!(state.store.contains(&stored.id));
}

#[tokio::test]
async fn test_create_keeps_event_parameters() {
    let (state, _) = test_state();
    let mut params = Parameters::new();
    params.insert("sample_filter".to_string(), "urgent".into());
    let mut req = request("filtered");
    req.event_parameters.insert(EVENT.to_string(), params);

    let stored = create(&state, req).await.unwrap();
    assert_eq!(
        stored.parameters_for(EVENT).get("sample_filter"),
        Some(&serde_json::json!("urgent"))
    );
    assert!(stored.parameters_for("other").is_empty());
}

#[tokio::test]
async fn test_create_rejects_duplicate_id() {
    let (state, constructor) = test_state();
    create(&state, request("dup")).await.unwrap();

    let err = create(&state, request("dup")).await.unwrap_err();
    assert!(matches!(err, ApiError::SubscriptionExists(_)));
    assert_eq!(constructor.created.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_create_rejects_bad_id() {
    let (state, _) = test_state();
    let err = create(&state, request("a/b")).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidRequest(_)));
    let err = create(&state, request("")).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidRequest(_)));
    for id in ["a?b", "a#b", "a%20b", "a b"] {
        let err = create(&state, request(id)).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)), "{id} accepted");
    }
    assert!(state.store.is_empty());
}

#[tokio::test]
async fn test_create_unknown_provider() {
    let (state, _) = test_state();
    let mut req = request("x");
    req.provider = Some("nope".to_string());
    let err = create(&state, req).await.unwrap_err();
    assert!(matches!(err, ApiError::Registry(_)));
    assert!(state.store.is_empty());
}

#[tokio::test]
async fn test_refresh_extends_lease() {
    let (state, constructor) = test_state();
    let created = create(&state, request("lease")).await.unwrap();

    let refreshed = refresh(&state, "lease").await.unwrap();
    assert!(refreshed.subscription.expires_at > created.subscription.expires_at);
    assert!(refreshed.refreshed_at.is_some());
    assert_eq!(refreshed.subscription.external_id(), Some("ext-1"));
    assert_eq!(constructor.refreshed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_refresh_missing() {
    let (state, _) = test_state();
    let err = refresh(&state, "ghost").await.unwrap_err();
    assert!(matches!(err, ApiError::SubscriptionNotFound(_)));
}

#[tokio::test]
async fn test_refresh_expired_upstream_surfaces_error() {
    let (state, constructor) = test_state();
    create(&state, request("gone")).await.unwrap();
    constructor.forget_upstream.store(true, Ordering::SeqCst);

    let err = refresh(&state, "gone").await.unwrap_err();
    assert!(matches!(err, ApiError::Subscription(SubscriptionError::Expired(_))));
}

#[tokio::test]
async fn test_refresh_or_recreate_recreates() {
    let (state, constructor) = test_state();
    create(&state, request("again")).await.unwrap();
    constructor.forget_upstream.store(true, Ordering::SeqCst);

    let stored = refresh_or_recreate(&state, "again").await.unwrap();
    assert_eq!(stored.subscription.external_id(), Some("ext-2"));
    assert_eq!(stored.subscription.endpoint, "https://hooks.test/triggers/again");
    assert_eq!(stored.subscription.events(), vec!["my-event-type.created"]);
    assert_eq!(constructor.created.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_recreate_after_delete_drops_new_registration() {
    let (state, constructor) = test_state();
    create(&state, request("raced")).await.unwrap();
    let stored = state.store.remove("raced").unwrap();

    let err = recreate_stored(&state, &stored).await.unwrap_err();
    assert!(matches!(err, ApiError::SubscriptionNotFound(_)));
    assert_eq!(constructor.created.load(Ordering::SeqCst), 2);
    assert_eq!(constructor.deleted.load(Ordering::SeqCst), 1);
    assert!(!state.store.contains("raced"));
}

#[tokio::test]
async fn test_refresh_or_recreate_plain_refresh() {
    let (state, constructor) = test_state();
    create(&state, request("plain")).await.unwrap();

    let stored = refresh_or_recreate(&state, "plain").await.unwrap();
    assert_eq!(stored.subscription.external_id(), Some("ext-1"));
    assert_eq!(constructor.created.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_delete_removes_record() {
    let (state, constructor) = test_state();
    create(&state, request("bye")).await.unwrap();

    let result = delete(&state, "bye").await.unwrap();
    assert!(result.success);
    assert!(!state.store.contains("bye"));
    assert_eq!(constructor.deleted.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_delete_upstream_failure_still_removes() {
    let (state, constructor) = test_state();
    create(&state, request("sticky")).await.unwrap();
    constructor.fail_delete.store(true, Ordering::SeqCst);

    let result = delete(&state, "sticky").await.unwrap();
    assert!(!result.success);
    assert!(!state.store.contains("sticky"));
}

#[tokio::test]
async fn test_delete_missing() {
    let (state, _) = test_state();
    let err = delete(&state, "ghost").await.unwrap_err();
    assert!(matches!(err, ApiError::SubscriptionNotFound(_)));
}
