//! Tests for authenticated request execution and the refresh-and-retry cycle.

use axum::http::StatusCode;
use dashboard_client::{ClientError, RequestSpec, Role, Route};
use serde_json::{json, Value};
use std::time::Duration;

mod common;
use common::{FakeBackend, RefreshBehavior, RejectStyle};

#[tokio::test]
async fn test_no_access_token_fails_without_network() {
    let backend = FakeBackend::start().await;
    let (client, navigator) = backend.client();

    let result: Result<Value, _> = client.execute(&RequestSpec::get("/units/")).await;

    assert!(matches!(result, Err(ClientError::NotAuthenticated)));
    assert_eq!(backend.state.request_count(), 0);
    assert_eq!(navigator.current(), Some(Route::Login));
}

#[tokio::test]
async fn test_valid_token_returns_body_verbatim() {
    let backend = FakeBackend::start().await;
    backend
        .state
        .set_route("/statistics/", StatusCode::OK, json!({"total_user": 3, "extra": [1, 2]}));
    let (client, navigator) = backend.signed_in_client("T1", "R1", Role::Superadmin);

    let body: Value = client
        .execute(&RequestSpec::get("/statistics/"))
        .await
        .unwrap();

    assert_eq!(body, json!({"total_user": 3, "extra": [1, 2]}));
    let requests = backend.state.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].authorization.as_deref(), Some("Bearer T1"));
    assert_eq!(backend.state.refresh_calls(), 0);
    assert!(navigator.history().is_empty());
}

#[tokio::test]
async fn test_expired_token_is_refreshed_and_retried_once() {
    let backend = FakeBackend::start().await;
    backend.state.set_valid_token("T_other");
    backend
        .state
        .set_route("/faces/search", StatusCode::OK, json!({"data": ["match"]}));
    let (client, _) = backend.signed_in_client("T_old", "R_old", Role::Unit);

    let body: Value = client
        .execute(&RequestSpec::get("/faces/search").query("user_id", "u-1"))
        .await
        .unwrap();

    assert_eq!(body, json!({"data": ["match"]}));
    assert_eq!(backend.state.refresh_calls(), 1);
    assert_eq!(
        *backend.state.refresh_tokens_seen.lock().unwrap(),
        vec!["R_old".to_string()]
    );

    let searches = backend.state.requests_to("/faces/search");
    assert_eq!(searches.len(), 2);
    assert_eq!(searches[0].authorization.as_deref(), Some("Bearer T_old"));
    assert_eq!(searches[1].authorization.as_deref(), Some("Bearer T_new"));
    assert_eq!(searches[1].query_map().get("user_id").map(String::as_str), Some("u-1"));

    let session = client.auth().session().unwrap();
    assert_eq!(session.access_token.as_deref(), Some("T_new"));
    assert_eq!(session.refresh_token.as_deref(), Some("R_new"));
    assert_eq!(session.user.unwrap().id.as_deref(), Some("u-1"));
}

#[tokio::test]
async fn test_nested_detail_status_code_counts_as_unauthorized() {
    let backend = FakeBackend::start().await;
    backend.state.set_valid_token("T_other");
    backend.state.set_reject_style(RejectStyle::NestedDetail);
    let (client, _) = backend.signed_in_client("T_old", "R_old", Role::Unit);

    let body: Value = client
        .execute(&RequestSpec::delete("/units/u-9"))
        .await
        .unwrap();

    assert_eq!(body["path"], "/units/u-9");
    assert_eq!(backend.state.refresh_calls(), 1);
}

#[tokio::test]
async fn test_second_rejection_ends_session_without_another_refresh() {
    let backend = FakeBackend::start().await;
    backend.state.set_always_reject(true);
    let (client, navigator) = backend.signed_in_client("T_old", "R_old", Role::Unit);

    let result: Result<Value, _> = client.execute(&RequestSpec::get("/users/me")).await;

    assert!(matches!(result, Err(ClientError::Unauthorized)));
    assert_eq!(backend.state.refresh_calls(), 1);
    assert_eq!(backend.state.requests_to("/users/me").len(), 2);
    assert!(client.auth().session().is_none());
    assert_eq!(navigator.current(), Some(Route::Login));
}

#[tokio::test]
async fn test_rejected_refresh_clears_session() {
    let backend = FakeBackend::start().await;
    backend.state.set_valid_token("T_other");
    backend
        .state
        .set_refresh(RefreshBehavior::Fail(StatusCode::BAD_REQUEST));
    let (client, navigator) = backend.signed_in_client("T_old", "R_bad", Role::Outlet);

    let result: Result<Value, _> = client.execute(&RequestSpec::get("/outlets/")).await;

    assert!(matches!(result, Err(ClientError::Unauthorized)));
    assert!(result.unwrap_err().is_session_ended());
    assert_eq!(backend.state.refresh_calls(), 1);
    assert_eq!(backend.state.requests_to("/outlets/").len(), 1);

    let store = client.auth().token_store();
    assert!(store.access_token(&backend.base_url).is_none());
    assert!(store.refresh_token(&backend.base_url).is_none());
    assert!(store.user(&backend.base_url).is_none());
    assert_eq!(navigator.current(), Some(Route::Login));
}

#[tokio::test]
async fn test_incomplete_refresh_body_clears_session() {
    let backend = FakeBackend::start().await;
    backend.state.set_valid_token("T_other");
    backend.state.set_refresh(RefreshBehavior::Incomplete);
    let (client, _) = backend.signed_in_client("T_old", "R_old", Role::Unit);

    let result: Result<Value, _> = client.execute(&RequestSpec::get("/photos/")).await;

    assert!(matches!(result, Err(ClientError::Unauthorized)));
    assert!(client.auth().session().is_none());
}

#[tokio::test]
async fn test_other_backend_errors_propagate_without_refresh() {
    let backend = FakeBackend::start().await;
    backend.state.set_route(
        "/units/missing",
        StatusCode::NOT_FOUND,
        json!({"detail": "Unit not found"}),
    );
    let (client, navigator) = backend.signed_in_client("T1", "R1", Role::Superadmin);

    let result: Result<Value, _> = client.execute(&RequestSpec::get("/units/missing")).await;

    match result {
        Err(ClientError::Backend { status, body }) => {
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert!(body.contains("Unit not found"));
        }
        other => panic!("expected backend error, got {other:?}"),
    }
    assert_eq!(backend.state.refresh_calls(), 0);
    assert!(client.auth().is_authenticated());
    assert!(navigator.history().is_empty());
}

#[tokio::test]
async fn test_unreachable_backend_is_a_network_error() {
    let backend = FakeBackend::start().await;
    let (client, _) = backend.signed_in_client("T1", "R1", Role::Unit);
    let store = client.auth().token_store().clone();

    // Same session, pointed at a port nothing listens on
    let record = store.get(&backend.base_url).unwrap();
    let dead = dashboard_client::ClientConfig::new("http://127.0.0.1:9").unwrap();
    store.store(&dead.api_base, record);
    let auth = dashboard_client::AuthClient::with_store(
        dead,
        store,
        dashboard_client::NavigatorNoop::new(),
    )
    .unwrap();
    let dead_client = dashboard_client::ApiClient::new(auth);

    let result: Result<Value, _> = dead_client.execute(&RequestSpec::get("/units/")).await;

    assert!(matches!(result, Err(ClientError::Network(_))));
    assert!(dead_client.auth().is_authenticated());
}

#[tokio::test]
async fn test_concurrent_rejections_share_one_refresh() {
    let backend = FakeBackend::start().await;
    backend.state.set_valid_token("T_other");
    backend.state.set_refresh_delay(Duration::from_millis(200));
    let (client, _) = backend.signed_in_client("T1", "R1", Role::Unit);

    let search = RequestSpec::get("/faces/search");
    let stats = RequestSpec::get("/statistics/");
    let (a, b) = tokio::join!(
        client.execute::<Value>(&search),
        client.execute::<Value>(&stats),
    );

    assert!(a.is_ok(), "{a:?}");
    assert!(b.is_ok(), "{b:?}");
    assert_eq!(backend.state.refresh_calls(), 1);

    let retried: Vec<_> = backend
        .state
        .requests()
        .into_iter()
        .filter(|r| r.authorization.as_deref() == Some("Bearer T_new"))
        .collect();
    assert_eq!(retried.len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_rejection_burst_across_threads_rotates_tokens_once() {
    let backend = FakeBackend::start().await;
    backend.state.set_valid_token("T_other");
    backend.state.set_refresh_delay(Duration::from_millis(50));
    let (client, navigator) = backend.signed_in_client("T1", "R1", Role::Unit);

    let tasks: Vec<_> = (0..16)
        .map(|i| {
            let client = client.clone();
            tokio::spawn(async move {
                // Stagger so some requests are rejected after the refresh finished
                tokio::time::sleep(Duration::from_millis(i * 10)).await;
                client
                    .execute::<Value>(&RequestSpec::get(format!("/units/u-{i}")))
                    .await
            })
        })
        .collect();

    for task in tasks {
        assert!(task.await.unwrap().is_ok());
    }

    assert_eq!(backend.state.refresh_calls(), 1);
    assert_eq!(
        *backend.state.refresh_tokens_seen.lock().unwrap(),
        vec!["R1".to_string()]
    );
    assert_eq!(client.auth().access_token().as_deref(), Some("T_new"));
    assert!(navigator.history().is_empty());
}

#[tokio::test]
async fn test_refreshed_token_serves_following_calls() {
    let backend = FakeBackend::start().await;
    backend.state.set_valid_token("T_other");
    let (client, _) = backend.signed_in_client("T1", "R1", Role::Unit);

    let _: Value = client.execute(&RequestSpec::get("/photos/")).await.unwrap();
    assert_eq!(backend.state.refresh_calls(), 1);
    assert_eq!(client.auth().access_token().as_deref(), Some("T_new"));

    let _: Value = client.execute(&RequestSpec::get("/photos/")).await.unwrap();
    assert_eq!(backend.state.refresh_calls(), 1);

    let photos = backend.state.requests_to("/photos/");
    assert_eq!(photos.len(), 3);
    assert_eq!(photos[2].authorization.as_deref(), Some("Bearer T_new"));
}
