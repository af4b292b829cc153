//! Concurrency tests for the refresh coordinator using the mock adapters.
//!
//! The mock transport lets these tests control timing precisely:
//! - A cancelled waiter does not disturb the others
//! - An exchange whose waiters were all cancelled still persists its result
//! - Phase transitions are observable through the watch channel
//! - A session restored outside this client is still ended by a failed refresh

mod common;

use common::*;
use futures::future::join_all;
use realit::api::{ApiClient, ApiRequest};
use realit::auth::{CredentialPair, RefreshPhase, SessionEvent};
use realit::config::ClientConfig;
use realit::error::{ApiError, RefreshFailure};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn script_refresh(setup: &MockSetup, delay: Duration) {
    setup.http.set_response_for_token(
        &mock_url("/feed"),
        ACCESS_1,
        MockResponse::status(401),
    );
    setup.http.set_response_for_token(
        &mock_url("/feed"),
        ACCESS_2,
        MockResponse::json(200, json!([])),
    );
    setup
        .http
        .set_delayed_response(&mock_url("/auth/refresh"), delay, MockResponse::json(200, rotated_tokens()));
}

#[tokio::test]
async fn test_cancelled_waiter_does_not_affect_others() {
    let setup = MockSetup::new(Some(signed_in_pair()));
    script_refresh(&setup, Duration::from_millis(100));

    let client = setup.client.clone();
    let survivor = tokio::spawn(async move { client.execute(ApiRequest::get("/feed")).await });

    let client = setup.client.clone();
    let cancelled = tokio::spawn(async move { client.execute(ApiRequest::get("/feed")).await });

    tokio::time::sleep(Duration::from_millis(20)).await;
    cancelled.abort();

    let response = survivor.await.unwrap().unwrap();
    assert_eq!(response.status, 200);
    assert!(cancelled.await.unwrap_err().is_cancelled());
    assert_eq!(setup.http.requests_to(&mock_url("/auth/refresh")).len(), 1);
}

#[tokio::test]
async fn test_exchange_completes_after_all_waiters_cancelled() {
    let setup = MockSetup::new(Some(signed_in_pair()));
    script_refresh(&setup, Duration::from_millis(50));

    let abandoned =
        tokio::time::timeout(Duration::from_millis(10), setup.client.execute(ApiRequest::get("/feed")))
            .await;
    assert!(abandoned.is_err());

    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(setup.store.pair(), Some(rotated_pair()));
    assert_eq!(*setup.client.refresh_phase().borrow(), RefreshPhase::Idle);
}

#[tokio::test]
async fn test_phase_transitions_on_success() {
    let setup = MockSetup::new(Some(signed_in_pair()));
    script_refresh(&setup, Duration::from_millis(30));
    let mut phases = setup.client.refresh_phase();

    let client = setup.client.clone();
    let request = tokio::spawn(async move { client.execute(ApiRequest::get("/feed")).await });

    let mut seen = Vec::new();
    while seen.last() != Some(&RefreshPhase::Idle) {
        phases.changed().await.unwrap();
        seen.push(*phases.borrow_and_update());
    }
    request.await.unwrap().unwrap();

    assert_eq!(seen.first(), Some(&RefreshPhase::RefreshInFlight));
    assert_eq!(seen.last(), Some(&RefreshPhase::Idle));
}

#[tokio::test]
async fn test_many_waiters_one_exchange_with_mock_transport() {
    let setup = MockSetup::new(Some(signed_in_pair()));
    script_refresh(&setup, Duration::from_millis(50));

    let results = join_all((0..10).map(|_| setup.client.execute(ApiRequest::get("/feed")))).await;

    assert!(results.iter().all(|r| r.is_ok()));
    assert_eq!(setup.client.coordinator().exchange_count(), 1);
    let replays = setup
        .http
        .requests_to(&mock_url("/feed"))
        .into_iter()
        .filter(|r| r.authorization() == Some(bearer(ACCESS_2).as_str()))
        .count();
    assert_eq!(replays, 10);
}

#[tokio::test]
async fn test_persist_failure_still_replays() {
    let setup = MockSetup::new(Some(signed_in_pair()));
    script_refresh(&setup, Duration::from_millis(1));
    setup.store.set_save_should_fail(true);
    let mut events = setup.client.subscribe();

    let response = setup
        .client
        .execute(ApiRequest::get("/feed"))
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(setup.store.pair(), Some(signed_in_pair()));
    assert!(drain_events(&mut events).is_empty());
}

#[tokio::test]
async fn test_unreadable_store_behaves_as_signed_out() {
    let setup = MockSetup::new(Some(CredentialPair::new("tok1", "ref1")));
    setup.store.set_load_should_fail(true);
    setup
        .http
        .set_response(&mock_url("/feed"), MockResponse::status(401));
    let mut events = setup.client.subscribe();

    let err = setup
        .client
        .execute(ApiRequest::get("/feed"))
        .await
        .unwrap_err();

    assert!(err.requires_reauth());
    assert!(matches!(err, ApiError::AuthenticationExpired { .. }));
    assert!(setup.http.requests_to(&mock_url("/auth/refresh")).is_empty());
    assert!(setup.http.get_requests()[0].authorization().is_none());
    assert_eq!(drain_events(&mut events), vec![SessionEvent::Invalidated]);
}

#[tokio::test]
async fn test_session_restored_by_another_client_is_invalidated_again() {
    let http = MockHttpClient::new();
    let store = InMemoryCredentials::new();
    let config = ClientConfig::new().with_base_url(MOCK_BASE);
    let first = ApiClient::new(&config, Arc::new(http.clone()), Arc::new(store.clone()));
    let second = ApiClient::new(&config, Arc::new(http.clone()), Arc::new(store.clone()));
    http.set_response(&mock_url("/feed"), MockResponse::status(401));
    http.set_response(
        &mock_url("/auth/refresh"),
        MockResponse::json(403, json!({"message": "revoked"})),
    );
    let mut events = first.subscribe();

    let err = first.execute(ApiRequest::get("/feed")).await.unwrap_err();
    assert!(matches!(
        err,
        ApiError::AuthenticationExpired {
            reason: RefreshFailure::MissingRefreshCredential
        }
    ));
    assert_eq!(drain_events(&mut events), vec![SessionEvent::Invalidated]);

    second.sign_in(&signed_in_pair()).await.unwrap();
    let err = first.execute(ApiRequest::get("/feed")).await.unwrap_err();

    assert!(matches!(
        err,
        ApiError::AuthenticationExpired {
            reason: RefreshFailure::Rejected { status: 403, .. }
        }
    ));
    assert_eq!(http.requests_to(&mock_url("/auth/refresh")).len(), 1);
    assert!(store.pair().is_none());
    assert_eq!(drain_events(&mut events), vec![SessionEvent::Invalidated]);
}
