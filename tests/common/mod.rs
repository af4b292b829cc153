//! Common test utilities for integration tests.
//!
//! This module provides reusable fixtures for building clients against a
//! `wiremock` server or the crate's mock adapters.
//!
//! # Example
//!
//! ```ignore
//! let server = MockServer::start().await;
//! let dir = tempfile::tempdir().unwrap();
//! let (client, store) = file_client(&server, &dir, Some(signed_in_pair()));
//! ```

#![allow(dead_code)]

pub mod mocks;

pub use mocks::*;

use realit::adapters::{FileCredentialStore, ReqwestHttpClient};
use realit::api::ApiClient;
use realit::auth::{CredentialPair, SessionEvent};
use realit::config::ClientConfig;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::broadcast;
use wiremock::MockServer;

pub const ACCESS_1: &str = "tok1";
pub const REFRESH_1: &str = "ref1";
pub const ACCESS_2: &str = "tok2";
pub const REFRESH_2: &str = "ref2";

/// The pair a signed-in user starts with.
pub fn signed_in_pair() -> CredentialPair {
    CredentialPair::new(ACCESS_1, REFRESH_1)
}

/// The pair the refresh endpoint hands out.
pub fn rotated_pair() -> CredentialPair {
    CredentialPair::new(ACCESS_2, REFRESH_2)
}

/// Refresh endpoint body carrying the rotated pair.
pub fn rotated_tokens() -> Value {
    json!({"access_token": ACCESS_2, "refresh_token": REFRESH_2})
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

pub fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig::new()
        .with_base_url(server.uri())
        .with_timeout(Duration::from_secs(5))
}

/// Client using reqwest and a credentials file inside `dir`.
pub fn file_client(
    server: &MockServer,
    dir: &TempDir,
    pair: Option<CredentialPair>,
) -> (Arc<ApiClient>, FileCredentialStore) {
    let store = FileCredentialStore::with_path(dir.path().join("credentials.json"));
    if let Some(pair) = pair {
        store.manager().save(&pair).unwrap();
    }

    let transport = ReqwestHttpClient::with_timeout(Duration::from_secs(5)).unwrap();
    let client = ApiClient::new(
        &config_for(server),
        Arc::new(transport),
        Arc::new(store.clone()),
    );
    (Arc::new(client), store)
}

/// Every event currently buffered on `events`.
pub fn drain_events(events: &mut broadcast::Receiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut drained = Vec::new();
    while let Ok(event) = events.try_recv() {
        drained.push(event);
    }
    drained
}
