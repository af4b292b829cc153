//! Mock implementations for test fixtures.
//!
//! This module re-exports the mock adapters from `realit::adapters::mock`
//! and builds clients on top of them for deterministic concurrency tests.

pub use realit::adapters::mock::{InMemoryCredentials, MockHttpClient, MockResponse};

use realit::api::ApiClient;
use realit::auth::CredentialPair;
use realit::config::ClientConfig;
use std::sync::Arc;

pub const MOCK_BASE: &str = "http://api.test";

pub fn mock_url(path: &str) -> String {
    format!("{}{}", MOCK_BASE, path)
}

/// Client over the mock transport and an in-memory store.
pub struct MockSetup {
    pub client: Arc<ApiClient>,
    pub http: MockHttpClient,
    pub store: InMemoryCredentials,
}

impl MockSetup {
    pub fn new(pair: Option<CredentialPair>) -> Self {
        let http = MockHttpClient::new();
        let store = InMemoryCredentials::new();
        store.set_pair(pair);

        let config = ClientConfig::new().with_base_url(MOCK_BASE);
        let client = ApiClient::new(&config, Arc::new(http.clone()), Arc::new(store.clone()));

        Self {
            client: Arc::new(client),
            http,
            store,
        }
    }
}
