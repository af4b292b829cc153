//! In-memory credential store for testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::auth::credentials::CredentialPair;
use crate::traits::{CredentialStore, CredentialsError};

/// In-memory credential store for testing.
///
/// Clones share the same storage, so a test can keep one handle for
/// assertions while the client under test owns another.
///
/// # Example
///
/// ```ignore
/// use realit::adapters::mock::InMemoryCredentials;
/// use realit::auth::CredentialPair;
///
/// let store = InMemoryCredentials::with_pair(CredentialPair::new("expired", "ref1"));
/// // ... exercise the client ...
/// assert_eq!(store.clear_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentials {
    pair: Arc<Mutex<Option<CredentialPair>>>,
    save_should_fail: Arc<AtomicBool>,
    load_should_fail: Arc<AtomicBool>,
    save_count: Arc<AtomicUsize>,
    clear_count: Arc<AtomicUsize>,
}

impl InMemoryCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding an initial pair.
    pub fn with_pair(pair: CredentialPair) -> Self {
        let store = Self::default();
        store.set_pair(Some(pair));
        store
    }

    /// Make every `set` fail with [`CredentialsError::SaveFailed`].
    pub fn set_save_should_fail(&self, should_fail: bool) {
        self.save_should_fail.store(should_fail, Ordering::SeqCst);
    }

    /// Make every read behave like unreadable storage.
    pub fn set_load_should_fail(&self, should_fail: bool) {
        self.load_should_fail.store(should_fail, Ordering::SeqCst);
    }

    /// Current pair, bypassing failure injection.
    pub fn pair(&self) -> Option<CredentialPair> {
        self.pair.lock().unwrap().clone()
    }

    pub fn set_pair(&self, pair: Option<CredentialPair>) {
        *self.pair.lock().unwrap() = pair;
    }

    /// Number of successful `set` calls.
    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }

    /// Number of `clear` calls.
    pub fn clear_count(&self) -> usize {
        self.clear_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentials {
    async fn load(&self) -> Option<CredentialPair> {
        if self.load_should_fail.load(Ordering::SeqCst) {
            tracing::warn!("Mock load failure");
            return None;
        }
        self.pair()
    }

    async fn set(&self, pair: &CredentialPair) -> Result<(), CredentialsError> {
        if self.save_should_fail.load(Ordering::SeqCst) {
            return Err(CredentialsError::SaveFailed("Mock save failure".to_string()));
        }
        self.set_pair(Some(pair.clone()));
        self.save_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn clear(&self) {
        self.set_pair(None);
        self.clear_count.fetch_add(1, Ordering::SeqCst);
    }
}
