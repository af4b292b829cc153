//! File-based credential store adapter.
//!
//! Wraps [`CredentialsManager`] and implements [`CredentialStore`], turning
//! read and clear failures into log lines so the request path never sees them.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::auth::credentials::{CredentialPair, CredentialsManager};
use crate::traits::{CredentialStore, CredentialsError};

/// File-based credential store.
///
/// # Example
///
/// ```ignore
/// use realit::adapters::FileCredentialStore;
/// use realit::traits::CredentialStore;
///
/// let store = FileCredentialStore::new()?;
/// if store.load().await.is_none() {
///     println!("Not signed in");
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    manager: CredentialsManager,
}

impl FileCredentialStore {
    /// Create a store at the default location in the home directory.
    pub fn new() -> Result<Self, CredentialsError> {
        CredentialsManager::new()
            .map(|manager| Self { manager })
            .ok_or_else(|| {
                CredentialsError::Other("Failed to determine home directory".to_string())
            })
    }

    /// Create a store backed by an explicit file.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            manager: CredentialsManager::with_path(path),
        }
    }

    pub fn manager(&self) -> &CredentialsManager {
        &self.manager
    }

    pub fn credentials_path(&self) -> &Path {
        self.manager.credentials_path()
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn load(&self) -> Option<CredentialPair> {
        match self.manager.load() {
            Ok(pair) => pair,
            Err(e) => {
                warn!("Treating unreadable credentials as signed out: {}", e);
                None
            }
        }
    }

    async fn set(&self, pair: &CredentialPair) -> Result<(), CredentialsError> {
        self.manager.save(pair)
    }

    async fn clear(&self) {
        if let Err(e) = self.manager.clear() {
            warn!("Failed to clear stored credentials: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::credentials::CredentialKind;
    use tempfile::TempDir;

    fn store_in(temp_dir: &TempDir) -> FileCredentialStore {
        FileCredentialStore::with_path(temp_dir.path().join("credentials.json"))
    }

    #[test]
    fn test_credentials_path() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        assert!(store.credentials_path().ends_with("credentials.json"));
    }

    #[tokio::test]
    async fn test_set_get_clear() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        assert!(store.load().await.is_none());
        assert!(store.get(CredentialKind::Access).await.is_none());

        store.set(&CredentialPair::new("tok", "ref")).await.unwrap();
        assert_eq!(store.get(CredentialKind::Access).await.as_deref(), Some("tok"));
        assert_eq!(store.get(CredentialKind::Refresh).await.as_deref(), Some("ref"));

        store.clear().await;
        assert!(store.load().await.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_file_reads_as_absent() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        std::fs::write(store.credentials_path(), "{ broken").unwrap();

        assert!(store.load().await.is_none());
        assert!(store.get(CredentialKind::Refresh).await.is_none());
    }

    #[tokio::test]
    async fn test_set_into_unwritable_location_fails() {
        let temp_dir = TempDir::new().unwrap();
        // A regular file where the parent directory should be.
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        let store = FileCredentialStore::with_path(blocker.join("credentials.json"));

        let result = store.set(&CredentialPair::new("a", "r")).await;
        assert!(matches!(result, Err(CredentialsError::SaveFailed(_))));
    }

    #[tokio::test]
    async fn test_clear_never_fails() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        store.clear().await;
        store.clear().await;
    }
}
