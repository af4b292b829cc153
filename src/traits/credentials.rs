//! Credential store trait abstraction.
//!
//! The store persists one [`CredentialPair`] at a time. Reads never fail from
//! the caller's point of view: a store that cannot be read is treated as
//! holding no credentials.

use async_trait::async_trait;
use std::fmt;

use crate::auth::credentials::{CredentialKind, CredentialPair};

/// Credential persistence errors.
#[derive(Debug, Clone)]
pub enum CredentialsError {
    /// Failed to load credentials
    LoadFailed(String),
    /// Failed to save credentials
    SaveFailed(String),
    /// Failed to clear credentials
    ClearFailed(String),
    /// IO error
    Io(String),
    /// Serialization/deserialization error
    Serialization(String),
    /// Other error
    Other(String),
}

impl fmt::Display for CredentialsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialsError::LoadFailed(msg) => write!(f, "Failed to load credentials: {}", msg),
            CredentialsError::SaveFailed(msg) => write!(f, "Failed to save credentials: {}", msg),
            CredentialsError::ClearFailed(msg) => {
                write!(f, "Failed to clear credentials: {}", msg)
            }
            CredentialsError::Io(msg) => write!(f, "IO error: {}", msg),
            CredentialsError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            CredentialsError::Other(msg) => write!(f, "Credentials error: {}", msg),
        }
    }
}

impl std::error::Error for CredentialsError {}

impl From<std::io::Error> for CredentialsError {
    fn from(e: std::io::Error) -> Self {
        CredentialsError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for CredentialsError {
    fn from(e: serde_json::Error) -> Self {
        CredentialsError::Serialization(e.to_string())
    }
}

/// Trait for credential storage.
///
/// # Example
///
/// ```ignore
/// use realit::traits::CredentialStore;
/// use realit::auth::{CredentialKind, CredentialPair};
///
/// async fn rotate<S: CredentialStore>(store: &S) -> Result<(), CredentialsError> {
///     if store.get(CredentialKind::Refresh).await.is_none() {
///         return Ok(());
///     }
///     store.set(&CredentialPair::new("access-2", "refresh-2")).await
/// }
/// ```
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Load the stored pair, or `None` when nothing (or only half a pair) is
    /// stored or the backing storage cannot be read.
    async fn load(&self) -> Option<CredentialPair>;

    /// Read one half of the stored pair.
    async fn get(&self, kind: CredentialKind) -> Option<String> {
        self.load().await.map(|pair| pair.get(kind).to_string())
    }

    /// Replace the stored pair.
    async fn set(&self, pair: &CredentialPair) -> Result<(), CredentialsError>;

    /// Remove any stored pair. Best effort: failures are logged, not returned.
    async fn clear(&self);
}
