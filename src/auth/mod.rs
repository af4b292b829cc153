//! Authentication module for the Realit client.
//!
//! This module provides authentication functionality including:
//! - Credential pair model and file storage
//! - Bearer authentication of outgoing requests
//! - Single-flight credential refresh
//! - Session invalidation events

pub mod authenticator;
pub mod credentials;
pub mod refresh;
pub mod session;

pub use authenticator::authenticate;
pub use credentials::{CredentialKind, CredentialPair, CredentialsManager};
pub use refresh::{RefreshCoordinator, RefreshOutcome, RefreshPhase};
pub use session::{SessionEvent, SessionInvalidator};
