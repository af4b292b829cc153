//! Prelude module for convenient imports.
//!
//! # Usage
//!
//! ```ignore
//! use realit::prelude::*;
//! ```
//!
//! This will import:
//! - The client and its configuration (ApiClient, ClientConfig, ApiRequest)
//! - Credential types (CredentialPair, CredentialStore)
//! - Session events and refresh phases
//! - Error types (ApiError, ApiResult)
//! - The typed services

pub use crate::api::{ApiClient, ApiRequest};
pub use crate::auth::{CredentialKind, CredentialPair, RefreshPhase, SessionEvent};
pub use crate::config::ClientConfig;
pub use crate::error::{ApiError, ApiResult, ErrorCategory};
pub use crate::services::Services;
pub use crate::traits::{CredentialStore, HttpClient};
