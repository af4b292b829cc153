//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP transport
//! - [`CredentialStore`] - Credential pair persistence

pub mod credentials;
pub mod http;

pub use credentials::{CredentialStore, CredentialsError};
pub use http::{Headers, HttpClient, HttpError, HttpRequest, Method, Response};
