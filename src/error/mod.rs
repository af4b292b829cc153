//! Error handling for the API client.
//!
//! | Error | Raised when | Retried by the client |
//! |-------|-------------|-----------------------|
//! | [`ApiError::Network`] | no response (timeout, DNS, reset) | no |
//! | first 401 | access token rejected | refresh + one replay |
//! | [`ApiError::AuthorizationFailure`] | replay rejected with 401 | no |
//! | [`ApiError::AuthenticationExpired`] | refresh exchange failed | no, session cleared |
//! | [`ApiError::Status`] | other non-2xx | no |
//!
//! Credential persistence failures on the request path are logged and
//! otherwise ignored; they only surface as [`ApiError::Persistence`] from
//! explicit sign-in calls.

mod api_error;
mod auth;
mod category;
mod network;

pub use api_error::ApiError;
pub use auth::RefreshFailure;
pub use category::ErrorCategory;
pub use network::NetworkError;

/// Result alias for API client operations.
pub type ApiResult<T> = Result<T, ApiError>;
