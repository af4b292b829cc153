//! The error type returned by every [`ApiClient`](crate::api::ApiClient) call.

use thiserror::Error;

use super::auth::RefreshFailure;
use super::category::ErrorCategory;
use super::network::NetworkError;
use crate::traits::{CredentialsError, Method};

/// Errors surfaced to callers of the API client.
///
/// A 401 is never surfaced on its own first occurrence: the client refreshes
/// and replays. Only the outcomes below reach the caller.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Transport failure. Not retried by the client.
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// A replayed request was rejected with 401 again.
    #[error("{method} {path} was rejected as unauthorized after a credential refresh")]
    AuthorizationFailure { method: Method, path: String },

    /// The refresh exchange failed; stored credentials have been cleared.
    #[error("session expired: {reason}")]
    AuthenticationExpired { reason: RefreshFailure },

    /// Any other non-2xx response.
    #[error("server returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// Credentials could not be persisted after an explicit sign-in.
    #[error(transparent)]
    Persistence(#[from] CredentialsError),
}

impl ApiError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ApiError::Network(_) => ErrorCategory::Network,
            ApiError::AuthorizationFailure { .. } | ApiError::AuthenticationExpired { .. } => {
                ErrorCategory::Auth
            }
            ApiError::Status { status, .. } if *status >= 500 => ErrorCategory::Server,
            ApiError::Status { .. } => ErrorCategory::Client,
            ApiError::Decode(_) => ErrorCategory::Server,
            ApiError::Persistence(_) => ErrorCategory::System,
        }
    }

    /// Whether the caller may retry the same request later.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Network(err) => err.is_retryable(),
            ApiError::Status { status, .. } => *status >= 500 || *status == 429 || *status == 408,
            _ => false,
        }
    }

    /// Whether the host should send the user back to sign-in.
    pub fn requires_reauth(&self) -> bool {
        matches!(self, ApiError::AuthenticationExpired { .. })
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Network(err) => err.error_code(),
            ApiError::AuthorizationFailure { .. } => "E_AUTH_UNAUTHORIZED",
            ApiError::AuthenticationExpired { reason } => reason.error_code(),
            ApiError::Status { .. } => "E_HTTP_STATUS",
            ApiError::Decode(_) => "E_DECODE",
            ApiError::Persistence(_) => "E_CRED_SAVE",
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(err) => err.user_message(),
            ApiError::AuthorizationFailure { .. } => {
                "You don't have access to this. Please sign in again if this keeps happening."
                    .to_string()
            }
            ApiError::AuthenticationExpired { .. } => {
                "Your session has expired. Please sign in again.".to_string()
            }
            ApiError::Status { status, .. } => match *status {
                400 => "The request was invalid. Please try again.".to_string(),
                401 => "The server rejected your credentials.".to_string(),
                403 => "Access denied. You don't have permission for this action.".to_string(),
                404 => "The requested resource was not found.".to_string(),
                429 => "Too many requests. Please wait a moment and try again.".to_string(),
                500..=599 => {
                    "The server is experiencing issues. Please try again later.".to_string()
                }
                _ => format!("The server returned an error (HTTP {}).", status),
            },
            ApiError::Decode(_) => {
                "Received an unexpected response from the server.".to_string()
            }
            ApiError::Persistence(_) => {
                "Could not save your sign-in. Please check file permissions.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(
            ApiError::Network(NetworkError::Cancelled).category(),
            ErrorCategory::Network
        );
        assert_eq!(
            ApiError::AuthenticationExpired {
                reason: RefreshFailure::MissingRefreshCredential
            }
            .category(),
            ErrorCategory::Auth
        );
        assert_eq!(
            ApiError::Status {
                status: 503,
                message: String::new()
            }
            .category(),
            ErrorCategory::Server
        );
        assert_eq!(
            ApiError::Status {
                status: 404,
                message: String::new()
            }
            .category(),
            ErrorCategory::Client
        );
        assert_eq!(
            ApiError::Persistence(CredentialsError::SaveFailed("x".into())).category(),
            ErrorCategory::System
        );
    }

    #[test]
    fn test_requires_reauth_only_for_expired_session() {
        assert!(ApiError::AuthenticationExpired {
            reason: RefreshFailure::Interrupted
        }
        .requires_reauth());
        assert!(!ApiError::AuthorizationFailure {
            method: Method::Get,
            path: "/feed".into()
        }
        .requires_reauth());
        assert!(!ApiError::Status {
            status: 401,
            message: String::new()
        }
        .requires_reauth());
    }

    #[test]
    fn test_retryable() {
        assert!(ApiError::Status {
            status: 502,
            message: String::new()
        }
        .is_retryable());
        assert!(!ApiError::Status {
            status: 400,
            message: String::new()
        }
        .is_retryable());
        assert!(!ApiError::Decode("x".into()).is_retryable());
    }

    #[test]
    fn test_display() {
        let err = ApiError::AuthorizationFailure {
            method: Method::Patch,
            path: "/notifications/read".into(),
        };
        assert_eq!(
            err.to_string(),
            "PATCH /notifications/read was rejected as unauthorized after a credential refresh"
        );

        let expired = ApiError::AuthenticationExpired {
            reason: RefreshFailure::Rejected {
                status: 403,
                message: "nope".into(),
            },
        };
        assert!(expired.to_string().starts_with("session expired"));
        assert_eq!(expired.error_code(), "E_AUTH_REFRESH_INV");
    }

    #[test]
    fn test_user_messages_not_empty() {
        let errors = vec![
            ApiError::Network(NetworkError::Cancelled),
            ApiError::Decode("bad".into()),
            ApiError::Status {
                status: 418,
                message: String::new(),
            },
        ];
        for err in errors {
            assert!(!err.user_message().is_empty());
        }
    }
}
