//! Refresh exchange failures.

use std::fmt;

use super::network::NetworkError;

/// Why a refresh exchange did not produce a new credential pair.
///
/// Every variant ends the session: the caller sees
/// [`ApiError::AuthenticationExpired`](super::ApiError::AuthenticationExpired).
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshFailure {
    /// No refresh credential was stored, so no exchange was attempted.
    MissingRefreshCredential,

    /// The refresh endpoint could not be reached.
    Transport(NetworkError),

    /// The refresh endpoint answered with a non-2xx status.
    Rejected { status: u16, message: String },

    /// A 2xx answer without a usable `{access_token, refresh_token}` pair.
    MalformedResponse { message: String },

    /// The exchange task ended without reporting a result.
    Interrupted,
}

impl RefreshFailure {
    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            RefreshFailure::MissingRefreshCredential => "E_AUTH_NO_REFRESH",
            RefreshFailure::Transport(_) => "E_AUTH_REFRESH_NET",
            RefreshFailure::Rejected { .. } => "E_AUTH_REFRESH_INV",
            RefreshFailure::MalformedResponse { .. } => "E_AUTH_REFRESH_BODY",
            RefreshFailure::Interrupted => "E_AUTH_REFRESH_ABORT",
        }
    }
}

impl fmt::Display for RefreshFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshFailure::MissingRefreshCredential => write!(f, "no refresh token stored"),
            RefreshFailure::Transport(err) => write!(f, "refresh request failed: {}", err),
            RefreshFailure::Rejected { status, message } => {
                write!(f, "refresh rejected with HTTP {}: {}", status, message)
            }
            RefreshFailure::MalformedResponse { message } => {
                write!(f, "malformed refresh response: {}", message)
            }
            RefreshFailure::Interrupted => write!(f, "refresh exchange was interrupted"),
        }
    }
}

impl std::error::Error for RefreshFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RefreshFailure::Transport(err) => Some(err),
            _ => None,
        }
    }
}
