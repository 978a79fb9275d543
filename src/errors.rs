// ABOUTME: Error types for Garmin Connect transport, authentication, and data access
// ABOUTME: Maps HTTP status codes to domain errors and carries SSO login failure reasons
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Garmin Connect Error Types
//!
//! Every fallible operation in this crate returns [`GarminResult`]. The three
//! domain kinds callers branch on are:
//!
//! - [`GarminError::RateLimitExceeded`] - HTTP 429 from either host
//! - [`GarminError::AuthenticationFailed`] - HTTP 401, or the SSO flow could not
//!   find the markers it needs (CSRF token, service ticket, profile blocks)
//! - [`GarminError::ConnectionFailed`] - HTTP 403 (carrying the URL), any other
//!   non-success status, or a network-level failure
//!
//! Status mapping happens once, in [`crate::http::endpoint::EndpointClient`].

use reqwest::StatusCode;

/// Result alias used across the crate
pub type GarminResult<T> = Result<T, GarminError>;

/// Why an authentication attempt (or an authenticated call) was rejected
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum AuthFailure {
    /// The server answered 401
    #[error("server rejected the session (401)")]
    Unauthorized,

    /// Sign-in page did not contain the `_csrf` input field
    #[error("CSRF token not found on sign-in page (status {status})")]
    MissingCsrfToken {
        /// HTTP status of the sign-in page response
        status: u16,
    },

    /// Credential POST response did not contain a `?ticket=` link
    #[error("service ticket not found in login response (status {status})")]
    MissingServiceTicket {
        /// HTTP status of the credential POST response
        status: u16,
    },

    /// An embedded profile block was absent from the application page
    #[error("embedded JSON block '{key}' not found")]
    MissingProfileBlock {
        /// Name of the JavaScript variable that was searched for
        key: &'static str,
    },

    /// An embedded profile block was present but not valid JSON
    #[error("embedded JSON block '{key}' could not be decoded")]
    MalformedProfileBlock {
        /// Name of the JavaScript variable
        key: &'static str,
        /// Underlying decode error
        #[source]
        source: serde_json::Error,
    },

    /// An embedded profile block decoded but lacked a required field
    #[error("embedded JSON block '{key}' has no string field '{field}'")]
    MissingProfileField {
        /// Name of the JavaScript variable
        key: &'static str,
        /// Field that was expected
        field: &'static str,
    },

    /// Summary endpoint flagged the data as privacy protected
    #[error("user summary is privacy protected")]
    PrivacyProtected,

    /// A call needing the display name was made before `login()`
    #[error("not logged in")]
    NotLoggedIn,
}

/// Underlying cause of a [`GarminError::ConnectionFailed`]
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ConnectionFailure {
    /// The server answered 403
    #[error("Forbidden url: {url}")]
    Forbidden {
        /// Requested URL
        url: String,
    },

    /// Any other non-success status
    #[error("HTTP {status} for url: {url}")]
    HttpStatus {
        /// Response status
        status: StatusCode,
        /// Requested URL
        url: String,
    },

    /// The request never produced a response (DNS, TLS, timeout, redirect loop)
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),
}

/// Errors returned by the Garmin Connect client
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum GarminError {
    /// Too many requests (HTTP 429)
    #[error("Too many requests: {url}")]
    RateLimitExceeded {
        /// Requested URL
        url: String,
    },

    /// Authentication failed or the session is not authorised
    #[error("Authentication error: {0}")]
    AuthenticationFailed(#[source] AuthFailure),

    /// Communication ended in error
    #[error("Connection error: {0}")]
    ConnectionFailed(#[source] ConnectionFailure),

    /// A success response whose body is not the expected JSON
    #[error("Invalid response body for {context}")]
    InvalidResponse {
        /// What was being decoded
        context: String,
        /// Underlying decode error
        #[source]
        source: serde_json::Error,
    },

    /// JSON decoded but is missing a structural element the caller needs
    #[error("Unexpected response shape: {context}")]
    UnexpectedShape {
        /// Description of what was expected
        context: String,
    },

    /// A persisted session blob could not be encoded or decoded
    #[error("Session data error: {0}")]
    Session(#[source] serde_json::Error),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl GarminError {
    /// Create an unexpected-shape error
    #[must_use]
    pub fn unexpected_shape(context: impl Into<String>) -> Self {
        Self::UnexpectedShape {
            context: context.into(),
        }
    }

    /// Map a non-success status to its domain error
    ///
    /// 429, 401 and 403 get dedicated kinds; everything else becomes
    /// [`ConnectionFailure::HttpStatus`].
    #[must_use]
    pub fn from_status(status: StatusCode, url: &str) -> Self {
        match status {
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimitExceeded {
                url: url.to_owned(),
            },
            StatusCode::UNAUTHORIZED => Self::AuthenticationFailed(AuthFailure::Unauthorized),
            StatusCode::FORBIDDEN => Self::ConnectionFailed(ConnectionFailure::Forbidden {
                url: url.to_owned(),
            }),
            other => Self::ConnectionFailed(ConnectionFailure::HttpStatus {
                status: other,
                url: url.to_owned(),
            }),
        }
    }

    /// True for HTTP 429
    #[must_use]
    pub const fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimitExceeded { .. })
    }

    /// True for any authentication-class failure
    #[must_use]
    pub const fn is_auth_failure(&self) -> bool {
        matches!(self, Self::AuthenticationFailed(_))
    }

    /// URL carried by a 403 failure, if this is one
    #[must_use]
    pub fn forbidden_url(&self) -> Option<&str> {
        match self {
            Self::ConnectionFailed(ConnectionFailure::Forbidden { url }) => Some(url),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GarminError {
    fn from(error: reqwest::Error) -> Self {
        Self::ConnectionFailed(ConnectionFailure::Transport(error))
    }
}

impl From<AuthFailure> for GarminError {
    fn from(reason: AuthFailure) -> Self {
        Self::AuthenticationFailed(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let url = "https://connect.garmin.com/modern/proxy/x";

        assert!(GarminError::from_status(StatusCode::TOO_MANY_REQUESTS, url).is_rate_limited());
        assert!(matches!(
            GarminError::from_status(StatusCode::UNAUTHORIZED, url),
            GarminError::AuthenticationFailed(AuthFailure::Unauthorized)
        ));
        assert_eq!(
            GarminError::from_status(StatusCode::FORBIDDEN, url).forbidden_url(),
            Some(url)
        );
        assert!(matches!(
            GarminError::from_status(StatusCode::BAD_GATEWAY, url),
            GarminError::ConnectionFailed(ConnectionFailure::HttpStatus { status, .. })
                if status == StatusCode::BAD_GATEWAY
        ));
    }

    #[test]
    fn test_forbidden_message_names_url() {
        let error = GarminError::from_status(StatusCode::FORBIDDEN, "https://example.test/a");
        assert_eq!(
            error.to_string(),
            "Connection error: Forbidden url: https://example.test/a"
        );
    }
}
