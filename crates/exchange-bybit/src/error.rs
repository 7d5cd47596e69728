//! Error types for Bybit exchange integration.
//!
//! Provides typed errors for configuration, signing, API communication,
//! and response parsing failures. An order the exchange rejects is not an
//! error here: rejection is a verdict carried by
//! [`OrderOutcome`](crate::types::OrderOutcome).

use thiserror::Error;

/// Errors that can occur when interacting with Bybit.
#[derive(Debug, Error)]
pub enum BybitError {
    /// Configuration error (missing credentials, bad client setup).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// HMAC signing error.
    #[error("signing error: {0}")]
    Signing(String),

    /// API request failed with a non-success HTTP status and an
    /// unrecognizable body.
    #[error("API error: {status_code} - {message}")]
    Api {
        /// HTTP status code.
        status_code: u16,
        /// Error message from API.
        message: String,
    },

    /// Network error.
    #[error("network error: {0}")]
    Network(String),

    /// Request timeout.
    #[error("request timeout: {0}")]
    Timeout(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Response parsed as JSON but is missing required fields.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl BybitError {
    /// Creates an API error from status code and message.
    pub fn api(status_code: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status_code,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for BybitError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::Network(format!("connection failed: {err}"))
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for BybitError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for Bybit operations.
pub type Result<T> = std::result::Result<T, BybitError>;

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Error Construction Tests ====================

    #[test]
    fn test_api_error_construction() {
        let err = BybitError::api(502, "bad gateway");
        assert!(matches!(
            err,
            BybitError::Api {
                status_code: 502,
                ..
            }
        ));
        assert!(err.to_string().contains("502"));
        assert!(err.to_string().contains("bad gateway"));
    }

    #[test]
    fn test_serde_error_conversion() {
        let parse_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: BybitError = parse_err.into();
        assert!(matches!(err, BybitError::Serialization(_)));
    }

    // ==================== Error Display Tests ====================

    #[test]
    fn test_error_display_configuration() {
        let err = BybitError::Configuration("missing BYBIT_API_KEY".to_string());
        let display = err.to_string();
        assert!(display.contains("configuration"));
        assert!(display.contains("BYBIT_API_KEY"));
    }

    #[test]
    fn test_error_display_signing() {
        let err = BybitError::Signing("failed to initialize HMAC".to_string());
        assert!(err.to_string().contains("signing"));
    }

    #[test]
    fn test_error_display_malformed_response() {
        let err = BybitError::MalformedResponse("accepted order missing orderId".to_string());
        let display = err.to_string();
        assert!(display.contains("malformed"));
        assert!(display.contains("orderId"));
    }

    #[test]
    fn test_error_display_network() {
        let err = BybitError::Network("connection failed: refused".to_string());
        assert!(err.to_string().contains("network"));
    }

    #[test]
    fn test_error_display_timeout() {
        let err = BybitError::Timeout("deadline elapsed".to_string());
        assert!(err.to_string().contains("timeout"));
    }
}
