//! HMAC-SHA256 authentication for the Bybit v5 API.
//!
//! Bybit signs POST requests with HMAC-SHA256 over:
//! timestamp + api_key + recv_window + body
//! and sends the lowercase hex digest in the `X-BAPI-SIGN` header.
//!
//! # Security
//!
//! - Credentials are loaded from environment variables
//! - The API secret is NEVER logged
//! - Secrets are zeroized on drop
//!
//! # Example
//!
//! ```ignore
//! use alert_bridge_bybit::auth::{BybitAuth, BybitAuthConfig};
//!
//! let auth = BybitAuth::from_env(&BybitAuthConfig::default())?;
//! let headers = auth.sign_request(r#"{"category":"linear","symbol":"BTCUSDT"}"#)?;
//! ```

use crate::error::{BybitError, Result};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};
use zeroize::Zeroize;

type HmacSha256 = Hmac<Sha256>;

/// Receive window sent with every signed request, in milliseconds.
///
/// Bybit drops requests whose timestamp has drifted outside this window.
pub const RECV_WINDOW: &str = "5000";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for Bybit authentication.
#[derive(Debug, Clone)]
pub struct BybitAuthConfig {
    /// Environment variable name for the API key.
    pub api_key_env: String,

    /// Environment variable name for the API secret.
    pub api_secret_env: String,
}

impl Default for BybitAuthConfig {
    fn default() -> Self {
        Self {
            api_key_env: "BYBIT_API_KEY".to_string(),
            api_secret_env: "BYBIT_SECRET_KEY".to_string(),
        }
    }
}

impl BybitAuthConfig {
    /// Sets custom environment variable names.
    #[must_use]
    pub fn with_env_vars(
        mut self,
        api_key_env: impl Into<String>,
        api_secret_env: impl Into<String>,
    ) -> Self {
        self.api_key_env = api_key_env.into();
        self.api_secret_env = api_secret_env.into();
        self
    }
}

// =============================================================================
// Signed Headers
// =============================================================================

/// Headers required for authenticated Bybit API requests.
#[derive(Debug, Clone)]
pub struct SignedHeaders {
    /// X-BAPI-API-KEY header.
    pub api_key: String,

    /// X-BAPI-TIMESTAMP header (Unix timestamp in milliseconds).
    pub timestamp: String,

    /// X-BAPI-RECV-WINDOW header.
    pub recv_window: String,

    /// X-BAPI-SIGN header (lowercase hex).
    pub signature: String,
}

impl SignedHeaders {
    /// Returns headers as tuples for reqwest.
    #[must_use]
    pub fn as_tuples(&self) -> [(&'static str, &str); 4] {
        [
            ("X-BAPI-API-KEY", &self.api_key),
            ("X-BAPI-TIMESTAMP", &self.timestamp),
            ("X-BAPI-RECV-WINDOW", &self.recv_window),
            ("X-BAPI-SIGN", &self.signature),
        ]
    }
}

// =============================================================================
// BybitAuth
// =============================================================================

/// HMAC-SHA256 authenticator for the Bybit API.
///
/// Handles signing of API requests. The API secret is stored as a
/// [`SecretString`] and never appears in debug output.
pub struct BybitAuth {
    /// API key.
    api_key: String,

    /// API secret used as the HMAC key.
    api_secret: SecretString,
}

impl std::fmt::Debug for BybitAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BybitAuth")
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .finish()
    }
}

impl Drop for BybitAuth {
    fn drop(&mut self) {
        // SecretString zeroizes itself; the key is wiped here.
        self.api_key.zeroize();
    }
}

impl BybitAuth {
    /// Creates a new authenticator from an API key and secret.
    #[must_use]
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: SecretString::from(api_secret.into()),
        }
    }

    /// Creates a new authenticator from environment variables.
    ///
    /// # Arguments
    /// * `config` - Configuration specifying environment variable names
    ///
    /// # Errors
    /// Returns error if either environment variable is missing.
    pub fn from_env(config: &BybitAuthConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            BybitError::Configuration(format!(
                "missing environment variable: {}",
                config.api_key_env
            ))
        })?;

        let api_secret = std::env::var(&config.api_secret_env).map_err(|_| {
            BybitError::Configuration(format!(
                "missing environment variable: {}",
                config.api_secret_env
            ))
        })?;

        Ok(Self::new(api_key, api_secret))
    }

    /// Returns the API key.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Signs a request body and returns the required headers.
    ///
    /// # Arguments
    /// * `body` - Serialized JSON request body (the exact bytes to be sent)
    ///
    /// # Errors
    /// Returns error if signing fails.
    pub fn sign_request(&self, body: &str) -> Result<SignedHeaders> {
        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| BybitError::Signing(format!("failed to get timestamp: {e}")))?
            .as_millis();

        self.sign_request_with_timestamp(body, timestamp_ms as u64)
    }

    /// Signs a request body with a specific timestamp (useful for testing).
    ///
    /// # Arguments
    /// * `body` - Serialized JSON request body
    /// * `timestamp_ms` - Unix timestamp in milliseconds
    ///
    /// # Errors
    /// Returns error if the HMAC cannot be initialized.
    pub fn sign_request_with_timestamp(
        &self,
        body: &str,
        timestamp_ms: u64,
    ) -> Result<SignedHeaders> {
        // Build the message to sign: timestamp + api_key + recv_window + body
        let timestamp = timestamp_ms.to_string();
        let message = format!("{}{}{}{}", timestamp, self.api_key, RECV_WINDOW, body);

        let mut mac = HmacSha256::new_from_slice(self.api_secret.expose_secret().as_bytes())
            .map_err(|e| BybitError::Signing(format!("failed to initialize HMAC: {e}")))?;
        mac.update(message.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());

        Ok(SignedHeaders {
            api_key: self.api_key.clone(),
            timestamp,
            recv_window: RECV_WINDOW.to_string(),
            signature,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
