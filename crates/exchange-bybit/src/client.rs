//! Bybit v5 REST API client.
//!
//! Provides order submission against Bybit's testnet with HMAC-SHA256
//! request signing. The body is serialized exactly once; the same bytes
//! are signed and sent.
//!
//! # Example
//!
//! ```ignore
//! use alert_bridge_bybit::{BybitClient, BybitClientConfig, OrderRequest};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = BybitClient::from_env(BybitClientConfig::default())?;
//!
//!     let order = OrderRequest::market("BTCUSDT", "Buy", "0.001");
//!     let outcome = client.place_order(&order).await?;
//!     println!("accepted: {}", outcome.is_accepted());
//!
//!     Ok(())
//! }
//! ```

use crate::auth::{BybitAuth, BybitAuthConfig};
use crate::error::{BybitError, Result};
use crate::types::{BybitApiResponse, OrderOutcome, OrderRequest};
use reqwest::Client;

// =============================================================================
// Constants
// =============================================================================

/// Bybit testnet API base URL.
pub const BYBIT_TESTNET_URL: &str = "https://api-testnet.bybit.com";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the Bybit client.
#[derive(Debug, Clone)]
pub struct BybitClientConfig {
    /// Base URL for the API.
    pub base_url: String,

    /// Authentication configuration.
    pub auth_config: BybitAuthConfig,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for BybitClientConfig {
    fn default() -> Self {
        Self {
            base_url: BYBIT_TESTNET_URL.to_string(),
            auth_config: BybitAuthConfig::default(),
            timeout_secs: 30,
        }
    }
}

impl BybitClientConfig {
    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the authentication configuration.
    #[must_use]
    pub fn with_auth_config(mut self, config: BybitAuthConfig) -> Self {
        self.auth_config = config;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

// =============================================================================
// BybitClient
// =============================================================================

/// Bybit REST API client.
///
/// Credentials are resolved once at construction and injected; a client
/// without credentials still constructs, but every order attempt fails
/// with a configuration error.
pub struct BybitClient {
    /// Configuration.
    config: BybitClientConfig,

    /// HTTP client.
    http: Client,

    /// Authentication handler, when credentials are available.
    auth: Option<BybitAuth>,
}

impl std::fmt::Debug for BybitClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BybitClient")
            .field("base_url", &self.config.base_url)
            .field("has_credentials", &self.auth.is_some())
            .finish_non_exhaustive()
    }
}

impl BybitClient {
    /// Creates a new client with explicitly provided credentials.
    ///
    /// # Arguments
    /// * `config` - Client configuration
    /// * `auth` - Credentials, or `None` to construct an unconfigured client
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: BybitClientConfig, auth: Option<BybitAuth>) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BybitError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, http, auth })
    }

    /// Creates a new client, resolving credentials from the environment.
    ///
    /// Missing credentials are not fatal: the client constructs without
    /// them and rejects order attempts until they are provided. This keeps
    /// the bridge bootable for status checks on a fresh deployment.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn from_env(config: BybitClientConfig) -> Result<Self> {
        let auth = match BybitAuth::from_env(&config.auth_config) {
            Ok(auth) => Some(auth),
            Err(err) => {
                tracing::warn!("Bybit credentials unavailable: {err}; order routing disabled");
                None
            }
        };

        Self::new(config, auth)
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Returns true if credentials are configured.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.auth.is_some()
    }

    /// Sets a custom base URL (useful for testing).
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Submits a signed order to `POST /v5/order/create`.
    ///
    /// Returns an [`OrderOutcome`] verdict for any response that carries a
    /// Bybit envelope, whether accepted or rejected. Errors are reserved
    /// for failures before or below the exchange: missing credentials,
    /// signing, transport, and unrecognizable responses.
    ///
    /// # Errors
    /// Returns error if credentials are missing, signing fails, the
    /// request cannot be delivered, or the response cannot be parsed.
    pub async fn place_order(&self, order: &OrderRequest) -> Result<OrderOutcome> {
        let auth = self.auth.as_ref().ok_or_else(|| {
            BybitError::Configuration(format!(
                "missing Bybit credentials: set {} and {}",
                self.config.auth_config.api_key_env, self.config.auth_config.api_secret_env
            ))
        })?;

        let url = format!("{}/v5/order/create", self.config.base_url);
        let body_json = serde_json::to_string(order)?;
        let headers = auth.sign_request(&body_json)?;

        tracing::debug!("POST {} body_len={}", url, body_json.len());

        let mut request = self
            .http
            .post(&url)
            .header("Content-Type", "application/json");
        for (name, value) in headers.as_tuples() {
            request = request.header(name, value);
        }

        let response = request.body(body_json).send().await?;
        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(status = %status, "Bybit response: {body}");

        let outcome = Self::parse_order_response(status, &body)?;
        match &outcome {
            OrderOutcome::Accepted { order_id, .. } => {
                tracing::info!(order_id = %order_id, symbol = %order.symbol, "Bybit accepted order");
            }
            OrderOutcome::Rejected { ret_code, ret_msg, .. } => {
                tracing::warn!(ret_code, ret_msg = %ret_msg, symbol = %order.symbol, "Bybit rejected order");
            }
        }

        Ok(outcome)
    }

    /// Maps an HTTP response to an order verdict.
    ///
    /// Any body carrying a `retCode` is a verdict, regardless of HTTP
    /// status. A body that is not a Bybit envelope becomes an error: an
    /// API error when the status was already a failure, a parse error
    /// otherwise.
    fn parse_order_response(status: reqwest::StatusCode, body: &str) -> Result<OrderOutcome> {
        let raw: serde_json::Value = match serde_json::from_str(body) {
            Ok(value) => value,
            Err(err) => {
                if !status.is_success() {
                    return Err(BybitError::api(status.as_u16(), body.to_string()));
                }
                return Err(err.into());
            }
        };

        let parsed: BybitApiResponse = serde_json::from_value(raw.clone())?;

        if parsed.ret_code == 0 {
            let order_id = parsed
                .result
                .and_then(|r| r.order_id)
                .ok_or_else(|| {
                    BybitError::MalformedResponse("accepted order missing orderId".to_string())
                })?;

            Ok(OrderOutcome::Accepted { order_id, raw })
        } else {
            Ok(OrderOutcome::Rejected {
                ret_code: parsed.ret_code,
                ret_msg: parsed.ret_msg,
                raw,
            })
        }
    }
}
