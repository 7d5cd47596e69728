//! Bybit exchange integration for the TradingView alert bridge.
//!
//! This crate provides:
//! - REST client for Bybit's v5 order API (testnet by default)
//! - HMAC-SHA256 authentication for API requests
//! - Data models for order requests and response envelopes
//!
//! # Example
//!
//! ```ignore
//! use alert_bridge_bybit::{BybitClient, BybitClientConfig, OrderOutcome, OrderRequest};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Credentials come from BYBIT_API_KEY / BYBIT_SECRET_KEY
//!     let client = BybitClient::from_env(BybitClientConfig::default())?;
//!
//!     let order = OrderRequest::market("BTCUSDT", "Buy", "0.001");
//!     match client.place_order(&order).await? {
//!         OrderOutcome::Accepted { order_id, .. } => println!("placed {order_id}"),
//!         OrderOutcome::Rejected { ret_msg, .. } => println!("rejected: {ret_msg}"),
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Authentication
//!
//! Bybit signs requests with HMAC-SHA256 over
//! `timestamp + api_key + recv_window + body`, hex-encoded into the
//! `X-BAPI-SIGN` header. Set the following environment variables:
//!
//! - `BYBIT_API_KEY`: Your API key
//! - `BYBIT_SECRET_KEY`: Your API secret

pub mod auth;
pub mod client;
pub mod error;
pub mod types;

// Re-export main types for convenience
pub use auth::{BybitAuth, BybitAuthConfig, SignedHeaders, RECV_WINDOW};
pub use client::{BybitClient, BybitClientConfig, BYBIT_TESTNET_URL};
pub use error::{BybitError, Result};
pub use types::{BybitApiResponse, OrderOutcome, OrderRequest, OrderResult};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api_exports() {
        let _ = BybitAuthConfig::default();
        let _ = BybitClientConfig::default();
    }

    #[test]
    fn test_error_types_accessible() {
        let err = BybitError::api(400, "bad request");
        assert!(err.to_string().contains("400"));
    }

    #[test]
    fn test_types_accessible() {
        let order = OrderRequest::market("BTCUSDT", "Buy", "0.001");
        assert_eq!(order.category, "linear");
        assert_eq!(order.order_type, "Market");
    }

    #[test]
    fn test_constants_accessible() {
        assert!(BYBIT_TESTNET_URL.starts_with("https://"));
        assert_eq!(RECV_WINDOW, "5000");
    }
}
