//! Data models for Bybit exchange integration.
//!
//! Quantities stay strings end to end: Bybit's v5 order API takes `qty` as a
//! string, and re-encoding through a float would risk changing the digits
//! that were signed.

use serde::{Deserialize, Serialize};

/// Order request for `POST /v5/order/create`.
///
/// Field order matters: the serialized JSON is the exact byte string that
/// gets signed and sent, so the struct keeps Bybit's documented field order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    /// Product category ("linear" for USDT perpetuals).
    pub category: String,

    /// Instrument symbol (e.g., "BTCUSDT").
    pub symbol: String,

    /// Order side ("Buy" or "Sell").
    pub side: String,

    /// Order type ("Market").
    pub order_type: String,

    /// Order quantity in base units, as a string.
    pub qty: String,
}

impl OrderRequest {
    /// Creates a linear-category market order.
    #[must_use]
    pub fn market(
        symbol: impl Into<String>,
        side: impl Into<String>,
        qty: impl Into<String>,
    ) -> Self {
        Self {
            category: "linear".to_string(),
            symbol: symbol.into(),
            side: side.into(),
            order_type: "Market".to_string(),
            qty: qty.into(),
        }
    }
}

/// Response envelope returned by Bybit v5 endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BybitApiResponse {
    /// Bybit return code; 0 means the request was accepted.
    pub ret_code: i64,

    /// Human-readable return message ("OK" on success).
    #[serde(default)]
    pub ret_msg: String,

    /// Endpoint-specific result payload.
    #[serde(default)]
    pub result: Option<OrderResult>,
}

/// Result payload of a successful order creation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResult {
    /// Exchange-assigned order ID.
    #[serde(default)]
    pub order_id: Option<String>,

    /// Caller-assigned order link ID, if any.
    #[serde(default)]
    pub order_link_id: Option<String>,
}

/// Verdict of an order submission that reached the exchange.
///
/// Both variants carry the raw response body so callers can echo it back
/// verbatim.
#[derive(Debug, Clone)]
pub enum OrderOutcome {
    /// Bybit accepted the order (`retCode == 0`).
    Accepted {
        /// Exchange-assigned order ID.
        order_id: String,
        /// Full response body as received.
        raw: serde_json::Value,
    },

    /// Bybit rejected the order (`retCode != 0`).
    Rejected {
        /// Bybit return code.
        ret_code: i64,
        /// Bybit return message.
        ret_msg: String,
        /// Full response body as received.
        raw: serde_json::Value,
    },
}

impl OrderOutcome {
    /// Returns true if the exchange accepted the order.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    /// Returns the raw response body.
    #[must_use]
    pub fn raw(&self) -> &serde_json::Value {
        match self {
            Self::Accepted { raw, .. } | Self::Rejected { raw, .. } => raw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== OrderRequest Tests ====================

    #[test]
    fn test_market_order_fields() {
        let order = OrderRequest::market("BTCUSDT", "Buy", "0.001");
        assert_eq!(order.category, "linear");
        assert_eq!(order.symbol, "BTCUSDT");
        assert_eq!(order.side, "Buy");
        assert_eq!(order.order_type, "Market");
        assert_eq!(order.qty, "0.001");
    }

    #[test]
    fn test_market_order_serialized_field_order() {
        // The serialized string is what gets signed, so the exact bytes matter.
        let order = OrderRequest::market("BTCUSDT", "Sell", "0.5");
        let json = serde_json::to_string(&order).unwrap();
        assert_eq!(
            json,
            r#"{"category":"linear","symbol":"BTCUSDT","side":"Sell","orderType":"Market","qty":"0.5"}"#
        );
    }

    #[test]
    fn test_order_request_round_trip() {
        let order = OrderRequest::market("ETHUSDT", "Buy", "1");
        let json = serde_json::to_string(&order).unwrap();
        let back: OrderRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back.symbol, "ETHUSDT");
        assert_eq!(back.order_type, "Market");
    }

    // ==================== BybitApiResponse Tests ====================

    #[test]
    fn test_response_deserialization_success() {
        let json = r#"{
            "retCode": 0,
            "retMsg": "OK",
            "result": {"orderId": "1321003749386327552", "orderLinkId": ""},
            "retExtInfo": {},
            "time": 1672211918471
        }"#;

        let response: BybitApiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.ret_code, 0);
        assert_eq!(response.ret_msg, "OK");
        assert_eq!(
            response.result.unwrap().order_id.as_deref(),
            Some("1321003749386327552")
        );
    }

    #[test]
    fn test_response_deserialization_rejection() {
        let json = r#"{"retCode": 110007, "retMsg": "ab not enough for new order"}"#;

        let response: BybitApiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.ret_code, 110007);
        assert_eq!(response.ret_msg, "ab not enough for new order");
        assert!(response.result.is_none());
    }

    #[test]
    fn test_response_missing_ret_code_fails() {
        let json = r#"{"message": "something else entirely"}"#;
        assert!(serde_json::from_str::<BybitApiResponse>(json).is_err());
    }

    #[test]
    fn test_response_missing_ret_msg_defaults_empty() {
        let json = r#"{"retCode": 10002}"#;
        let response: BybitApiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.ret_msg, "");
    }

    // ==================== OrderOutcome Tests ====================

    #[test]
    fn test_outcome_accessors() {
        let raw = serde_json::json!({"retCode": 0});
        let accepted = OrderOutcome::Accepted {
            order_id: "abc".to_string(),
            raw: raw.clone(),
        };
        assert!(accepted.is_accepted());
        assert_eq!(accepted.raw(), &raw);

        let rejected = OrderOutcome::Rejected {
            ret_code: 10001,
            ret_msg: "params error".to_string(),
            raw: raw.clone(),
        };
        assert!(!rejected.is_accepted());
        assert_eq!(rejected.raw(), &raw);
    }
}
