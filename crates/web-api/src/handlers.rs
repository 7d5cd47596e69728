//! HTTP handlers for the alert bridge.
//!
//! The order route is one straight line: read the body, normalize the
//! alert, place the order, map the outcome to a response. Status mapping
//! is a pure function of the order result, so every failure mode has an
//! explicit, testable HTTP shape.

use alert_bridge_bybit::{BybitClient, BybitError, OrderOutcome, OrderRequest};
use alert_bridge_core::Alert;
use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;

/// Remediation hint attached to every internal failure response.
const FAILURE_TIP: &str = "Check the API key and network connection";

// =============================================================================
// Response Types
// =============================================================================

/// Body returned by the order route.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BridgeResponse {
    /// Exchange accepted the order (HTTP 200).
    Placed(OrderPlacedResponse),
    /// Exchange rejected the order (HTTP 400).
    Rejected(OrderRejectedResponse),
    /// The bridge itself failed (HTTP 500).
    Failed(BridgeErrorResponse),
}

/// Success response: the exchange accepted the order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPlacedResponse {
    /// Always `true`.
    pub success: bool,

    /// Human-readable summary of the submitted order.
    pub message: String,

    /// Exchange-assigned order ID.
    pub order_id: String,

    /// The inbound alert payload, echoed back verbatim.
    pub trading_view_data: serde_json::Value,

    /// The raw exchange response.
    pub bybit_response: serde_json::Value,
}

/// Failure response: the exchange rejected the order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRejectedResponse {
    /// Always `false`.
    pub success: bool,

    /// The exchange's error message.
    pub error: String,

    /// The raw exchange response.
    pub bybit_response: serde_json::Value,
}

/// Failure response: the bridge failed before or below the exchange.
#[derive(Debug, Serialize)]
pub struct BridgeErrorResponse {
    /// Always `false`.
    pub success: bool,

    /// What went wrong.
    pub error: String,

    /// Fixed remediation hint.
    pub tip: String,
}

/// Body returned for disallowed methods on the order route.
#[derive(Debug, Serialize)]
pub struct MethodNotAllowedResponse {
    /// What went wrong.
    pub error: String,

    /// Always `false`.
    pub success: bool,
}

/// Static service description returned by the status route.
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub message: String,
    pub endpoints: ServiceEndpoints,
    pub usage: String,
    pub example: AlertExample,
}

/// Endpoint listing inside [`ServiceInfo`].
#[derive(Debug, Serialize)]
pub struct ServiceEndpoints {
    pub main: String,
    pub test: String,
}

/// Example alert payload inside [`ServiceInfo`].
#[derive(Debug, Serialize)]
pub struct AlertExample {
    pub action: String,
    pub symbol: String,
    pub quantity: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Receives a TradingView alert and forwards it to Bybit as a market order.
///
/// Always returns a well-formed JSON response: 200 when the exchange
/// accepts, 400 when it rejects, 500 for anything that fails before or
/// below the exchange (unreadable payload, missing credentials, transport).
pub async fn create_order(
    State(client): State<Arc<BybitClient>>,
    body: Bytes,
) -> (StatusCode, Json<BridgeResponse>) {
    let (alert_json, alert) = match parse_alert(&body) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::warn!("unreadable alert payload: {err}");
            let (status, response) = internal_error(format!("invalid alert payload: {err}"));
            return (status, Json(response));
        }
    };

    tracing::info!(payload = %alert_json, "received TradingView alert");

    let order = OrderRequest::market(
        alert.normalized_symbol(),
        alert.trade_side().as_api_str(),
        alert.order_qty(),
    );

    tracing::info!(
        symbol = %order.symbol,
        side = %order.side,
        qty = %order.qty,
        "derived order parameters"
    );

    let result = client.place_order(&order).await;
    let (status, response) = order_response(alert_json, &order, result);

    (status, Json(response))
}

/// Answers bare CORS pre-flight requests on the order route.
///
/// True pre-flights (with `Access-Control-Request-Method`) are already
/// short-circuited by the CORS layer; this covers plain OPTIONS probes.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Rejects disallowed methods on the order route with a structured body.
pub async fn method_not_allowed() -> (StatusCode, Json<MethodNotAllowedResponse>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(MethodNotAllowedResponse {
            error: "only POST requests are allowed".to_string(),
            success: false,
        }),
    )
}

/// Returns a static service description on any method.
pub async fn service_status() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "TradingView-Bybit bridge is running".to_string(),
        endpoints: ServiceEndpoints {
            main: "/api/bybit - receives TradingView alerts".to_string(),
            test: "/api/test - service status".to_string(),
        },
        usage: "Send TradingView alerts as POST requests to /api/bybit".to_string(),
        example: AlertExample {
            action: "buy".to_string(),
            symbol: "BTCUSDT".to_string(),
            quantity: "0.001".to_string(),
        },
    })
}

// =============================================================================
// Response Mapping
// =============================================================================

/// Parses the inbound body into the raw JSON value and the typed alert.
///
/// The raw value is kept so the response can echo the payload exactly as
/// received, unknown fields included.
fn parse_alert(body: &[u8]) -> Result<(serde_json::Value, Alert), serde_json::Error> {
    let raw: serde_json::Value = serde_json::from_slice(body)?;
    let alert: Alert = serde_json::from_value(raw.clone())?;
    Ok((raw, alert))
}

/// Maps an order result to its HTTP status and response body.
fn order_response(
    alert_json: serde_json::Value,
    order: &OrderRequest,
    result: Result<OrderOutcome, BybitError>,
) -> (StatusCode, BridgeResponse) {
    match result {
        Ok(OrderOutcome::Accepted { order_id, raw }) => (
            StatusCode::OK,
            BridgeResponse::Placed(OrderPlacedResponse {
                success: true,
                message: format!(
                    "Order placed: {} {} {}",
                    order.side, order.qty, order.symbol
                ),
                order_id,
                trading_view_data: alert_json,
                bybit_response: raw,
            }),
        ),
        Ok(OrderOutcome::Rejected { ret_msg, raw, .. }) => (
            StatusCode::BAD_REQUEST,
            BridgeResponse::Rejected(OrderRejectedResponse {
                success: false,
                error: format!("Bybit error: {ret_msg}"),
                bybit_response: raw,
            }),
        ),
        Err(err) => internal_error(err.to_string()),
    }
}

fn internal_error(error: String) -> (StatusCode, BridgeResponse) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        BridgeResponse::Failed(BridgeErrorResponse {
            success: false,
            error,
            tip: FAILURE_TIP.to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_order() -> OrderRequest {
        OrderRequest::market("BTCUSDT", "Buy", "0.001")
    }

    // ==================== Alert Parsing Tests ====================

    #[test]
    fn test_parse_alert_object() {
        let body = br#"{"action": "sell", "symbol": "ETH/USDT"}"#;
        let (raw, alert) = parse_alert(body).unwrap();
        assert_eq!(raw["action"], "sell");
        assert_eq!(alert.normalized_symbol(), "ETHUSDT");
    }

    #[test]
    fn test_parse_alert_preserves_unknown_fields() {
        let body = br#"{"action": "buy", "strategy": "breakout", "price": 65000}"#;
        let (raw, _alert) = parse_alert(body).unwrap();
        assert_eq!(raw["strategy"], "breakout");
        assert_eq!(raw["price"], 65000);
    }

    #[test]
    fn test_parse_alert_rejects_invalid_json() {
        assert!(parse_alert(b"not json at all").is_err());
        assert!(parse_alert(b"").is_err());
    }

    #[test]
    fn test_parse_alert_rejects_non_object() {
        assert!(parse_alert(br#""just a string""#).is_err());
        assert!(parse_alert(b"[1, 2, 3]").is_err());
    }

    // ==================== Response Mapping Tests ====================

    #[test]
    fn test_accepted_outcome_maps_to_200() {
        let raw = json!({"retCode": 0, "retMsg": "OK", "result": {"orderId": "123"}});
        let outcome = OrderOutcome::Accepted {
            order_id: "123".to_string(),
            raw: raw.clone(),
        };

        let (status, response) =
            order_response(json!({"action": "buy"}), &sample_order(), Ok(outcome));

        assert_eq!(status, StatusCode::OK);
        let body = serde_json::to_value(&response).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["orderId"], "123");
        assert_eq!(body["message"], "Order placed: Buy 0.001 BTCUSDT");
        assert_eq!(body["tradingViewData"]["action"], "buy");
        assert_eq!(body["bybitResponse"], raw);
    }

    #[test]
    fn test_rejected_outcome_maps_to_400() {
        let raw = json!({"retCode": 10001, "retMsg": "insufficient balance"});
        let outcome = OrderOutcome::Rejected {
            ret_code: 10001,
            ret_msg: "insufficient balance".to_string(),
            raw: raw.clone(),
        };

        let (status, response) = order_response(json!({}), &sample_order(), Ok(outcome));

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body = serde_json::to_value(&response).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Bybit error: insufficient balance");
        assert_eq!(body["bybitResponse"], raw);
        assert!(body.get("tip").is_none());
    }

    #[test]
    fn test_client_error_maps_to_500_with_tip() {
        let err = BybitError::Configuration(
            "missing Bybit credentials: set BYBIT_API_KEY and BYBIT_SECRET_KEY".to_string(),
        );

        let (status, response) = order_response(json!({}), &sample_order(), Err(err));

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let body = serde_json::to_value(&response).unwrap();
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("BYBIT_API_KEY"));
        assert_eq!(body["tip"], FAILURE_TIP);
    }

    #[test]
    fn test_network_error_message_surfaced() {
        let err = BybitError::Network("connection failed: refused".to_string());
        let (status, response) = order_response(json!({}), &sample_order(), Err(err));

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let body = serde_json::to_value(&response).unwrap();
        assert!(body["error"].as_str().unwrap().contains("connection failed"));
    }

    // ==================== Response Shape Tests ====================

    #[test]
    fn test_method_not_allowed_shape() {
        let response = MethodNotAllowedResponse {
            error: "only POST requests are allowed".to_string(),
            success: false,
        };
        let body = serde_json::to_value(&response).unwrap();
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("POST"));
    }

    #[test]
    fn test_service_info_shape() {
        let response = ServiceInfo {
            message: "TradingView-Bybit bridge is running".to_string(),
            endpoints: ServiceEndpoints {
                main: "/api/bybit - receives TradingView alerts".to_string(),
                test: "/api/test - service status".to_string(),
            },
            usage: "Send TradingView alerts as POST requests to /api/bybit".to_string(),
            example: AlertExample {
                action: "buy".to_string(),
                symbol: "BTCUSDT".to_string(),
                quantity: "0.001".to_string(),
            },
        };

        let body = serde_json::to_value(&response).unwrap();
        assert!(body["endpoints"]["main"].as_str().unwrap().contains("/api/bybit"));
        assert_eq!(body["example"]["action"], "buy");
        assert_eq!(body["example"]["quantity"], "0.001");
    }
}
