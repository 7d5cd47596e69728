//! Inbound alert payload and normalization rules.
//!
//! TradingView webhook templates are loosely shaped: field names vary
//! (`symbol`/`ticker`, `action`/`side`, `quantity`/`qty`) and any field may
//! be missing. This module pins down the normalization the bridge applies
//! before an order is built.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fallback symbol when an alert names none.
pub const DEFAULT_SYMBOL: &str = "BTCUSDT";

/// Fallback order quantity when an alert names none.
pub const DEFAULT_QTY: &str = "0.001";

/// Inbound TradingView alert payload.
///
/// Every field is optional; defaults apply only to absent fields. Unknown
/// extra fields are ignored here and preserved by the caller through the raw
/// JSON value it echoes back.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Alert {
    /// Instrument symbol, e.g. "BTCUSDT" or "BTC/USDT".
    pub symbol: Option<String>,

    /// Alternate symbol field used by some alert templates.
    pub ticker: Option<String>,

    /// Trade action text ("buy", "sell", "long", "short", ...).
    pub action: Option<String>,

    /// Alternate action field.
    pub side: Option<String>,

    /// Order quantity, as text or number.
    pub quantity: Option<Quantity>,

    /// Alternate quantity field.
    pub qty: Option<Quantity>,
}

impl Alert {
    /// Returns the normalized symbol: `symbol` wins over `ticker`, falling
    /// back to [`DEFAULT_SYMBOL`] when both are absent. Every slash is
    /// removed ("BTC/USDT" becomes "BTCUSDT").
    #[must_use]
    pub fn normalized_symbol(&self) -> String {
        self.symbol
            .as_deref()
            .or(self.ticker.as_deref())
            .unwrap_or(DEFAULT_SYMBOL)
            .replace('/', "")
    }

    /// Returns the trade side derived from `action` (over `side`).
    ///
    /// An absent action defaults to [`Side::Buy`]; a present value (even an
    /// empty string) is classified by [`Side::from_action`].
    #[must_use]
    pub fn trade_side(&self) -> Side {
        match self.action.as_deref().or(self.side.as_deref()) {
            Some(action) => Side::from_action(action),
            None => Side::Buy,
        }
    }

    /// Returns the order quantity as a string: `quantity` wins over `qty`,
    /// absent both falls back to [`DEFAULT_QTY`].
    #[must_use]
    pub fn order_qty(&self) -> String {
        self.quantity
            .as_ref()
            .or(self.qty.as_ref())
            .map_or_else(|| DEFAULT_QTY.to_string(), Quantity::to_string)
    }
}

/// Order quantity as it arrives on the wire.
///
/// Alert templates send either a JSON string (`"0.001"`) or a bare number
/// (`0.001`); both stringify the same way downstream.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    /// Quantity given as a string.
    Text(String),
    /// Quantity given as a JSON number.
    Number(serde_json::Number),
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Side of an order, in Bybit's canonical capitalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    /// Open or add to a long position.
    Buy,
    /// Open or add to a short position.
    Sell,
}

impl Side {
    /// Classifies free-form action text.
    ///
    /// Recognized values map directly: `buy`/`long` derive [`Side::Buy`],
    /// `sell`/`short` derive [`Side::Sell`] (case-insensitive). Anything
    /// else falls back to the legacy TradingView rule: text containing
    /// "buy" is a buy, everything else is a sell.
    #[must_use]
    pub fn from_action(action: &str) -> Self {
        let action = action.to_lowercase();
        match action.as_str() {
            "buy" | "long" => Self::Buy,
            "sell" | "short" => Self::Sell,
            other if other.contains("buy") => Self::Buy,
            _ => Self::Sell,
        }
    }

    /// Returns the API string representation.
    #[must_use]
    pub fn as_api_str(&self) -> &'static str {
        match self {
            Self::Buy => "Buy",
            Self::Sell => "Sell",
        }
    }
}
