//! # Kline update message.
//!
//! [`Message`] is the only payload the broadcast carries: one candlestick update for
//! a `(symbol, timeframe)` pair. It has no identity beyond its fields and is cloned
//! to every recipient; the string fields are `Arc<str>` so a clone is two refcount
//! bumps.
//!
//! ## Example
//! ```rust
//! use klinecast::Message;
//!
//! let m = Message::new("BTCUSDT", "1", 1_700_000_000, true);
//! assert_eq!(m.symbol(), "BTCUSDT");
//! assert_eq!(m.timeframe(), "1");
//! assert!(m.is_confirmed());
//! ```

use std::fmt;
use std::sync::Arc;

/// One kline update.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Message {
    /// Instrument identifier (e.g. `BTCUSDT`).
    pub symbol: Arc<str>,
    /// Timeframe identifier (e.g. `1`, `60`, `D`).
    pub timeframe: Arc<str>,
    /// Candle open time as an epoch value.
    pub start_time: i64,
    /// True once the candle is closed and will not change again.
    pub confirm: bool,
}

impl Message {
    /// Creates a message from its four fields.
    pub fn new(
        symbol: impl Into<Arc<str>>,
        timeframe: impl Into<Arc<str>>,
        start_time: i64,
        confirm: bool,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe: timeframe.into(),
            start_time,
            confirm,
        }
    }

    #[inline]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    #[inline]
    pub fn timeframe(&self) -> &str {
        &self.timeframe
    }

    #[inline]
    pub fn start_time(&self) -> i64 {
        self.start_time
    }

    #[inline]
    pub fn is_confirmed(&self) -> bool {
        self.confirm
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{} start={} confirm={}",
            self.symbol, self.timeframe, self.start_time, self.confirm
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_string_storage() {
        let a = Message::new("ETHUSDT", "60", 1_700_000_060, false);
        let b = a.clone();
        assert_eq!(a, b);
        assert!(Arc::ptr_eq(&a.symbol, &b.symbol));
        assert!(Arc::ptr_eq(&a.timeframe, &b.timeframe));
    }

    #[test]
    fn display_is_compact() {
        let m = Message::new("BTCUSDT", "1", 1_700_000_000, true);
        assert_eq!(m.to_string(), "BTCUSDT@1 start=1700000000 confirm=true");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_with_camel_case_fields() {
        let m = Message::new("BTCUSDT", "D", 1_700_000_000, false);
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "symbol": "BTCUSDT",
                "timeframe": "D",
                "startTime": 1_700_000_000i64,
                "confirm": false,
            })
        );
        let back: Message = serde_json::from_value(json).unwrap();
        assert_eq!(back, m);
    }
}
