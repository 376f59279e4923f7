use serde::Serialize;
use serde_json::Value;
use std::fmt;

// ── Inbound request ───────────────────────────────────────────────────────────

/// Body of an inbound quote call: `{ "symbol": "..." }`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteRequest {
    pub symbol: String,
}

impl QuoteRequest {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self { symbol: symbol.into() }
    }

    /// Lenient body parsing: an unparseable body or a missing/null symbol
    /// yields an empty symbol, which is rejected downstream as invalid input.
    pub fn from_body(body: &[u8]) -> Self {
        let value: Value = serde_json::from_slice(body).unwrap_or(Value::Null);
        let symbol = match value.get("symbol") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };
        Self { symbol }
    }
}

// ── Normalized symbol ─────────────────────────────────────────────────────────

/// Upstream query key, e.g. `RELIANCE.NS` or `^NSEI`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedSymbol(String);

impl NormalizedSymbol {
    pub(crate) fn new_unchecked(s: String) -> Self {
        Self(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for NormalizedSymbol {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// ── Quote ─────────────────────────────────────────────────────────────────────

/// Normalized quote returned to callers. Absent values serialize as `null`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub symbol: String,
    pub price: Option<f64>,
    pub previous_close: Option<f64>,
    pub change: Option<f64>,
    pub change_percent: Option<f64>,
    pub currency: String,
    pub market_time: Option<String>,
    pub exchange_name: Option<String>,
    pub short_name: Option<String>,
    pub long_name: Option<String>,
}

impl Quote {
    pub fn bias(&self) -> Option<Bias> {
        Bias::from_change_percent(self.change_percent)
    }
}

// ── Directional bias ──────────────────────────────────────────────────────────

const BIAS_THRESHOLD_PCT: f64 = 0.75;

/// Three-way label derived from the day's percentage change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bias {
    Bullish,
    Bearish,
    Neutral,
}

impl Bias {
    pub fn from_change_percent(change_percent: Option<f64>) -> Option<Self> {
        let cp = change_percent?;
        if cp >= BIAS_THRESHOLD_PCT {
            Some(Self::Bullish)
        } else if cp <= -BIAS_THRESHOLD_PCT {
            Some(Self::Bearish)
        } else {
            Some(Self::Neutral)
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Bullish => "Bullish bias",
            Self::Bearish => "Bearish bias",
            Self::Neutral => "Neutral bias",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_parsing_is_lenient() {
        assert_eq!(QuoteRequest::from_body(br#"{"symbol":" tcs "}"#).symbol, " tcs ");
        assert_eq!(QuoteRequest::from_body(br#"{"symbol":500325}"#).symbol, "500325");
        assert_eq!(QuoteRequest::from_body(br#"{"symbol":null}"#).symbol, "");
        assert_eq!(QuoteRequest::from_body(br#"{}"#).symbol, "");
        assert_eq!(QuoteRequest::from_body(b"not json").symbol, "");
        assert_eq!(QuoteRequest::from_body(b"").symbol, "");
        assert_eq!(QuoteRequest::from_body(br#"["TCS"]"#).symbol, "");
    }

    #[test]
    fn bias_thresholds_are_inclusive() {
        assert_eq!(Bias::from_change_percent(Some(0.75)), Some(Bias::Bullish));
        assert_eq!(Bias::from_change_percent(Some(-0.75)), Some(Bias::Bearish));
        assert_eq!(Bias::from_change_percent(Some(0.74)), Some(Bias::Neutral));
        assert_eq!(Bias::from_change_percent(Some(0.0)), Some(Bias::Neutral));
        assert_eq!(Bias::from_change_percent(None), None);
    }

    #[test]
    fn quote_serializes_camel_case_with_nulls() {
        let q = Quote {
            symbol: "TCS.NS".into(),
            price: Some(3900.5),
            previous_close: None,
            change: None,
            change_percent: None,
            currency: "INR".into(),
            market_time: None,
            exchange_name: Some("NSI".into()),
            short_name: None,
            long_name: None,
        };
        let v = serde_json::to_value(&q).unwrap();
        assert_eq!(v["symbol"], "TCS.NS");
        assert_eq!(v["price"], 3900.5);
        assert!(v["previousClose"].is_null());
        assert!(v["changePercent"].is_null());
        assert_eq!(v["exchangeName"], "NSI");
        assert!(v.as_object().unwrap().contains_key("longName"));
    }
}
