use serde::{Deserialize, Serialize};

/// One rated symbol.
///
/// `rate` is the analyst recommendation mean when the provider has one
/// (lower is more favourable), otherwise a price used as a stand-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    #[serde(rename = "Rate")]
    pub rate: f64,
    #[serde(rename = "Symbol")]
    pub symbol: String,
}

impl StockRecord {
    pub fn new(rate: f64, symbol: impl Into<String>) -> Self {
        Self {
            rate,
            symbol: symbol.into(),
        }
    }

    /// True if the rate is a usable number (not NaN).
    pub fn has_rate(&self) -> bool {
        !self.rate.is_nan()
    }
}
