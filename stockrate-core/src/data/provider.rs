//! Quote provider trait and structured error types.
//!
//! The QuoteProvider trait abstracts over where quote information comes from
//! (Yahoo Finance, a JSON fixture) so the fetcher can be driven by a mock in
//! tests.

use std::collections::HashMap;
use std::path::Path;

use serde_json::{Map, Value};
use thiserror::Error;

/// Flattened key/value view of a provider response.
///
/// A key that is present with a `null` value is distinct from a key that is
/// missing; the fetcher relies on that difference.
pub type QuoteInfo = Map<String, Value>;

/// Structured error types for provider operations.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("HTTP {status} for {symbol}")]
    HttpStatus { status: u16, symbol: String },

    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("provider error: {0}")]
    Other(String),
}

impl ProviderError {
    /// True for failures of the transport itself (DNS, connect, timeout).
    pub fn is_transport(&self) -> bool {
        matches!(self, ProviderError::NetworkUnreachable(_))
    }
}

/// Trait for quote providers.
pub trait QuoteProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch the flattened quote information for one symbol.
    fn quote_info(&self, symbol: &str) -> Result<QuoteInfo, ProviderError>;
}

/// In-memory provider keyed by symbol. Unknown symbols return an empty map,
/// which is what Yahoo hands back for delisted tickers.
#[derive(Debug, Default)]
pub struct StaticProvider {
    quotes: HashMap<String, QuoteInfo>,
    failures: HashMap<String, String>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quote(mut self, symbol: &str, info: Value) -> Self {
        let info = match info {
            Value::Object(map) => map,
            _ => QuoteInfo::new(),
        };
        self.quotes.insert(symbol.to_string(), info);
        self
    }

    /// Make `symbol` fail with a transport error.
    pub fn with_network_failure(mut self, symbol: &str, message: &str) -> Self {
        self.failures.insert(symbol.to_string(), message.to_string());
        self
    }

    /// Load a fixture of the form `{ "AAPL": { "recommendationMean": 1.9, ... }, ... }`.
    pub fn from_json_file(path: &Path) -> Result<Self, ProviderError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ProviderError::Other(format!("read fixture {}: {e}", path.display())))?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ProviderError> {
        let quotes: HashMap<String, QuoteInfo> = serde_json::from_str(content)
            .map_err(|e| ProviderError::ResponseFormatChanged(format!("parse fixture: {e}")))?;
        Ok(Self {
            quotes,
            failures: HashMap::new(),
        })
    }
}

impl QuoteProvider for StaticProvider {
    fn name(&self) -> &str {
        "static"
    }

    fn quote_info(&self, symbol: &str) -> Result<QuoteInfo, ProviderError> {
        if let Some(message) = self.failures.get(symbol) {
            return Err(ProviderError::NetworkUnreachable(message.clone()));
        }
        Ok(self.quotes.get(symbol).cloned().unwrap_or_default())
    }
}
