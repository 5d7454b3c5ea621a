//! Per-symbol rate fetching.
//!
//! Every failure is caught here and turned into a [`SkipReason`]; callers
//! treat any `Err` as "skip this symbol" and only the log tells the causes
//! apart.

use thiserror::Error;

use super::provider::{ProviderError, QuoteInfo, QuoteProvider};
use crate::domain::StockRecord;

pub const RECOMMENDATION_MEAN: &str = "recommendationMean";
pub const CURRENT_PRICE: &str = "currentPrice";
pub const REGULAR_MARKET_PRICE: &str = "regularMarketPrice";

/// Why a symbol produced no record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SkipReason {
    #[error("empty response received from provider")]
    EmptyResponse,

    #[error("no recommendation data")]
    MissingField,

    #[error("network issue: {0}")]
    Transport(String),

    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

pub type FetchOutcome = Result<StockRecord, SkipReason>;

/// Pick the rate out of a provider response.
///
/// A missing `recommendationMean` key skips the symbol, while a present but
/// null one falls back to `currentPrice`, then `regularMarketPrice`, then 0.
/// Prices of exactly zero count as unavailable.
pub fn select_rate(info: &QuoteInfo) -> Result<f64, SkipReason> {
    if info.is_empty() {
        return Err(SkipReason::EmptyResponse);
    }

    match info.get(RECOMMENDATION_MEAN) {
        None => Err(SkipReason::MissingField),
        Some(value) if value.is_null() => Ok(nonzero_number(info, CURRENT_PRICE)
            .or_else(|| nonzero_number(info, REGULAR_MARKET_PRICE))
            .unwrap_or(0.0)),
        Some(value) => value.as_f64().ok_or_else(|| {
            SkipReason::Unexpected(format!("{RECOMMENDATION_MEAN} is not a number: {value}"))
        }),
    }
}

fn nonzero_number(info: &QuoteInfo, key: &str) -> Option<f64> {
    info.get(key)
        .and_then(|v| v.as_f64())
        .filter(|v| *v != 0.0)
}

impl From<ProviderError> for SkipReason {
    fn from(e: ProviderError) -> Self {
        if e.is_transport() {
            let detail = match e {
                ProviderError::NetworkUnreachable(msg) => msg,
                other => other.to_string(),
            };
            return SkipReason::Transport(detail);
        }
        match e {
            ProviderError::SymbolNotFound { .. } => SkipReason::EmptyResponse,
            other => SkipReason::Unexpected(other.to_string()),
        }
    }
}

/// Fetch one symbol. Never panics on provider failures.
pub fn fetch(provider: &dyn QuoteProvider, symbol: &str) -> FetchOutcome {
    let outcome = provider
        .quote_info(symbol)
        .map_err(SkipReason::from)
        .and_then(|info| {
            let rate = select_rate(&info)?;
            if info.get(RECOMMENDATION_MEAN).is_some_and(|v| v.is_null()) {
                log::debug!("{symbol}: using price as fallback");
            }
            Ok(StockRecord::new(rate, symbol))
        });

    if let Err(reason) = &outcome {
        report_skip(provider.name(), symbol, reason);
    }
    outcome
}

fn report_skip(provider: &str, symbol: &str, reason: &SkipReason) {
    match reason {
        SkipReason::MissingField => {
            log::warn!("No recommendation data for {symbol}. Skipping.")
        }
        SkipReason::EmptyResponse => log::error!(
            "Unable to fetch data for '{symbol}' from {provider}: {reason}. \
             Possible causes: invalid stock symbol or empty API response."
        ),
        SkipReason::Transport(_) => log::error!(
            "Network issue while fetching '{symbol}' from {provider}: {reason}. \
             Please check your internet connection or try again later."
        ),
        SkipReason::Unexpected(_) => {
            log::error!("Failed to fetch '{symbol}' from {provider}: {reason}")
        }
    }
}

/// Progress callback for multi-symbol fetches.
pub trait FetchProgress {
    fn on_start(&self, symbol: &str, index: usize, total: usize);

    fn on_complete(&self, symbol: &str, index: usize, total: usize, outcome: &FetchOutcome);

    fn on_batch_complete(&self, succeeded: usize, skipped: usize, total: usize);
}

/// Progress reporter that writes through the `log` facade.
pub struct LogProgress;

impl FetchProgress for LogProgress {
    fn on_start(&self, symbol: &str, index: usize, total: usize) {
        log::info!("[{}/{}] Fetching {symbol}...", index + 1, total);
    }

    fn on_complete(&self, symbol: &str, _index: usize, _total: usize, outcome: &FetchOutcome) {
        match outcome {
            Ok(record) => log::debug!("  OK: {symbol} rate={}", record.rate),
            Err(reason) => log::debug!("  SKIP: {symbol}: {reason}"),
        }
    }

    fn on_batch_complete(&self, succeeded: usize, skipped: usize, total: usize) {
        log::info!("Fetch complete: {succeeded}/{total} succeeded, {skipped} skipped");
    }
}

/// Fetch every symbol in order, one at a time.
pub fn fetch_all(
    provider: &dyn QuoteProvider,
    symbols: &[String],
    progress: &dyn FetchProgress,
) -> Vec<FetchOutcome> {
    let total = symbols.len();
    let mut outcomes = Vec::with_capacity(total);

    for (i, symbol) in symbols.iter().enumerate() {
        progress.on_start(symbol, i, total);
        let outcome = fetch(provider, symbol);
        progress.on_complete(symbol, i, total, &outcome);
        outcomes.push(outcome);
    }

    let succeeded = outcomes.iter().filter(|o| o.is_ok()).count();
    progress.on_batch_complete(succeeded, total - succeeded, total);
    outcomes
}
