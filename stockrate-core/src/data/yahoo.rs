//! Yahoo Finance quote provider.
//!
//! Fetches analyst and price fields from Yahoo's v10 quoteSummary API. The
//! endpoint wants a session cookie plus a matching "crumb"; both are obtained
//! lazily on the first request and reused for the rest of the run.
//!
//! Yahoo Finance has no official API and is subject to unannounced format
//! changes, so everything past the envelope is kept as loose JSON.

use std::sync::Mutex;
use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::provider::{ProviderError, QuoteInfo, QuoteProvider};
use crate::config::ProviderConfig;

const COOKIE_URL: &str = "https://fc.yahoo.com";
const CRUMB_URL: &str = "https://query1.finance.yahoo.com/v1/test/getcrumb";
const SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";

/// quoteSummary modules merged into one flat map, in priority order.
const MODULES: [&str; 3] = ["financialData", "price", "summaryDetail"];

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: SummaryResult,
}

#[derive(Debug, Deserialize)]
struct SummaryResult {
    result: Option<Vec<Map<String, Value>>>,
    error: Option<SummaryError>,
}

#[derive(Debug, Deserialize)]
struct SummaryError {
    code: String,
    description: String,
}

/// Yahoo Finance quote provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    crumb: Mutex<Option<String>>,
}

impl YahooProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .cookie_store(true)
            .build()
            .map_err(|e| ProviderError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            crumb: Mutex::new(None),
        })
    }

    /// quoteSummary URL with `symbol` as one percent-encoded path segment.
    fn summary_url(symbol: &str, crumb: &str) -> Result<Url, ProviderError> {
        let mut url = Url::parse(SUMMARY_URL)
            .map_err(|e| ProviderError::Other(format!("invalid summary URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| ProviderError::Other("summary URL cannot take a path".into()))?
            .push(symbol);
        url.query_pairs_mut()
            .append_pair("modules", &MODULES.join(","))
            .append_pair("crumb", crumb);
        Ok(url)
    }

    /// Return the cached crumb, fetching cookie and crumb on first use.
    fn crumb(&self) -> Result<String, ProviderError> {
        let mut cached = self
            .crumb
            .lock()
            .map_err(|_| ProviderError::Other("crumb lock poisoned".into()))?;
        if let Some(crumb) = cached.as_ref() {
            return Ok(crumb.clone());
        }

        // fc.yahoo.com answers 404 but sets the session cookie either way.
        self.client.get(COOKIE_URL).send().map_err(transport_error)?;

        let resp = self.client.get(CRUMB_URL).send().map_err(transport_error)?;
        if !resp.status().is_success() {
            return Err(ProviderError::AuthenticationRequired(format!(
                "crumb request returned HTTP {}",
                resp.status()
            )));
        }
        let crumb = resp.text().map_err(transport_error)?.trim().to_string();
        if crumb.is_empty() || crumb.contains('<') {
            return Err(ProviderError::AuthenticationRequired(
                "Yahoo Finance did not issue a crumb".into(),
            ));
        }

        log::debug!("obtained Yahoo crumb");
        *cached = Some(crumb.clone());
        Ok(crumb)
    }

    fn forget_crumb(&self) {
        if let Ok(mut cached) = self.crumb.lock() {
            *cached = None;
        }
    }

    /// Parse a quoteSummary body into a flattened QuoteInfo.
    fn parse_response(symbol: &str, body: &str) -> Result<QuoteInfo, ProviderError> {
        let resp: SummaryResponse = serde_json::from_str(body).map_err(|e| {
            ProviderError::ResponseFormatChanged(format!(
                "failed to parse response for {symbol}: {e}"
            ))
        })?;

        if let Some(err) = resp.quote_summary.error {
            return Err(if err.code == "Not Found" {
                ProviderError::SymbolNotFound {
                    symbol: symbol.to_string(),
                }
            } else {
                ProviderError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
            });
        }

        let modules = resp
            .quote_summary
            .result
            .and_then(|r| r.into_iter().next())
            .unwrap_or_default();

        Ok(flatten_modules(&modules))
    }
}

/// Merge the quoteSummary modules into one map.
///
/// Yahoo wraps numbers as `{ "raw": 1.9, "fmt": "1.90" }` and reports a
/// missing number as `{}`. The first are unwrapped to `raw`, the second
/// become `null`. A key seen in an earlier module keeps its value unless that
/// value was null.
pub fn flatten_modules(modules: &Map<String, Value>) -> QuoteInfo {
    let mut info = QuoteInfo::new();
    for name in MODULES {
        let Some(Value::Object(fields)) = modules.get(name) else {
            continue;
        };
        for (key, value) in fields {
            let value = unwrap_raw(value);
            match info.get(key) {
                Some(existing) if !existing.is_null() => {}
                _ => {
                    info.insert(key.clone(), value);
                }
            }
        }
    }
    info
}

fn unwrap_raw(value: &Value) -> Value {
    match value {
        Value::Object(obj) if obj.is_empty() => Value::Null,
        Value::Object(obj) => obj.get("raw").cloned().unwrap_or_else(|| value.clone()),
        other => other.clone(),
    }
}

fn transport_error(e: reqwest::Error) -> ProviderError {
    ProviderError::NetworkUnreachable(e.to_string())
}

impl QuoteProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn quote_info(&self, symbol: &str) -> Result<QuoteInfo, ProviderError> {
        let crumb = self.crumb()?;
        let url = Self::summary_url(symbol, &crumb)?;
        log::debug!("fetching Yahoo quote summary for {symbol}");

        let resp = self.client.get(url).send().map_err(transport_error)?;
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            // Crumb expired or was rejected; the next symbol starts a new session.
            self.forget_crumb();
            return Err(ProviderError::AuthenticationRequired(format!(
                "HTTP {status} from Yahoo Finance"
            )));
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ProviderError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }

        if !status.is_success() {
            return Err(ProviderError::HttpStatus {
                status: status.as_u16(),
                symbol: symbol.to_string(),
            });
        }

        let body = resp.text().map_err(transport_error)?;
        Self::parse_response(symbol, &body)
    }
}
