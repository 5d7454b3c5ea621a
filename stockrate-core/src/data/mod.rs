//! Symbol loading and quote fetching

pub mod fetch;
pub mod loader;
pub mod provider;
pub mod universe;
pub mod yahoo;

pub use fetch::{fetch, fetch_all, FetchOutcome, FetchProgress, LogProgress, SkipReason};
pub use loader::{load, LoadError, LoadedSymbols, SymbolLoader, TextEncoding};
pub use provider::{ProviderError, QuoteInfo, QuoteProvider, StaticProvider};
pub use universe::Universe;
pub use yahoo::YahooProvider;
