//! StockRate Core — symbol lists in, ranked rate table out.
//!
//! This crate holds the whole ingestion path:
//! - Symbol list loading with an ordered encoding fallback
//! - Quote providers (Yahoo Finance, in-memory fixtures)
//! - Per-symbol fetching with tagged skip reasons
//! - Tabulation, ranking and CSV persistence
//! - Universe files and symbol-list generation

pub mod config;
pub mod data;
pub mod domain;
pub mod export;
pub mod table;

pub use config::{ConfigError, ReportConfig};
pub use domain::{StockRecord, SymbolList};
pub use export::{persist, save_successful_symbols, PersistError, PersistStatus};
pub use table::{tabulate, tabulate_outcomes, ResultTable};
