//! Domain types for StockRate

pub mod record;

pub use record::StockRecord;

/// Ordered list of ticker symbols as read from an input file.
pub type SymbolList = Vec<String>;
