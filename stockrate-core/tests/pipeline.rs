//! End-to-end tests of the ingestion path: load → fetch → tabulate → persist.

use serde_json::json;
use stockrate_core::data::{
    fetch, fetch_all, load, LogProgress, SkipReason, StaticProvider, SymbolLoader,
};
use stockrate_core::export::{persist, PersistStatus};
use stockrate_core::{tabulate, tabulate_outcomes, StockRecord};

fn provider() -> StaticProvider {
    StaticProvider::new()
        .with_quote("AAA", json!({ "recommendationMean": 3.1, "currentPrice": 10.0 }))
        .with_quote("BBB", json!({ "recommendationMean": 1.2 }))
        .with_quote("7203.T", json!({ "recommendationMean": null, "currentPrice": 150 }))
        .with_quote("NOREC", json!({ "currentPrice": 42.0 }))
        .with_network_failure("DOWN", "connection reset")
}

#[test]
fn absent_recommendation_is_not_a_zero_record() {
    assert_eq!(fetch(&provider(), "NOREC"), Err(SkipReason::MissingField));
}

#[test]
fn null_recommendation_uses_current_price() {
    assert_eq!(
        fetch(&provider(), "7203.T"),
        Ok(StockRecord::new(150.0, "7203.T"))
    );
}

#[test]
fn only_absent_results_give_empty_table() {
    let symbols: Vec<String> = ["NOREC", "DOWN", "UNKNOWN"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let outcomes = fetch_all(&provider(), &symbols, &LogProgress);
    assert!(outcomes.iter().all(|o| o.is_err()));
    assert!(tabulate_outcomes(&outcomes, true).is_empty());
    assert!(tabulate_outcomes(&outcomes, false).is_empty());
}

#[test]
fn full_pipeline_ranks_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("stocks.csv");
    std::fs::write(&input, "AAA\nNOREC\n\nBBB\nDOWN\n7203.T\n").unwrap();

    let symbols = load(&input);
    assert_eq!(symbols, vec!["AAA", "NOREC", "BBB", "DOWN", "7203.T"]);

    let outcomes = fetch_all(&provider(), &symbols, &LogProgress);
    let table = tabulate_outcomes(&outcomes, true);
    assert_eq!(table.symbols(), vec!["BBB", "AAA", "7203.T"]);

    let out = dir.path().join("data/successful_symbols.csv");
    let status = persist(&out, table.records());
    assert!(matches!(status, PersistStatus::Written { rows: 3, .. }));

    let written = std::fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines.len(), table.len() + 1);
    assert_eq!(lines[0], "Rate,Symbol");
    assert_eq!(lines[1], "1.2,BBB");

    // The in-memory table is untouched by persisting.
    assert_eq!(table.len(), 3);
}

#[test]
fn persisted_symbols_load_back_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("saved.csv");
    let records = vec![
        StockRecord::new(2.5, "MSFT"),
        StockRecord::new(1.1, "6758.T"),
        StockRecord::new(3.0, "AAPL"),
    ];
    assert!(persist(&out, &records).is_written());

    let symbols = SymbolLoader::new().column(1).skip_header(true).load(&out);
    assert_eq!(symbols, vec!["MSFT", "6758.T", "AAPL"]);
}

#[test]
fn failed_persist_leaves_table_intact() {
    let dir = tempfile::tempdir().unwrap();
    let table = tabulate(vec![Some(StockRecord::new(1.0, "SPY"))], true);
    let status = persist(dir.path(), table.records());
    assert!(matches!(status, PersistStatus::Failed(_)));
    assert_eq!(table.symbols(), vec!["SPY"]);
}
