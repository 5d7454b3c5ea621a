//! Result table — the filtered, optionally ranked view of a fetch batch.

use std::fmt;

use crate::data::fetch::FetchOutcome;
use crate::domain::StockRecord;

/// Ordered records with absent fetch results already removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultTable {
    records: Vec<StockRecord>,
}

impl ResultTable {
    pub fn new(records: Vec<StockRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[StockRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn symbols(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.symbol.as_str()).collect()
    }

    /// Drop rows without a rate and order the rest ascending by rate.
    ///
    /// The sort is stable, so equal rates keep their fetch order.
    pub fn sort_by_rate(&mut self) {
        self.records.retain(StockRecord::has_rate);
        self.records.sort_by(|a, b| a.rate.total_cmp(&b.rate));
    }
}

/// Build a table from raw fetch results, dropping absent entries.
pub fn tabulate<I>(records: I, sort: bool) -> ResultTable
where
    I: IntoIterator<Item = Option<StockRecord>>,
{
    let mut table = ResultTable::new(records.into_iter().flatten().collect());
    if table.is_empty() {
        log::warn!("No data to display.");
        return table;
    }
    if sort {
        table.sort_by_rate();
    }
    table
}

/// [`tabulate`] over tagged fetch outcomes; every `Err` counts as absent.
pub fn tabulate_outcomes(outcomes: &[FetchOutcome], sort: bool) -> ResultTable {
    tabulate(outcomes.iter().map(|o| o.as_ref().ok().cloned()), sort)
}

impl fmt::Display for ResultTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>4}  {:<12} {:>12}", "", "Symbol", "Rate")?;
        writeln!(f, "{}", "-".repeat(30))?;
        for (i, r) in self.records.iter().enumerate() {
            writeln!(f, "{:>4}  {:<12} {:>12.2}", i, r.symbol, r.rate)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fetch::SkipReason;

    #[test]
    fn sorts_ascending_and_drops_absent() {
        let input = vec![
            Some(StockRecord::new(3.1, "AAA")),
            None,
            Some(StockRecord::new(1.2, "BBB")),
        ];
        let table = tabulate(input, true);
        assert_eq!(
            table.records(),
            &[StockRecord::new(1.2, "BBB"), StockRecord::new(3.1, "AAA")]
        );
    }

    #[test]
    fn unsorted_keeps_input_order() {
        let input = vec![
            Some(StockRecord::new(3.1, "AAA")),
            None,
            Some(StockRecord::new(1.2, "BBB")),
        ];
        assert_eq!(tabulate(input, false).symbols(), vec!["AAA", "BBB"]);
    }

    #[test]
    fn all_absent_is_empty() {
        let table = tabulate(vec![None, None, None], true);
        assert!(table.is_empty());
    }

    #[test]
    fn sorting_drops_nan_rates() {
        let input = vec![
            Some(StockRecord::new(f64::NAN, "NAN")),
            Some(StockRecord::new(2.0, "OK")),
        ];
        assert_eq!(tabulate(input.clone(), true).symbols(), vec!["OK"]);
        assert_eq!(tabulate(input, false).len(), 2);
    }

    #[test]
    fn equal_rates_keep_fetch_order() {
        let input = vec![
            Some(StockRecord::new(2.0, "FIRST")),
            Some(StockRecord::new(1.0, "LOW")),
            Some(StockRecord::new(2.0, "SECOND")),
        ];
        assert_eq!(
            tabulate(input, true).symbols(),
            vec!["LOW", "FIRST", "SECOND"]
        );
    }

    #[test]
    fn outcomes_treat_errors_as_absent() {
        let outcomes = vec![
            Err(SkipReason::MissingField),
            Ok(StockRecord::new(2.5, "CCC")),
            Err(SkipReason::Transport("timeout".into())),
        ];
        assert_eq!(tabulate_outcomes(&outcomes, false).symbols(), vec!["CCC"]);
    }

    #[test]
    fn display_lists_rows() {
        let table = ResultTable::new(vec![StockRecord::new(1.25, "7203.T")]);
        let text = table.to_string();
        assert!(text.contains("Symbol"));
        assert!(text.contains("7203.T"));
        assert!(text.contains("1.25"));
    }
}
