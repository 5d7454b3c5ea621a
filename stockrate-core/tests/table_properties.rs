//! Property tests for tabulation.

use proptest::prelude::*;
use stockrate_core::{tabulate, StockRecord};

fn arb_record() -> impl Strategy<Value = Option<StockRecord>> {
    prop::option::of(
        (
            prop_oneof![4 => 0.0f64..10_000.0, 1 => Just(f64::NAN)],
            "[A-Z0-9]{1,5}(\\.T)?",
        )
            .prop_map(|(rate, symbol)| StockRecord::new(rate, symbol)),
    )
}

proptest! {
    #[test]
    fn sorted_tabulate_is_idempotent(input in prop::collection::vec(arb_record(), 0..40)) {
        let once = tabulate(input.clone(), true);
        let twice = tabulate(input, true);
        // NaN never survives sorting, so PartialEq on f64 is safe here.
        prop_assert_eq!(once.records(), twice.records());

        let resorted = tabulate(once.records().iter().cloned().map(Some), true);
        prop_assert_eq!(resorted.records(), once.records());
    }

    #[test]
    fn sorted_tabulate_is_ascending_and_complete(input in prop::collection::vec(arb_record(), 0..40)) {
        let table = tabulate(input.clone(), true);
        for pair in table.records().windows(2) {
            prop_assert!(pair[0].rate <= pair[1].rate);
        }
        let expected = input.iter().flatten().filter(|r| !r.rate.is_nan()).count();
        prop_assert_eq!(table.len(), expected);
    }

    #[test]
    fn only_absent_input_is_empty(n in 0usize..20) {
        let table = tabulate(vec![None; n], true);
        prop_assert!(table.is_empty());
    }

    #[test]
    fn unsorted_preserves_order(input in prop::collection::vec(arb_record(), 0..40)) {
        let table = tabulate(input.clone(), false);
        let expected: Vec<String> = input.into_iter().flatten().map(|r| r.symbol).collect();
        let got: Vec<String> = table.records().iter().map(|r| r.symbol.clone()).collect();
        prop_assert_eq!(got, expected);
    }
}
