//! Property-based tests for the cleaner.
//!
//! Verified properties:
//! 1. **No panics**: year parsing accepts any text
//! 2. **Idempotence**: cleaning canonical output changes nothing
//! 3. **Missing values**: measurement cells are empty or finite numbers
//! 4. **Filtering**: rows are only ever dropped, never invented
//!
//! ```bash
//! PROPTEST_CASES=5000 cargo test -p curator --test cleaning_properties
//! ```

use std::sync::Arc;

use proptest::prelude::*;

use curator::clean::parse_year;
use curator::{CleaningRules, CountryLookup, DataCleaner, DataTable};

// =============================================================================
// Test Strategies
// =============================================================================

fn country_cell() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Argentina".to_string()),
        Just("brazil".to_string()),
        Just("CHL".to_string()),
        Just(" Uruguay ".to_string()),
        Just("Atlantis".to_string()),
        Just(String::new()),
    ]
}

fn year_cell() -> impl Strategy<Value = String> {
    prop_oneof![
        (1950i32..2030).prop_map(|y| y.to_string()),
        (1950i32..2030).prop_map(|y| format!("{}.0", y)),
        (1950i32..2030, 1u32..13).prop_map(|(y, m)| format!("{}-{:02}", y, m)),
        Just("n/a".to_string()),
        Just(String::new()),
    ]
}

fn value_cell() -> impl Strategy<Value = String> {
    prop_oneof![
        (-1.0e6f64..1.0e6).prop_map(|v| format!("{:.3}", v)),
        (0i64..100_000).prop_map(|v| v.to_string()),
        Just("..".to_string()),
        Just("NA".to_string()),
        Just(String::new()),
        Just("not a number".to_string()),
    ]
}

fn note_cell() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z ]{0,12}",
        Just("NaN".to_string()),
        Just(String::new()),
    ]
}

fn raw_table() -> impl Strategy<Value = DataTable> {
    prop::collection::vec((country_cell(), year_cell(), value_cell(), note_cell()), 1..40).prop_map(
        |rows| {
            DataTable::new(
                vec!["Country Name".into(), "Year".into(), "GDP".into(), "note".into()],
                rows.into_iter().map(|(c, y, v, n)| vec![c, y, v, n]).collect(),
            )
        },
    )
}

fn cleaner() -> DataCleaner {
    DataCleaner::new(Arc::new(CountryLookup::builtin()))
}

// =============================================================================
// Year Parsing
// =============================================================================

proptest! {
    #[test]
    fn parse_year_never_panics(input in "\\PC{0,30}") {
        let _ = parse_year(&input);
    }

    #[test]
    fn parse_year_stays_in_range(input in "[0-9QMS\\-\\./ ]{0,12}") {
        if let Some(year) = parse_year(&input) {
            prop_assert!((1000..=2999).contains(&year));
        }
    }

    #[test]
    fn plain_years_round_trip(year in 1000i32..3000) {
        prop_assert_eq!(parse_year(&year.to_string()), Some(year));
    }
}

// =============================================================================
// Cleaning Invariants
// =============================================================================

proptest! {
    #[test]
    fn cleaning_is_idempotent(raw in raw_table()) {
        let cleaner = cleaner();
        let rules = CleaningRules::default();
        if let Ok(first) = cleaner.clean(&raw, &rules) {
            let second = cleaner.clean(&first.table, &rules).expect("canonical output cleans");
            prop_assert_eq!(&second.table, &first.table);
            prop_assert_eq!(second.year_range(), first.year_range());
        }
    }

    #[test]
    fn measurement_cells_are_empty_or_finite(raw in raw_table()) {
        if let Ok(dataset) = cleaner().clean(&raw, &CleaningRules::default()) {
            for column in &dataset.report.measurement_columns {
                let idx = dataset.table.column_index(column).expect("measurement column present");
                for cell in dataset.table.column_values(idx) {
                    prop_assert!(
                        cell.is_empty() || cell.parse::<f64>().map(f64::is_finite).unwrap_or(false),
                        "cell {:?} in {}", cell, column
                    );
                }
            }
        }
    }

    #[test]
    fn rows_only_dropped(raw in raw_table(), start in 1950i32..2030, span in 0i32..30) {
        let rules = CleaningRules::default().with_years(Some(start), Some(start + span));
        if let Ok(dataset) = cleaner().clean(&raw, &rules) {
            prop_assert!(dataset.table.row_count() <= raw.row_count());
            for year in dataset.table.column_values(1) {
                let year: i32 = year.parse().expect("integer year");
                prop_assert!(year >= start && year <= start + span);
            }
        }
    }
}
