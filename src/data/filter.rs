//! Row filtering by year, quarter and month.

use super::record::{CrashRecord, CrashTable};
use std::collections::BTreeSet;

/// Accepted values per filter key. An empty set places no restriction on that key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub years: BTreeSet<i64>,
    pub quarters: BTreeSet<String>,
    pub months: BTreeSet<String>,
}

fn accepts<T: Ord>(accepted: &BTreeSet<T>, value: Option<&T>) -> bool {
    accepted.is_empty() || value.is_some_and(|v| accepted.contains(v))
}

impl FilterSelection {
    pub fn is_empty(&self) -> bool {
        self.years.is_empty() && self.quarters.is_empty() && self.months.is_empty()
    }

    pub fn clear(&mut self) {
        self.years.clear();
        self.quarters.clear();
        self.months.clear();
    }

    /// Whether a record passes every active filter.
    pub fn matches(&self, record: &CrashRecord) -> bool {
        accepts(&self.years, record.year.as_ref())
            && accepts(&self.quarters, record.quarter.as_ref())
            && accepts(&self.months, record.month.as_ref())
    }
}

/// Keep only the rows matching `selection`. The input table is left untouched.
pub fn apply_filters(table: &CrashTable, selection: &FilterSelection) -> CrashTable {
    if selection.is_empty() {
        return table.clone();
    }

    let records = table
        .records()
        .iter()
        .filter(|record| selection.matches(record))
        .cloned()
        .collect();
    table.with_records(records)
}

/// Choices offered by the filter sidebar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub years: Vec<i64>,
    pub quarters: Vec<String>,
    pub months: Vec<String>,
}

impl FilterOptions {
    /// Distinct non-null values of each filter key, sorted ascending.
    pub fn from_table(table: &CrashTable) -> Self {
        let mut years = BTreeSet::new();
        let mut quarters = BTreeSet::new();
        let mut months = BTreeSet::new();

        for record in table.records() {
            years.extend(record.year);
            quarters.extend(record.quarter.iter().cloned());
            months.extend(record.month.iter().cloned());
        }

        Self {
            years: years.into_iter().collect(),
            quarters: quarters.into_iter().collect(),
            months: months.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(year: Option<i64>, quarter: Option<&str>, month: Option<&str>) -> CrashRecord {
        CrashRecord {
            year,
            quarter: quarter.map(str::to_string),
            month: month.map(str::to_string),
            ..Default::default()
        }
    }

    fn sample() -> CrashTable {
        CrashTable::new(
            Vec::new(),
            vec![
                record(Some(1985), Some("Qtr 3"), Some("August")),
                record(Some(1988), Some("Qtr 4"), Some("December")),
                record(Some(1985), Some("Qtr 1"), Some("January")),
                record(None, None, None),
            ],
        )
    }

    #[test]
    fn test_empty_selection_returns_everything() {
        let table = sample();
        let filtered = apply_filters(&table, &FilterSelection::default());
        assert_eq!(filtered, table);
    }

    #[test]
    fn test_single_key_filter() {
        let table = sample();
        let selection = FilterSelection {
            years: BTreeSet::from([1985]),
            ..Default::default()
        };
        let filtered = apply_filters(&table, &selection);
        assert_eq!(filtered.len(), 2);
        assert!(filtered.records().iter().all(|r| r.year == Some(1985)));
        // input untouched
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn test_filters_compose_with_and() {
        let selection = FilterSelection {
            years: BTreeSet::from([1985, 1988]),
            quarters: BTreeSet::from(["Qtr 3".to_string(), "Qtr 4".to_string()]),
            months: BTreeSet::from(["December".to_string()]),
        };
        let filtered = apply_filters(&sample(), &selection);
        assert_eq!(
            filtered.records().to_vec(),
            vec![record(Some(1988), Some("Qtr 4"), Some("December"))]
        );
    }

    #[test]
    fn test_null_values_never_match_active_filter() {
        let selection = FilterSelection {
            months: BTreeSet::from(["August".to_string()]),
            ..Default::default()
        };
        assert!(!selection.matches(&record(None, None, None)));
        assert!(FilterSelection::default().matches(&record(None, None, None)));
    }

    #[test]
    fn test_no_match_yields_empty_table() {
        let selection = FilterSelection {
            years: BTreeSet::from([2001]),
            ..Default::default()
        };
        assert!(apply_filters(&sample(), &selection).is_empty());
    }

    #[test]
    fn test_options_are_distinct_and_sorted() {
        let options = FilterOptions::from_table(&sample());
        assert_eq!(options.years, vec![1985, 1988]);
        assert_eq!(options.quarters, vec!["Qtr 1", "Qtr 3", "Qtr 4"]);
        assert_eq!(options.months, vec!["August", "December", "January"]);
    }
}
