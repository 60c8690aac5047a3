//! Dashboard Session
//! Owns the cleaned table for one dashboard and recomputes the view on demand.

use crate::data::{apply_filters, CrashTable, FilterOptions, FilterSelection};
use crate::stats::{DashboardSummary, StatsCalculator};
use std::time::Instant;
use tracing::debug;

/// Filtered rows plus the metrics derived from them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardSnapshot {
    pub filtered: CrashTable,
    pub summary: DashboardSummary,
}

/// State of one dashboard: the cleaned table, its filter choices and the
/// user's current selection.
#[derive(Debug, Clone)]
pub struct DashboardSession {
    table: CrashTable,
    options: FilterOptions,
    selection: FilterSelection,
}

impl DashboardSession {
    pub fn new(table: CrashTable) -> Self {
        let options = FilterOptions::from_table(&table);
        Self {
            table,
            options,
            selection: FilterSelection::default(),
        }
    }

    pub fn table(&self) -> &CrashTable {
        &self.table
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut FilterSelection {
        &mut self.selection
    }

    /// Filter choices together with the editable selection.
    pub fn filters_mut(&mut self) -> (&FilterOptions, &mut FilterSelection) {
        (&self.options, &mut self.selection)
    }

    /// Re-derive the filtered view and all metrics from the full table.
    pub fn snapshot(&self) -> DashboardSnapshot {
        let started = Instant::now();
        let filtered = apply_filters(&self.table, &self.selection);
        let summary = StatsCalculator::summarize(&filtered);
        debug!(
            rows = filtered.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "dashboard recomputed"
        );

        DashboardSnapshot { filtered, summary }
    }
}
