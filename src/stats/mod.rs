//! Stats module - summary metrics and rankings

mod calculator;

pub use calculator::{DashboardSummary, RankedEntry, StatsCalculator, YearKey};
