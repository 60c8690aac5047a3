//! Data Processor Module
//! Handles data cleaning: header normalization, imputation, numeric coercion,
//! derived calendar fields and de-duplication.

use super::loader::RawTable;
use super::record::{month_number, CrashRecord, CrashTable, YearBin, UNKNOWN};
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Columns read into typed record fields. Everything else lands in `extra`.
const KNOWN_COLUMNS: [&str; 11] = [
    "year",
    "quarter",
    "month",
    "day",
    "country_region",
    "operator",
    "aircraft_manufacturer",
    "aircraft",
    "fatalities_air",
    "ground",
    "abroad",
];

/// Normalize a header: trim, lowercase, spaces and slashes to `_`, parentheses removed.
pub fn normalize_column_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .replace(' ', "_")
        .replace(['(', ')'], "")
        .replace('/', "_")
}

/// Parse a finite number. Anything else is missing.
fn parse_number(value: Option<&str>) -> Option<f64> {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Parse an integral number; non-integral values are missing.
fn parse_integer(value: Option<&str>) -> Option<i64> {
    parse_number(value)
        .filter(|v| v.fract() == 0.0 && v.abs() < i64::MAX as f64)
        .map(|v| v as i64)
}

fn parse_count(value: Option<&str>) -> Option<u64> {
    parse_integer(value).and_then(|v| u64::try_from(v).ok())
}

fn parse_day(value: Option<&str>) -> Option<u32> {
    parse_integer(value)
        .filter(|v| (1..=31).contains(v))
        .map(|v| v as u32)
}

/// First day of the given month, if it is a real date.
fn first_of_month(year: Option<i64>, month: Option<u32>) -> Option<NaiveDate> {
    let year = i32::try_from(year?).ok()?;
    NaiveDate::from_ymd_opt(year, month?, 1)
}

/// Column positions after header normalization. First occurrence wins.
struct ColumnIndex {
    positions: HashMap<String, usize>,
    extra: Vec<(String, usize)>,
}

impl ColumnIndex {
    fn new(headers: &[String]) -> Self {
        let mut positions = HashMap::new();
        let mut extra = Vec::new();

        for (idx, header) in headers.iter().enumerate() {
            let name = normalize_column_name(header);
            if KNOWN_COLUMNS.contains(&name.as_str()) {
                positions.entry(name).or_insert(idx);
            } else {
                extra.push((name, idx));
            }
        }

        Self { positions, extra }
    }

    fn cell<'a>(&self, row: &'a [Option<String>], name: &str) -> Option<&'a str> {
        self.positions
            .get(name)
            .and_then(|&idx| row.get(idx))
            .and_then(|cell| cell.as_deref())
    }
}

/// Handles data cleaning and transformation operations.
pub struct DataProcessor;

impl DataProcessor {
    /// Turn raw cells into the cleaned, de-duplicated table.
    pub fn clean(raw: RawTable) -> CrashTable {
        let index = ColumnIndex::new(&raw.headers);
        let missing: Vec<&str> = KNOWN_COLUMNS
            .iter()
            .copied()
            .filter(|name| !index.positions.contains_key(*name))
            .collect();
        if !missing.is_empty() {
            debug!(?missing, "columns absent, treating as empty");
        }

        let records: Vec<CrashRecord> = raw
            .rows
            .iter()
            .map(|row| Self::clean_row(&index, row))
            .collect();

        let before = records.len();
        let records = Self::dedup(records);
        debug!(removed = before - records.len(), "dropped exact duplicates");

        let extra_columns = index.extra.into_iter().map(|(name, _)| name).collect();
        CrashTable::new(extra_columns, records)
    }

    fn clean_row(index: &ColumnIndex, row: &[Option<String>]) -> CrashRecord {
        let text = |name: &str| index.cell(row, name).map(str::to_string);
        let category = |name: &str| text(name).unwrap_or_else(|| UNKNOWN.to_string());

        let year = parse_integer(index.cell(row, "year"));
        let month = text("month");
        let month_num = month.as_deref().and_then(month_number);
        let month_date = first_of_month(year, month_num);

        CrashRecord {
            year,
            quarter: text("quarter"),
            month,
            month_num,
            month_date,
            month_name: month_date.map(|d| d.format("%B").to_string()),
            year_bin: year.and_then(YearBin::from_year),
            day: parse_day(index.cell(row, "day")),
            country_region: category("country_region"),
            operator: category("operator"),
            aircraft_manufacturer: category("aircraft_manufacturer"),
            aircraft: text("aircraft"),
            fatalities_air: parse_count(index.cell(row, "fatalities_air")),
            ground: parse_count(index.cell(row, "ground")),
            abroad: parse_number(index.cell(row, "abroad")),
            extra: index
                .extra
                .iter()
                .map(|(_, idx)| row.get(*idx).cloned().flatten())
                .collect(),
        }
    }

    /// Drop rows identical to an earlier row, keeping first-seen order.
    pub fn dedup(records: Vec<CrashRecord>) -> Vec<CrashRecord> {
        let mut seen: HashSet<CrashRecord> = HashSet::with_capacity(records.len());
        records
            .into_iter()
            .filter(|record| seen.insert(record.clone()))
            .collect()
    }
}
