//! Crash Record Module
//! Typed rows of the cleaned dataset and the calendar lookups used to derive them.

use chrono::NaiveDate;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Placeholder for missing categorical values.
pub const UNKNOWN: &str = "Unknown";

/// Month names mapped to month numbers. "Feburary" is kept next to the correct
/// spelling because the published dataset uses it.
pub const MONTHS: [(&str, u32); 13] = [
    ("January", 1),
    ("February", 2),
    ("Feburary", 2),
    ("March", 3),
    ("April", 4),
    ("May", 5),
    ("June", 6),
    ("July", 7),
    ("August", 8),
    ("September", 9),
    ("October", 10),
    ("November", 11),
    ("December", 12),
];

/// Look up a month number by its English name (case-sensitive).
pub fn month_number(name: &str) -> Option<u32> {
    MONTHS
        .iter()
        .find(|(month, _)| *month == name)
        .map(|(_, num)| *num)
}

/// Decade buckets used to group crashes by period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum YearBin {
    Early1910s,
    Mid1920s,
    Late1930s,
    Early1940s,
    Mid1950s,
    Late1960s,
    Early1970s,
    Late1980s,
    Early2000s,
    Mid2010s,
    Early2020s,
}

impl YearBin {
    /// Bin edges. Each bucket is `(edge[i], edge[i + 1]]`, the first one also
    /// includes its lower edge.
    pub const EDGES: [i64; 12] = [
        1908, 1920, 1932, 1944, 1956, 1968, 1980, 1992, 2004, 2016, 2020, 2024,
    ];

    pub const ALL: [YearBin; 11] = [
        YearBin::Early1910s,
        YearBin::Mid1920s,
        YearBin::Late1930s,
        YearBin::Early1940s,
        YearBin::Mid1950s,
        YearBin::Late1960s,
        YearBin::Early1970s,
        YearBin::Late1980s,
        YearBin::Early2000s,
        YearBin::Mid2010s,
        YearBin::Early2020s,
    ];

    /// Bucket a year. Years outside the edges have no bucket.
    pub fn from_year(year: i64) -> Option<Self> {
        let first = Self::EDGES[0];
        let last = Self::EDGES[Self::EDGES.len() - 1];
        if year < first || year > last {
            return None;
        }
        if year == first {
            return Some(Self::ALL[0]);
        }

        Self::EDGES
            .windows(2)
            .position(|edge| year > edge[0] && year <= edge[1])
            .map(|idx| Self::ALL[idx])
    }

    pub fn label(&self) -> &'static str {
        match self {
            YearBin::Early1910s => "Early 1910s",
            YearBin::Mid1920s => "Mid 1920s",
            YearBin::Late1930s => "Late 1930s",
            YearBin::Early1940s => "Early 1940s",
            YearBin::Mid1950s => "Mid 1950s",
            YearBin::Late1960s => "Late 1960s",
            YearBin::Early1970s => "Early 1970s",
            YearBin::Late1980s => "Late 1980s",
            YearBin::Early2000s => "Early 2000s",
            YearBin::Mid2010s => "Mid 2010s",
            YearBin::Early2020s => "Early 2020s",
        }
    }
}

/// One cleaned row of the crash dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct CrashRecord {
    pub year: Option<i64>,
    pub quarter: Option<String>,
    pub month: Option<String>,
    pub month_num: Option<u32>,
    pub month_date: Option<NaiveDate>,
    pub month_name: Option<String>,
    pub year_bin: Option<YearBin>,
    pub day: Option<u32>,
    pub country_region: String,
    pub operator: String,
    pub aircraft_manufacturer: String,
    pub aircraft: Option<String>,
    pub fatalities_air: Option<u64>,
    pub ground: Option<u64>,
    /// Always finite when present.
    pub abroad: Option<f64>,
    /// Values of the remaining source columns, aligned with `CrashTable::extra_columns`.
    pub extra: Vec<Option<String>>,
}

impl Default for CrashRecord {
    fn default() -> Self {
        Self {
            year: None,
            quarter: None,
            month: None,
            month_num: None,
            month_date: None,
            month_name: None,
            year_bin: None,
            day: None,
            country_region: UNKNOWN.to_string(),
            operator: UNKNOWN.to_string(),
            aircraft_manufacturer: UNKNOWN.to_string(),
            aircraft: None,
            fatalities_air: None,
            ground: None,
            abroad: None,
            extra: Vec::new(),
        }
    }
}

// `abroad` is never NaN, so float equality is reflexive here.
impl Eq for CrashRecord {}

impl Hash for CrashRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.year.hash(state);
        self.quarter.hash(state);
        self.month.hash(state);
        self.month_num.hash(state);
        self.month_date.hash(state);
        self.month_name.hash(state);
        self.year_bin.hash(state);
        self.day.hash(state);
        self.country_region.hash(state);
        self.operator.hash(state);
        self.aircraft_manufacturer.hash(state);
        self.aircraft.hash(state);
        self.fatalities_air.hash(state);
        self.ground.hash(state);
        // 0.0 and -0.0 compare equal, so they must hash equal
        self.abroad
            .map(|v| if v == 0.0 { 0u64 } else { v.to_bits() })
            .hash(state);
        self.extra.hash(state);
    }
}

/// The cleaned dataset. Cheap to clone: records are shared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrashTable {
    extra_columns: Arc<[String]>,
    records: Arc<[CrashRecord]>,
}

impl CrashTable {
    pub fn new(extra_columns: Vec<String>, records: Vec<CrashRecord>) -> Self {
        Self {
            extra_columns: extra_columns.into(),
            records: records.into(),
        }
    }

    /// Build a table sharing this table's extra column layout.
    pub fn with_records(&self, records: Vec<CrashRecord>) -> Self {
        Self {
            extra_columns: Arc::clone(&self.extra_columns),
            records: records.into(),
        }
    }

    pub fn records(&self) -> &[CrashRecord] {
        &self.records
    }

    pub fn extra_columns(&self) -> &[String] {
        &self.extra_columns
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_month_lookup_accepts_both_february_spellings() {
        assert_eq!(month_number("January"), Some(1));
        assert_eq!(month_number("February"), Some(2));
        assert_eq!(month_number("Feburary"), Some(2));
        assert_eq!(month_number("December"), Some(12));
        assert_eq!(month_number("december"), None);
        assert_eq!(month_number(""), None);
    }

    #[test]
    fn test_year_bin_edges() {
        assert_eq!(YearBin::from_year(1907), None);
        assert_eq!(YearBin::from_year(1908), Some(YearBin::Early1910s));
        assert_eq!(YearBin::from_year(1920), Some(YearBin::Early1910s));
        assert_eq!(YearBin::from_year(1921), Some(YearBin::Mid1920s));
        assert_eq!(YearBin::from_year(1985), Some(YearBin::Early1970s));
        assert_eq!(YearBin::from_year(1992), Some(YearBin::Early1970s));
        assert_eq!(YearBin::from_year(1996), Some(YearBin::Late1980s));
        assert_eq!(YearBin::from_year(2004), Some(YearBin::Late1980s));
        assert_eq!(YearBin::from_year(2020), Some(YearBin::Mid2010s));
        assert_eq!(YearBin::from_year(2024), Some(YearBin::Early2020s));
        assert_eq!(YearBin::from_year(2025), None);
    }

    #[test]
    fn test_year_bin_labels_are_distinct() {
        let labels: HashSet<&str> = YearBin::ALL.iter().map(YearBin::label).collect();
        assert_eq!(labels.len(), YearBin::ALL.len());
        assert_eq!(YearBin::Early1970s.label(), "Early 1970s");
    }

    #[test]
    fn test_signed_zero_abroad_hashes_equal() {
        use std::collections::hash_map::DefaultHasher;

        let a = CrashRecord {
            abroad: Some(0.0),
            ..Default::default()
        };
        let b = CrashRecord {
            abroad: Some(-0.0),
            ..Default::default()
        };
        let hash = |r: &CrashRecord| {
            let mut h = DefaultHasher::new();
            r.hash(&mut h);
            h.finish()
        };
        assert_eq!(a, b);
        assert_eq!(hash(&a), hash(&b));
    }

    proptest! {
        #[test]
        fn prop_year_bin_is_pure(year in 1800i64..2100) {
            prop_assert_eq!(YearBin::from_year(year), YearBin::from_year(year));
            let in_range = (1908..=2024).contains(&year);
            prop_assert_eq!(YearBin::from_year(year).is_some(), in_range);
        }
    }
}
