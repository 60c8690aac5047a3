//! Statistics Calculator Module
//! Summary metrics and top-N fatality rankings over a (filtered) crash table.

use crate::data::{CrashRecord, CrashTable};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

/// Number of entries kept in each ranking.
pub const TOP_N: usize = 5;

/// Grouping key for the yearly ranking. Rows without a year form their own group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct YearKey(pub Option<i64>);

impl fmt::Display for YearKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(year) => write!(f, "{}", year),
            None => f.write_str(crate::data::UNKNOWN),
        }
    }
}

/// One (group, summed fatalities) pair of a ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry<K> {
    pub key: K,
    pub fatalities: u64,
}

/// Everything the dashboard shows about the current selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub record_count: usize,
    pub year_sum: i64,
    pub fatality_sum: u64,
    pub unique_aircraft_count: usize,
    pub top_years: Vec<RankedEntry<YearKey>>,
    pub top_countries: Vec<RankedEntry<String>>,
}

/// Handles metric calculations over crash tables.
pub struct StatsCalculator;

impl StatsCalculator {
    pub fn record_count(table: &CrashTable) -> usize {
        table.len()
    }

    /// Sum of the year values themselves, nulls counted as 0. Saturates at
    /// the integer bounds.
    pub fn year_sum(table: &CrashTable) -> i64 {
        table
            .records()
            .iter()
            .filter_map(|r| r.year)
            .fold(0i64, i64::saturating_add)
    }

    pub fn fatality_sum(table: &CrashTable) -> u64 {
        table
            .records()
            .iter()
            .filter_map(|r| r.fatalities_air)
            .fold(0u64, u64::saturating_add)
    }

    pub fn unique_aircraft_count(table: &CrashTable) -> usize {
        table
            .records()
            .iter()
            .filter_map(|r| r.aircraft.as_deref())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Group rows by `key`, sum fatalities, keep the `n` largest groups.
    ///
    /// Ties keep the order in which groups were first seen.
    pub fn top_by_fatalities<K, F>(
        records: &[CrashRecord],
        n: usize,
        key: F,
    ) -> Vec<RankedEntry<K>>
    where
        K: Eq + Hash + Clone,
        F: Fn(&CrashRecord) -> K,
    {
        let mut positions: HashMap<K, usize> = HashMap::new();
        let mut groups: Vec<RankedEntry<K>> = Vec::new();

        for record in records {
            let group_key = key(record);
            let idx = *positions.entry(group_key.clone()).or_insert_with(|| {
                groups.push(RankedEntry {
                    key: group_key,
                    fatalities: 0,
                });
                groups.len() - 1
            });
            let group = &mut groups[idx];
            group.fatalities = group
                .fatalities
                .saturating_add(record.fatalities_air.unwrap_or(0));
        }

        // stable sort keeps first-seen order among equal sums
        groups.sort_by(|a, b| b.fatalities.cmp(&a.fatalities));
        groups.truncate(n);
        groups
    }

    pub fn top_years_by_fatalities(table: &CrashTable) -> Vec<RankedEntry<YearKey>> {
        Self::top_by_fatalities(table.records(), TOP_N, |r| YearKey(r.year))
    }

    pub fn top_countries_by_fatalities(table: &CrashTable) -> Vec<RankedEntry<String>> {
        Self::top_by_fatalities(table.records(), TOP_N, |r| r.country_region.clone())
    }

    /// Compute every metric for a table. The two rankings run in parallel.
    pub fn summarize(table: &CrashTable) -> DashboardSummary {
        let (top_years, top_countries) = rayon::join(
            || Self::top_years_by_fatalities(table),
            || Self::top_countries_by_fatalities(table),
        );

        DashboardSummary {
            record_count: Self::record_count(table),
            year_sum: Self::year_sum(table),
            fatality_sum: Self::fatality_sum(table),
            unique_aircraft_count: Self::unique_aircraft_count(table),
            top_years,
            top_countries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataLoader;
    use pretty_assertions::assert_eq;

    fn crash(
        year: Option<i64>,
        country: &str,
        fatalities: Option<u64>,
        aircraft: Option<&str>,
    ) -> CrashRecord {
        CrashRecord {
            year,
            country_region: country.to_string(),
            fatalities_air: fatalities,
            aircraft: aircraft.map(str::to_string),
            ..Default::default()
        }
    }

    fn entry<K>(key: K, fatalities: u64) -> RankedEntry<K> {
        RankedEntry { key, fatalities }
    }

    #[test]
    fn test_empty_table_gives_zero_summary() {
        let summary = StatsCalculator::summarize(&CrashTable::default());
        assert_eq!(summary, DashboardSummary::default());
    }

    #[test]
    fn test_scalar_metrics() {
        let table = CrashTable::new(
            Vec::new(),
            vec![
                crash(Some(1985), "Japan", Some(520), Some("Boeing B-747-SR46")),
                crash(Some(1988), "UK", None, Some("Boeing B-747-121")),
                crash(None, "Peru", Some(10), Some("Boeing B-747-121")),
                crash(Some(1990), "Peru", Some(5), None),
            ],
        );

        assert_eq!(StatsCalculator::record_count(&table), 4);
        assert_eq!(StatsCalculator::year_sum(&table), 1985 + 1988 + 1990);
        assert_eq!(StatsCalculator::fatality_sum(&table), 535);
        assert_eq!(StatsCalculator::unique_aircraft_count(&table), 2);
    }

    #[test]
    fn test_top_years_limits_and_orders() {
        let records: Vec<CrashRecord> = (0..8)
            .map(|i| crash(Some(2000 + i), "X", Some(10 * i as u64), None))
            .collect();
        let table = CrashTable::new(Vec::new(), records);

        let top = StatsCalculator::top_years_by_fatalities(&table);
        assert_eq!(top.len(), TOP_N);
        assert_eq!(top[0], entry(YearKey(Some(2007)), 70));
        assert!(top.windows(2).all(|w| w[0].fatalities >= w[1].fatalities));
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let table = CrashTable::new(
            Vec::new(),
            vec![
                crash(Some(1990), "B", Some(5), None),
                crash(Some(1980), "A", Some(5), None),
                crash(Some(1970), "C", Some(9), None),
            ],
        );
        let top = StatsCalculator::top_countries_by_fatalities(&table);
        assert_eq!(
            top,
            vec![
                entry("C".to_string(), 9),
                entry("B".to_string(), 5),
                entry("A".to_string(), 5),
            ]
        );
    }

    #[test]
    fn test_null_years_form_their_own_group() {
        let table = CrashTable::new(Vec::new(), vec![crash(None, "X", None, None)]);
        let top = StatsCalculator::top_years_by_fatalities(&table);
        assert_eq!(top, vec![entry(YearKey(None), 0)]);
        assert_eq!(top[0].key.to_string(), "Unknown");
    }

    #[test]
    fn test_countries_sum_per_group() {
        let table = CrashTable::new(
            Vec::new(),
            vec![
                crash(Some(1985), "Japan", Some(520), None),
                crash(Some(1988), "UK", Some(270), None),
                crash(Some(1996), "Japan", Some(3), None),
            ],
        );
        assert_eq!(
            StatsCalculator::top_countries_by_fatalities(&table),
            vec![entry("Japan".to_string(), 523), entry("UK".to_string(), 270)]
        );
    }

    #[test]
    fn test_duplicate_rows_counted_once_after_cleaning() {
        let table =
            DataLoader::load_bytes(b"Year,Fatalities (air)\n1985,520\n1985,520\n1988,270\n")
                .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(
            StatsCalculator::top_years_by_fatalities(&table),
            vec![entry(YearKey(Some(1985)), 520), entry(YearKey(Some(1988)), 270)]
        );
    }

    #[test]
    fn test_unknown_country_and_bad_fatalities_contribute_zero() {
        let table = DataLoader::load_bytes(b"Country/Region,Fatalities (air)\n,N/A\n").unwrap();
        let summary = StatsCalculator::summarize(&table);

        assert_eq!(table.records()[0].country_region, "Unknown");
        assert_eq!(summary.fatality_sum, 0);
        assert_eq!(summary.top_countries, vec![entry("Unknown".to_string(), 0)]);
    }

    #[test]
    fn test_extreme_values_saturate() {
        let table = DataLoader::load_bytes(
            b"Year,Fatalities (air),Country/Region\n\
              9000000000000000000,9000000000000000000,X\n\
              8000000000000000000,8000000000000000000,X\n\
              7000000000000000000,7000000000000000000,X\n",
        )
        .unwrap();
        assert_eq!(table.len(), 3);

        let summary = StatsCalculator::summarize(&table);
        assert_eq!(summary.year_sum, i64::MAX);
        assert_eq!(summary.fatality_sum, u64::MAX);
        assert_eq!(summary.top_countries, vec![entry("X".to_string(), u64::MAX)]);
        assert_eq!(summary.top_years.len(), 3);

        let negative = CrashTable::new(
            Vec::new(),
            vec![
                crash(Some(i64::MIN + 1), "X", None, None),
                crash(Some(-5), "X", None, None),
            ],
        );
        assert_eq!(StatsCalculator::year_sum(&negative), i64::MIN);
    }

    #[test]
    fn test_summary_serializes_rankings() {
        let table = CrashTable::new(
            Vec::new(),
            vec![crash(Some(1985), "Japan", Some(520), None)],
        );
        let json = serde_json::to_value(StatsCalculator::summarize(&table)).unwrap();
        assert_eq!(json["top_years"][0]["key"], 1985);
        assert_eq!(json["top_countries"][0]["key"], "Japan");
        assert_eq!(json["fatality_sum"], 520);
    }
}
