//! Chart Viewer Widget
//! Central panel: metric cards, row preview, ranking tables and charts.

use crate::charts::{ChartData, ChartPlotter};
use crate::data::{CrashRecord, CrashTable, YearBin};
use crate::session::DashboardSnapshot;
use crate::stats::{DashboardSummary, RankedEntry, YearKey};
use egui::{RichText, ScrollArea};
use std::fmt::Display;

const CHART_HEIGHT: f32 = 300.0;

/// Fixed columns of the preview grid, in display order.
const PREVIEW_COLUMNS: [&str; 15] = [
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
    "month_num",
    "month_date",
    "month_name",
    "year_bin",
];

fn cell<T: Display>(value: &Option<T>) -> String {
    value.as_ref().map(|v| v.to_string()).unwrap_or_default()
}

fn preview_cells(record: &CrashRecord) -> Vec<String> {
    let mut cells = vec![
        cell(&record.year),
        cell(&record.quarter),
        cell(&record.month),
        cell(&record.day),
        record.country_region.clone(),
        record.operator.clone(),
        record.aircraft_manufacturer.clone(),
        cell(&record.aircraft),
        cell(&record.fatalities_air),
        cell(&record.ground),
        cell(&record.abroad),
        cell(&record.month_num),
        cell(&record.month_date),
        cell(&record.month_name),
        record
            .year_bin
            .as_ref()
            .map(YearBin::label)
            .unwrap_or_default()
            .to_string(),
    ];
    cells.extend(record.extra.iter().map(cell));
    cells
}

/// Scrollable dashboard body.
#[derive(Default)]
pub struct ChartViewer {
    years: ChartData,
    countries: ChartData,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refresh chart inputs after a recompute
    pub fn set_summary(&mut self, summary: &DashboardSummary) {
        self.years = ChartData::from_ranking(&summary.top_years);
        self.countries = ChartData::from_ranking(&summary.top_countries);
    }

    pub fn show(
        &self,
        ui: &mut egui::Ui,
        title: &str,
        snapshot: &DashboardSnapshot,
        preview_rows: usize,
    ) {
        ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
            ui.heading(title);
            ui.add_space(10.0);

            Self::draw_preview(ui, &snapshot.filtered, preview_rows);
            ui.add_space(15.0);

            Self::draw_metrics(ui, &snapshot.summary);
            ui.add_space(15.0);
            ui.separator();

            ui.label(RichText::new("Top 5 Years With Highest Fatalities").size(16.0).strong());
            Self::draw_ranking::<YearKey>(ui, "top_years_table", "year", &snapshot.summary.top_years);
            ui.add_space(10.0);

            if self.years.is_empty() {
                ui.label(RichText::new("ℹ No data to display for the selected filters.").italics());
            } else {
                ui.label(RichText::new("Top 5 Yearly Fatalities (Bar Chart)").size(16.0).strong());
                ChartPlotter::draw_bar_chart(ui, &self.years, CHART_HEIGHT);
            }
            ui.add_space(15.0);

            ui.label(RichText::new("Top 5 Countries by Fatalities").size(16.0).strong());
            ChartPlotter::draw_pie_chart(ui, &self.countries, CHART_HEIGHT);
        });
    }

    fn draw_preview(ui: &mut egui::Ui, table: &CrashTable, rows: usize) {
        ScrollArea::horizontal().id_salt("preview_scroll").show(ui, |ui| {
            egui::Grid::new("preview_grid")
                .striped(true)
                .spacing([12.0, 4.0])
                .show(ui, |ui| {
                    let headers = PREVIEW_COLUMNS
                        .iter()
                        .copied()
                        .chain(table.extra_columns().iter().map(String::as_str));
                    for name in headers {
                        ui.label(RichText::new(name).strong().size(11.0));
                    }
                    ui.end_row();

                    for record in table.records().iter().take(rows) {
                        for value in preview_cells(record) {
                            ui.label(RichText::new(value).size(11.0));
                        }
                        ui.end_row();
                    }
                });
        });
        ui.label(
            RichText::new(format!("Showing {} of {} rows", rows.min(table.len()), table.len()))
                .size(11.0)
                .weak(),
        );
    }

    fn draw_metrics(ui: &mut egui::Ui, summary: &DashboardSummary) {
        let metrics = [
            ("Fatality Records", summary.record_count.to_string()),
            ("Sum of Years", summary.year_sum.to_string()),
            ("Total Fatalities (Air)", summary.fatality_sum.to_string()),
            ("Unique Aircraft", summary.unique_aircraft_count.to_string()),
        ];

        ui.columns(metrics.len(), |columns| {
            for (column, (label, value)) in columns.iter_mut().zip(metrics.iter()) {
                egui::Frame::none()
                    .fill(column.visuals().widgets.noninteractive.bg_fill)
                    .rounding(6.0)
                    .inner_margin(10.0)
                    .show(column, |ui| {
                        ui.label(RichText::new(*label).size(12.0).weak());
                        ui.label(RichText::new(value).size(24.0).strong());
                    });
            }
        });
    }

    fn draw_ranking<K: Display>(
        ui: &mut egui::Ui,
        id: &str,
        key_name: &str,
        entries: &[RankedEntry<K>],
    ) {
        egui::Grid::new(id).striped(true).min_col_width(80.0).show(ui, |ui| {
            ui.label(RichText::new(key_name).strong());
            ui.label(RichText::new("fatalities_air").strong());
            ui.end_row();
            for entry in entries {
                ui.label(entry.key.to_string());
                ui.label(entry.fatalities.to_string());
                ui.end_row();
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_cells_align_with_headers() {
        let record = CrashRecord {
            year: Some(1985),
            year_bin: Some(YearBin::Early1970s),
            fatalities_air: Some(520),
            extra: vec![Some("Ueno".to_string()), None],
            ..Default::default()
        };
        let cells = preview_cells(&record);

        assert_eq!(cells.len(), PREVIEW_COLUMNS.len() + 2);
        assert_eq!(cells[0], "1985");
        assert_eq!(cells[4], "Unknown");
        assert_eq!(cells[8], "520");
        assert_eq!(cells[14], "Early 1970s");
        assert_eq!(cells[15], "Ueno");
        assert_eq!(cells[16], "");
    }
}
