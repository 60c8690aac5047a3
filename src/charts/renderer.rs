//! Static Chart Renderer
//! Writes the dashboard charts as PNG images and the summary as JSON.
//!
//! Output files, all inside the export directory:
//! - `top_years.png`: horizontal bar chart of the yearly ranking
//! - `top_countries.png`: pie chart of the country ranking
//! - `summary.json`: metrics and both rankings

use super::plotter::{ChartData, CATEGORY20, DARK2};
use crate::stats::DashboardSummary;
use plotters::coord::ranged1d::SegmentValue;
use plotters::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub const BAR_CHART_FILE: &str = "top_years.png";
pub const PIE_CHART_FILE: &str = "top_countries.png";
pub const SUMMARY_FILE: &str = "summary.json";

const IMAGE_SIZE: (u32, u32) = (900, 600);

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to render chart: {0}")]
    Render(String),
    #[error("Failed to serialize summary: {0}")]
    Serialize(#[from] serde_json::Error),
}

fn render_err<E: std::fmt::Display>(err: E) -> ExportError {
    ExportError::Render(err.to_string())
}

fn rgb(palette: &[[u8; 3]], idx: usize) -> RGBColor {
    let [r, g, b] = palette[idx % palette.len()];
    RGBColor(r, g, b)
}

/// Renders dashboard charts to image files.
pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Horizontal bar chart, largest entry at the top.
    pub fn render_bar_chart(data: &ChartData, path: &Path) -> Result<(), ExportError> {
        let n = data.values.len();
        let max = data.values.iter().copied().fold(0.0, f64::max).max(1.0);

        let root = BitMapBackend::new(path, IMAGE_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Top 5 Yearly Fatalities", ("sans-serif", 26))
            .margin(20)
            .x_label_area_size(45)
            .y_label_area_size(80)
            .build_cartesian_2d(0f64..max * 1.1, (0..n).into_segmented())
            .map_err(render_err)?;

        let labels = &data.labels;
        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(n)
            .y_label_formatter(&|value| match value {
                SegmentValue::CenterOf(pos) if *pos < n => {
                    labels.get(n - 1 - pos).cloned().unwrap_or_default()
                }
                _ => String::new(),
            })
            .x_desc("Total Fatalities")
            .y_desc("Year")
            .draw()
            .map_err(render_err)?;

        chart
            .draw_series(data.values.iter().enumerate().map(|(i, &value)| {
                let pos = n - 1 - i;
                let mut bar = Rectangle::new(
                    [
                        (0.0, SegmentValue::Exact(pos)),
                        (value, SegmentValue::Exact(pos + 1)),
                    ],
                    rgb(&CATEGORY20, i).filled(),
                );
                bar.set_margin(6, 6, 0, 0);
                bar
            }))
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
        Ok(())
    }

    /// Pie chart with labels and percentages.
    pub fn render_pie_chart(data: &ChartData, path: &Path) -> Result<(), ExportError> {
        let root = BitMapBackend::new(path, IMAGE_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;
        let root = root
            .titled("Top 5 Countries by Fatalities", ("sans-serif", 26))
            .map_err(render_err)?;

        let (width, height) = root.dim_in_pixel();
        let center = (width as i32 / 2, height as i32 / 2);
        let radius = f64::from(width.min(height)) * 0.35;
        let colors: Vec<RGBColor> = (0..data.values.len()).map(|i| rgb(&DARK2, i)).collect();

        let mut pie = Pie::new(&center, &radius, &data.values, &colors, &data.labels);
        pie.start_angle(-90.0);
        pie.label_style(("sans-serif", 18).into_font().color(&BLACK));
        pie.percentages(("sans-serif", 16).into_font().color(&WHITE));
        root.draw(&pie).map_err(render_err)?;

        root.present().map_err(render_err)?;
        Ok(())
    }

    /// Write the summary as pretty JSON.
    pub fn write_summary(summary: &DashboardSummary, path: &Path) -> Result<(), ExportError> {
        let json = serde_json::to_string_pretty(summary)?;
        fs::write(path, json).map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Render both charts into `dir`. Empty rankings are skipped.
    pub fn export_charts(
        summary: &DashboardSummary,
        dir: &Path,
    ) -> Result<Vec<PathBuf>, ExportError> {
        fs::create_dir_all(dir).map_err(|source| ExportError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut written = Vec::new();

        let years = ChartData::from_ranking(&summary.top_years);
        if !years.is_empty() {
            let path = dir.join(BAR_CHART_FILE);
            Self::render_bar_chart(&years, &path)?;
            written.push(path);
        }

        let countries = ChartData::from_ranking(&summary.top_countries);
        if countries.total() > 0.0 {
            let path = dir.join(PIE_CHART_FILE);
            Self::render_pie_chart(&countries, &path)?;
            written.push(path);
        }

        info!(files = written.len(), dir = %dir.display(), "charts exported");
        Ok(written)
    }

    /// Write `summary.json` into `dir`.
    pub fn export_summary(summary: &DashboardSummary, dir: &Path) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(dir).map_err(|source| ExportError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = dir.join(SUMMARY_FILE);
        Self::write_summary(summary, &path)?;
        info!(path = %path.display(), "summary exported");
        Ok(path)
    }
}
