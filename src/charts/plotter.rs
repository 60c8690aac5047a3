//! Chart Plotter Module
//! Interactive bar and pie charts drawn with egui_plot and the egui painter.

use crate::stats::RankedEntry;
use egui::{Color32, RichText, Sense, Shape, Stroke};
use egui_plot::{Bar, BarChart, Plot};
use std::f32::consts::{FRAC_PI_2, TAU};
use std::fmt::Display;

/// Vega "category20" scheme, used for the yearly bars.
pub const CATEGORY20: [[u8; 3]; 20] = [
    [31, 119, 180],
    [174, 199, 232],
    [255, 127, 14],
    [255, 187, 120],
    [44, 160, 44],
    [152, 223, 138],
    [214, 39, 40],
    [255, 152, 150],
    [148, 103, 189],
    [197, 176, 213],
    [140, 86, 75],
    [196, 156, 148],
    [227, 119, 194],
    [247, 182, 210],
    [127, 127, 127],
    [199, 199, 199],
    [188, 189, 34],
    [219, 219, 141],
    [23, 190, 207],
    [158, 218, 229],
];

/// Vega "dark2" scheme, used for the country slices.
pub const DARK2: [[u8; 3]; 8] = [
    [27, 158, 119],
    [217, 95, 2],
    [117, 112, 179],
    [231, 41, 138],
    [102, 166, 30],
    [230, 171, 2],
    [166, 118, 29],
    [102, 102, 102],
];

pub fn palette_color(palette: &[[u8; 3]], idx: usize) -> Color32 {
    let [r, g, b] = palette[idx % palette.len()];
    Color32::from_rgb(r, g, b)
}

/// Labels and values of one ranking, in ranking order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartData {
    pub fn from_ranking<K: Display>(entries: &[RankedEntry<K>]) -> Self {
        Self {
            labels: entries.iter().map(|e| e.key.to_string()).collect(),
            values: entries.iter().map(|e| e.fatalities as f64).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Share of the total held by each entry. Empty when the total is zero.
    pub fn fractions(&self) -> Vec<f64> {
        let total = self.total();
        if total <= 0.0 {
            return Vec::new();
        }
        self.values.iter().map(|v| v / total).collect()
    }

    /// Index of the slice covering `turn`, a fraction of a full clockwise
    /// turn starting at twelve o'clock.
    pub fn slice_at(&self, turn: f64) -> Option<usize> {
        let mut cumulative = 0.0;
        for (idx, fraction) in self.fractions().into_iter().enumerate() {
            cumulative += fraction;
            if turn < cumulative {
                return Some(idx);
            }
        }
        None
    }
}

/// Creates the dashboard charts.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Horizontal bars, largest at the top, one color per year.
    pub fn draw_bar_chart(ui: &mut egui::Ui, data: &ChartData, height: f32) {
        let n = data.values.len();
        let labels = data.labels.clone();

        let bars: Vec<Bar> = data
            .values
            .iter()
            .zip(&data.labels)
            .enumerate()
            .map(|(i, (&value, label))| {
                Bar::new((n - 1 - i) as f64, value)
                    .name(label)
                    .width(0.7)
                    .fill(palette_color(&CATEGORY20, i))
            })
            .collect();

        Plot::new("top_years_bar")
            .height(height)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .include_x(0.0)
            .x_axis_label("Total Fatalities")
            .y_axis_label("Year")
            .y_axis_formatter(move |mark, _range| {
                let pos = mark.value.round();
                if (mark.value - pos).abs() > 1e-6 || pos < 0.0 || pos >= n as f64 {
                    return String::new();
                }
                // bar at position p shows ranking entry n - 1 - p
                labels
                    .get(n - 1 - pos as usize)
                    .cloned()
                    .unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).horizontal().name("Fatalities"));
            });
    }

    /// Pie chart with a legend and a hover tooltip.
    pub fn draw_pie_chart(ui: &mut egui::Ui, data: &ChartData, diameter: f32) {
        let fractions = data.fractions();
        if fractions.is_empty() {
            ui.label(RichText::new("No fatalities recorded for the selected filters.").italics());
            return;
        }

        ui.horizontal(|ui| {
            let (rect, response) =
                ui.allocate_exact_size(egui::vec2(diameter, diameter), Sense::hover());
            let center = rect.center();
            let radius = diameter / 2.0 - 4.0;
            let painter = ui.painter_at(rect);

            let mut start = -FRAC_PI_2;
            for (idx, fraction) in fractions.iter().enumerate() {
                let sweep = *fraction as f32 * TAU;
                let color = palette_color(&DARK2, idx);
                // thin triangles so every piece stays convex
                let steps = ((sweep / (TAU / 180.0)).ceil() as usize).max(1);
                for step in 0..steps {
                    let a0 = start + sweep * step as f32 / steps as f32;
                    let a1 = start + sweep * (step + 1) as f32 / steps as f32;
                    painter.add(Shape::convex_polygon(
                        vec![
                            center,
                            center + radius * egui::vec2(a0.cos(), a0.sin()),
                            center + radius * egui::vec2(a1.cos(), a1.sin()),
                        ],
                        color,
                        Stroke::NONE,
                    ));
                }
                start += sweep;
            }

            if let Some(pos) = response.hover_pos() {
                let offset = pos - center;
                if offset.length() <= radius {
                    let turn = ((offset.y.atan2(offset.x) + FRAC_PI_2).rem_euclid(TAU) / TAU) as f64;
                    if let Some(idx) = data.slice_at(turn) {
                        response.on_hover_text_at_pointer(format!(
                            "country_region: {}\nfatalities_air: {}",
                            data.labels[idx], data.values[idx]
                        ));
                    }
                }
            }

            ui.add_space(12.0);
            ui.vertical(|ui| {
                ui.label(RichText::new("country_region").strong());
                for (idx, (label, value)) in data.labels.iter().zip(&data.values).enumerate() {
                    ui.horizontal(|ui| {
                        let (swatch, _) =
                            ui.allocate_exact_size(egui::vec2(12.0, 12.0), Sense::hover());
                        ui.painter()
                            .rect_filled(swatch, 2.0, palette_color(&DARK2, idx));
                        ui.label(format!("{}  ({})", label, value));
                    });
                }
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::YearKey;

    fn data(values: &[f64]) -> ChartData {
        ChartData {
            labels: (0..values.len()).map(|i| format!("c{}", i)).collect(),
            values: values.to_vec(),
        }
    }

    #[test]
    fn test_from_ranking_keeps_order() {
        let ranking = vec![
            RankedEntry {
                key: YearKey(Some(1985)),
                fatalities: 520,
            },
            RankedEntry {
                key: YearKey(None),
                fatalities: 3,
            },
        ];
        let chart = ChartData::from_ranking(&ranking);
        assert_eq!(chart.labels, vec!["1985", "Unknown"]);
        assert_eq!(chart.values, vec![520.0, 3.0]);
    }

    #[test]
    fn test_fractions() {
        assert_eq!(data(&[3.0, 1.0]).fractions(), vec![0.75, 0.25]);
        assert!(data(&[0.0, 0.0]).fractions().is_empty());
        assert!(data(&[]).fractions().is_empty());
    }

    #[test]
    fn test_slice_lookup() {
        let chart = data(&[2.0, 1.0, 1.0]);
        assert_eq!(chart.slice_at(0.0), Some(0));
        assert_eq!(chart.slice_at(0.49), Some(0));
        assert_eq!(chart.slice_at(0.5), Some(1));
        assert_eq!(chart.slice_at(0.99), Some(2));
        assert_eq!(chart.slice_at(1.0), None);
    }

    #[test]
    fn test_palette_wraps() {
        assert_eq!(palette_color(&DARK2, 0), palette_color(&DARK2, 8));
        assert_eq!(palette_color(&CATEGORY20, 2), Color32::from_rgb(255, 127, 14));
    }
}
