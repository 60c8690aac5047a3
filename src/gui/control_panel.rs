//! Control Panel Widget
//! Left side panel with the dataset picker, filter lists and export buttons.

use crate::data::{FilterOptions, FilterSelection};
use egui::{Color32, RichText, ScrollArea};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Left side control panel.
pub struct ControlPanel {
    pub data_path: Option<PathBuf>,
    pub status: String,
    pub busy: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            data_path: None,
            status: "Ready".to_string(),
            busy: false,
        }
    }
}

/// Checkbox list acting as a multi-select. Returns true when the set changed.
fn multiselect<T: Ord + Clone>(
    ui: &mut egui::Ui,
    id: &str,
    options: &[T],
    selected: &mut BTreeSet<T>,
    label: impl Fn(&T) -> String,
) -> bool {
    let mut changed = false;

    ScrollArea::vertical()
        .id_salt(id)
        .max_height(160.0)
        .show(ui, |ui| {
            for option in options {
                let mut checked = selected.contains(option);
                if ui.checkbox(&mut checked, label(option)).changed() {
                    if checked {
                        selected.insert(option.clone());
                    } else {
                        selected.remove(option);
                    }
                    changed = true;
                }
            }
        });

    changed
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set status line text
    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    /// Draw the control panel
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        options: &FilterOptions,
        selection: &mut FilterSelection,
    ) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("✈ Air Crash Dashboard")
                    .size(20.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();

        // ===== Data Source =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.horizontal(|ui| {
            let name = self
                .data_path
                .as_ref()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "No file loaded".to_string());
            ui.label(RichText::new(name).size(12.0));

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.add_enabled_ui(!self.busy, |ui| {
                    if ui.button("📂 Open CSV").clicked() {
                        action = ControlPanelAction::OpenCsv;
                    }
                });
            });
        });

        ui.add_space(10.0);
        ui.separator();

        // ===== Filters =====
        ui.horizontal(|ui| {
            ui.label(RichText::new("Filters").size(14.0).strong());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.small_button("Clear").clicked() && !selection.is_empty() {
                    selection.clear();
                    action = ControlPanelAction::FiltersChanged;
                }
            });
        });

        let mut changed = false;
        egui::CollapsingHeader::new("Year")
            .default_open(true)
            .show(ui, |ui| {
                changed |= multiselect(ui, "year_filter", &options.years, &mut selection.years, |y| {
                    y.to_string()
                });
            });
        egui::CollapsingHeader::new("Quarter")
            .default_open(true)
            .show(ui, |ui| {
                changed |= multiselect(
                    ui,
                    "quarter_filter",
                    &options.quarters,
                    &mut selection.quarters,
                    String::clone,
                );
            });
        egui::CollapsingHeader::new("Month")
            .default_open(true)
            .show(ui, |ui| {
                changed |= multiselect(
                    ui,
                    "month_filter",
                    &options.months,
                    &mut selection.months,
                    String::clone,
                );
            });
        if changed {
            action = ControlPanelAction::FiltersChanged;
        }

        ui.add_space(10.0);
        ui.separator();

        // ===== Export =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(!self.busy, |ui| {
                let charts = egui::Button::new(RichText::new("🖼 Export Charts").size(14.0))
                    .min_size(egui::vec2(160.0, 28.0));
                if ui.add(charts).clicked() {
                    action = ControlPanelAction::ExportCharts;
                }
                ui.add_space(5.0);
                let summary = egui::Button::new(RichText::new("📄 Export Summary").size(14.0))
                    .min_size(egui::vec2(160.0, 28.0));
                if ui.add(summary).clicked() {
                    action = ControlPanelAction::ExportSummary;
                }
            });
        });

        ui.add_space(10.0);
        ui.separator();

        let status_color = if self.status.starts_with("Error") {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    OpenCsv,
    FiltersChanged,
    ExportCharts,
    ExportSummary,
}
