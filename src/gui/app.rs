//! Dashboard Main Application
//! Main window with the filter panel and the dashboard body.

use crate::charts::StaticChartRenderer;
use crate::config::AppConfig;
use crate::data::{CrashTable, DataLoader};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::session::{DashboardSession, DashboardSnapshot};
use egui::SidePanel;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::thread;
use tracing::{error, info, warn};

/// CSV loading result from background thread
enum LoadResult {
    Complete { table: CrashTable, path: PathBuf },
    Error(String),
}

/// Main application window.
pub struct DashboardApp {
    config: AppConfig,
    session: DashboardSession,
    snapshot: DashboardSnapshot,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig, table: CrashTable) -> Self {
        let mut control_panel = ControlPanel::new();
        control_panel.data_path = Some(config.data_path.clone());

        let mut app = Self {
            config,
            session: DashboardSession::new(table),
            snapshot: DashboardSnapshot::default(),
            control_panel,
            chart_viewer: ChartViewer::new(),
            load_rx: None,
        };
        app.refresh();
        app.control_panel
            .set_status(&format!("Loaded {} rows", app.session.table().len()));
        app
    }

    /// Recompute the filtered view and metrics from the full table
    fn refresh(&mut self) {
        self.snapshot = self.session.snapshot();
        self.chart_viewer.set_summary(&self.snapshot.summary);
    }

    /// Handle CSV file selection; loading runs on a background thread
    fn handle_open_csv(&mut self) {
        if self.load_rx.is_some() {
            return; // Already loading
        }

        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        else {
            return;
        };

        self.control_panel.set_status("Loading CSV file...");
        self.control_panel.busy = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        thread::spawn(move || {
            let result = match DataLoader::load(&path) {
                Ok(table) => LoadResult::Complete { table, path },
                Err(e) => LoadResult::Error(e.to_string()),
            };
            let _ = tx.send(result);
        });
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(LoadResult::Complete { table, path }) => {
                info!(path = %path.display(), rows = table.len(), "dataset replaced");
                self.control_panel
                    .set_status(&format!("Loaded {} rows", table.len()));
                self.control_panel.data_path = Some(path);
                self.control_panel.busy = false;
                self.session = DashboardSession::new(table);
                self.refresh();
            }
            Ok(LoadResult::Error(message)) => {
                error!(%message, "failed to load dataset");
                self.control_panel.set_status(&format!("Error: {}", message));
                self.control_panel.busy = false;
            }
            Err(std::sync::mpsc::TryRecvError::Empty) => {
                self.load_rx = Some(rx);
            }
            Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                self.control_panel.set_status("Error: loader stopped unexpectedly");
                self.control_panel.busy = false;
            }
        }
    }

    fn handle_export_charts(&mut self) {
        let dir = self.config.export_dir.clone();
        match StaticChartRenderer::export_charts(&self.snapshot.summary, &dir) {
            Ok(files) if files.is_empty() => {
                self.control_panel.set_status("No charts to export");
            }
            Ok(files) => {
                self.control_panel.set_status(&format!(
                    "Exported {} chart(s) to {}",
                    files.len(),
                    dir.display()
                ));
                if let Err(e) = open::that(&dir) {
                    warn!(error = %e, "could not open export directory");
                }
            }
            Err(e) => {
                error!(error = %e, "chart export failed");
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }

    fn handle_export_summary(&mut self) {
        match StaticChartRenderer::export_summary(&self.snapshot.summary, &self.config.export_dir) {
            Ok(path) => self
                .control_panel
                .set_status(&format!("Summary written to {}", path.display())),
            Err(e) => {
                error!(error = %e, "summary export failed");
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }

    fn title(&self) -> String {
        self.control_panel
            .data_path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "Air Crash Dashboard".to_string())
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        // Request repaint while loading
        if self.load_rx.is_some() {
            ctx.request_repaint();
        }

        SidePanel::left("filters")
            .min_width(240.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let (options, selection) = self.session.filters_mut();
                    let action = self.control_panel.show(ui, options, selection);

                    match action {
                        ControlPanelAction::OpenCsv => self.handle_open_csv(),
                        ControlPanelAction::FiltersChanged => self.refresh(),
                        ControlPanelAction::ExportCharts => self.handle_export_charts(),
                        ControlPanelAction::ExportSummary => self.handle_export_summary(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        let title = self.title();
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer
                .show(ui, &title, &self.snapshot, self.config.preview_rows);
        });
    }
}
