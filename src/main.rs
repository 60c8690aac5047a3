//! Air Crash Dashboard - Historical Air Crash Data Explorer
//!
//! Loads the air crash dataset, cleans it, and shows filterable metrics and charts.

mod charts;
mod config;
mod data;
mod gui;
mod logging;
mod session;
mod stats;

use anyhow::Context;
use clap::Parser;
use config::AppConfig;
use data::DataLoader;
use eframe::egui;
use gui::DashboardApp;
use std::path::PathBuf;
use tracing::info;

/// Command line options. Flags override the config file.
#[derive(Parser, Debug)]
#[command(name = "aircrash-dashboard", version, about)]
struct Cli {
    /// CSV dataset to load at startup
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// JSON config file (defaults to ./aircrash-dashboard.json when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for exported charts and summaries
    #[arg(long)]
    export_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(data) = cli.data {
        config.data_path = data;
    }
    if let Some(dir) = cli.export_dir {
        config.export_dir = dir;
    }

    logging::init_logging(&config.log_filter);
    info!(data = %config.data_path.display(), "starting dashboard");

    // The dataset is required up front; no partial load
    let table = DataLoader::load(&config.data_path)
        .with_context(|| format!("loading {}", config.data_path.display()))?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 650.0])
            .with_title("Air Crash Dashboard"),
        ..Default::default()
    };

    eframe::run_native(
        "Air Crash Dashboard",
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, config, table)))),
    )
    .map_err(|e| anyhow::anyhow!("dashboard window failed: {e}"))
}
