//! Crime Dashboard - Regional Crime Statistics Explorer
//!
//! Interactive dashboard over a static table of regional crime statistics.

use anyhow::Context;
use clap::Parser;
use crime_dashboard::config::DashboardConfig;
use crime_dashboard::gui::CrimeDashboardApp;
use crime_dashboard::logging;
use eframe::egui;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "crime_dashboard", version, about = "Regional crime statistics dashboard")]
struct Cli {
    /// Configuration file (defaults to ./crime_dashboard.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// CSV file to load at startup
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Keep only known states/UTs and drop TOTAL district rows
    #[arg(long)]
    restrict_regions: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    let mut config =
        DashboardConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(data) = cli.data {
        config.data_path = data;
    }
    if cli.restrict_regions {
        config.restrict_regions = true;
    }
    logging::log_config_info(&config);

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([1000.0, 650.0])
            .with_title("Crime Data Visualization Dashboard"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Crime Dashboard",
        options,
        Box::new(|cc| Ok(Box::new(CrimeDashboardApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("Dashboard failed: {e}"))
}
