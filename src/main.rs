//! Rate Explorer - interactive dashboard for health-insurance rate data.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Configuration, load or export error

mod app;
mod cli;
mod color;
mod config;
mod data;
mod engine;
mod error;
mod state;
mod ui;

use std::path::Path;

use anyhow::{Context, Result};
use app::RateExplorerApp;
use cli::Args;
use config::{Config, DEFAULT_CONFIG_FILE};
use eframe::egui;
use engine::request::{render, ChartRequest};
use state::AppState;

fn main() {
    let args = Args::parse_args();
    env_logger::init();

    if let Err(e) = run(args) {
        log::error!("{e:#}");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    if args.init_config {
        return handle_init_config();
    }

    let mut config = Config::resolve(args.config.as_deref())?;
    config.merge_with_args(&args);
    log::debug!("Configuration: {config:?}");

    if let Some(route) = &args.export {
        return export(&config, route);
    }

    let mut state = AppState::from_config(&config)?;
    if let Some(path) = &config.data.path {
        state.load_path(path);
    }
    run_dashboard(state)
}

/// Handle --init-config: write a default rate-explorer.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(DEFAULT_CONFIG_FILE);
    anyhow::ensure!(
        !path.exists(),
        "{DEFAULT_CONFIG_FILE} already exists. Remove it first or edit it manually."
    );

    std::fs::write(path, Config::default_toml()?)
        .with_context(|| format!("Failed to write {DEFAULT_CONFIG_FILE}"))?;
    println!("Created {DEFAULT_CONFIG_FILE} with default settings.");
    Ok(())
}

/// Print the data behind one view as JSON.
fn export(config: &Config, route: &str) -> Result<()> {
    let request = ChartRequest::from_route(route)?;
    let path = config
        .data
        .path
        .as_deref()
        .context("--export needs a dataset (--data or [data] path)")?;
    let dataset = data::loader::load_file(path)?;

    let chart = render(&dataset, &request, &config.view.options());
    let json = serde_json::to_string_pretty(&chart).context("serializing chart data")?;
    println!("{json}");
    Ok(())
}

fn run_dashboard(state: AppState) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Health Insurance Interactive EDA Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(RateExplorerApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("dashboard window failed: {e}"))
}
