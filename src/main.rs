// Hide console window on Windows in release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! Inkline - Main Entry Point
//!
//! Opens an inline rich-text editor in a window. When the window closes,
//! the submitted form is printed to stdout as JSON.

mod app;

use app::InklineApp;
use clap::Parser;
use inkline::config::{load_config, load_config_from};
use inkline::error::ResultExt;
use log::info;
use std::path::PathBuf;

/// Application name constant.
const APP_NAME: &str = "Inkline";

#[derive(Parser, Debug)]
#[command(name = "inkline")]
#[command(about = "Inline rich-text editor")]
#[command(version)]
struct Cli {
    /// Markup to start with (overrides the configured initial content)
    initial_markup: Option<String>,

    /// Read settings from this file instead of the user config
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Container to mount into; also the submitted field name
    #[arg(long, value_name = "ID")]
    container: Option<String>,
}

fn main() -> eframe::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    info!("Starting {}", APP_NAME);

    let mut settings = match &cli.config {
        Some(path) => load_config_from(path).unwrap_or_warn_default(
            Default::default(),
            &format!("Failed to load configuration from {}", path.display()),
        ),
        None => load_config(),
    };
    if let Some(container) = cli.container {
        settings.container_id = container;
        settings.sanitize();
    }

    let window_size = settings.window_size;
    info!(
        "Window configuration: {}x{}",
        window_size.width, window_size.height
    );

    let viewport = eframe::egui::ViewportBuilder::default()
        .with_title(APP_NAME)
        .with_inner_size([window_size.width, window_size.height])
        .with_min_inner_size([320.0, 240.0]);

    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    let initial = cli.initial_markup;
    eframe::run_native(
        APP_NAME,
        native_options,
        Box::new(move |cc| Ok(Box::new(InklineApp::new(cc, settings, initial)?))),
    )
}
