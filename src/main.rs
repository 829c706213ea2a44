//! Plot Dashboard - CSV Data Visualization
//!
//! Desktop front end: upload a CSV, pick a style and chart, download PNGs.

use eframe::egui;
use plot_dashboard::config::DashboardConfig;
use plot_dashboard::gui::DashboardApp;
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    // Config problems fall back to defaults; report them once logging is up
    let (config, config_error) = match DashboardConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (DashboardConfig::default(), Some(e)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .init();

    if let Some(e) = config_error {
        tracing::warn!(error = %e, "Using default configuration");
    }
    tracing::info!(
        width = config.plot_width,
        height = config.plot_height,
        style = %config.default_style,
        "Starting dashboard"
    );

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 700.0])
            .with_title("Customer Data Visualization Dashboard"),
        ..Default::default()
    };

    eframe::run_native(
        "Plot Dashboard",
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, config)))),
    )
}
