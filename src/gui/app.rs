//! Plot Dashboard Main Application
//! Main window with control panel and plot viewer, driving one session.

use crate::config::DashboardConfig;
use crate::dashboard::Dashboard;
use crate::error::Failure;
use crate::gui::{ControlPanel, ControlPanelAction, PlotViewer, StatusMessage};
use crate::session::Session;
use egui::SidePanel;

/// Main application window.
pub struct DashboardApp {
    dashboard: Dashboard,
    session: Session,
    control_panel: ControlPanel,
    plot_viewer: PlotViewer,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        let control_panel = ControlPanel::new(config.default_style);
        Self {
            dashboard: Dashboard::new(config),
            session: Session::new(),
            control_panel,
            plot_viewer: PlotViewer::new(),
        }
    }

    /// Handle CSV file selection
    fn handle_browse_csv(&mut self, ctx: &egui::Context) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        else {
            return;
        };

        match self.dashboard.upload_file(&mut self.session, &path) {
            Ok(outcome) => {
                self.control_panel.selections.csv_path = Some(path);
                self.control_panel.update_columns(
                    outcome.numeric_columns,
                    self.dashboard.chart_types(&self.session),
                );
                self.plot_viewer
                    .set_preview(self.dashboard.preview(&self.session));
                match outcome.warning {
                    Some(warning) => {
                        self.plot_viewer.clear_plot();
                        self.plot_viewer.set_status(StatusMessage::Warning(warning));
                    }
                    None => self.render_current(ctx),
                }
            }
            Err(e) => self
                .plot_viewer
                .set_status(StatusMessage::Error(Failure::from(e))),
        }
    }

    /// Render whatever the pickers currently describe
    fn render_current(&mut self, ctx: &egui::Context) {
        let Some(request) = self.control_panel.chart_request() else {
            return;
        };

        match self.dashboard.render(&mut self.session, &request) {
            Ok(outcome) => {
                self.plot_viewer
                    .set_plot(ctx, &outcome.plot_name, &outcome.bytes);
                self.plot_viewer
                    .set_status(StatusMessage::Success(outcome.message));
                self.control_panel
                    .update_plot_names(self.session.plots().list_names());
            }
            Err(e) => self
                .plot_viewer
                .set_status(StatusMessage::Error(Failure::from(e))),
        }
    }

    /// Save the selected cached plot through a save dialog
    fn handle_download(&mut self) {
        let name = self.control_panel.selections.download.clone();
        let download = match self.dashboard.download(&self.session, &name) {
            Ok(download) => download,
            Err(e) => {
                self.plot_viewer
                    .set_status(StatusMessage::Error(Failure::from(e)));
                return;
            }
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name(&download.file_name)
            .save_file()
        else {
            return;
        };

        match download.write_to(&path) {
            Ok(()) => self.plot_viewer.set_status(StatusMessage::Success(format!(
                "Saved {} to {}",
                download.file_name,
                path.display()
            ))),
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Failed to save plot");
                self.plot_viewer
                    .set_status(StatusMessage::Error(Failure::from_error(e)));
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(ctx),
                        ControlPanelAction::SelectionChanged => self.render_current(ctx),
                        ControlPanelAction::Download => self.handle_download(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Plot Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.plot_viewer.show(ui);
        });
    }
}
