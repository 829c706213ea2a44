//! GUI module - User interface components

mod app;
mod control_panel;
mod plot_viewer;

pub use app::DashboardApp;
pub use control_panel::{ControlPanel, ControlPanelAction, Selections};
pub use plot_viewer::{PlotViewer, StatusMessage};
