//! Plot Dashboard - CSV upload, statistical charts and PNG download
//!
//! The headless [`dashboard::Dashboard`] operates on an explicit
//! [`session::Session`]; the egui front end in [`gui`] is a thin shell on
//! top of it.

pub mod charts;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod error;
pub mod gui;
pub mod session;
pub mod stats;

pub use dashboard::{Dashboard, RenderOutcome, UploadOutcome};
pub use error::{DashboardError, DashboardResult, Failure};
pub use session::{Session, SessionState};
