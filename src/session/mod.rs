//! Session module - per-user dataset and plot cache
//!
//! One `Session` lives for as long as the user keeps the dashboard open.
//! It is passed explicitly to every dashboard operation; nothing here is
//! global.

mod cache;
mod export;

pub use cache::{PlotCache, PlotNotFoundError};
pub use export::{PlotDownload, PNG_MIME};

use crate::data::Dataset;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No dataset uploaded yet
    Empty,
    Loaded,
}

#[derive(Debug, Default)]
pub struct Session {
    pub(crate) dataset: Option<Dataset>,
    pub(crate) plots: PlotCache,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        match self.dataset {
            Some(_) => SessionState::Loaded,
            None => SessionState::Empty,
        }
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn plots(&self) -> &PlotCache {
        &self.plots
    }
}
