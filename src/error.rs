//! Dashboard errors
//! Everything a dashboard operation can fail with, plus the user-facing
//! failure report the interaction shell shows.

use crate::charts::ChartError;
use crate::data::DataParseError;
use crate::session::PlotNotFoundError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error(transparent)]
    DataParse(#[from] DataParseError),
    #[error(transparent)]
    Chart(#[from] ChartError),
    #[error(transparent)]
    PlotNotFound(#[from] PlotNotFoundError),
    #[error("No dataset loaded")]
    NoDataset,
    #[error("No numeric columns found in the uploaded dataset.")]
    NoNumericColumns,
}

pub type DashboardResult<T> = Result<T, DashboardError>;

/// A failure as shown to the user: a one-line message and the full cause
/// chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub message: String,
    pub trace: String,
}

impl Failure {
    pub fn from_error<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let message = format!("An error occurred: {err}");
        let trace = format!("{:?}", anyhow::Error::new(err));
        Self { message, trace }
    }
}

impl From<DashboardError> for Failure {
    fn from(err: DashboardError) -> Self {
        Failure::from_error(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_carries_message_and_trace() {
        let failure = Failure::from(DashboardError::NoDataset);
        assert_eq!(failure.message, "An error occurred: No dataset loaded");
        assert!(failure.trace.contains("No dataset loaded"));
    }

    #[test]
    fn trace_includes_the_cause_chain() {
        let err = DashboardError::from(ChartError::Render {
            plot: "histogram_a".to_string(),
            source: "bandwidth collapsed".into(),
        });
        let failure = Failure::from(err);
        assert!(failure.message.contains("histogram_a"));
        assert!(failure.trace.contains("Caused by"));
        assert!(failure.trace.contains("bandwidth collapsed"));
    }
}
