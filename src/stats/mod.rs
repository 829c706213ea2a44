//! Stats module - distribution summaries and correlation

mod calculator;

pub use calculator::{BoxSummary, GaussianKde, Histogram, StatsCalculator, StatsError};
