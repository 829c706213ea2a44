//! Data module - CSV loading and dataset access

mod dataset;
mod loader;

pub use dataset::{Dataset, DatasetPreview};
pub use loader::{DataParseError, DatasetLoader, DEFAULT_INFER_SCHEMA_ROWS};
