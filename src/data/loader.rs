//! CSV Dataset Loader Module
//! Decodes uploaded delimited text into a Dataset using Polars.

use crate::data::Dataset;
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

/// Rows Polars inspects when inferring column types.
pub const DEFAULT_INFER_SCHEMA_ROWS: usize = 10_000;

#[derive(Error, Debug)]
pub enum DataParseError {
    #[error("Failed to read uploaded file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Uploaded file is empty")]
    Empty,
    #[error("Uploaded file is not valid UTF-8 text: {0}")]
    Encoding(#[from] std::str::Utf8Error),
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("No columns found in the uploaded file")]
    NoColumns,
}

/// Turns raw uploaded bytes into a [`Dataset`].
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    infer_schema_rows: usize,
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self::new(DEFAULT_INFER_SCHEMA_ROWS)
    }
}

impl DatasetLoader {
    pub fn new(infer_schema_rows: usize) -> Self {
        Self { infer_schema_rows }
    }

    /// Parse uploaded CSV content. The first line is the header row.
    pub fn load(
        &self,
        content: &[u8],
        source_name: Option<&str>,
    ) -> Result<Dataset, DataParseError> {
        let text = std::str::from_utf8(content)?;
        if text.trim().is_empty() {
            return Err(DataParseError::Empty);
        }

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(self.infer_schema_rows))
            .into_reader_with_file_handle(Cursor::new(content.to_vec()))
            .finish()?;

        if df.width() == 0 {
            return Err(DataParseError::NoColumns);
        }

        Ok(Dataset::new(df, source_name.map(str::to_string)))
    }

    /// Read a CSV file from disk and parse it.
    pub fn load_file(&self, path: &Path) -> Result<Dataset, DataParseError> {
        let content = std::fs::read(path)?;
        let name = path.file_name().map(|n| n.to_string_lossy().to_string());
        self.load(&content, name.as_deref())
    }
}
