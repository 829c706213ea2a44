//! Download exporter
//! Packages a cached plot as a downloadable PNG file.

use crate::session::{PlotCache, PlotNotFoundError};
use std::fs;
use std::io;
use std::path::Path;

pub const PNG_MIME: &str = "image/png";

/// A cached plot ready to hand to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotDownload {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl PlotDownload {
    /// Copy the cached bytes for `name` out as `<name>.png`.
    pub fn from_cache(cache: &PlotCache, name: &str) -> Result<Self, PlotNotFoundError> {
        let bytes = cache.get(name)?;
        Ok(Self {
            file_name: format!("{name}.png"),
            mime: PNG_MIME,
            bytes: bytes.to_vec(),
        })
    }

    pub fn write_to(&self, path: &Path) -> io::Result<()> {
        fs::write(path, &self.bytes)
    }
}
