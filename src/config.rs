//! Dashboard configuration
//! Read from a JSON file; every field is optional and falls back to its
//! default.

use crate::charts::{PlotStyle, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::data::DEFAULT_INFER_SCHEMA_ROWS;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "PLOT_DASHBOARD_CONFIG";
/// Looked up in the working directory when the variable is unset.
pub const DEFAULT_CONFIG_FILE: &str = "plot_dashboard.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DashboardConfig {
    #[serde(default = "default_plot_width")]
    pub plot_width: u32,
    #[serde(default = "default_plot_height")]
    pub plot_height: u32,
    /// Style preselected in the picker
    #[serde(default)]
    pub default_style: PlotStyle,
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
    #[serde(default = "default_infer_schema_rows")]
    pub infer_schema_rows: usize,
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` wins over it.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_plot_width() -> u32 {
    DEFAULT_WIDTH
}

fn default_plot_height() -> u32 {
    DEFAULT_HEIGHT
}

fn default_preview_rows() -> usize {
    5
}

fn default_infer_schema_rows() -> usize {
    DEFAULT_INFER_SCHEMA_ROWS
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            plot_width: default_plot_width(),
            plot_height: default_plot_height(),
            default_style: PlotStyle::default(),
            preview_rows: default_preview_rows(),
            infer_schema_rows: default_infer_schema_rows(),
            log_filter: default_log_filter(),
        }
    }
}

impl DashboardConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|source| ConfigError::Json {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        config.validate()
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()
    }

    /// `$PLOT_DASHBOARD_CONFIG`, else `./plot_dashboard.json` if it exists,
    /// else defaults.
    pub fn load() -> Result<Self, ConfigError> {
        if let Some(path) = env::var_os(CONFIG_ENV_VAR) {
            return Self::load_from(Path::new(&path));
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            return Self::load_from(local);
        }
        Ok(Self::default())
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.plot_width == 0 || self.plot_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "plot size must be non-zero, got {}x{}",
                self.plot_width, self.plot_height
            )));
        }
        if self.infer_schema_rows == 0 {
            return Err(ConfigError::Invalid(
                "infer_schema_rows must be at least 1".to_string(),
            ));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config = DashboardConfig::from_json_str("{}").unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!((config.plot_width, config.plot_height), (800, 600));
        assert_eq!(config.preview_rows, 5);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let config = DashboardConfig::from_json_str(
            r#"{ "plot_width": 1024, "default_style": "ggplot" }"#,
        )
        .unwrap();
        assert_eq!(config.plot_width, 1024);
        assert_eq!(config.plot_height, 600);
        assert_eq!(config.default_style, PlotStyle::Ggplot);
    }

    #[test]
    fn rejects_malformed_and_unknown() {
        assert!(matches!(
            DashboardConfig::from_json_str("{ plot_width"),
            Err(ConfigError::Json { .. })
        ));
        assert!(matches!(
            DashboardConfig::from_json_str(r#"{ "default_style": "solarized" }"#),
            Err(ConfigError::Json { .. })
        ));
        assert!(matches!(
            DashboardConfig::from_json_str(r#"{ "colour": "red" }"#),
            Err(ConfigError::Json { .. })
        ));
    }

    #[test]
    fn rejects_zero_plot_size() {
        let err = DashboardConfig::from_json_str(r#"{ "plot_width": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = DashboardConfig::load_from(Path::new("/nonexistent/plot_dashboard.json"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
