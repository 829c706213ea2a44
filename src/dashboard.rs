//! Interaction shell
//! Headless controller behind the UI: upload, pick, render, download.
//! Holds no per-user state of its own; every call takes the user's
//! `Session`.

use crate::charts::{ChartKind, ChartRenderer, ChartRequest, ChartType};
use crate::config::DashboardConfig;
use crate::data::{DataParseError, Dataset, DatasetLoader, DatasetPreview};
use crate::error::{DashboardError, DashboardResult};
use crate::session::{PlotDownload, Session};
use std::path::Path;

/// Summary of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    pub rows: usize,
    pub columns: usize,
    pub numeric_columns: Vec<String>,
    /// Set when the dataset has nothing to plot.
    pub warning: Option<String>,
}

/// Result of a successful render; the bytes are already cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutcome {
    pub plot_name: String,
    pub bytes: Vec<u8>,
    pub message: String,
}

pub struct Dashboard {
    config: DashboardConfig,
    loader: DatasetLoader,
    renderer: ChartRenderer,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(DashboardConfig::default())
    }
}

impl Dashboard {
    pub fn new(config: DashboardConfig) -> Self {
        let loader = DatasetLoader::new(config.infer_schema_rows);
        let renderer = ChartRenderer::new(config.plot_width, config.plot_height);
        Self {
            config,
            loader,
            renderer,
        }
    }

    /// Parse `bytes` and make it the session's dataset. On error the
    /// session is left exactly as it was.
    pub fn upload(
        &self,
        session: &mut Session,
        name: &str,
        bytes: &[u8],
    ) -> DashboardResult<UploadOutcome> {
        let loaded = self.loader.load(bytes, Some(name));
        self.accept(session, name, loaded)
    }

    /// Read and parse a CSV file from disk, see [`Dashboard::upload`].
    pub fn upload_file(&self, session: &mut Session, path: &Path) -> DashboardResult<UploadOutcome> {
        let name = path.display().to_string();
        let loaded = self.loader.load_file(path);
        self.accept(session, &name, loaded)
    }

    fn accept(
        &self,
        session: &mut Session,
        name: &str,
        loaded: Result<Dataset, DataParseError>,
    ) -> DashboardResult<UploadOutcome> {
        let dataset = loaded.map_err(|e| {
            tracing::error!(file = %name, error = %e, "Upload rejected");
            DashboardError::from(e)
        })?;

        let outcome = UploadOutcome {
            rows: dataset.row_count(),
            columns: dataset.column_count(),
            numeric_columns: dataset.numeric_columns().to_vec(),
            warning: (!dataset.has_numeric_columns())
                .then(|| DashboardError::NoNumericColumns.to_string()),
        };
        tracing::info!(
            file = %name,
            rows = outcome.rows,
            columns = outcome.columns,
            numeric = outcome.numeric_columns.len(),
            "Dataset loaded"
        );
        if let Some(warning) = &outcome.warning {
            tracing::warn!(file = %name, "{warning}");
        }

        session.dataset = Some(dataset);
        Ok(outcome)
    }

    /// Chart kinds the picker may offer: all of them once a dataset with at
    /// least one numeric column is loaded, otherwise none.
    pub fn chart_types(&self, session: &Session) -> &'static [ChartType] {
        match session.dataset() {
            Some(dataset) if dataset.has_numeric_columns() => &ChartType::ALL,
            _ => &[],
        }
    }

    /// First numeric column(s) for `chart_type`, styled with the configured
    /// default. `None` when nothing can be plotted.
    pub fn default_request(&self, session: &Session, chart_type: ChartType) -> Option<ChartRequest> {
        let numeric = session.dataset()?.numeric_columns();
        let first = numeric.first()?;
        let kind = match chart_type {
            ChartType::Histogram => ChartKind::histogram(first),
            ChartType::Boxplot => ChartKind::boxplot(first),
            ChartType::Scatterplot => {
                ChartKind::scatterplot(first, numeric.get(1).unwrap_or(first))
            }
            ChartType::CorrelationHeatmap => ChartKind::CorrelationHeatmap,
        };
        Some(ChartRequest::new(kind, self.config.default_style))
    }

    pub fn preview(&self, session: &Session) -> Option<DatasetPreview> {
        session
            .dataset()
            .map(|dataset| dataset.preview(self.config.preview_rows))
    }

    /// Render and cache. The cache is only written when rendering succeeds.
    pub fn render(
        &self,
        session: &mut Session,
        request: &ChartRequest,
    ) -> DashboardResult<RenderOutcome> {
        let dataset = session.dataset().ok_or(DashboardError::NoDataset)?;
        if !dataset.has_numeric_columns() {
            return Err(DashboardError::NoNumericColumns);
        }

        let plot = self.renderer.render(dataset, request).map_err(|e| {
            tracing::error!(plot = %request.plot_name(), error = %e, "Render failed");
            DashboardError::from(e)
        })?;

        let message = format!("Plot '{}' generated and saved.", plot.name);
        tracing::info!(plot = %plot.name, style = %request.style, bytes = plot.bytes.len(), "Plot cached");
        session.plots.put(plot.name.clone(), plot.bytes.clone());

        Ok(RenderOutcome {
            plot_name: plot.name,
            bytes: plot.bytes,
            message,
        })
    }

    pub fn download(&self, session: &Session, name: &str) -> DashboardResult<PlotDownload> {
        let download = PlotDownload::from_cache(session.plots(), name).map_err(|e| {
            tracing::warn!(plot = %name, "Download of unknown plot");
            DashboardError::from(e)
        })?;
        tracing::info!(file = %download.file_name, bytes = download.bytes.len(), "Plot downloaded");
        Ok(download)
    }
}
