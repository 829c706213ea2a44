//! Chart requests and plot naming

use crate::charts::PlotStyle;
use std::fmt;

/// Chart kind without its columns, used for the kind picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChartType {
    #[default]
    Histogram,
    Boxplot,
    Scatterplot,
    CorrelationHeatmap,
}

impl ChartType {
    pub const ALL: [ChartType; 4] = [
        ChartType::Histogram,
        ChartType::Boxplot,
        ChartType::Scatterplot,
        ChartType::CorrelationHeatmap,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ChartType::Histogram => "Histogram",
            ChartType::Boxplot => "Boxplot",
            ChartType::Scatterplot => "Scatterplot",
            ChartType::CorrelationHeatmap => "Correlation Heatmap",
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A chart kind together with exactly the columns it needs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Histogram { column: String },
    Boxplot { column: String },
    Scatterplot { x: String, y: String },
    CorrelationHeatmap,
}

impl ChartKind {
    pub fn histogram(column: impl Into<String>) -> Self {
        ChartKind::Histogram {
            column: column.into(),
        }
    }

    pub fn boxplot(column: impl Into<String>) -> Self {
        ChartKind::Boxplot {
            column: column.into(),
        }
    }

    pub fn scatterplot(x: impl Into<String>, y: impl Into<String>) -> Self {
        ChartKind::Scatterplot {
            x: x.into(),
            y: y.into(),
        }
    }

    pub fn chart_type(&self) -> ChartType {
        match self {
            ChartKind::Histogram { .. } => ChartType::Histogram,
            ChartKind::Boxplot { .. } => ChartType::Boxplot,
            ChartKind::Scatterplot { .. } => ChartType::Scatterplot,
            ChartKind::CorrelationHeatmap => ChartType::CorrelationHeatmap,
        }
    }

    /// Columns the user selected. The heatmap selects none: it always spans
    /// every numeric column.
    pub fn columns(&self) -> Vec<&str> {
        match self {
            ChartKind::Histogram { column } | ChartKind::Boxplot { column } => {
                vec![column.as_str()]
            }
            ChartKind::Scatterplot { x, y } => vec![x.as_str(), y.as_str()],
            ChartKind::CorrelationHeatmap => Vec::new(),
        }
    }

    /// Cache key and download stem. Depends only on kind and columns.
    pub fn plot_name(&self) -> String {
        match self {
            ChartKind::Histogram { column } => format!("histogram_{column}"),
            ChartKind::Boxplot { column } => format!("boxplot_{column}"),
            ChartKind::Scatterplot { x, y } => format!("scatterplot_{x}_vs_{y}"),
            ChartKind::CorrelationHeatmap => "correlation_heatmap".to_string(),
        }
    }
}

/// Everything needed to draw one chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartRequest {
    pub kind: ChartKind,
    pub style: PlotStyle,
}

impl ChartRequest {
    pub fn new(kind: ChartKind, style: PlotStyle) -> Self {
        Self { kind, style }
    }

    pub fn plot_name(&self) -> String {
        self.kind.plot_name()
    }
}
