//! Static Chart Renderer
//! Draws a chart request into an RGB bitmap with plotters and encodes it as PNG.
//!
//! Layouts:
//! 1. Histogram: count bars over auto-sized bins + kernel density line
//! 2. Boxplot: single vertical box, 1.5 IQR whiskers, outlier points
//! 3. Scatterplot: one point per row where both columns are present
//! 4. Correlation heatmap: annotated coolwarm grid over every numeric
//!    column, colour bar on the right

use crate::charts::{ChartKind, ChartRequest, Theme};
use crate::data::Dataset;
use crate::stats::{GaussianKde, StatsCalculator, StatsError};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::ops::Range;
use std::time::Instant;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;

const KDE_SAMPLES: usize = 200;
const COLORBAR_WIDTH: i32 = 90;
const COLORBAR_STEPS: usize = 100;

// Coolwarm anchors at -1, 0 and 1
const COOL: RGBColor = RGBColor(59, 76, 192);
const NEUTRAL: RGBColor = RGBColor(221, 221, 221);
const WARM: RGBColor = RGBColor(180, 4, 38);
const UNDEFINED_CELL: RGBColor = RGBColor(160, 160, 160);

type F64Chart<'a, 'b> = ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Column '{column}' is not a numeric column of the current dataset")]
    ColumnNotFound { column: String },
    #[error("Failed to render plot '{plot}': {source}")]
    Render {
        plot: String,
        #[source]
        source: BoxError,
    },
}

/// Encoded chart image and the name it is cached under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPlot {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Renders chart requests to PNG at a fixed pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartRenderer {
    width: u32,
    height: u32,
}

impl Default for ChartRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl ChartRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Render a request against the dataset. Every referenced column must be
    /// numeric; the heatmap always uses all numeric columns.
    pub fn render(
        &self,
        dataset: &Dataset,
        request: &ChartRequest,
    ) -> Result<RenderedPlot, ChartError> {
        let started = Instant::now();
        let name = request.plot_name();
        let theme = request.style.theme();
        let mut buffer = vec![0u8; self.width as usize * self.height as usize * 3];

        let drawn = match &request.kind {
            ChartKind::Histogram { column } => {
                let values = Self::column_values(dataset, column)?;
                self.draw_histogram(&mut buffer, &theme, column, &values)
            }
            ChartKind::Boxplot { column } => {
                let values = Self::column_values(dataset, column)?;
                self.draw_boxplot(&mut buffer, &theme, column, &values)
            }
            ChartKind::Scatterplot { x, y } => {
                let xs = Self::column_cells(dataset, x)?;
                let ys = Self::column_cells(dataset, y)?;
                let points: Vec<(f64, f64)> = xs
                    .into_iter()
                    .zip(ys)
                    .filter_map(|(x, y)| Some((x?, y?)))
                    .collect();
                self.draw_scatter(&mut buffer, &theme, x, y, &points)
            }
            ChartKind::CorrelationHeatmap => {
                let columns = dataset.numeric_columns();
                let cells = columns
                    .iter()
                    .map(|column| Self::column_cells(dataset, column))
                    .collect::<Result<Vec<_>, _>>()?;
                let matrix = StatsCalculator::correlation_matrix(&cells);
                self.draw_heatmap(&mut buffer, &theme, columns, &matrix)
            }
        };
        drawn.map_err(|source| ChartError::Render {
            plot: name.clone(),
            source,
        })?;

        let bytes = self.encode_png(&buffer).map_err(|e| ChartError::Render {
            plot: name.clone(),
            source: Box::new(e),
        })?;

        tracing::debug!(
            plot = %name,
            style = %request.style,
            bytes = bytes.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Rendered chart"
        );

        Ok(RenderedPlot { name, bytes })
    }

    fn column_cells(dataset: &Dataset, column: &str) -> Result<Vec<Option<f64>>, ChartError> {
        dataset
            .numeric_cells(column)
            .ok_or_else(|| ChartError::ColumnNotFound {
                column: column.to_string(),
            })
    }

    fn column_values(dataset: &Dataset, column: &str) -> Result<Vec<f64>, ChartError> {
        Ok(Self::column_cells(dataset, column)?
            .into_iter()
            .flatten()
            .collect())
    }

    fn encode_png(&self, buffer: &[u8]) -> Result<Vec<u8>, image::ImageError> {
        let mut png_bytes = Vec::new();
        PngEncoder::new(&mut png_bytes).write_image(
            buffer,
            self.width,
            self.height,
            ExtendedColorType::Rgb8,
        )?;
        Ok(png_bytes)
    }

    fn draw_histogram(
        &self,
        buffer: &mut [u8],
        theme: &Theme,
        column: &str,
        values: &[f64],
    ) -> Result<(), BoxError> {
        let hist = StatsCalculator::histogram(values)?;
        let kde = GaussianKde::fit(values)?;

        let x_min = hist.edges[0];
        let x_max = hist.edges[hist.edges.len() - 1];
        finite_span(x_min, x_max)?;
        if !hist.bin_width().is_finite() {
            return Err(StatsError::NonFiniteRange.into());
        }
        let scale = values.len() as f64 * hist.bin_width();
        let curve: Vec<(f64, f64)> = (0..=KDE_SAMPLES)
            .map(|i| {
                let x = x_min + (x_max - x_min) * i as f64 / KDE_SAMPLES as f64;
                (x, kde.density(x) * scale)
            })
            .collect();
        let peak = curve
            .iter()
            .map(|&(_, y)| y)
            .fold(hist.max_count() as f64, f64::max);
        let y_range = checked_range(0.0, peak * 1.05)?;

        let root = BitMapBackend::with_buffer(buffer, (self.width, self.height)).into_drawing_area();
        root.fill(&theme.background)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .caption(format!("Histogram of {column}"), theme.caption_style())
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(x_min..x_max, y_range)?;
        chart.plotting_area().fill(&theme.panel)?;
        Self::draw_mesh(&mut chart, theme, column, "Count", true)?;

        chart.draw_series(hist.counts.iter().enumerate().map(|(i, &count)| {
            Rectangle::new(
                [(hist.edges[i], 0.0), (hist.edges[i + 1], count as f64)],
                theme.primary.mix(0.55).filled(),
            )
        }))?;
        chart.draw_series(hist.counts.iter().enumerate().map(|(i, &count)| {
            Rectangle::new(
                [(hist.edges[i], 0.0), (hist.edges[i + 1], count as f64)],
                theme.primary.stroke_width(1),
            )
        }))?;
        chart.draw_series(LineSeries::new(curve, theme.accent.stroke_width(2)))?;

        root.present()?;
        Ok(())
    }

    fn draw_boxplot(
        &self,
        buffer: &mut [u8],
        theme: &Theme,
        column: &str,
        values: &[f64],
    ) -> Result<(), BoxError> {
        let summary = StatsCalculator::box_summary(values)?;
        let (lo, hi) = summary.extent();
        let y_range = padded_range(lo, hi)?;
        let (left, center, right) = (0.3, 0.5, 0.7);
        let (cap_left, cap_right) = (0.4, 0.6);

        let root = BitMapBackend::with_buffer(buffer, (self.width, self.height)).into_drawing_area();
        root.fill(&theme.background)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .caption(format!("Boxplot of {column}"), theme.caption_style())
            .x_label_area_size(20)
            .y_label_area_size(60)
            .build_cartesian_2d(0.0..1.0, y_range)?;
        chart.plotting_area().fill(&theme.panel)?;
        Self::draw_mesh(&mut chart, theme, "", column, false)?;

        chart.draw_series(std::iter::once(Rectangle::new(
            [(left, summary.q1), (right, summary.q3)],
            theme.primary.mix(0.8).filled(),
        )))?;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(left, summary.q1), (right, summary.q3)],
            theme.text.stroke_width(1),
        )))?;

        let lines = vec![
            vec![(left, summary.median), (right, summary.median)],
            vec![(center, summary.q1), (center, summary.whisker_low)],
            vec![(center, summary.q3), (center, summary.whisker_high)],
            vec![(cap_left, summary.whisker_low), (cap_right, summary.whisker_low)],
            vec![(cap_left, summary.whisker_high), (cap_right, summary.whisker_high)],
        ];
        chart.draw_series(
            lines
                .into_iter()
                .map(|points| PathElement::new(points, theme.text.stroke_width(2))),
        )?;
        chart.draw_series(
            summary
                .outliers
                .iter()
                .map(|&v| Circle::new((center, v), 4, theme.text.stroke_width(1))),
        )?;

        root.present()?;
        Ok(())
    }

    fn draw_scatter(
        &self,
        buffer: &mut [u8],
        theme: &Theme,
        x_column: &str,
        y_column: &str,
        points: &[(f64, f64)],
    ) -> Result<(), BoxError> {
        if points.is_empty() {
            return Err(StatsError::TooFewValues {
                needed: 1,
                found: 0,
            }
            .into());
        }

        let (x_lo, x_hi) = bounds(points.iter().map(|p| p.0));
        let (y_lo, y_hi) = bounds(points.iter().map(|p| p.1));
        let x_range = padded_range(x_lo, x_hi)?;
        let y_range = padded_range(y_lo, y_hi)?;

        let root = BitMapBackend::with_buffer(buffer, (self.width, self.height)).into_drawing_area();
        root.fill(&theme.background)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .caption(format!("{y_column} vs {x_column}"), theme.caption_style())
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range, y_range)?;
        chart.plotting_area().fill(&theme.panel)?;
        Self::draw_mesh(&mut chart, theme, x_column, y_column, true)?;

        chart.draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 4, theme.primary.mix(0.8).filled())),
        )?;

        root.present()?;
        Ok(())
    }

    fn draw_heatmap(
        &self,
        buffer: &mut [u8],
        theme: &Theme,
        columns: &[String],
        matrix: &[Vec<f64>],
    ) -> Result<(), BoxError> {
        let n = columns.len();
        if n == 0 {
            return Err(StatsError::TooFewValues {
                needed: 1,
                found: 0,
            }
            .into());
        }

        let root = BitMapBackend::with_buffer(buffer, (self.width, self.height)).into_drawing_area();
        root.fill(&theme.background)?;
        let body = root.titled("Correlation Heatmap", theme.caption_style())?;
        let (grid_area, bar_area) =
            body.split_horizontally((self.width as i32 - COLORBAR_WIDTH).max(1));

        let longest = columns.iter().map(|c| c.chars().count()).max().unwrap_or(1) as u32;
        let mut chart = ChartBuilder::on(&grid_area)
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size((longest * 8 + 12).min(self.width / 3))
            .build_cartesian_2d(0i32..n as i32, n as i32..0i32)?;

        let (plot_w, plot_h) = chart.plotting_area().dim_in_pixel();
        let cell_w = plot_w as i32 / n as i32;
        let cell_h = plot_h as i32 / n as i32;
        let label_at = |i: &i32| {
            usize::try_from(*i)
                .ok()
                .and_then(|i| columns.get(i))
                .cloned()
                .unwrap_or_default()
        };

        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(n + 1)
            .y_labels(n + 1)
            .x_label_offset(cell_w / 2)
            .y_label_offset(cell_h / 2)
            .x_label_formatter(&label_at)
            .y_label_formatter(&label_at)
            .axis_style(&theme.axis)
            .label_style(theme.label_style())
            .draw()?;

        chart.draw_series(matrix.iter().enumerate().flat_map(|(row, coefficients)| {
            coefficients.iter().enumerate().map(move |(col, &r)| {
                Rectangle::new(
                    [(col as i32, row as i32), (col as i32 + 1, row as i32 + 1)],
                    coolwarm(r).filled(),
                )
            })
        }))?;

        let centered = Pos::new(HPos::Center, VPos::Center);
        chart.draw_series(matrix.iter().enumerate().flat_map(|(row, coefficients)| {
            coefficients.iter().enumerate().map(move |(col, &r)| {
                let ink = if r.abs() > 0.6 { WHITE } else { BLACK };
                EmptyElement::at((col as i32, row as i32))
                    + Text::new(
                        format_coefficient(r),
                        (cell_w / 2, cell_h / 2),
                        theme.annotation_style(ink).pos(centered),
                    )
            })
        }))?;

        let mut bar = ChartBuilder::on(&bar_area)
            .margin(10)
            .margin_bottom(50)
            .right_y_label_area_size(45)
            .build_cartesian_2d(0.0..1.0, -1.0..1.0)?;
        bar.configure_mesh()
            .disable_mesh()
            .disable_x_axis()
            .y_labels(5)
            .axis_style(&theme.axis)
            .label_style(theme.label_style())
            .draw()?;
        bar.draw_series((0..COLORBAR_STEPS).map(|i| {
            let lo = -1.0 + 2.0 * i as f64 / COLORBAR_STEPS as f64;
            let hi = -1.0 + 2.0 * (i + 1) as f64 / COLORBAR_STEPS as f64;
            Rectangle::new([(0.0, lo), (1.0, hi)], coolwarm((lo + hi) / 2.0).filled())
        }))?;

        root.present()?;
        Ok(())
    }

    fn draw_mesh(
        chart: &mut F64Chart<'_, '_>,
        theme: &Theme,
        x_desc: &str,
        y_desc: &str,
        x_labels: bool,
    ) -> Result<(), BoxError> {
        let mut mesh = chart.configure_mesh();
        mesh.x_desc(x_desc)
            .y_desc(y_desc)
            .axis_style(&theme.axis)
            .label_style(theme.label_style())
            .axis_desc_style(theme.label_style());
        if !x_labels {
            mesh.x_labels(0);
        }
        match theme.grid {
            Some(grid) => {
                mesh.bold_line_style(&grid).light_line_style(&TRANSPARENT);
            }
            None => {
                mesh.disable_mesh();
            }
        }
        mesh.draw()?;
        Ok(())
    }
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

/// Axis range with 5% padding; a single value gets a unit margin.
fn padded_range(lo: f64, hi: f64) -> Result<Range<f64>, StatsError> {
    let span = finite_span(lo, hi)?;
    if span <= f64::EPSILON * lo.abs().max(1.0) {
        checked_range(lo - 1.0, hi + 1.0)
    } else {
        let padding = span * 0.05;
        checked_range(lo - padding, hi + padding)
    }
}

/// `hi - lo`, rejected when it overflows. Plotters cannot lay out an
/// axis over an infinite span.
fn finite_span(lo: f64, hi: f64) -> Result<f64, StatsError> {
    let span = hi - lo;
    if lo.is_finite() && hi.is_finite() && span.is_finite() {
        Ok(span)
    } else {
        Err(StatsError::NonFiniteRange)
    }
}

fn checked_range(lo: f64, hi: f64) -> Result<Range<f64>, StatsError> {
    finite_span(lo, hi)?;
    Ok(lo..hi)
}

fn coolwarm(r: f64) -> RGBColor {
    if r.is_nan() {
        return UNDEFINED_CELL;
    }
    let t = r.clamp(-1.0, 1.0);
    let (from, to, frac) = if t < 0.0 {
        (COOL, NEUTRAL, t + 1.0)
    } else {
        (NEUTRAL, WARM, t)
    };
    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
    RGBColor(lerp(from.0, to.0), lerp(from.1, to.1), lerp(from.2, to.2))
}

fn format_coefficient(r: f64) -> String {
    if r.is_nan() {
        "nan".to_string()
    } else {
        format!("{r:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::PlotStyle;
    use crate::data::DatasetLoader;
    use std::error::Error as _;

    const PNG_MAGIC: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

    fn dataset() -> Dataset {
        let csv = "name,age,income,score,flat\n\
                   ann,31,52000,7.5,1\n\
                   ben,45,61000,6.1,1\n\
                   cat,28,48000,8.3,1\n\
                   dan,52,75000,5.9,1\n\
                   eve,39,58000,7.0,1\n\
                   fay,23,39000,9.1,1\n";
        DatasetLoader::default().load(csv.as_bytes(), None).unwrap()
    }

    fn render(kind: ChartKind) -> Result<RenderedPlot, ChartError> {
        ChartRenderer::default().render(&dataset(), &ChartRequest::new(kind, PlotStyle::Default))
    }

    fn assert_png(bytes: &[u8], width: u32, height: u32) {
        assert_eq!(bytes[..8], PNG_MAGIC);
        let image = image::load_from_memory(bytes).unwrap();
        assert_eq!((image.width(), image.height()), (width, height));
    }

    #[test]
    fn renders_every_chart_kind() {
        let kinds = [
            ChartKind::histogram("age"),
            ChartKind::boxplot("income"),
            ChartKind::scatterplot("age", "income"),
            ChartKind::CorrelationHeatmap,
        ];
        for kind in kinds {
            let plot = render(kind.clone()).unwrap();
            assert_eq!(plot.name, kind.plot_name());
            assert_png(&plot.bytes, DEFAULT_WIDTH, DEFAULT_HEIGHT);
        }
    }

    #[test]
    fn rendering_is_deterministic() {
        let first = render(ChartKind::CorrelationHeatmap).unwrap();
        let second = render(ChartKind::CorrelationHeatmap).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn every_style_renders() {
        let renderer = ChartRenderer::new(400, 300);
        for style in PlotStyle::ALL {
            let request = ChartRequest::new(ChartKind::histogram("score"), style);
            let plot = renderer.render(&dataset(), &request).unwrap();
            assert_png(&plot.bytes, 400, 300);
        }
    }

    #[test]
    fn scatter_of_a_column_against_itself() {
        let plot = render(ChartKind::scatterplot("age", "age")).unwrap();
        assert_eq!(plot.name, "scatterplot_age_vs_age");
    }

    #[test]
    fn unknown_and_text_columns_are_not_found() {
        let err = render(ChartKind::histogram("height")).unwrap_err();
        assert!(matches!(err, ChartError::ColumnNotFound { ref column } if column == "height"));

        let err = render(ChartKind::scatterplot("age", "name")).unwrap_err();
        assert!(matches!(err, ChartError::ColumnNotFound { ref column } if column == "name"));
    }

    #[test]
    fn constant_column_histogram_is_a_render_error() {
        let err = render(ChartKind::histogram("flat")).unwrap_err();
        match &err {
            ChartError::Render { plot, .. } => assert_eq!(plot, "histogram_flat"),
            other => panic!("unexpected error: {other:?}"),
        }
        let cause = err.source().unwrap();
        assert!(matches!(
            cause.downcast_ref::<StatsError>(),
            Some(StatsError::ZeroVariance)
        ));
    }

    #[test]
    fn constant_column_boxplot_still_renders() {
        let plot = render(ChartKind::boxplot("flat")).unwrap();
        assert_eq!(plot.name, "boxplot_flat");
    }

    #[test]
    fn coolwarm_endpoints() {
        assert_eq!(coolwarm(-1.0), COOL);
        assert_eq!(coolwarm(0.0), NEUTRAL);
        assert_eq!(coolwarm(1.0), WARM);
        assert_eq!(coolwarm(f64::NAN), UNDEFINED_CELL);
        assert_eq!(format_coefficient(0.456), "0.46");
        assert_eq!(format_coefficient(f64::NAN), "nan");
    }

    #[test]
    fn padded_range_widens_single_values() {
        assert_eq!(padded_range(3.0, 3.0).unwrap(), 2.0..4.0);
        let range = padded_range(0.0, 10.0).unwrap();
        assert!((range.start + 0.5).abs() < 1e-12 && (range.end - 10.5).abs() < 1e-12);
    }

    #[test]
    fn padded_range_rejects_overflowing_spans() {
        assert!(matches!(
            padded_range(-1e308, 1e308),
            Err(StatsError::NonFiniteRange)
        ));
        // The span fits but the padding pushes the end past f64::MAX
        assert!(matches!(
            padded_range(0.0, 1.75e308),
            Err(StatsError::NonFiniteRange)
        ));
    }

    fn render_csv(csv: &str, kind: ChartKind) -> Result<RenderedPlot, ChartError> {
        let dataset = DatasetLoader::default().load(csv.as_bytes(), None).unwrap();
        ChartRenderer::new(200, 150).render(&dataset, &ChartRequest::new(kind, PlotStyle::Default))
    }

    fn assert_non_finite_range(result: Result<RenderedPlot, ChartError>) {
        let err = result.unwrap_err();
        assert!(matches!(err, ChartError::Render { .. }), "{err:?}");
        assert!(matches!(
            err.source().unwrap().downcast_ref::<StatsError>(),
            Some(StatsError::NonFiniteRange)
        ));
    }

    #[test]
    fn overflowing_spans_fail_instead_of_hanging() {
        let wide = "a,b\n-1e308,1\n1e308,2\n0,3\n";
        assert_non_finite_range(render_csv(wide, ChartKind::histogram("a")));
        assert_non_finite_range(render_csv(wide, ChartKind::boxplot("a")));
        assert_non_finite_range(render_csv(wide, ChartKind::scatterplot("a", "b")));
        assert_non_finite_range(render_csv(wide, ChartKind::scatterplot("b", "a")));
    }

    #[test]
    fn overflowing_variance_is_reported_as_such() {
        assert_non_finite_range(render_csv(
            "a\n1e308\n1.7e308\n1.5e308\n",
            ChartKind::histogram("a"),
        ));
    }

    #[test]
    fn wide_but_finite_spans_still_render() {
        let plot = render_csv("a\n-1e307\n1e307\n0\n", ChartKind::boxplot("a")).unwrap();
        assert_eq!(plot.name, "boxplot_a");
    }
}
