//! Statistics Calculator Module
//! Distribution summaries, histogram binning, kernel density estimation
//! and Pearson correlation for the chart renderer.

use rayon::prelude::*;
use statrs::distribution::{Continuous, Normal};
use statrs::statistics::Statistics;
use thiserror::Error;

/// Upper bound on automatically chosen histogram bins.
const MAX_BINS: usize = 1_000;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("need at least {needed} values, found {found}")]
    TooFewValues { needed: usize, found: usize },
    #[error("values have zero variance, density estimate is undefined")]
    ZeroVariance,
    #[error("value span exceeds the range of f64")]
    NonFiniteRange,
    #[error("invalid kernel: {0}")]
    Kernel(String),
}

/// Box-and-whisker summary of one column.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

impl BoxSummary {
    /// Smallest and largest value drawn (whiskers or outliers).
    pub fn extent(&self) -> (f64, f64) {
        self.outliers.iter().fold(
            (self.whisker_low, self.whisker_high),
            |(lo, hi), &v| (lo.min(v), hi.max(v)),
        )
    }
}

/// Histogram counts over contiguous bins. `edges` has one more entry than `counts`.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn bin_width(&self) -> f64 {
        match (self.edges.first(), self.edges.last()) {
            (Some(first), Some(last)) if !self.counts.is_empty() => {
                (last - first) / self.counts.len() as f64
            }
            _ => 0.0,
        }
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

/// Gaussian kernel density estimate with Scott's bandwidth.
#[derive(Debug, Clone)]
pub struct GaussianKde {
    samples: Vec<f64>,
    bandwidth: f64,
    kernel: Normal,
}

impl GaussianKde {
    pub fn fit(values: &[f64]) -> Result<Self, StatsError> {
        if values.len() < 2 {
            return Err(StatsError::TooFewValues {
                needed: 2,
                found: values.len(),
            });
        }

        let std = values.iter().std_dev();
        if !std.is_finite() {
            return Err(StatsError::NonFiniteRange);
        }
        if std == 0.0 {
            return Err(StatsError::ZeroVariance);
        }

        let bandwidth = std * (values.len() as f64).powf(-0.2);
        let kernel = Normal::new(0.0, 1.0).map_err(|e| StatsError::Kernel(e.to_string()))?;

        Ok(Self {
            samples: values.to_vec(),
            bandwidth,
            kernel,
        })
    }

    /// Probability density at `x`.
    pub fn density(&self, x: f64) -> f64 {
        let h = self.bandwidth;
        let sum: f64 = self
            .samples
            .iter()
            .map(|&xi| self.kernel.pdf((x - xi) / h))
            .sum();
        sum / (self.samples.len() as f64 * h)
    }
}

/// Handles statistical calculations for chart rendering.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    fn sorted(values: &[f64]) -> Vec<f64> {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        sorted
    }

    /// Quartiles, 1.5 IQR whiskers and the points beyond them.
    pub fn box_summary(values: &[f64]) -> Result<BoxSummary, StatsError> {
        if values.is_empty() {
            return Err(StatsError::TooFewValues {
                needed: 1,
                found: 0,
            });
        }

        let sorted = Self::sorted(values);
        let q1 = Self::percentile(&sorted, 25.0);
        let median = Self::percentile(&sorted, 50.0);
        let q3 = Self::percentile(&sorted, 75.0);
        let iqr = q3 - q1;
        let low_fence = q1 - 1.5 * iqr;
        let high_fence = q3 + 1.5 * iqr;

        let whisker_low = sorted
            .iter()
            .copied()
            .find(|&v| v >= low_fence)
            .unwrap_or(q1);
        let whisker_high = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= high_fence)
            .unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < low_fence || v > high_fence)
            .collect();

        Ok(BoxSummary {
            q1,
            median,
            q3,
            whisker_low,
            whisker_high,
            outliers,
        })
    }

    /// Number of bins per NumPy's "auto" rule: the finer of Sturges and
    /// Freedman-Diaconis.
    pub fn auto_bin_count(sorted_values: &[f64]) -> usize {
        let n = sorted_values.len();
        let (Some(&min), Some(&max)) = (sorted_values.first(), sorted_values.last()) else {
            return 1;
        };
        let range = max - min;
        if n < 2 || range <= 0.0 {
            return 1;
        }

        let sturges_width = range / ((n as f64).log2() + 1.0);
        let iqr = Self::percentile(sorted_values, 75.0) - Self::percentile(sorted_values, 25.0);
        let fd_width = 2.0 * iqr * (n as f64).powf(-1.0 / 3.0);

        let width = if fd_width > 0.0 {
            fd_width.min(sturges_width)
        } else {
            sturges_width
        };

        ((range / width).ceil() as usize).clamp(1, MAX_BINS)
    }

    /// Count values into automatically sized, equal-width bins.
    pub fn histogram(values: &[f64]) -> Result<Histogram, StatsError> {
        if values.is_empty() {
            return Err(StatsError::TooFewValues {
                needed: 1,
                found: 0,
            });
        }

        let sorted = Self::sorted(values);
        let mut min = sorted[0];
        let mut max = sorted[sorted.len() - 1];
        if !(max - min).is_finite() {
            return Err(StatsError::NonFiniteRange);
        }
        if min == max {
            min -= 0.5;
            max += 0.5;
        }

        let bins = Self::auto_bin_count(&sorted);
        let width = (max - min) / bins as f64;
        let edges: Vec<f64> = (0..=bins).map(|i| min + width * i as f64).collect();

        let mut counts = vec![0usize; bins];
        for &v in &sorted {
            let idx = (((v - min) / width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Ok(Histogram { edges, counts })
    }

    /// Pearson correlation over rows where both cells are present.
    /// NaN when fewer than two such rows exist or either side is constant.
    pub fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> f64 {
        let pairs: Vec<(f64, f64)> = xs
            .iter()
            .zip(ys)
            .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
            .collect();
        let n = pairs.len();
        if n < 2 {
            return f64::NAN;
        }

        let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n as f64;
        let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n as f64;

        let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
        for &(x, y) in &pairs {
            let dx = x - mean_x;
            let dy = y - mean_y;
            cov += dx * dy;
            var_x += dx * dx;
            var_y += dy * dy;
        }

        if var_x == 0.0 || var_y == 0.0 {
            return f64::NAN;
        }
        (cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0)
    }

    /// Pairwise Pearson matrix. Rows are computed in parallel; the result
    /// is ordered like `columns`.
    pub fn correlation_matrix(columns: &[Vec<Option<f64>>]) -> Vec<Vec<f64>> {
        (0..columns.len())
            .into_par_iter()
            .map(|i| {
                (0..columns.len())
                    .map(|j| Self::pearson(&columns[i], &columns[j]))
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn percentile_interpolates_linearly() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(StatsCalculator::percentile(&sorted, 0.0), 1.0);
        assert_eq!(StatsCalculator::percentile(&sorted, 100.0), 4.0);
        assert!((StatsCalculator::percentile(&sorted, 25.0) - 1.75).abs() < 1e-12);
        assert!((StatsCalculator::percentile(&sorted, 50.0) - 2.5).abs() < 1e-12);
        assert!(StatsCalculator::percentile(&[], 50.0).is_nan());
    }

    #[test]
    fn box_summary_flags_outliers() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let summary = StatsCalculator::box_summary(&values).unwrap();

        assert!((summary.median - 3.5).abs() < 1e-12);
        assert_eq!(summary.whisker_low, 1.0);
        assert_eq!(summary.whisker_high, 5.0);
        assert_eq!(summary.outliers, vec![100.0]);
        assert_eq!(summary.extent(), (1.0, 100.0));
    }

    #[test]
    fn box_summary_of_single_value() {
        let summary = StatsCalculator::box_summary(&[7.0]).unwrap();
        assert_eq!(summary.q1, 7.0);
        assert_eq!(summary.q3, 7.0);
        assert!(summary.outliers.is_empty());
        assert!(StatsCalculator::box_summary(&[]).is_err());
    }

    #[test]
    fn histogram_counts_every_value() {
        let values: Vec<f64> = (0..50).map(|i| (i % 17) as f64 * 1.3).collect();
        let hist = StatsCalculator::histogram(&values).unwrap();

        assert_eq!(hist.edges.len(), hist.counts.len() + 1);
        assert_eq!(hist.counts.iter().sum::<usize>(), values.len());
        assert!(hist.bin_width() > 0.0);
    }

    #[test]
    fn histogram_of_constant_values_uses_unit_bin() {
        let hist = StatsCalculator::histogram(&[2.0, 2.0, 2.0]).unwrap();
        assert_eq!(hist.counts, vec![3]);
        assert_eq!(hist.edges, vec![1.5, 2.5]);
    }

    #[test]
    fn kde_integrates_to_one() {
        let values = [1.0, 2.0, 2.5, 3.0, 4.5, 5.0];
        let kde = GaussianKde::fit(&values).unwrap();

        let (lo, hi, steps) = (-20.0, 30.0, 5_000);
        let dx = (hi - lo) / steps as f64;
        let area: f64 = (0..steps).map(|i| kde.density(lo + dx * i as f64) * dx).sum();
        assert!((area - 1.0).abs() < 1e-3, "area = {area}");
    }

    #[test]
    fn kde_rejects_degenerate_input() {
        assert!(matches!(
            GaussianKde::fit(&[4.0]),
            Err(StatsError::TooFewValues { needed: 2, found: 1 })
        ));
        assert!(matches!(
            GaussianKde::fit(&[4.0, 4.0, 4.0]),
            Err(StatsError::ZeroVariance)
        ));
    }

    #[test]
    fn overflowing_spread_is_not_zero_variance() {
        assert!(matches!(
            GaussianKde::fit(&[1e308, 1.7e308, 1.5e308]),
            Err(StatsError::NonFiniteRange)
        ));
        assert!(matches!(
            StatsCalculator::histogram(&[-1e308, 0.0, 1e308]),
            Err(StatsError::NonFiniteRange)
        ));
    }

    #[test]
    fn pearson_detects_linear_relations() {
        let x = cells(&[1.0, 2.0, 3.0, 4.0]);
        let up = cells(&[2.0, 4.0, 6.0, 8.0]);
        let down = cells(&[8.0, 6.0, 4.0, 2.0]);

        assert!((StatsCalculator::pearson(&x, &up) - 1.0).abs() < 1e-12);
        assert!((StatsCalculator::pearson(&x, &down) + 1.0).abs() < 1e-12);
        assert!(StatsCalculator::pearson(&x, &cells(&[1.0, 1.0, 1.0, 1.0])).is_nan());
    }

    #[test]
    fn pearson_skips_incomplete_rows() {
        let x = vec![Some(1.0), None, Some(3.0), Some(4.0)];
        let y = vec![Some(1.0), Some(50.0), Some(3.0), Some(4.0)];
        assert!((StatsCalculator::pearson(&x, &y) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn correlation_matrix_is_symmetric_with_unit_diagonal() {
        let columns = vec![
            cells(&[1.0, 2.0, 3.0, 5.0]),
            cells(&[2.0, 1.0, 4.0, 3.0]),
            cells(&[9.0, 7.0, 4.0, 1.0]),
        ];
        let matrix = StatsCalculator::correlation_matrix(&columns);

        assert_eq!(matrix.len(), 3);
        for i in 0..3 {
            assert!((matrix[i][i] - 1.0).abs() < 1e-12);
            for j in 0..3 {
                assert!((matrix[i][j] - matrix[j][i]).abs() < 1e-12);
            }
        }
    }
}
