//! Chart-ready series and axis ranges.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ResultsError};
use crate::group::GroupedResults;
use crate::metric::Metric;

/// Headroom added above the tallest point when the y-axis is not fixed.
const Y_HEADROOM: f64 = 0.05;

/// One suite's measurements projected onto a single metric.
///
/// `xs` and `ys` have the same length and keep the group's row order; no
/// sorting by degree happens here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Suite the points belong to.
    pub suite: String,
    /// Metric plotted on the y-axis.
    pub metric: Metric,
    /// Degrees.
    pub xs: Vec<u32>,
    /// Metric values.
    pub ys: Vec<f64>,
}

impl Series {
    /// `(degree, value)` pairs in order.
    pub fn points(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.xs.iter().copied().zip(self.ys.iter().copied())
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// Returns `true` if the series has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }
}

impl GroupedResults {
    /// Builds the `metric` series for `suite`.
    ///
    /// # Errors
    ///
    /// Returns [`ResultsError::UnknownSuite`] if no row matched `suite`, and
    /// [`ResultsError::MetricUnavailable`] if any measurement lacks `metric`.
    pub fn series(&self, suite: &str, metric: Metric) -> Result<Series> {
        let measurements = self
            .get(suite)
            .ok_or_else(|| ResultsError::UnknownSuite(suite.to_string()))?;

        let mut xs = Vec::with_capacity(measurements.len());
        let mut ys = Vec::with_capacity(measurements.len());
        for m in measurements {
            let value = m.value(metric).ok_or_else(|| ResultsError::MetricUnavailable {
                suite: suite.to_string(),
                metric,
            })?;
            xs.push(m.degree);
            ys.push(value);
        }

        Ok(Series {
            suite: suite.to_string(),
            metric,
            xs,
            ys,
        })
    }
}

/// Axis extents covering a set of series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRanges {
    /// Smallest degree.
    pub min_x: u32,
    /// Largest degree.
    pub max_x: u32,
    /// Largest value, or the caller's override.
    pub max_y: f64,
    /// Whether `max_y` came from an override.
    pub y_fixed: bool,
}

impl AxisRanges {
    /// Computes ranges over the union of `series`.
    ///
    /// Returns `None` when there are no points at all.
    pub fn from_series<'a, I>(series: I, max_y_override: Option<f64>) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Series>,
    {
        let mut points = series.into_iter().flat_map(Series::points);
        let (x0, y0) = points.next()?;
        let (min_x, max_x, max_y) = points.fold((x0, x0, y0), |(lo, hi, top), (x, y)| {
            (lo.min(x), hi.max(x), top.max(y))
        });

        Some(Self {
            min_x,
            max_x,
            max_y: max_y_override.unwrap_or(max_y),
            y_fixed: max_y_override.is_some(),
        })
    }

    /// Top of the y-axis: the override verbatim, or the data maximum plus
    /// five percent headroom.
    #[must_use]
    pub fn y_top(&self) -> f64 {
        if self.y_fixed {
            self.max_y
        } else {
            self.max_y + self.max_y * Y_HEADROOM
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::Measurement;

    fn grouped() -> GroupedResults {
        let mut grouped = GroupedResults::new();
        for (suite, degree, real_time, bps) in [
            ("Fibonacci", 4, 100.0, None),
            ("Galois", 4, 200.0, Some(1.0e9)),
            ("Galois", 7, 150.0, Some(2.0e9)),
        ] {
            grouped.push(
                suite,
                Measurement {
                    degree,
                    real_time,
                    cpu_time: real_time * 0.9,
                    bytes_per_second: bps,
                },
            );
        }
        grouped
    }

    #[test]
    fn builds_series_in_group_order() {
        let series = grouped().series("Fibonacci", Metric::RealTime).unwrap();
        assert_eq!(series.len(), 1);
        assert!(!series.is_empty());
        assert_eq!(series.xs, [4]);
        assert_eq!(series.ys, [100.0]);

        let series = grouped().series("Galois", Metric::BytesPerSecond).unwrap();
        assert_eq!(series.points().collect::<Vec<_>>(), [(4, 1.0e9), (7, 2.0e9)]);
    }

    #[test]
    fn unknown_suite_fails() {
        assert!(matches!(
            grouped().series("FeedthroughGalois", Metric::RealTime),
            Err(ResultsError::UnknownSuite(name)) if name == "FeedthroughGalois"
        ));
    }

    #[test]
    fn missing_metric_fails() {
        assert!(matches!(
            grouped().series("Fibonacci", Metric::BytesPerSecond),
            Err(ResultsError::MetricUnavailable { metric: Metric::BytesPerSecond, .. })
        ));
    }

    #[test]
    fn ranges_cover_union() {
        let grouped = grouped();
        let all = [
            grouped.series("Fibonacci", Metric::RealTime).unwrap(),
            grouped.series("Galois", Metric::RealTime).unwrap(),
        ];
        let ranges = AxisRanges::from_series(&all, None).unwrap();
        assert_eq!((ranges.min_x, ranges.max_x), (4, 7));
        assert!((ranges.max_y - 200.0).abs() < f64::EPSILON);
        assert!((ranges.y_top() - 210.0).abs() < 1e-9);

        let fixed = AxisRanges::from_series(&all, Some(500.0)).unwrap();
        assert!((fixed.y_top() - 500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ranges_of_nothing() {
        let none: [Series; 0] = [];
        assert_eq!(AxisRanges::from_series(&none, None), None);
    }
}
