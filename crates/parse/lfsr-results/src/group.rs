//! Case-name filtering and grouping by suite.
//!
//! LFSR benchmarks are registered as `LFSR_<Suite><Degree_N>`, optionally
//! followed by harness suffixes such as `/iterations:1000` or `_mean`. Rows
//! whose name does not follow that shape are skipped without error; rows
//! whose timing columns are malformed abort grouping.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ResultsError};
use crate::metric::Metric;
use crate::record::RawRecord;

/// Anchored at the start; anything after the degree is ignored.
static CASE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^LFSR_([A-Za-z]+)<Degree_([0-9]+)>").expect("case name pattern is valid")
});

/// Timing and throughput of one benchmark case at one degree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// LFSR degree parsed from the case name.
    pub degree: u32,
    /// Wall-clock time per iteration.
    pub real_time: f64,
    /// CPU time per iteration.
    pub cpu_time: f64,
    /// Throughput, when the benchmark reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes_per_second: Option<f64>,
}

impl Measurement {
    /// Value of `metric` for this measurement.
    #[must_use]
    pub fn value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::RealTime => Some(self.real_time),
            Metric::CpuTime => Some(self.cpu_time),
            Metric::BytesPerSecond => self.bytes_per_second,
        }
    }
}

/// All measurements of one suite, in file order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteResults {
    /// Suite name as captured from the case name.
    pub suite: String,
    /// Measurements in the order their rows appeared.
    pub measurements: Vec<Measurement>,
}

/// Measurements grouped by suite.
///
/// Suites keep first-appearance order and measurements keep row order.
/// Duplicate `(suite, degree)` rows are all kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupedResults {
    suites: Vec<SuiteResults>,
}

impl GroupedResults {
    /// Creates an empty set of results.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `measurement` to `suite`, creating the suite on first use.
    pub fn push(&mut self, suite: &str, measurement: Measurement) {
        match self.suites.iter_mut().find(|s| s.suite == suite) {
            Some(group) => group.measurements.push(measurement),
            None => self.suites.push(SuiteResults {
                suite: suite.to_string(),
                measurements: vec![measurement],
            }),
        }
    }

    /// Measurements of `suite`, or `None` if no row matched it.
    #[must_use]
    pub fn get(&self, suite: &str) -> Option<&[Measurement]> {
        self.suites
            .iter()
            .find(|s| s.suite == suite)
            .map(|s| s.measurements.as_slice())
    }

    /// Iterates over the suites in first-appearance order.
    pub fn iter(&self) -> impl Iterator<Item = &SuiteResults> {
        self.suites.iter()
    }

    /// Suite names in first-appearance order.
    pub fn suite_names(&self) -> impl Iterator<Item = &str> {
        self.suites.iter().map(|s| s.suite.as_str())
    }

    /// Number of suites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.suites.len()
    }

    /// Returns `true` if no row matched the naming convention.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.suites.is_empty()
    }
}

/// Splits an LFSR case name into its suite and degree.
///
/// Returns `Ok(None)` for names outside the naming convention.
///
/// # Errors
///
/// Returns [`ResultsError::InvalidField`] if the degree does not fit a `u32`.
pub fn parse_case_name(row: usize, name: &str) -> Result<Option<(&str, u32)>> {
    let Some(caps) = CASE_NAME.captures(name) else {
        return Ok(None);
    };
    let (Some(suite), Some(degree)) = (caps.get(1), caps.get(2)) else {
        return Ok(None);
    };
    let degree = degree.as_str().parse().map_err(|_| ResultsError::InvalidField {
        row,
        field: "name",
        value: name.to_string(),
    })?;
    Ok(Some((suite.as_str(), degree)))
}

/// Groups benchmark rows by suite.
///
/// `real_time` and `cpu_time` are validated on every row, matching or not.
/// `bytes_per_second` is validated on matching rows when `metrics` asks for
/// it, and captured opportunistically otherwise.
///
/// # Errors
///
/// Propagates reader errors and returns [`ResultsError::MissingField`] or
/// [`ResultsError::InvalidField`] for the first malformed row.
pub fn group_records<I>(records: I, metrics: &[Metric]) -> Result<GroupedResults>
where
    I: IntoIterator<Item = Result<RawRecord>>,
{
    let need_bytes = metrics.contains(&Metric::BytesPerSecond);
    let mut grouped = GroupedResults::new();
    let mut skipped = 0usize;

    for record in records {
        let record = record?;
        let row = record.row();
        let name = required(&record, "name")?;
        let real_time = measurement(&record, Metric::RealTime)?;
        let cpu_time = measurement(&record, Metric::CpuTime)?;
        tracing::trace!(row, name, real_time, cpu_time, "record");

        let Some((suite, degree)) = parse_case_name(row, name)? else {
            tracing::trace!(row, name, "name outside LFSR convention, skipped");
            skipped += 1;
            continue;
        };

        let bytes_per_second = if need_bytes {
            Some(measurement(&record, Metric::BytesPerSecond)?)
        } else {
            measurement(&record, Metric::BytesPerSecond).ok()
        };

        grouped.push(
            suite,
            Measurement {
                degree,
                real_time,
                cpu_time,
                bytes_per_second,
            },
        );
    }

    tracing::debug!(suites = grouped.len(), skipped, "grouped benchmark rows");
    Ok(grouped)
}

fn required<'a>(record: &'a RawRecord, field: &'static str) -> Result<&'a str> {
    record.get(field).ok_or(ResultsError::MissingField {
        row: record.row(),
        field,
    })
}

/// Parses a non-negative, finite numeric column.
fn measurement(record: &RawRecord, metric: Metric) -> Result<f64> {
    let field = metric.column();
    let raw = required(record, field)?;
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(ResultsError::InvalidField {
            row: record.row(),
            field,
            value: raw.to_string(),
        }),
    }
}
