//! Error type shared by every pipeline stage.

use std::path::PathBuf;

use crate::metric::Metric;

/// Errors that can occur while reading and grouping benchmark results.
///
/// Every variant is fatal: the pipeline stops at the first error. Rows whose
/// name does not follow the LFSR naming convention are not errors.
#[derive(Debug, thiserror::Error)]
pub enum ResultsError {
    /// The input file could not be opened or read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Path of the file being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file bytes are not valid for the detected or configured encoding.
    #[error("input is not valid {encoding}: {reason}")]
    Decode {
        /// Label of the encoding used for decoding.
        encoding: &'static str,
        /// What went wrong.
        reason: String,
    },

    /// The input has no header row.
    #[error("input has no header row")]
    NoHeader,

    /// The CSV structure is malformed.
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from a row.
    #[error("row {row}: missing required field `{field}`")]
    MissingField {
        /// 1-based data row number.
        row: usize,
        /// Column name.
        field: &'static str,
    },

    /// A required column holds a value that cannot be used.
    #[error("row {row}: invalid value {value:?} for field `{field}`")]
    InvalidField {
        /// 1-based data row number.
        row: usize,
        /// Column name.
        field: &'static str,
        /// The offending raw value.
        value: String,
    },

    /// A series was requested for a suite with no matching rows.
    #[error("no results for suite `{0}`")]
    UnknownSuite(String),

    /// A series was requested for a metric some measurements lack.
    #[error("suite `{suite}` has no `{metric}` values")]
    MetricUnavailable {
        /// Suite the series was requested for.
        suite: String,
        /// Metric that is missing.
        metric: Metric,
    },

    /// An encoding label was not recognised.
    #[error("unknown encoding `{0}`")]
    UnknownEncoding(String),

    /// A metric name was not recognised.
    #[error("unknown metric `{0}` (expected real_time, cpu_time or bytes_per_second)")]
    UnknownMetric(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = ResultsError> = std::result::Result<T, E>;
