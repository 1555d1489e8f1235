//! `lfsr-results` --- parser for LFSR benchmark result CSV files.
//!
//! Turns the CSV output of the LFSR benchmark harness into chart-ready
//! series. The pipeline has four stages:
//!
//! 1. [`encoding`]: sniff the text encoding of the raw file bytes.
//! 2. [`record`]: decode the file and yield one [`RawRecord`] per data row.
//! 3. [`group`]: keep rows named `LFSR_<Suite><Degree_N>...` and group their
//!    measurements by suite.
//! 4. [`series`]: project a group onto `(degree, metric)` pairs and compute
//!    axis ranges.
//!
//! # Usage
//!
//! ```ignore
//! let grouped = lfsr_results::load_grouped(path, EncodingChoice::Auto, &[Metric::RealTime])?;
//! let series = grouped.series("FeedthroughGalois", Metric::RealTime)?;
//! ```

pub mod encoding;
pub mod error;
pub mod group;
pub mod metric;
pub mod record;
pub mod series;

use std::path::Path;

pub use encoding::{Encoding, EncodingChoice};
pub use error::{Result, ResultsError};
pub use group::{GroupedResults, Measurement};
pub use metric::Metric;
pub use record::{RawRecord, RecordReader};
pub use series::{AxisRanges, Series};

/// Runs the whole pipeline on one file: detect, decode, parse and group.
///
/// `metrics` names every metric the caller will later build series for;
/// rows lacking one of them abort the run.
///
/// # Errors
///
/// Returns the first [`ResultsError`] raised by any stage.
pub fn load_grouped(
    path: &Path,
    encoding: EncodingChoice,
    metrics: &[Metric],
) -> Result<GroupedResults> {
    let reader = RecordReader::open(path, encoding)?;
    group::group_records(reader, metrics)
}
