//! Measurement dimensions that can be plotted against degree.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ResultsError;

/// A plottable measurement column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Wall-clock time per iteration (`real_time`).
    RealTime,
    /// CPU time per iteration (`cpu_time`).
    CpuTime,
    /// Throughput (`bytes_per_second`).
    BytesPerSecond,
}

impl Metric {
    /// All metrics, in column order.
    pub const ALL: [Metric; 3] = [Metric::RealTime, Metric::CpuTime, Metric::BytesPerSecond];

    /// CSV column name holding this metric.
    #[must_use]
    pub fn column(self) -> &'static str {
        match self {
            Metric::RealTime => "real_time",
            Metric::CpuTime => "cpu_time",
            Metric::BytesPerSecond => "bytes_per_second",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for Metric {
    type Err = ResultsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|m| m.column() == s)
            .ok_or_else(|| ResultsError::UnknownMetric(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_column_names() {
        assert_eq!("real_time".parse::<Metric>().unwrap(), Metric::RealTime);
        assert_eq!("cpu_time".parse::<Metric>().unwrap(), Metric::CpuTime);
        assert_eq!(
            "bytes_per_second".parse::<Metric>().unwrap(),
            Metric::BytesPerSecond
        );
        assert!(matches!(
            "items_per_second".parse::<Metric>(),
            Err(ResultsError::UnknownMetric(_))
        ));
    }
}
