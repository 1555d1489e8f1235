//! Chart assembly.
//!
//! Bridges the `lfsr-results` pipeline to the renderers: loads the grouped
//! results once, then builds one [`Chart`] per requested metric with its
//! series, legend styling, axis ranges and output file name.

use anyhow::{Context, Result};
use lfsr_results::{AxisRanges, GroupedResults, Metric, Series};
use serde::Serialize;

use crate::config::{ImageFormat, PlotConfig, Rgb};
use crate::verbose::Timer;

/// One suite's series with its legend styling.
#[derive(Debug, Clone, Serialize)]
pub struct PlottedSeries {
    /// Legend label.
    pub label: String,
    /// Line and marker color.
    pub color: Rgb,
    /// The points.
    #[serde(flatten)]
    pub series: Series,
}

/// A fully specified line chart.
#[derive(Debug, Clone, Serialize)]
pub struct Chart {
    /// Metric on the y-axis.
    pub metric: Metric,
    /// Output file name without extension.
    pub file_stem: String,
    /// Main title.
    pub title: String,
    /// Second title line.
    pub subtitle: String,
    /// Y-axis description.
    pub y_desc: &'static str,
    /// Plotted series, in legend order.
    pub series: Vec<PlottedSeries>,
    /// Axis extents over every series.
    pub ranges: AxisRanges,
}

impl Chart {
    /// Output file name for `format`.
    pub fn file_name(&self, format: ImageFormat) -> String {
        format!("{}.{}", self.file_stem, format.extension())
    }
}

/// Reads the input file and groups its rows.
pub fn load(config: &PlotConfig) -> Result<GroupedResults> {
    let _t = Timer::start("load results");
    let grouped = lfsr_results::load_grouped(&config.input, config.encoding, &config.metrics())
        .with_context(|| format!("loading benchmark results from {}", config.input.display()))?;

    tracing::debug!(
        suites = ?grouped.suite_names().collect::<Vec<_>>(),
        "loaded {}",
        config.input.display()
    );
    Ok(grouped)
}

/// Builds every chart the configuration asks for.
///
/// A configured suite with no rows in the input is an error.
pub fn build_charts(config: &PlotConfig, grouped: &GroupedResults) -> Result<Vec<Chart>> {
    chart_plans(config)
        .into_iter()
        .map(|plan| build_chart(config, grouped, plan))
        .collect()
}

/// Reads the input and builds the charts.
pub fn run(config: &PlotConfig) -> Result<Vec<Chart>> {
    let grouped = load(config)?;
    build_charts(config, &grouped)
}

struct ChartPlan {
    metric: Metric,
    file_stem: String,
    max_y: Option<f64>,
}

/// Wall time alone goes to `<platform>`; with extra charts each file gets a
/// metric suffix.
fn chart_plans(config: &PlotConfig) -> Vec<ChartPlan> {
    let platform = &config.platform;
    let wall_stem = if config.throughput {
        format!("{platform}.wall")
    } else {
        platform.clone()
    };

    let mut plans = vec![ChartPlan {
        metric: Metric::RealTime,
        file_stem: wall_stem,
        max_y: config.max_y_wall,
    }];
    if config.cpu_time {
        plans.push(ChartPlan {
            metric: Metric::CpuTime,
            file_stem: format!("{platform}.cpu"),
            max_y: None,
        });
    }
    if config.throughput {
        plans.push(ChartPlan {
            metric: Metric::BytesPerSecond,
            file_stem: format!("{platform}.bytes"),
            max_y: config.max_y_bps,
        });
    }
    plans
}

fn build_chart(config: &PlotConfig, grouped: &GroupedResults, plan: ChartPlan) -> Result<Chart> {
    let series = config
        .suites
        .iter()
        .map(|suite| -> Result<PlottedSeries> {
            Ok(PlottedSeries {
                label: suite.label.clone(),
                color: suite.color,
                series: grouped.series(&suite.name, plan.metric)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    // Every suite has at least one point, so this only fails with no suites.
    let ranges = AxisRanges::from_series(series.iter().map(|s| &s.series), plan.max_y)
        .context("no data points to plot")?;

    let (title, subtitle, y_desc) = match plan.metric {
        Metric::RealTime => ("Wall Time per Degree", "Average time per run", "Time (ns)"),
        Metric::CpuTime => ("CPU Time per Degree", "Average CPU time per run", "Time (ns)"),
        Metric::BytesPerSecond => ("Throughput per Degree", "Bytes per second", "Bytes/s"),
    };

    Ok(Chart {
        metric: plan.metric,
        file_stem: plan.file_stem,
        title: title.to_string(),
        subtitle: format!("{subtitle}, 4-tap LFSR ({})", config.platform),
        y_desc,
        series,
        ranges,
    })
}
