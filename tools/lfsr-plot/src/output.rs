//! Terminal output formatting for plotted series.

use std::io::{self, Write};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::plot::Chart;

/// JSON document printed by `--format json`.
#[derive(Serialize)]
struct Report<'a> {
    platform: &'a str,
    charts: &'a [Chart],
}

/// Print a chart's series as a formatted table.
pub fn write_chart_table(out: &mut impl Write, chart: &Chart) -> io::Result<()> {
    // Compute column widths.
    let name_width = chart
        .series
        .iter()
        .map(|s| s.label.len())
        .max()
        .unwrap_or(5)
        .max(5);
    let metric = chart.metric.column();
    let value_width = metric.len().max(14);

    writeln!(out)?;
    writeln!(out, "  {} ({})", chart.title, chart.subtitle)?;
    writeln!(out)?;

    // Header.
    writeln!(
        out,
        "  {:<name_width$}  {:>6}  {:>value_width$}",
        "Suite", "Degree", metric
    )?;
    writeln!(out, "  {:-<name_width$}  {:->6}  {:->value_width$}", "", "", "")?;

    for plotted in &chart.series {
        for (degree, value) in plotted.series.points() {
            writeln!(
                out,
                "  {:<name_width$}  {:>6}  {:>value_width$.3}",
                plotted.label, degree, value
            )?;
        }
    }

    let ranges = &chart.ranges;
    writeln!(out)?;
    writeln!(
        out,
        "  Degrees {}..={}, y-axis top {:.3}{}",
        ranges.min_x,
        ranges.max_x,
        ranges.y_top(),
        if ranges.y_fixed { " (fixed)" } else { "" }
    )?;
    Ok(())
}

/// Print every chart as one pretty JSON document.
pub fn write_json(out: &mut impl Write, platform: &str, charts: &[Chart]) -> Result<()> {
    let report = Report { platform, charts };
    serde_json::to_writer_pretty(&mut *out, &report).context("serializing charts to JSON")?;
    writeln!(out)?;
    Ok(())
}

/// Print all charts as tables to stdout.
pub fn print_tables(charts: &[Chart]) -> Result<()> {
    let mut stdout = io::stdout().lock();
    for chart in charts {
        write_chart_table(&mut stdout, chart)?;
    }
    writeln!(stdout)?;
    Ok(())
}

/// Print all charts as JSON to stdout.
pub fn print_json(platform: &str, charts: &[Chart]) -> Result<()> {
    write_json(&mut io::stdout().lock(), platform, charts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Rgb;
    use crate::plot::PlottedSeries;
    use lfsr_results::{AxisRanges, Metric, Series};

    fn chart() -> Chart {
        let series = Series {
            suite: "FeedthroughGalois".into(),
            metric: Metric::RealTime,
            xs: vec![5, 6],
            ys: vec![12.5, 13.25],
        };
        let ranges = AxisRanges::from_series([&series], None).unwrap();
        Chart {
            metric: Metric::RealTime,
            file_stem: "x86".into(),
            title: "Wall Time per Degree".into(),
            subtitle: "Average time per run, 4-tap LFSR (x86)".into(),
            y_desc: "Time (ns)",
            series: vec![PlottedSeries {
                label: "Galois".into(),
                color: Rgb(0x55, 0x9c, 0xff),
                series,
            }],
            ranges,
        }
    }

    #[test]
    fn table_lists_every_point() {
        let mut out = Vec::new();
        write_chart_table(&mut out, &chart()).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Wall Time per Degree"));
        assert!(text.contains("real_time"));
        let rows: Vec<&str> = text.lines().filter(|l| l.contains("Galois")).collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].contains("12.500"));
        assert!(rows[1].contains("13.250"));
        assert!(text.contains("Degrees 5..=6"));
    }

    #[test]
    fn json_report_shape() {
        let mut out = Vec::new();
        write_json(&mut out, "x86", &[chart()]).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["platform"], "x86");
        let series = &value["charts"][0]["series"][0];
        assert_eq!(series["label"], "Galois");
        assert_eq!(series["color"], "#559cff");
        assert_eq!(series["suite"], "FeedthroughGalois");
        assert_eq!(series["xs"], serde_json::json!([5, 6]));
        assert_eq!(value["charts"][0]["metric"], "real_time");
    }
}
