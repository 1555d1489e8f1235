//! LFSR benchmark plotter.
//!
//! Reads a Google-Benchmark-style CSV of LFSR runs, groups the rows by suite
//! and degree, and charts time (and optionally throughput) against degree.
//!
//! Pipeline: decode input → parse CSV → group by suite → build charts →
//!           report on stdout → render images.

mod cli;
mod config;
mod output;
mod plot;
mod render;
mod verbose;

use anyhow::{Context, Result};
use clap::Parser;

use config::{OutputFormat, PlotConfig};
use plot::Chart;
use render::{ChartRenderer, PlottersRenderer};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    verbose::init(cli.quiet, cli.verbose);

    let config = PlotConfig::resolve(&cli)?;
    let charts = plot::run(&config)?;

    match config.format {
        OutputFormat::Table => output::print_tables(&charts)?,
        OutputFormat::Json => output::print_json(&config.platform, &charts)?,
        OutputFormat::Off => {}
    }

    if config.write_image {
        let renderer = PlottersRenderer::new(&config)?;
        write_images(&renderer, &config, &charts)?;
    }
    Ok(())
}

/// Renders every chart into the configured output directory.
fn write_images(renderer: &dyn ChartRenderer, config: &PlotConfig, charts: &[Chart]) -> Result<()> {
    let _t = verbose::Timer::start("render images");
    std::fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("creating {}", config.output_dir.display()))?;

    for chart in charts {
        let path = config.output_dir.join(chart.file_name(config.image_format));
        renderer.render(chart, &path)?;
    }
    Ok(())
}
