//! Command-line interface definitions for lfsr-plot.

use std::path::PathBuf;

use clap::Parser;
use lfsr_results::EncodingChoice;

use crate::config::{ImageFormat, OutputFormat};

/// Plot LFSR benchmark results against LFSR degree.
#[derive(Parser, Debug)]
#[command(name = "lfsr-plot", version, about)]
pub struct Cli {
    /// CSV file containing benchmark results.
    #[arg(long)]
    pub input_file: PathBuf,

    /// Platform name, used in chart titles and image file names.
    #[arg(long)]
    pub platform: String,

    /// Write the rendered chart(s) to `<platform>.<ext>`.
    #[arg(long)]
    pub write_image: bool,

    /// Also plot throughput (`bytes_per_second`); writes `<platform>.wall.<ext>`
    /// and `<platform>.bytes.<ext>`.
    #[arg(long)]
    pub throughput: bool,

    /// Also plot CPU time, written to `<platform>.cpu.<ext>`.
    #[arg(long)]
    pub cpu_time: bool,

    /// Y-axis maximum for the throughput chart.
    #[arg(long)]
    pub max_y_bps: Option<f64>,

    /// Y-axis maximum for the wall-time chart.
    #[arg(long)]
    pub max_y_wall: Option<f64>,

    /// Suite to plot (repeatable; default: the Feedthrough suites).
    #[arg(long = "suite", value_name = "NAME")]
    pub suites: Vec<String>,

    /// Input encoding: auto, utf-8, utf-16, utf-16le, utf-16be, us-ascii, iso-8859-1.
    #[arg(long)]
    pub encoding: Option<EncodingChoice>,

    /// Image encoder for `--write-image`.
    #[arg(long, value_enum)]
    pub image_format: Option<ImageFormat>,

    /// Directory images are written to (default: current directory).
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// TrueType font used for chart text.
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// TOML configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Terminal report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Only print warnings and errors.
    #[arg(long, short = 'q', conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print debug diagnostics, including stage timings.
    #[arg(long, short = 'v')]
    pub verbose: bool,
}
