//! Plot configuration.
//!
//! Settings come from three layers, later ones winning: built-in defaults
//! that reproduce the classic Feedthrough chart, an optional TOML file
//! (`--config`), and command-line flags. [`PlotConfig::resolve`] flattens
//! them into one explicit struct that is threaded through the pipeline.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use lfsr_results::{EncodingChoice, Metric};
use serde::{Deserialize, Serialize, Serializer};

use crate::cli::Cli;

/// Default chart size in pixels.
const DEFAULT_SIZE: (u32, u32) = (800, 500);

/// Suites plotted when neither the CLI nor the config file names any.
const DEFAULT_SUITES: [(&str, &str, Rgb); 3] = [
    ("FeedthroughFibonacci", "Fibonacci", Rgb(0xf1, 0x47, 0xab)),
    ("FeedthroughFibonacciBulk", "FibonacciBulk", Rgb(0xb5, 0x11, 0xf2)),
    ("FeedthroughGalois", "Galois", Rgb(0x55, 0x9c, 0xff)),
];

/// Colors handed out to suites without an explicit color.
const PALETTE: [Rgb; 6] = [
    Rgb(0xf1, 0x47, 0xab),
    Rgb(0xb5, 0x11, 0xf2),
    Rgb(0x55, 0x9c, 0xff),
    Rgb(0x2e, 0xcc, 0x71),
    Rgb(0xf3, 0x9c, 0x12),
    Rgb(0xe7, 0x4c, 0x3c),
];

/// Image encoder used when writing charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// PNG bitmap.
    #[default]
    Png,
    /// SVG vector image.
    Svg,
}

impl ImageFormat {
    /// File extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }
}

/// How series are reported on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text table per chart.
    Table,
    /// One JSON document with every chart.
    Json,
    /// Nothing.
    #[value(name = "none")]
    Off,
}

/// A `#rrggbb` color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl FromStr for Rgb {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            bail!("invalid color '{s}' (expected #rrggbb)");
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
        Ok(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ---------------------------------------------------------------------------
// File configuration
// ---------------------------------------------------------------------------

/// Contents of a `--config` TOML file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Input encoding label, or `auto`.
    pub encoding: Option<String>,
    /// Image encoder.
    pub image_format: Option<ImageFormat>,
    /// Chart width in pixels.
    pub width: Option<u32>,
    /// Chart height in pixels.
    pub height: Option<u32>,
    /// Directory images are written to.
    pub output_dir: Option<PathBuf>,
    /// TrueType font used for chart text.
    pub font: Option<PathBuf>,
    /// Y-axis maximum for the wall-time chart.
    pub max_y_wall: Option<f64>,
    /// Y-axis maximum for the throughput chart.
    pub max_y_bps: Option<f64>,
    /// Suites to plot, with their legend labels and colors.
    #[serde(default)]
    pub suites: Vec<SuiteStyle>,
}

/// Legend styling of one suite in the config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuiteStyle {
    /// Suite name as captured from `LFSR_<Suite><Degree_N>`.
    pub name: String,
    /// Legend label (default: the suite name).
    pub label: Option<String>,
    /// Line color as `#rrggbb`.
    pub color: Option<String>,
}

impl FileConfig {
    /// Loads and parses a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// A suite selected for plotting.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSuite {
    /// Suite name used for lookup.
    pub name: String,
    /// Legend label.
    pub label: String,
    /// Line and marker color.
    pub color: Rgb,
}

/// Everything one run needs, after defaults, file and CLI are merged.
#[derive(Debug, Clone)]
pub struct PlotConfig {
    /// Benchmark CSV to read.
    pub input: PathBuf,
    /// Platform label for titles and file names.
    pub platform: String,
    /// Whether images are written.
    pub write_image: bool,
    /// Whether the throughput chart is produced.
    pub throughput: bool,
    /// Whether the CPU-time chart is produced.
    pub cpu_time: bool,
    /// Y-axis maximum for the wall-time chart.
    pub max_y_wall: Option<f64>,
    /// Y-axis maximum for the throughput chart.
    pub max_y_bps: Option<f64>,
    /// How the input encoding is chosen.
    pub encoding: EncodingChoice,
    /// Image encoder.
    pub image_format: ImageFormat,
    /// Directory images are written to.
    pub output_dir: PathBuf,
    /// Chart size in pixels.
    pub size: (u32, u32),
    /// Font for chart text, if one was requested.
    pub font: Option<PathBuf>,
    /// Suites to plot, in legend order.
    pub suites: Vec<PlotSuite>,
    /// Terminal report format.
    pub format: OutputFormat,
}

impl PlotConfig {
    /// Loads the `--config` file, if any, and merges it with the CLI.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::merge(cli, file)
    }

    /// Merges CLI flags over file settings over built-in defaults.
    pub fn merge(cli: &Cli, file: FileConfig) -> Result<Self> {
        if cli.platform.is_empty() || cli.platform.contains(['/', '\\']) {
            bail!(
                "platform '{}' cannot be used in a file name",
                cli.platform
            );
        }

        let encoding = match (cli.encoding, &file.encoding) {
            (Some(choice), _) => choice,
            (None, Some(label)) => label
                .parse::<EncodingChoice>()
                .with_context(|| format!("config key `encoding`: '{label}'"))?,
            (None, None) => EncodingChoice::Auto,
        };

        let max_y_wall = cli.max_y_wall.or(file.max_y_wall);
        let max_y_bps = cli.max_y_bps.or(file.max_y_bps);
        for (flag, value) in [("max-y-wall", max_y_wall), ("max-y-bps", max_y_bps)] {
            if let Some(v) = value {
                if !(v.is_finite() && v > 0.0) {
                    bail!("--{flag} must be a positive number, got {v}");
                }
            }
        }

        let size = (
            file.width.unwrap_or(DEFAULT_SIZE.0),
            file.height.unwrap_or(DEFAULT_SIZE.1),
        );
        if size.0 == 0 || size.1 == 0 {
            bail!("chart size {}x{} is empty", size.0, size.1);
        }

        let suites = resolve_suites(&cli.suites, &file.suites)?;

        Ok(Self {
            input: cli.input_file.clone(),
            platform: cli.platform.clone(),
            write_image: cli.write_image,
            throughput: cli.throughput,
            cpu_time: cli.cpu_time,
            max_y_wall,
            max_y_bps,
            encoding,
            image_format: cli.image_format.or(file.image_format).unwrap_or_default(),
            output_dir: cli
                .output_dir
                .clone()
                .or(file.output_dir)
                .unwrap_or_else(|| PathBuf::from(".")),
            size,
            font: cli.font.clone().or(file.font),
            suites,
            format: cli.format,
        })
    }

    /// Metrics every plotted row must provide.
    pub fn metrics(&self) -> Vec<Metric> {
        let mut metrics = vec![Metric::RealTime];
        if self.cpu_time {
            metrics.push(Metric::CpuTime);
        }
        if self.throughput {
            metrics.push(Metric::BytesPerSecond);
        }
        metrics
    }
}

/// Picks the suite list and fills in labels and colors.
fn resolve_suites(cli: &[String], file: &[SuiteStyle]) -> Result<Vec<PlotSuite>> {
    let names: Vec<&str> = if !cli.is_empty() {
        cli.iter().map(String::as_str).collect()
    } else if !file.is_empty() {
        file.iter().map(|s| s.name.as_str()).collect()
    } else {
        DEFAULT_SUITES.iter().map(|(name, _, _)| *name).collect()
    };

    names
        .into_iter()
        .enumerate()
        .map(|(i, name)| -> Result<PlotSuite> {
            let style = file.iter().find(|s| s.name == name);
            let builtin = DEFAULT_SUITES.iter().find(|(n, _, _)| *n == name);

            let label = style
                .and_then(|s| s.label.clone())
                .or_else(|| builtin.map(|(_, label, _)| (*label).to_string()))
                .unwrap_or_else(|| name.to_string());
            let color = match style.and_then(|s| s.color.as_deref()) {
                Some(color) => color
                    .parse::<Rgb>()
                    .with_context(|| format!("color of suite '{name}'"))?,
                None => builtin.map_or(PALETTE[i % PALETTE.len()], |(_, _, color)| *color),
            };

            Ok(PlotSuite {
                name: name.to_string(),
                label,
                color,
            })
        })
        .collect()
}
