//! Chart rendering.
//!
//! Image export sits behind [`ChartRenderer`] so the pipeline does not care
//! which backend writes the file. [`PlottersRenderer`] draws the dark
//! line-and-marker chart with `plotters`, to PNG or SVG.
//!
//! Text needs a TrueType font. One is loaded from `--font`, or from a list of
//! common system locations; without one the chart is drawn with axes, grid
//! and series but no text.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::{FontStyle, register_font};

use crate::config::{ImageFormat, PlotConfig, Rgb};
use crate::plot::Chart;

/// Fonts tried when none is configured.
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

const BACKGROUND: RGBColor = RGBColor(0x15, 0x15, 0x15);
const FOREGROUND: RGBColor = RGBColor(0xdd, 0xdd, 0xdd);
const GRID: RGBColor = RGBColor(0x22, 0x22, 0x22);
const LEGEND_BACKGROUND: RGBColor = RGBColor(0x33, 0x33, 0x33);

/// Something that can turn a [`Chart`] into an image file.
pub trait ChartRenderer {
    /// Render `chart` to `path`.
    fn render(&self, chart: &Chart, path: &Path) -> Result<()>;
}

/// `plotters`-backed renderer for PNG and SVG output.
pub struct PlottersRenderer {
    format: ImageFormat,
    size: (u32, u32),
    text: bool,
}

impl PlottersRenderer {
    /// Create a renderer for `config`, registering a font if one is found.
    pub fn new(config: &PlotConfig) -> Result<Self> {
        let text = match &config.font {
            Some(path) => {
                load_font(path)?;
                true
            }
            None => match SYSTEM_FONTS.iter().map(PathBuf::from).find(|p| p.is_file()) {
                Some(path) => load_font(&path).is_ok(),
                None => false,
            },
        };
        if !text {
            tracing::warn!("no usable font found (pass --font); charts are drawn without text");
        }

        Ok(Self {
            format: config.image_format,
            size: config.size,
            text,
        })
    }
}

impl ChartRenderer for PlottersRenderer {
    fn render(&self, chart: &Chart, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        let drawn = match self.format {
            ImageFormat::Png => {
                let root = BitMapBackend::new(path, self.size).into_drawing_area();
                draw_chart(&root, chart, self.text).map_err(|e| anyhow!("{e}"))
            }
            ImageFormat::Svg => {
                let root = SVGBackend::new(path, self.size).into_drawing_area();
                draw_chart(&root, chart, self.text).map_err(|e| anyhow!("{e}"))
            }
        };
        drawn.with_context(|| format!("drawing chart to {}", path.display()))?;

        tracing::info!("Chart written to {}", path.display());
        Ok(())
    }
}

/// Reads a TrueType font and registers it as the `sans-serif` family.
fn load_font(path: &Path) -> Result<()> {
    let bytes =
        std::fs::read(path).with_context(|| format!("reading font {}", path.display()))?;
    // Registered fonts must outlive every chart; one font per process.
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    register_font("sans-serif", FontStyle::Normal, bytes)
        .map_err(|_| anyhow!("invalid font {}", path.display()))?;
    tracing::debug!("using font {}", path.display());
    Ok(())
}

fn rgb(color: Rgb) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

/// Draw `chart` onto `root` and flush it to the backend.
fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &Chart,
    text: bool,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&BACKGROUND)?;

    let ranges = &chart.ranges;
    // A single degree would give an empty x range.
    let x_range = match ranges.min_x.checked_add(1) {
        _ if ranges.min_x < ranges.max_x => ranges.min_x..ranges.max_x,
        Some(next) => ranges.min_x..next,
        None => ranges.min_x - 1..ranges.min_x,
    };
    let y_top = if ranges.y_top() > 0.0 { ranges.y_top() } else { 1.0 };

    let mut builder = ChartBuilder::on(root);
    builder.margin(20);
    if text {
        builder
            .caption(
                format!("{}: {}", chart.title, chart.subtitle),
                ("sans-serif", 20).into_font().color(&FOREGROUND),
            )
            .x_label_area_size(40)
            .y_label_area_size(80);
    }
    let mut ctx = builder.build_cartesian_2d(x_range, 0f64..y_top)?;

    let mut mesh = ctx.configure_mesh();
    mesh.bold_line_style(GRID.stroke_width(1))
        .light_line_style(GRID.mix(0.4).stroke_width(1))
        .axis_style(FOREGROUND.stroke_width(1));
    if text {
        let span = u64::from(ranges.max_x - ranges.min_x) + 1;
        mesh.x_desc("Degree")
            .y_desc(chart.y_desc)
            .x_labels(usize::try_from(span.min(64)).unwrap_or(64))
            .y_labels(20)
            .label_style(("sans-serif", 13).into_font().color(&FOREGROUND));
    } else {
        mesh.x_labels(0).y_labels(0);
    }
    mesh.draw()?;

    for plotted in &chart.series {
        let color = rgb(plotted.color);
        let anno = ctx.draw_series(LineSeries::new(
            plotted.series.points(),
            color.stroke_width(2),
        ))?;
        if text {
            anno.label(plotted.label.as_str()).legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
        }
        ctx.draw_series(
            plotted
                .series
                .points()
                .map(|p| Circle::new(p, 3, color.filled())),
        )?;
    }

    if text {
        ctx.configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(LEGEND_BACKGROUND.mix(0.5).filled())
            .border_style(GRID.stroke_width(1))
            .label_font(("sans-serif", 13).into_font().color(&FOREGROUND))
            .draw()?;
    }

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::PlottedSeries;
    use lfsr_results::{AxisRanges, Metric, Series};

    fn chart_of(xs: Vec<u32>, ys: Vec<f64>) -> Chart {
        let series = Series {
            suite: "FeedthroughGalois".into(),
            metric: Metric::RealTime,
            xs,
            ys,
        };
        let ranges = AxisRanges::from_series([&series], None).unwrap();
        Chart {
            metric: Metric::RealTime,
            file_stem: "test".into(),
            title: "Wall Time per Degree".into(),
            subtitle: "Average time per run, 4-tap LFSR (test)".into(),
            y_desc: "Time (ns)",
            series: vec![PlottedSeries {
                label: "Galois".into(),
                color: Rgb(0x55, 0x9c, 0xff),
                series,
            }],
            ranges,
        }
    }

    fn svg_renderer() -> PlottersRenderer {
        PlottersRenderer {
            format: ImageFormat::Svg,
            size: (400, 250),
            text: false,
        }
    }

    #[test]
    fn renders_svg_without_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plots/test.svg");
        let chart = chart_of(vec![5, 7, 6], vec![10.0, 14.0, 12.0]);
        svg_renderer().render(&chart, &path).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("polyline"));
    }

    #[test]
    fn renders_single_point_at_largest_degree() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("max.svg");
        let chart = chart_of(vec![u32::MAX], vec![1.0]);
        svg_renderer().render(&chart, &path).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn missing_font_is_an_error() {
        assert!(load_font(Path::new("/nonexistent/font.ttf")).is_err());
    }
}
