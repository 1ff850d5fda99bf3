//! PNG chart rendering.
//!
//! This module draws an `AggregatedSeries` as a line or bar chart and
//! derives the output path from the source file, the groupby columns and the
//! chart type.

use crate::config::JobConfig;
use crate::error::ProcessError;
use crate::models::{AggregatedSeries, ChartType};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::error::Error;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Series color for lines, markers and bars.
pub const SERIES_COLOR: RGBColor = RGBColor(0x2c, 0xa0, 0x2c);

/// Half the width of a bar, in category units.
const BAR_HALF_WIDTH: f64 = 0.3;

/// Largest axis bound the tick generator handles without overflowing.
const MAX_AXIS_BOUND: f64 = 1e300;

/// Narrower value spans are drawn on a unit-height axis.
const MIN_SPAN: f64 = 1e-9;

/// Canvas settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
        }
    }
}

/// Everything about one chart except its data.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub chart_type: ChartType,
    /// Caption drawn above the plot.
    pub title: String,
    /// X-axis description (the groupby names).
    pub x_desc: String,
    /// Y-axis description and legend entry.
    pub y_label: String,
    /// Where the PNG is written.
    pub output: PathBuf,
}

impl ChartSpec {
    /// Describe the chart drawn for `source` under `job`.
    pub fn for_source(source: &Path, job: &JobConfig) -> Self {
        let stem = file_stem(source);
        Self {
            chart_type: job.chart_type,
            title: format!("{} grouped by {}", stem, job.groupby.join(", ")),
            x_desc: job.groupby.join(", "),
            y_label: job.y_label(),
            output: output_path(source, &job.groupby, job.chart_type),
        }
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Output path: `<dir>/<stem>_<groupby..>_<chart_type>.png` beside the source.
/// Path separators inside groupby names become `_`.
pub fn output_path(source: &Path, groupby: &[String], chart_type: ChartType) -> PathBuf {
    let keys = groupby
        .join("_")
        .replace(|c: char| matches!(c, '/' | '\\'), "_");
    let name = format!("{}_{}_{}.png", file_stem(source), keys, chart_type);
    source.with_file_name(name)
}

/// Y range that always includes zero, padded so data labels fit.
///
/// Fails with `Unplottable` when a bound is not finite or exceeds
/// `MAX_AXIS_BOUND`.
fn y_range(series: &AggregatedSeries) -> Result<(f64, f64), ProcessError> {
    let (min, max) = series.value_range().unwrap_or((0.0, 0.0));
    let lo = min.min(0.0);
    let hi = max.max(0.0);

    let span = if hi - lo >= MIN_SPAN { hi - lo } else { 1.0 };
    let pad = span * 0.1;

    let lo = if lo < 0.0 { lo - pad } else { lo };
    let hi = hi + pad;

    if !(lo.abs() <= MAX_AXIS_BOUND && hi.abs() <= MAX_AXIS_BOUND) {
        return Err(ProcessError::Unplottable { min, max });
    }
    Ok((lo, hi))
}

/// Category label for an X-axis position, empty between categories.
fn label_at(x: f64, labels: &[String]) -> String {
    let rounded = x.round();
    if (x - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}

/// Data labels show the total truncated to an integer.
fn value_label(value: f64) -> String {
    format!("{}", value.trunc() as i64)
}

/// Chart renderer writing PNG files through `plotters`.
pub struct ChartRenderer {
    options: RenderOptions,
}

impl ChartRenderer {
    /// Create a new renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render `series` to `spec.output`, overwriting any existing file.
    pub fn render(&self, series: &AggregatedSeries, spec: &ChartSpec) -> Result<(), ProcessError> {
        if series.is_empty() {
            return Err(ProcessError::EmptySeries);
        }
        let y_bounds = y_range(series)?;

        debug!(
            "Drawing {} chart with {} groups to {}",
            spec.chart_type,
            series.len(),
            spec.output.display()
        );

        self.draw(series, spec, y_bounds).map_err(|e| ProcessError::Write {
            path: spec.output.clone(),
            message: e.to_string(),
        })
    }

    fn draw(
        &self,
        series: &AggregatedSeries,
        spec: &ChartSpec,
        (y_lo, y_hi): (f64, f64),
    ) -> Result<(), Box<dyn Error>> {
        let labels: Vec<String> = series.iter().map(|(key, _)| key.to_string()).collect();
        let points: Vec<(f64, f64)> = series
            .iter()
            .enumerate()
            .map(|(i, (_, total))| (i as f64, *total))
            .collect();
        let color = SERIES_COLOR;

        let root = BitMapBackend::new(&spec.output, (self.options.width, self.options.height))
            .into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&spec.title, ("sans-serif", 26))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(90)
            .build_cartesian_2d(-0.5f64..(labels.len() as f64 - 0.5), y_lo..y_hi)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .light_line_style(BLACK.mix(0.05))
            .x_labels(labels.len())
            .x_label_formatter(&|x: &f64| label_at(*x, &labels))
            .y_label_formatter(&|y: &f64| format!("{:.0}", y))
            .x_desc(spec.x_desc.as_str())
            .y_desc(spec.y_label.as_str())
            .axis_desc_style(("sans-serif", 18))
            .draw()?;

        match spec.chart_type {
            ChartType::Line => {
                chart
                    .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))?
                    .label(spec.y_label.as_str())
                    .legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                    });
                chart.draw_series(
                    points
                        .iter()
                        .map(|&(x, y)| Circle::new((x, y), 4, color.filled())),
                )?;
            }
            ChartType::Bar => {
                chart
                    .draw_series(points.iter().map(|&(x, y)| {
                        Rectangle::new(
                            [(x - BAR_HALF_WIDTH, 0.0), (x + BAR_HALF_WIDTH, y)],
                            color.filled(),
                        )
                    }))?
                    .label(spec.y_label.as_str())
                    .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));
            }
        }

        let label_style = TextStyle::from(("sans-serif", 14).into_font())
            .pos(Pos::new(HPos::Center, VPos::Bottom));
        chart.draw_series(
            points
                .iter()
                .map(|&(x, y)| Text::new(value_label(y), (x, y), label_style.clone())),
        )?;

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        root.present()?;
        Ok(())
    }
}

impl Default for ChartRenderer {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}
