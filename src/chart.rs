//! Chart rendering.
//!
//! Draws the cleaned table as a scatter of publication date against
//! training compute (log scale), one series per domain in category order.
//! Everything visual comes from [`ChartConfig`]; the table is only read.

use plotters::prelude::*;
use std::fs;
use std::ops::Range;
use std::path::Path;
use tracing::{info, instrument, warn};

use crate::config::ChartConfig;
use crate::error::{ChartError, Result};
use crate::types::{CleanTable, Domain, Record};

const FONT: &str = "sans-serif";
const HEADER_HEIGHT: u32 = 90;
const FOOTER_HEIGHT: u32 = 30;
const YEAR_PADDING: f64 = 2.0;

fn render_err<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError::Render(e.to_string())
}

/// Fractional-year span covering every record, padded on both sides
pub fn year_bounds(table: &CleanTable) -> Range<f64> {
    let years = table.iter().map(Record::fractional_year);
    let (min, max) = years.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| {
        (lo.min(y), hi.max(y))
    });

    if min.is_finite() && max.is_finite() {
        (min - YEAR_PADDING).floor()..(max + YEAR_PADDING).ceil()
    } else {
        1950.0..2030.0
    }
}

/// Whole decades of FLOP covering every plottable record
pub fn compute_bounds(table: &CleanTable) -> Range<f64> {
    let (min, max) = table
        .iter()
        .map(|r| r.training_compute_flop)
        .filter(|v| *v > 0.0)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if min.is_finite() && max.is_finite() {
        let lo = 10f64.powf(min.log10().floor());
        let mut hi = 10f64.powf(max.log10().ceil());
        if hi <= lo {
            hi = lo * 10.0;
        }
        lo..hi
    } else {
        1.0..1e26
    }
}

/// Axis tick text for a power of ten, e.g. `1e23`
pub fn format_power_of_ten(value: f64) -> String {
    if value <= 0.0 {
        return String::new();
    }
    format!("1e{}", value.log10().round() as i32)
}

/// Render `table` to an SVG file at `path`, creating parent directories.
#[instrument(skip(table, config), fields(path = %path.display(), rows = table.len()))]
pub fn render_chart(table: &CleanTable, config: &ChartConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let palette = Domain::ALL
        .iter()
        .map(|d| config.color_for(*d).map(|(r, g, b)| RGBColor(r, g, b)))
        .collect::<Result<Vec<_>>>()?;

    let root = SVGBackend::new(path, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let (header, body) = root.split_vertically(HEADER_HEIGHT);
    let body_height = body.dim_in_pixel().1;
    let (plot_area, footer) = body.split_vertically(body_height.saturating_sub(FOOTER_HEIGHT));

    header
        .draw(&Text::new(
            config.title.as_str(),
            (24, 18),
            (FONT, 28.0).into_font().style(FontStyle::Bold),
        ))
        .map_err(render_err)?;
    header
        .draw(&Text::new(
            config.subtitle.as_str(),
            (24, 56),
            (FONT, 16.0).into_font().color(&RGBColor(90, 90, 90)),
        ))
        .map_err(render_err)?;
    footer
        .draw(&Text::new(
            config.caption.as_str(),
            (24, 8),
            (FONT, 12.0).into_font().color(&RGBColor(120, 120, 120)),
        ))
        .map_err(render_err)?;

    let mut chart = ChartBuilder::on(&plot_area)
        .margin_left(16)
        .margin_right(32)
        .margin_top(8)
        .x_label_area_size(48)
        .y_label_area_size(72)
        .build_cartesian_2d(year_bounds(table), compute_bounds(table).log_scale())
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_desc(config.x_label.as_str())
        .y_desc(config.y_label.as_str())
        .x_label_formatter(&|year| format!("{:.0}", year))
        .y_label_formatter(&|flop| format_power_of_ten(*flop))
        .light_line_style(&RGBColor(235, 235, 235))
        .label_style((FONT, 13.0))
        .axis_desc_style((FONT, 15.0))
        .draw()
        .map_err(render_err)?;

    let mut skipped = 0usize;
    for (domain, records) in table.by_domain() {
        let color = palette[domain.index()];
        let size = config.point_size;

        let points: Vec<(f64, f64)> = records
            .iter()
            .filter_map(|r| {
                if r.training_compute_flop > 0.0 {
                    Some((r.fractional_year(), r.training_compute_flop))
                } else {
                    skipped += 1;
                    None
                }
            })
            .collect();
        let count = points.len();

        chart
            .draw_series(
                points
                    .into_iter()
                    .map(|point| Circle::new(point, size, color.mix(0.75).filled())),
            )
            .map_err(render_err)?
            .label(format!("{} ({})", domain, count))
            .legend(move |(x, y)| Circle::new((x + 8, y), size, color.filled()));
    }
    if skipped > 0 {
        warn!(skipped, "Zero-compute records cannot be placed on a log axis");
    }

    for annotation in &config.annotations {
        let Some(record) = table.find_system(&annotation.system) else {
            warn!(system = %annotation.system, "Annotated system not in table");
            continue;
        };
        if record.training_compute_flop <= 0.0 {
            continue;
        }

        let anchor = (record.fractional_year(), record.training_compute_flop);
        let callout = EmptyElement::at(anchor)
            + Circle::new((0, 0), config.point_size + 3, BLACK.stroke_width(1))
            + Text::new(
                annotation.text().to_string(),
                (8, -16),
                (FONT, 13.0).into_font().color(&RGBColor(40, 40, 40)),
            );
        chart.draw_series(std::iter::once(callout)).map_err(render_err)?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(&WHITE.mix(0.85))
        .border_style(&RGBColor(200, 200, 200))
        .label_font((FONT, 13.0))
        .draw()
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    info!("Rendered chart");
    Ok(())
}
