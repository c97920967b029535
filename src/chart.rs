//! Drawing of report pages with plotters.

use crate::report::{Page, Panel, TraceStyle};
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::ops::Range;

/// Size of every page in pixels.
pub const PAGE_SIZE: (u32, u32) = (1200, 600);

const FONT: &str = "sans-serif";
const TIME_FORMAT: &str = "%d-%m-%y %H:%M";
/// Horizontal time labels on the bottom panel; few enough not to overlap.
const TIME_LABELS: usize = 8;

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

/// Render one page as a standalone SVG document.
pub fn render_svg(page: &Page) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, PAGE_SIZE).into_drawing_area();
        root.fill(&WHITE).context("failed to fill background")?;
        match page {
            Page::Title { text, font_size } => draw_title(&root, text, *font_size)?,
            Page::Chart { title, panels } => draw_chart(&root, title, panels)?,
        }
        root.present().context("failed to present page")?;
    }
    Ok(svg)
}

fn draw_title(root: &Area, text: &str, font_size: u32) -> Result<()> {
    let (width, height) = root.dim_in_pixel();
    let style = TextStyle::from((FONT, f64::from(font_size)).into_font())
        .pos(Pos::new(HPos::Center, VPos::Center));
    let center = (width as i32 / 2, height as i32 / 2);
    root.draw(&Text::new(text.to_string(), center, style))
        .context("failed to draw title")?;
    Ok(())
}

fn draw_chart(root: &Area, title: &str, panels: &[Panel]) -> Result<()> {
    let body = root
        .titled(title, (FONT, 16.0))
        .context("failed to draw chart title")?;

    let areas = body.split_evenly((panels.len().max(1), 1));
    for (i_panel, (area, panel)) in areas.iter().zip(panels).enumerate() {
        // Only the bottom panel carries time labels.
        let time_labels = i_panel + 1 == panels.len();
        draw_panel(area, panel, time_labels)
            .with_context(|| format!("failed to draw panel {:?}", panel.y_label))?;
    }
    Ok(())
}

fn draw_panel(area: &Area, panel: &Panel, time_labels: bool) -> Result<()> {
    let (x_range, y_range) = bounds(panel);
    let half_width = bar_half_width(&x_range, panel);

    let mut chart = ChartBuilder::on(area)
        .margin(6)
        .x_label_area_size(if time_labels { 30 } else { 4 })
        .y_label_area_size(70)
        .build_cartesian_2d(x_range, y_range)
        .context("failed to build coordinates")?;

    let format_x = |x: &f64| {
        if time_labels {
            format_tick(*x)
        } else {
            String::new()
        }
    };
    chart
        .configure_mesh()
        .x_labels(TIME_LABELS)
        .x_label_formatter(&format_x)
        .x_label_style((FONT, 11.0))
        .y_desc(panel.y_label.as_str())
        .draw()
        .context("failed to draw mesh")?;

    for trace in &panel.traces {
        let color = trace.color;
        let points = trace
            .points
            .iter()
            .map(|&(time, val)| (seconds(time), val));
        let anno = match trace.style {
            TraceStyle::Line { width } => {
                chart.draw_series(LineSeries::new(points, color.stroke_width(width)))
            }
            TraceStyle::Bars => chart.draw_series(points.map(|(x, y)| {
                Rectangle::new([(x - half_width, 0.0), (x + half_width, y)], color.filled())
            })),
        }
        .with_context(|| format!("failed to draw {:?}", trace.label))?;
        anno.label(trace.label.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 3), (x + 16, y + 3)], color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .context("failed to draw legend")?;

    Ok(())
}

fn seconds(time: NaiveDateTime) -> f64 {
    time.and_utc().timestamp() as f64
}

fn format_tick(secs: f64) -> String {
    DateTime::from_timestamp(secs.round() as i64, 0)
        .map(|time| time.format(TIME_FORMAT).to_string())
        .unwrap_or_default()
}

/// Axis ranges covering every finite point of the panel, with some margin.
fn bounds(panel: &Panel) -> (Range<f64>, Range<f64>) {
    let mut x = (f64::INFINITY, f64::NEG_INFINITY);
    let mut y = (f64::INFINITY, f64::NEG_INFINITY);
    for trace in &panel.traces {
        for &(time, val) in &trace.points {
            let secs = seconds(time);
            x = (x.0.min(secs), x.1.max(secs));
            if val.is_finite() {
                y = (y.0.min(val), y.1.max(val));
            }
        }
        if trace.style == TraceStyle::Bars {
            y = (y.0.min(0.0), y.1.max(0.0));
        }
    }

    if x.0 > x.1 {
        return (0.0..3600.0, 0.0..1.0);
    }
    if y.0 > y.1 {
        y = (0.0, 1.0);
    }
    (padded(x, 0.0, 1800.0), padded(y, 0.05, 1.0))
}

fn padded((lo, hi): (f64, f64), frac: f64, min_half: f64) -> Range<f64> {
    let span = hi - lo;
    if span <= 0.0 {
        return lo - min_half..hi + min_half;
    }
    let pad = span * frac;
    lo - pad..hi + pad
}

/// Half the width of a bar so that evenly spaced bars do not overlap.
fn bar_half_width(x_range: &Range<f64>, panel: &Panel) -> f64 {
    let n_bars = panel
        .traces
        .iter()
        .filter(|t| t.style == TraceStyle::Bars)
        .map(|t| t.points.len())
        .max()
        .unwrap_or(0)
        .max(1);
    0.4 * (x_range.end - x_range.start) / n_bars as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Trace;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn panel(style: TraceStyle, points: Vec<(NaiveDateTime, f64)>) -> Panel {
        Panel {
            y_label: "y".to_string(),
            traces: vec![Trace {
                label: "t".to_string(),
                color: RGBColor(0, 0, 255),
                style,
                points,
            }],
        }
    }

    #[test]
    fn tick_labels_use_day_month_year() {
        assert_eq!(format_tick(seconds(at(5, 14))), "05-03-24 14:00");
    }

    #[test]
    fn bounds_pad_the_value_range() {
        let p = panel(TraceStyle::Line { width: 1 }, vec![(at(1, 0), 10.0), (at(2, 0), 20.0)]);
        let (x, y) = bounds(&p);
        assert_eq!(x, seconds(at(1, 0))..seconds(at(2, 0)));
        assert!((y.start - 9.5).abs() < 1e-9);
        assert!((y.end - 20.5).abs() < 1e-9);
    }

    #[test]
    fn bars_start_at_zero() {
        let p = panel(TraceStyle::Bars, vec![(at(1, 0), 2.0), (at(1, 6), 4.0)]);
        let (_, y) = bounds(&p);
        assert!(y.start < 0.0);
        assert!(y.end > 4.0);
    }

    #[test]
    fn single_point_gets_a_visible_range() {
        let p = panel(TraceStyle::Line { width: 1 }, vec![(at(1, 0), 3.0)]);
        let (x, y) = bounds(&p);
        assert!(x.end > x.start);
        assert!(y.end > y.start);
    }

    #[test]
    fn empty_panel_has_default_range() {
        let p = panel(TraceStyle::Line { width: 1 }, Vec::new());
        assert_eq!(bounds(&p), (0.0..3600.0, 0.0..1.0));
    }

    #[test]
    fn time_labels_are_horizontal_and_bounded() {
        let points: Vec<_> = (0..48).map(|h| (at(1 + h / 24, h % 24), h as f64)).collect();
        let page = Page::Chart {
            title: "chart".to_string(),
            panels: vec![panel(TraceStyle::Line { width: 1 }, points)],
        };

        let svg = render_svg(&page).unwrap();
        assert!(!svg.contains("rotate(90"));
        let n_ticks = svg.matches("-03-24 ").count();
        assert!(n_ticks >= 2, "{n_ticks} time labels");
        assert!(n_ticks <= TIME_LABELS, "{n_ticks} time labels");
    }

    #[test]
    fn title_page_is_a_standalone_svg() {
        let page = Page::Title {
            text: "Weather Report".to_string(),
            font_size: 24,
        };
        let svg = render_svg(&page).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Weather Report"));
    }

    #[test]
    fn bars_do_not_overlap() {
        let points: Vec<_> = (0..10).map(|h| (at(1, h), 1.0)).collect();
        let p = panel(TraceStyle::Bars, points);
        let (x, _) = bounds(&p);
        let spacing = 3600.0;
        assert!(2.0 * bar_half_width(&x, &p) < spacing);
    }
}
