//! The five static charts. Every builder is a pure function of the report and
//! returns SVG markup; `render_all` writes them to disk.

use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::model::{ImageMetric, ImageReport};
use crate::render::svg::{Anchor, Frame, Svg, Text, polar, sweep_of};
use crate::render::{write_png, write_svg};
use crate::stats::{self, Savings};
use crate::utils::format_mb;

pub const BAR_CHART: &str = "01_size_comparison_bar";
pub const WATERFALL_CHART: &str = "02_waterfall_chart";
pub const PIE_CHARTS: &str = "03_pie_charts";
pub const HORIZONTAL_BAR: &str = "04_horizontal_bar";
pub const DASHBOARD: &str = "05_dashboard";

const FINAL_COLOR: &str = "#2980b9";
const SAVED_COLOR: &str = "#27ae60";
const BASELINE_COLOR: &str = "#ff0000";
const DELTA_COLOR: &str = "#008000";
const MUTED_COLOR: &str = "#888888";
const EMPTY_MESSAGE: &str = "No images found";

/// Outcome of one chart: the files written, or why it was skipped.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartOutput {
    Written { name: &'static str, files: Vec<PathBuf> },
    Skipped { name: &'static str, reason: String },
}

/// Render every chart into `output_dir`, which must already exist.
pub fn render_all(
    report: &ImageReport,
    repository: &str,
    output_dir: &Path,
) -> Result<Vec<ChartOutput>, AppError> {
    let mut outputs = Vec::with_capacity(5);

    let bar = bar_chart(report, repository);
    let png = output_dir.join(format!("{BAR_CHART}.png"));
    let svg = output_dir.join(format!("{BAR_CHART}.svg"));
    write_png(&png, &bar)?;
    write_svg(&svg, &bar)?;
    outputs.push(ChartOutput::Written { name: "Bar chart", files: vec![png, svg] });

    match waterfall_chart(report) {
        Some(markup) => {
            let png = output_dir.join(format!("{WATERFALL_CHART}.png"));
            write_png(&png, &markup)?;
            outputs.push(ChartOutput::Written { name: "Waterfall chart", files: vec![png] });
        }
        None => outputs.push(ChartOutput::Skipped {
            name: "Waterfall chart",
            reason: "Basic image size is 0".to_string(),
        }),
    }

    let charts: [(&'static str, &str, String); 3] = [
        ("Pie charts", PIE_CHARTS, pie_charts(report)),
        ("Horizontal bar chart", HORIZONTAL_BAR, horizontal_bar_chart(report)),
        ("Dashboard", DASHBOARD, dashboard(report, repository)),
    ];
    for (name, file, markup) in charts {
        let png = output_dir.join(format!("{file}.png"));
        write_png(&png, &markup)?;
        outputs.push(ChartOutput::Written { name, files: vec![png] });
    }

    Ok(outputs)
}

struct Column {
    label: String,
    value: f64,
    color: &'static str,
    top_label: Option<String>,
    inner_label: Option<String>,
}

/// Vertical bars with the value axis, one slot per column.
fn draw_columns(svg: &mut Svg, frame: &Frame, columns: &[Column], max: f64, suffix: &str, font: f64) {
    svg.value_axis(frame, max, suffix);
    if columns.is_empty() {
        return;
    }
    let slot = frame.width / columns.len() as f64;
    let bar_width = slot * 0.6;
    for (index, column) in columns.iter().enumerate() {
        let center = frame.x + slot * (index as f64 + 0.5);
        let top = frame.value_y(column.value, max);
        svg.rect(center - bar_width / 2.0, top, bar_width, frame.bottom() - top, column.color);
        if let Some(label) = &column.top_label {
            svg.text(Text::new(center, top - 6.0, label).size(font).middle().bold());
        }
        if let Some(label) = &column.inner_label {
            let mid = (top + frame.bottom()) / 2.0;
            svg.text(
                Text::new(center, mid, label).size(font - 1.0).middle().bold().fill("#ffffff").central(),
            );
        }
        svg.text(Text::new(center, frame.bottom() + 18.0, &column.label).size(font).middle());
    }
}

fn empty_message(svg: &mut Svg, frame: &Frame) {
    svg.text(
        Text::new(frame.center_x(), frame.center_y(), EMPTY_MESSAGE)
            .size(16.0)
            .middle()
            .fill(MUTED_COLOR)
            .central(),
    );
}

fn title(svg: &mut Svg, x: f64, y: f64, lines: &[&str], size: f64) {
    for (index, line) in lines.iter().enumerate() {
        svg.text(Text::new(x, y + index as f64 * (size + 4.0), line).size(size).middle().bold());
    }
}

/// `-85%` for a reduction, `+12%` when the image grew.
fn reduction_label(pct: f64) -> String {
    if pct >= 0.0 { format!("-{pct:.0}%") } else { format!("+{:.0}%", pct.abs()) }
}

fn size_columns(report: &ImageReport, with_reduction: bool) -> Vec<Column> {
    let baseline = stats::baseline(report);
    report
        .present()
        .map(|metric| {
            let inner_label = (with_reduction && baseline > 0.0 && !metric.variant.is_baseline())
                .then(|| reduction_label(stats::reduction_pct(metric.size_mb(), baseline)));
            Column {
                label: metric.variant.as_str().to_string(),
                value: metric.size_mb(),
                color: metric.variant.color(),
                top_label: Some(format_mb(metric.size_mb())),
                inner_label,
            }
        })
        .collect()
}

fn max_size(report: &ImageReport) -> f64 {
    report.present().map(ImageMetric::size_mb).fold(0.0, f64::max)
}

/// Grouped bar chart with reductions against the baseline.
pub fn bar_chart(report: &ImageReport, repository: &str) -> String {
    let mut svg = Svg::new(1200.0, 700.0);
    let subtitle = format!("{repository} Optimization");
    title(&mut svg, 600.0, 40.0, &["Docker Image Size Comparison", subtitle.as_str()], 20.0);

    let frame = Frame::new(110.0, 100.0, 1050.0, 500.0);
    let baseline = stats::baseline(report);
    let columns = size_columns(report, true);
    let max = max_size(report).max(baseline) * 1.15;

    draw_columns(&mut svg, &frame, &columns, max, "", 14.0);
    if columns.is_empty() {
        empty_message(&mut svg, &frame);
    }

    if baseline > 0.0 {
        let y = frame.value_y(baseline, max);
        svg.dashed_line(frame.x, y, frame.right(), y, BASELINE_COLOR, 0.5);
        let legend_x = frame.right() - 190.0;
        svg.dashed_line(legend_x, frame.y + 20.0, legend_x + 30.0, frame.y + 20.0, BASELINE_COLOR, 0.5);
        svg.text(Text::new(legend_x + 38.0, frame.y + 20.0, "Baseline (Basic)").size(13.0).central());
    }

    svg.text(Text::new(frame.center_x(), frame.bottom() + 52.0, "Optimization Stage").size(15.0).middle());
    svg.text(
        Text::new(40.0, frame.center_y(), "Image Size (MB)").size(15.0).middle().rotate(-90.0),
    );
    svg.finish()
}

/// Step-by-step waterfall, or `None` when there is no baseline.
pub fn waterfall_chart(report: &ImageReport) -> Option<String> {
    let steps = stats::waterfall(report)?;

    let mut svg = Svg::new(1200.0, 700.0);
    title(&mut svg, 600.0, 40.0, &["Optimization Waterfall", "Step-by-Step Size Reduction"], 20.0);

    let frame = Frame::new(110.0, 100.0, 1050.0, 520.0);
    let max = steps.iter().map(|s| s.level).fold(0.0, f64::max) * 1.25;
    svg.value_axis(&frame, max, "");

    let slot = frame.width / steps.len() as f64;
    let bar_width = slot * 0.6;
    let mut previous: Option<(f64, f64)> = None;
    for (index, step) in steps.iter().enumerate() {
        let center = frame.x + slot * (index as f64 + 0.5);
        let top = frame.value_y(step.level, max);
        svg.text(Text::new(center, frame.bottom() + 20.0, step.variant.display_name()).size(13.0).middle());

        if !step.present {
            svg.outline(center - bar_width / 2.0, top, bar_width, frame.bottom() - top, MUTED_COLOR);
            svg.text(Text::new(center, top - 8.0, "n/a").size(12.0).middle().fill(MUTED_COLOR));
            continue;
        }

        svg.rect(center - bar_width / 2.0, top, bar_width, frame.bottom() - top, step.variant.color());
        let size = format_mb(step.level);
        svg.text(Text::new(center, top - 8.0, &size).size(13.0).middle().bold());

        if let Some((prev_x, prev_top)) = previous
            && step.delta != 0.0
        {
            svg.arrow(prev_x + bar_width / 2.0, prev_top, center - bar_width / 2.0, top);
            let delta = if step.delta > 0.0 {
                format!("(-{:.0}MB)", step.delta)
            } else {
                format!("(+{:.0}MB)", step.delta.abs())
            };
            svg.text(Text::new(center, top - 28.0, &delta).size(12.0).middle().bold().fill(DELTA_COLOR));
        }
        previous = Some((center, top));
    }

    svg.text(
        Text::new(40.0, frame.center_y(), "Image Size (MB)").size(15.0).middle().rotate(-90.0),
    );
    Some(svg.finish())
}

struct Slice {
    label: Vec<String>,
    value: f64,
    color: &'static str,
    explode: f64,
}

/// Pie with outside labels and inside percentages.
fn draw_pie(svg: &mut Svg, cx: f64, cy: f64, radius: f64, slices: &[Slice], decimals: usize) {
    let total: f64 = slices.iter().map(|s| s.value).sum();
    let mut start = 0.0;
    for slice in slices {
        let sweep = sweep_of(slice.value, total);
        if sweep <= 0.0 {
            continue;
        }
        svg.wedge(cx, cy, radius, start, sweep, slice.color, slice.explode);

        let mid = start + sweep / 2.0;
        let offset = 1.0 + slice.explode;
        let (px, py) = polar(cx, cy, radius * 0.6 * offset, mid);
        let share = format!("{:.*}%", decimals, slice.value / total * 100.0);
        svg.text(Text::new(px, py, &share).size(12.0).middle().bold().fill("#ffffff").central());

        let (lx, ly) = polar(cx, cy, radius * (1.12 + slice.explode), mid);
        let anchor = if mid.to_radians().sin() >= 0.0 { Anchor::Start } else { Anchor::End };
        let first_line = ly - (slice.label.len() as f64 - 1.0) * 8.0;
        for (line_index, line) in slice.label.iter().enumerate() {
            svg.text(
                Text::new(lx, first_line + line_index as f64 * 16.0, line)
                    .size(12.0)
                    .anchor(anchor)
                    .central(),
            );
        }
        start += sweep;
    }
}

fn savings_slices(savings: &Savings, detailed: bool, explode: f64) -> Vec<Slice> {
    let (final_label, saved_label) = if detailed {
        (
            vec!["Final Size".to_string(), format!("({})", format_mb(savings.final_mb))],
            vec!["Saved".to_string(), format!("({})", format_mb(savings.saved_mb))],
        )
    } else {
        (
            vec!["Final".to_string(), format_mb(savings.final_mb)],
            vec!["Saved".to_string(), format_mb(savings.saved_mb)],
        )
    };
    vec![
        Slice { label: final_label, value: savings.final_mb, color: FINAL_COLOR, explode: 0.0 },
        Slice { label: saved_label, value: savings.saved_mb, color: SAVED_COLOR, explode },
    ]
}

/// Savings that can be drawn as a pie: the best variant must be smaller.
fn drawable_savings(report: &ImageReport) -> Option<Savings> {
    Savings::from_report(report).filter(|savings| savings.saved_mb > 0.0)
}

/// Size distribution on the left, baseline vs best variant on the right.
pub fn pie_charts(report: &ImageReport) -> String {
    let mut svg = Svg::new(1400.0, 600.0);

    let left = Frame::new(0.0, 60.0, 700.0, 540.0);
    title(&mut svg, left.center_x(), 40.0, &["Image Size Distribution"], 17.0);
    let slices: Vec<Slice> = report
        .present()
        .map(|metric| Slice {
            label: vec![metric.variant.as_str().to_string(), format!("({})", format_mb(metric.size_mb()))],
            value: metric.size_mb(),
            color: metric.variant.color(),
            explode: 0.05,
        })
        .collect();
    if slices.is_empty() {
        empty_message(&mut svg, &left);
    } else {
        draw_pie(&mut svg, left.center_x(), left.center_y(), 190.0, &slices, 1);
    }

    let right = Frame::new(700.0, 60.0, 700.0, 540.0);
    match drawable_savings(report) {
        Some(savings) => {
            let heading = format!("{} Optimization Result", capitalize(savings.best.as_str()));
            title(&mut svg, right.center_x(), 32.0, &[heading.as_str(), "(vs Basic)"], 17.0);
            let slices = savings_slices(&savings, true, 0.1);
            draw_pie(&mut svg, right.center_x(), right.center_y(), 190.0, &slices, 1);
        }
        None => {
            svg.text(
                Text::new(right.center_x(), right.center_y(), "No optimized result to compare")
                    .size(16.0)
                    .middle()
                    .fill(MUTED_COLOR),
            );
        }
    }

    svg.finish()
}

/// Present images ranked by size, largest on top.
pub fn horizontal_bar_chart(report: &ImageReport) -> String {
    let mut svg = Svg::new(1000.0, 600.0);
    title(&mut svg, 500.0, 40.0, &["Docker Images Ranked by Size"], 20.0);

    let frame = Frame::new(140.0, 70.0, 800.0, 460.0);
    let ranked = stats::ranked_desc(report);
    let max = ranked.first().map(|m| m.size_mb()).unwrap_or_default() * 1.2;
    svg.horizontal_value_axis(&frame, max, "");

    if ranked.is_empty() {
        empty_message(&mut svg, &frame);
    } else {
        let slot = frame.height / ranked.len() as f64;
        let bar_height = slot * 0.6;
        for (index, metric) in ranked.iter().enumerate() {
            let center = frame.y + slot * (index as f64 + 0.5);
            let right = frame.value_x(metric.size_mb(), max);
            svg.rect(frame.x, center - bar_height / 2.0, right - frame.x, bar_height, metric.variant.color());
            let value = format_mb(metric.size_mb());
            svg.text(Text::new(right + 10.0, center, &value).size(14.0).bold().central());
            svg.text(
                Text::new(frame.x - 10.0, center, metric.variant.display_name())
                    .size(14.0)
                    .anchor(Anchor::End)
                    .central(),
            );
        }
    }

    svg.text(Text::new(frame.center_x(), frame.bottom() + 50.0, "Image Size (MB)").size(15.0).middle());
    svg.finish()
}

/// Key metrics shown in the dashboard's text panel.
pub fn key_metrics(savings: &Savings) -> [(&'static str, String); 4] {
    [
        ("Original Size", format!("{:.0} MB", savings.original_mb)),
        ("Best Optimized", format!("{:.0} MB", savings.final_mb)),
        ("Total Saved", format!("{:.0} MB", savings.saved_mb)),
        ("Reduction Rate", format!("{:.1}%", savings.reduction_pct)),
    ]
}

/// 2x3 composite: sizes across the top, reductions, savings pie and key
/// metrics along the bottom.
pub fn dashboard(report: &ImageReport, repository: &str) -> String {
    let mut svg = Svg::new(1600.0, 1000.0);
    title(&mut svg, 800.0, 40.0, &["Docker Image Optimization Dashboard", repository], 24.0);

    let top = Frame::new(90.0, 130.0, 1460.0, 330.0);
    title(&mut svg, top.center_x(), top.y - 16.0, &["Docker Image Size Comparison"], 16.0);
    let columns = size_columns(report, false);
    let max = max_size(report) * 1.15;
    draw_columns(&mut svg, &top, &columns, max, "", 13.0);
    if columns.is_empty() {
        empty_message(&mut svg, &top);
    }
    svg.text(Text::new(30.0, top.center_y(), "Size (MB)").size(13.0).middle().rotate(-90.0));

    let baseline = stats::baseline(report);
    let reductions = Frame::new(90.0, 580.0, 400.0, 340.0);
    if baseline > 0.0 {
        title(&mut svg, reductions.center_x(), reductions.y - 16.0, &["Size Reduction vs Basic"], 14.0);
        let columns: Vec<Column> = report
            .present()
            .map(|metric| {
                let pct = stats::reduction_pct(metric.size_mb(), baseline);
                Column {
                    label: metric.variant.as_str().to_string(),
                    value: pct.max(0.0),
                    color: metric.variant.color(),
                    top_label: (pct > 0.0).then(|| format!("{pct:.0}%")),
                    inner_label: None,
                }
            })
            .collect();
        draw_columns(&mut svg, &reductions, &columns, 100.0, "%", 11.0);
        svg.text(
            Text::new(40.0, reductions.center_y(), "Reduction (%)").size(12.0).middle().rotate(-90.0),
        );
    }

    let pie = Frame::new(600.0, 580.0, 400.0, 340.0);
    let metrics = Frame::new(1100.0, 580.0, 450.0, 340.0);
    if let Some(savings) = drawable_savings(report) {
        let heading = format!("Best Result ({})", capitalize(savings.best.as_str()));
        title(&mut svg, pie.center_x(), pie.y - 16.0, &[heading.as_str()], 14.0);
        let slices = savings_slices(&savings, false, 0.0);
        draw_pie(&mut svg, pie.center_x(), pie.center_y(), 120.0, &slices, 0);

        title(&mut svg, metrics.center_x(), metrics.y - 16.0, &["Key Metrics"], 14.0);
        for (index, (label, value)) in key_metrics(&savings).iter().enumerate() {
            let y = metrics.y + 50.0 + index as f64 * 68.0;
            let label = format!("{label}:");
            svg.text(Text::new(metrics.x + 45.0, y, &label).size(15.0).bold());
            svg.text(Text::new(metrics.x + 270.0, y, value).size(15.0).bold().fill(FINAL_COLOR));
        }
    }

    svg.finish()
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Variant;

    fn report(sizes: &[(Variant, f64)]) -> ImageReport {
        ImageReport::from_sizes_mb(sizes)
    }

    #[test]
    fn bar_chart_annotates_sizes_and_reductions() {
        let svg = bar_chart(&report(&[(Variant::Basic, 1200.0), (Variant::Jlink, 180.0)]), "bookshelf");
        assert!(svg.contains(">1200MB<"));
        assert!(svg.contains(">180MB<"));
        assert!(svg.contains(">-85%<"));
        assert!(svg.contains("Baseline (Basic)"));
        assert!(!svg.contains(">alpine<"));
    }

    #[test]
    fn bar_chart_without_baseline_has_no_reference_line() {
        let svg = bar_chart(&report(&[(Variant::Alpine, 150.0)]), "bookshelf");
        assert!(svg.contains(">150MB<"));
        assert!(!svg.contains("Baseline (Basic)"));
        assert!(!svg.contains('%'));
    }

    #[test]
    fn waterfall_skipped_without_baseline() {
        assert!(waterfall_chart(&report(&[(Variant::Alpine, 150.0)])).is_none());
    }

    #[test]
    fn waterfall_marks_drops_between_present_stages() {
        let svg = waterfall_chart(&report(&[
            (Variant::Basic, 1200.0),
            (Variant::Jre, 450.0),
            (Variant::Jlink, 180.0),
        ]))
        .unwrap();
        assert!(svg.contains("(-750MB)"));
        assert!(svg.contains("(-270MB)"));
        assert!(svg.contains(">n/a<"));
        assert_eq!(svg.matches("marker-end").count(), 2);
    }

    #[test]
    fn savings_pie_splits_final_and_saved() {
        let svg = pie_charts(&report(&[(Variant::Basic, 1200.0), (Variant::Jlink, 180.0)]));
        assert!(svg.contains("Jlink Optimization Result"));
        assert!(svg.contains(">15.0%<"));
        assert!(svg.contains(">85.0%<"));
        assert!(svg.contains("(1020MB)"));
    }

    #[test]
    fn pie_for_missing_baseline_only_shows_distribution() {
        let svg = pie_charts(&report(&[(Variant::Alpine, 150.0)]));
        assert!(svg.contains("No optimized result to compare"));
        assert!(svg.contains(">100.0%<"));
    }

    #[test]
    fn horizontal_bar_lists_largest_first() {
        let svg = horizontal_bar_chart(&report(&[
            (Variant::Native, 120.0),
            (Variant::Basic, 1200.0),
            (Variant::Alpine, 300.0),
        ]));
        let basic = svg.find(">BASIC<").unwrap();
        let alpine = svg.find(">ALPINE<").unwrap();
        let native = svg.find(">NATIVE<").unwrap();
        assert!(basic < alpine && alpine < native);
    }

    #[test]
    fn empty_report_renders_placeholders() {
        let empty = ImageReport::new();
        assert!(bar_chart(&empty, "bookshelf").contains(EMPTY_MESSAGE));
        assert!(horizontal_bar_chart(&empty).contains(EMPTY_MESSAGE));
        assert!(pie_charts(&empty).contains(EMPTY_MESSAGE));
        assert!(dashboard(&empty, "bookshelf").contains(EMPTY_MESSAGE));
    }

    #[test]
    fn dashboard_key_metrics() {
        let svg = dashboard(&report(&[(Variant::Basic, 1200.0), (Variant::Jlink, 180.0)]), "bookshelf");
        assert!(svg.contains("Best Result (Jlink)"));
        assert!(svg.contains(">1020 MB<"));
        assert!(svg.contains(">85.0%<"));
        assert!(svg.contains(">85%<"));
    }

    #[test]
    fn grown_image_is_labelled_as_growth() {
        assert_eq!(reduction_label(-12.4), "+12%");
        assert_eq!(reduction_label(85.0), "-85%");
    }

    #[test]
    fn render_all_skips_waterfall_without_baseline() {
        let dir = tempfile::tempdir().unwrap();
        let outputs = render_all(&report(&[(Variant::Alpine, 150.0)]), "bookshelf", dir.path()).unwrap();
        assert!(outputs.iter().any(|o| matches!(o, ChartOutput::Skipped { name: "Waterfall chart", .. })));
        assert!(dir.path().join("01_size_comparison_bar.png").exists());
        assert!(dir.path().join("01_size_comparison_bar.svg").exists());
        assert!(!dir.path().join("02_waterfall_chart.png").exists());
        assert!(dir.path().join("05_dashboard.png").exists());
    }
}
