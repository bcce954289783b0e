//! Self-contained HTML dashboard with Chart.js charts, a comparison table and
//! static recommendations.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use chrono::{DateTime, TimeZone};
use serde_json::json;

use crate::error::AppError;
use crate::model::{ImageMetric, ImageReport};
use crate::stats::{self, Badge, Headline};
use crate::utils::escape_markup;

pub const REPORT_FILE: &str = "optimization_report.html";

const CHART_JS_CDN: &str = "https://cdn.jsdelivr.net/npm/chart.js";

const STYLE: &str = r#"
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, sans-serif;
            background: linear-gradient(135deg, #1a1a2e 0%, #16213e 100%);
            color: #eee;
            min-height: 100vh;
            padding: 20px;
        }
        .container { max-width: 1200px; margin: 0 auto; }
        header { text-align: center; padding: 40px 0; border-bottom: 1px solid #333; margin-bottom: 40px; }
        h1 {
            font-size: 2.5em;
            margin-bottom: 10px;
            background: linear-gradient(90deg, #00d4ff, #7c3aed);
            -webkit-background-clip: text;
            -webkit-text-fill-color: transparent;
        }
        .subtitle { color: #888; font-size: 1.1em; }
        .metrics {
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
            gap: 20px;
            margin-bottom: 40px;
        }
        .metric-card {
            background: rgba(255,255,255,0.05);
            border-radius: 16px;
            padding: 24px;
            text-align: center;
            border: 1px solid rgba(255,255,255,0.1);
            transition: transform 0.3s;
        }
        .metric-card:hover { transform: translateY(-5px); }
        .metric-value { font-size: 2.5em; font-weight: bold; margin-bottom: 8px; }
        .metric-label { color: #888; font-size: 0.9em; }
        .success { color: #00d4ff; }
        .warning { color: #ffd93d; }
        .danger { color: #ff6b6b; }
        .chart-container {
            background: rgba(255,255,255,0.05);
            border-radius: 16px;
            padding: 30px;
            margin-bottom: 30px;
            border: 1px solid rgba(255,255,255,0.1);
        }
        .chart-title { font-size: 1.3em; margin-bottom: 20px; color: #fff; }
        .chart-pair { display: grid; grid-template-columns: 3fr 2fr; gap: 30px; }
        table { width: 100%; border-collapse: collapse; margin-top: 20px; }
        th, td { padding: 15px; text-align: left; border-bottom: 1px solid rgba(255,255,255,0.1); }
        th { background: rgba(255,255,255,0.05); font-weight: 600; }
        tr:hover { background: rgba(255,255,255,0.03); }
        .size-bar {
            height: 8px;
            background: linear-gradient(90deg, #00d4ff, #7c3aed);
            border-radius: 4px;
            margin-top: 5px;
        }
        .badge { display: inline-block; padding: 4px 12px; border-radius: 20px; font-size: 0.8em; font-weight: 600; }
        .badge-best { background: #00d4ff; color: #000; }
        .badge-good { background: #00c853; color: #000; }
        .badge-warning { background: #ffd93d; color: #000; }
        .badge-large { background: #ff6b6b; color: #000; }
        .empty { color: #888; text-align: center; padding: 20px; }
        .recommendations {
            background: rgba(0, 212, 255, 0.1);
            border-left: 4px solid #00d4ff;
            padding: 20px;
            border-radius: 0 16px 16px 0;
            margin-top: 30px;
        }
        .recommendations h3 { margin-bottom: 15px; }
        .recommendations ul { margin-left: 20px; }
        .recommendations li { margin-bottom: 10px; line-height: 1.6; }
        footer { text-align: center; padding: 40px 0; color: #666; border-top: 1px solid #333; margin-top: 40px; }
"#;

const RECOMMENDATIONS: [(&str, &str); 4] = [
    ("Development and testing", "use the Alpine image for fast builds at a reasonable size."),
    ("Production", "use the jlink image for the smallest footprint and a reduced attack surface."),
    ("Startup-critical workloads", "consider the native image, at the cost of longer builds."),
    ("CI/CD", "keep multi-stage builds to get the most out of layer caching."),
];

/// Build the complete HTML document.
pub fn render_report<Tz>(report: &ImageReport, repository: &str, generated_at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let repository = escape_markup(repository);
    let mut html = String::with_capacity(16 * 1024);

    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Docker Image Optimization Report - {repository}</title>
    <script src="{CHART_JS_CDN}"></script>
    <style>{STYLE}    </style>
</head>
<body>
    <div class="container">
        <header>
            <h1>🐳 Docker Image Optimization Report</h1>
            <p class="subtitle">{repository} - Generated: {generated}</p>
        </header>
"#,
        generated = generated_at.format("%Y-%m-%d %H:%M:%S"),
    );

    write_metric_cards(&mut html, &Headline::from_report(report));

    html.push_str(
        r#"
        <div class="chart-container">
            <h2 class="chart-title">📊 Image Size Comparison</h2>
            <div class="chart-pair">
                <canvas id="sizeChart"></canvas>
                <canvas id="pieChart"></canvas>
            </div>
        </div>
"#,
    );

    write_table(&mut html, report);
    write_recommendations(&mut html);

    let _ = write!(
        html,
        r#"
        <footer>
            <p>Generated by imgsize for {repository}</p>
        </footer>
    </div>
"#
    );

    write_chart_script(&mut html, report);
    html.push_str("</body>\n</html>\n");
    html
}

pub fn write_report(path: &Path, html: &str) -> Result<(), AppError> {
    fs::write(path, html)?;
    Ok(())
}

fn write_metric_cards(html: &mut String, headline: &Headline) {
    let best = headline.smallest.map(|v| v.display_name()).unwrap_or("N/A");
    let largest = headline.largest.map(|v| v.display_name()).unwrap_or("N/A");
    let cards = [
        ("danger", format!("{:.0}MB", headline.largest_mb), format!("Original Size ({largest})")),
        ("success", format!("{:.0}MB", headline.smallest_mb), format!("Best Optimized ({best})")),
        ("warning", format!("{:.0}MB", headline.saved_mb), "Total Saved".to_string()),
        ("success", format!("{:.0}%", headline.reduction_pct), "Reduction Rate".to_string()),
    ];

    html.push_str("\n        <div class=\"metrics\">\n");
    for (class, value, label) in cards {
        let _ = write!(
            html,
            r#"            <div class="metric-card">
                <div class="metric-value {class}">{value}</div>
                <div class="metric-label">{label}</div>
            </div>
"#
        );
    }
    html.push_str("        </div>\n");
}

fn write_table(html: &mut String, report: &ImageReport) {
    html.push_str(
        r#"
        <div class="chart-container">
            <h2 class="chart-title">📋 Detailed Comparison</h2>
            <table>
                <thead>
                    <tr>
                        <th>Image</th>
                        <th>Size</th>
                        <th>Layers</th>
                        <th>Platform</th>
                        <th>Created</th>
                        <th>Reduction</th>
                        <th>Status</th>
                    </tr>
                </thead>
                <tbody>
"#,
    );

    let baseline = stats::baseline(report);
    let rows = stats::ranked_desc(report);
    for metric in &rows {
        write_row(html, metric, report, baseline);
    }

    html.push_str("                </tbody>\n            </table>\n");
    if rows.is_empty() {
        html.push_str("            <p class=\"empty\">No images found</p>\n");
    }
    html.push_str("        </div>\n");
}

fn write_row(html: &mut String, metric: &ImageMetric, report: &ImageReport, baseline: f64) {
    let reduction = stats::reduction_pct(metric.size_mb(), baseline);
    let bar_width = if baseline > 0.0 { (metric.size_mb() / baseline * 100.0).min(100.0) } else { 0.0 };
    let badge = Badge::classify(metric, report);
    let (layers, platform, created) = match &metric.details {
        Some(details) => (
            details.layers.to_string(),
            escape_markup(&details.platform()),
            details.created.format("%Y-%m-%d %H:%M").to_string(),
        ),
        None => ("-".to_string(), "-".to_string(), "-".to_string()),
    };

    let _ = write!(
        html,
        r#"                    <tr>
                        <td><strong>{name}</strong></td>
                        <td>
                            {size:.0} MB
                            <div class="size-bar" style="width: {bar_width:.1}%"></div>
                        </td>
                        <td>{layers}</td>
                        <td>{platform}</td>
                        <td>{created}</td>
                        <td>{reduction:.0}%</td>
                        <td><span class="badge {class}">{label}</span></td>
                    </tr>
"#,
        name = metric.variant.display_name(),
        size = metric.size_mb(),
        class = badge.css_class(),
        label = badge.label(),
    );
}

fn write_recommendations(html: &mut String) {
    html.push_str(
        r#"
        <div class="recommendations">
            <h3>💡 Recommendations</h3>
            <ul>
"#,
    );
    for (audience, advice) in RECOMMENDATIONS {
        let _ = writeln!(html, "                <li><strong>{audience}:</strong> {advice}</li>");
    }
    html.push_str("            </ul>\n        </div>\n");
}

/// Name, size and color arrays handed to Chart.js.
pub fn chart_data(report: &ImageReport) -> serde_json::Value {
    let present: Vec<&ImageMetric> = report.present().collect();
    json!({
        "labels": present.iter().map(|m| m.variant.display_name()).collect::<Vec<_>>(),
        "sizes": present.iter().map(|m| (m.size_mb() * 10.0).round() / 10.0).collect::<Vec<_>>(),
        "colors": present.iter().map(|m| m.variant.color()).collect::<Vec<_>>(),
    })
}

fn write_chart_script(html: &mut String, report: &ImageReport) {
    let data = chart_data(report);
    let _ = write!(
        html,
        r#"
    <script>
        const data = {data};

        new Chart(document.getElementById('sizeChart').getContext('2d'), {{
            type: 'bar',
            data: {{
                labels: data.labels,
                datasets: [{{
                    label: 'Size (MB)',
                    data: data.sizes,
                    backgroundColor: data.colors,
                    borderColor: data.colors,
                    borderWidth: 2,
                    borderRadius: 8
                }}]
            }},
            options: {{
                responsive: true,
                plugins: {{ legend: {{ display: false }} }},
                scales: {{
                    y: {{ beginAtZero: true, grid: {{ color: 'rgba(255,255,255,0.1)' }}, ticks: {{ color: '#888' }} }},
                    x: {{ grid: {{ display: false }}, ticks: {{ color: '#888' }} }}
                }}
            }}
        }});

        new Chart(document.getElementById('pieChart').getContext('2d'), {{
            type: 'doughnut',
            data: {{
                labels: data.labels,
                datasets: [{{ data: data.sizes, backgroundColor: data.colors, borderWidth: 0 }}]
            }},
            options: {{
                responsive: true,
                plugins: {{ legend: {{ position: 'right', labels: {{ color: '#888' }} }} }}
            }}
        }});
    </script>
"#
    );
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::model::Variant;

    fn render(report: &ImageReport) -> String {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        render_report(report, "bookshelf", &at)
    }

    #[test]
    fn cards_show_largest_smallest_and_reduction() {
        let report = ImageReport::from_sizes_mb(&[(Variant::Basic, 1200.0), (Variant::Jlink, 180.0)]);
        let html = render(&report);
        assert!(html.contains(">1200MB<"));
        assert!(html.contains(">180MB<"));
        assert!(html.contains(">1020MB<"));
        assert!(html.contains(">85%<"));
        assert!(html.contains("Best Optimized (JLINK)"));
        assert!(html.contains("Generated: 2024-05-01 09:30:00"));
    }

    #[test]
    fn table_rows_sorted_by_size_with_badges() {
        let report = ImageReport::from_sizes_mb(&[
            (Variant::Basic, 1200.0),
            (Variant::Multistage, 700.0),
            (Variant::Jlink, 180.0),
        ]);
        let html = render(&report);
        let basic = html.find("<strong>BASIC</strong>").unwrap();
        let multistage = html.find("<strong>MULTISTAGE</strong>").unwrap();
        let jlink = html.find("<strong>JLINK</strong>").unwrap();
        assert!(basic < multistage && multistage < jlink);
        assert_eq!(html.matches("badge-best\">").count(), 1);
        assert!(html.contains("badge-warning\">GOOD"));
        assert!(html.contains("badge-large\">LARGE"));
    }

    #[test]
    fn missing_images_are_left_out() {
        let report = ImageReport::from_sizes_mb(&[(Variant::Alpine, 150.0)]);
        let html = render(&report);
        assert!(!html.contains("<strong>BASIC</strong>"));
        assert!(html.contains("<strong>ALPINE</strong>"));
        // Without a baseline the reduction short-circuits to zero.
        assert!(html.contains("<td>0%</td>"));
    }

    #[test]
    fn chart_data_rounds_sizes_and_keeps_variant_colors() {
        let report = ImageReport::from_sizes_mb(&[(Variant::Jre, 450.26), (Variant::Native, 88.0)]);
        let data = chart_data(&report);
        assert_eq!(data["labels"], json!(["JRE", "NATIVE"]));
        assert_eq!(data["sizes"], json!([450.3, 88.0]));
        assert_eq!(data["colors"], json!(["#f39c12", "#9b59b6"]));
    }

    #[test]
    fn empty_report_still_renders() {
        let html = render(&ImageReport::new());
        assert!(html.contains("No images found"));
        assert!(html.contains("Best Optimized (N/A)"));
        assert!(html.ends_with("</html>\n"));
    }

    #[test]
    fn repository_name_is_escaped() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        let html = render_report(&ImageReport::new(), "<shop>", &at);
        assert!(html.contains("&lt;shop&gt;"));
        assert!(!html.contains("<shop>"));
    }
}
