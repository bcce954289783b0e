use chrono::Local;

use crate::collector::{CollectMode, collect};
use crate::error::AppError;
use crate::html::{REPORT_FILE, render_report, write_report};
use crate::model::ImageReport;
use crate::utils::display_path;

use super::{ReportOptions, prepare_output_dir, print_banner, print_footer};

/// Collect detailed image metadata and write the HTML dashboard.
pub fn execute_html(options: &ReportOptions) -> Result<ImageReport, AppError> {
    let output_dir = &options.config.output_dir;
    prepare_output_dir(output_dir)?;

    print_banner("Docker Image Optimization HTML Report Generator");

    println!("Collecting image information...");
    let inspector = options.inspector();
    let report =
        collect(&inspector, &options.config.repository, CollectMode::Details, options.verbose);
    println!("Found {} images", report.present_count());
    println!();

    println!("Generating HTML report...");
    let path = output_dir.join(REPORT_FILE);
    let html = render_report(&report, &options.config.repository, &Local::now());
    write_report(&path, &html)?;
    println!("✓ HTML report saved: {}", display_path(&path));

    print_footer(&[
        format!("Report saved to: {}", display_path(&path)),
        "Open in browser to view interactive charts!".to_string(),
    ]);
    Ok(report)
}
