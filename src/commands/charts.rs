use crate::collector::{CollectMode, collect};
use crate::error::AppError;
use crate::model::ImageReport;
use crate::render::charts::{ChartOutput, render_all};
use crate::utils::display_path;

use super::{ReportOptions, prepare_output_dir, print_banner, print_footer};

/// Collect image sizes and write every chart into the output directory.
pub fn execute_charts(options: &ReportOptions) -> Result<ImageReport, AppError> {
    let output_dir = &options.config.output_dir;
    prepare_output_dir(output_dir)?;

    print_banner("Docker Image Visualization Report Generator");

    println!("Fetching Docker image sizes...");
    let inspector = options.inspector();
    let report = collect(&inspector, &options.config.repository, CollectMode::Size, options.verbose);
    print_sizes(&report);
    println!();

    println!("Generating charts...");
    for output in render_all(&report, &options.config.repository, output_dir)? {
        match output {
            ChartOutput::Written { name, files } => {
                if let Some(first) = files.first() {
                    println!("✓ {name} saved: {}", display_path(first));
                }
            }
            ChartOutput::Skipped { name, reason } => {
                eprintln!("Warning: {reason}, skipping {}", name.to_ascii_lowercase());
            }
        }
    }

    print_footer(&[format!("All charts saved to: {}/", display_path(output_dir))]);
    Ok(report)
}

fn print_sizes(report: &ImageReport) {
    let found: Vec<String> = report
        .metrics()
        .map(|metric| format!("{}: {:.1}MB", metric.variant, metric.size_mb()))
        .collect();
    println!("Found images: {}", found.join(", "));
}
