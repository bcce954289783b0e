use indicatif::{ProgressBar, ProgressStyle};

use crate::error::InspectError;
use crate::inspect::ImageInspector;
use crate::model::{ImageMetric, ImageReport, Variant};
use crate::utils::format_bytes;

/// How much to ask the runtime for each image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectMode {
    /// Byte size only.
    Size,
    /// Size, creation time, platform and layer count.
    Details,
}

/// Inspect every variant of `repository`. Images that cannot be inspected are
/// recorded as zero-sized placeholders with a warning; this never fails.
pub fn collect(
    inspector: &dyn ImageInspector,
    repository: &str,
    mode: CollectMode,
    verbose: bool,
) -> ImageReport {
    let progress = progress_bar(Variant::ALL.len() as u64);
    let mut report = ImageReport::new();

    for variant in Variant::ALL {
        let image_ref = variant.image_ref(repository);
        progress.set_message(image_ref.clone());

        match inspect_one(inspector, variant, &image_ref, mode) {
            Ok(metric) => {
                if verbose {
                    progress.suspend(|| {
                        println!("  {:<24} {:>12}", image_ref, format_bytes(metric.size_bytes))
                    });
                }
                report.insert(metric);
            }
            Err(err) => {
                progress.suspend(|| eprintln!("Warning: {image_ref} not found ({err})"));
                report.insert(ImageMetric::missing(variant));
            }
        }
        progress.inc(1);
    }

    progress.finish_and_clear();
    report
}

fn inspect_one(
    inspector: &dyn ImageInspector,
    variant: Variant,
    image_ref: &str,
    mode: CollectMode,
) -> Result<ImageMetric, InspectError> {
    match mode {
        CollectMode::Size => {
            let size = inspector.inspect_size(image_ref)?;
            Ok(ImageMetric::new(variant, size))
        }
        CollectMode::Details => {
            let (size, details) = inspector.inspect_details(image_ref)?;
            Ok(ImageMetric::with_details(variant, size, details))
        }
    }
}

fn progress_bar(len: u64) -> ProgressBar {
    let bar = ProgressBar::new(len);
    let style = ProgressStyle::with_template("{spinner} Inspecting {msg:<24} [{bar:24}] {pos}/{len}")
        .map(|style| style.progress_chars("=> "))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::model::ImageDetails;

    struct FakeInspector {
        sizes: HashMap<String, u64>,
    }

    impl FakeInspector {
        fn new(entries: &[(&str, u64)]) -> Self {
            let sizes = entries.iter().map(|(name, size)| (name.to_string(), *size)).collect();
            Self { sizes }
        }
    }

    impl ImageInspector for FakeInspector {
        fn inspect_size(&self, image_ref: &str) -> Result<u64, InspectError> {
            match self.sizes.get(image_ref) {
                Some(0) => Err(InspectError::Malformed("<no value>".to_string())),
                Some(size) => Ok(*size),
                None => Err(InspectError::Failed(format!("No such image: {image_ref}"))),
            }
        }

        fn inspect_details(&self, image_ref: &str) -> Result<(u64, ImageDetails), InspectError> {
            let size = self.inspect_size(image_ref)?;
            let details = ImageDetails {
                created: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
                architecture: "amd64".to_string(),
                os: "linux".to_string(),
                layers: 7,
            };
            Ok((size, details))
        }
    }

    #[test]
    fn every_variant_has_exactly_one_entry() {
        let inspector = FakeInspector::new(&[("bookshelf:basic", 1000), ("bookshelf:jlink", 100)]);
        let report = collect(&inspector, "bookshelf", CollectMode::Size, false);
        assert_eq!(report.len(), Variant::ALL.len());
        assert_eq!(report.get(Variant::Basic).unwrap().size_bytes, 1000);
        assert_eq!(report.get(Variant::Jlink).unwrap().size_bytes, 100);
        assert_eq!(report.get(Variant::Alpine).unwrap().size_bytes, 0);
        assert_eq!(report.present_count(), 2);
    }

    #[test]
    fn malformed_output_becomes_placeholder() {
        let inspector = FakeInspector::new(&[("bookshelf:native", 0)]);
        let report = collect(&inspector, "bookshelf", CollectMode::Size, false);
        assert!(!report.get(Variant::Native).unwrap().is_present());
        assert!(report.none_found());
    }

    #[test]
    fn details_mode_keeps_metadata() {
        let inspector = FakeInspector::new(&[("shop:alpine", 2048)]);
        let report = collect(&inspector, "shop", CollectMode::Details, false);
        let alpine = report.get(Variant::Alpine).unwrap();
        assert_eq!(alpine.details.as_ref().map(|d| d.layers), Some(7));
        assert!(report.get(Variant::Basic).unwrap().details.is_none());
    }
}
