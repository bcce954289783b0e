use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Build variants of the repository, in optimization order. `Basic` is the
/// unoptimized baseline every other variant is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Variant {
    Basic,
    Multistage,
    Jre,
    Alpine,
    Jlink,
    Native,
}

impl Variant {
    pub const ALL: [Variant; 6] = [
        Variant::Basic,
        Variant::Multistage,
        Variant::Jre,
        Variant::Alpine,
        Variant::Jlink,
        Variant::Native,
    ];

    pub const BASELINE: Variant = Variant::Basic;

    pub fn from_name(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "basic" => Some(Variant::Basic),
            "multistage" => Some(Variant::Multistage),
            "jre" => Some(Variant::Jre),
            "alpine" => Some(Variant::Alpine),
            "jlink" => Some(Variant::Jlink),
            "native" => Some(Variant::Native),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Basic => "basic",
            Variant::Multistage => "multistage",
            Variant::Jre => "jre",
            Variant::Alpine => "alpine",
            Variant::Jlink => "jlink",
            Variant::Native => "native",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Variant::Basic => "BASIC",
            Variant::Multistage => "MULTISTAGE",
            Variant::Jre => "JRE",
            Variant::Alpine => "ALPINE",
            Variant::Jlink => "JLINK",
            Variant::Native => "NATIVE",
        }
    }

    /// Chart color shared by every renderer.
    pub fn color(&self) -> &'static str {
        match self {
            Variant::Basic => "#e74c3c",
            Variant::Multistage => "#e67e22",
            Variant::Jre => "#f39c12",
            Variant::Alpine => "#27ae60",
            Variant::Jlink => "#2980b9",
            Variant::Native => "#9b59b6",
        }
    }

    pub fn is_baseline(&self) -> bool {
        *self == Variant::BASELINE
    }

    /// Image reference for this variant, e.g. `bookshelf:jlink`.
    pub fn image_ref(&self, repository: &str) -> String {
        format!("{repository}:{}", self.as_str())
    }
}

impl std::str::FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variant::from_name(s).ok_or_else(|| format!("Unknown variant '{s}'"))
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Metadata only available from a full inspect document.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageDetails {
    pub created: DateTime<Utc>,
    pub architecture: String,
    pub os: String,
    pub layers: usize,
}

impl ImageDetails {
    pub fn platform(&self) -> String {
        format!("{}/{}", self.os, self.architecture)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageMetric {
    pub variant: Variant,
    pub size_bytes: u64,
    pub details: Option<ImageDetails>,
}

impl ImageMetric {
    pub fn new(variant: Variant, size_bytes: u64) -> Self {
        ImageMetric { variant, size_bytes, details: None }
    }

    pub fn with_details(variant: Variant, size_bytes: u64, details: ImageDetails) -> Self {
        ImageMetric { variant, size_bytes, details: Some(details) }
    }

    /// Placeholder recorded when an image could not be inspected.
    pub fn missing(variant: Variant) -> Self {
        ImageMetric::new(variant, 0)
    }

    pub fn size_mb(&self) -> f64 {
        self.size_bytes as f64 / BYTES_PER_MB
    }

    pub fn is_present(&self) -> bool {
        self.size_bytes > 0
    }
}

/// One metric per variant, iterated in `Variant::ALL` order.
#[derive(Debug, Clone)]
pub struct ImageReport {
    pub images: BTreeMap<Variant, ImageMetric>,
}

impl ImageReport {
    pub fn new() -> Self {
        let images = Variant::ALL.iter().map(|v| (*v, ImageMetric::missing(*v))).collect();
        Self { images }
    }

    pub fn from_metrics<I>(metrics: I) -> Self
    where
        I: IntoIterator<Item = ImageMetric>,
    {
        let mut report = ImageReport::new();
        for metric in metrics {
            report.insert(metric);
        }
        report
    }

    /// Convenience constructor from `(variant, megabytes)` pairs.
    pub fn from_sizes_mb(sizes: &[(Variant, f64)]) -> Self {
        ImageReport::from_metrics(
            sizes.iter().map(|(variant, mb)| {
                ImageMetric::new(*variant, (mb * BYTES_PER_MB).round() as u64)
            }),
        )
    }

    pub fn insert(&mut self, metric: ImageMetric) {
        self.images.insert(metric.variant, metric);
    }

    pub fn get(&self, variant: Variant) -> Option<&ImageMetric> {
        self.images.get(&variant)
    }

    pub fn size_mb(&self, variant: Variant) -> f64 {
        self.get(variant).map(ImageMetric::size_mb).unwrap_or_default()
    }

    pub fn metrics(&self) -> impl Iterator<Item = &ImageMetric> {
        self.images.values()
    }

    /// Metrics with a nonzero size.
    pub fn present(&self) -> impl Iterator<Item = &ImageMetric> {
        self.images.values().filter(|metric| metric.is_present())
    }

    pub fn present_count(&self) -> usize {
        self.present().count()
    }

    /// True when no image was found at all.
    pub fn none_found(&self) -> bool {
        self.present_count() == 0
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl Default for ImageReport {
    fn default() -> Self {
        ImageReport::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_report_covers_every_variant_with_placeholders() {
        let report = ImageReport::new();
        assert_eq!(report.len(), 6);
        assert!(report.none_found());
        assert!(report.metrics().all(|metric| metric.size_bytes == 0));
    }

    #[test]
    fn report_iterates_in_variant_order() {
        let report = ImageReport::from_sizes_mb(&[
            (Variant::Native, 90.0),
            (Variant::Basic, 1200.0),
            (Variant::Alpine, 300.0),
        ]);
        let order: Vec<Variant> = report.metrics().map(|m| m.variant).collect();
        assert_eq!(order, Variant::ALL.to_vec());
        let present: Vec<Variant> = report.present().map(|m| m.variant).collect();
        assert_eq!(present, vec![Variant::Basic, Variant::Alpine, Variant::Native]);
    }

    #[test]
    fn size_mb_converts_from_bytes() {
        let metric = ImageMetric::new(Variant::Jre, 5 * 1024 * 1024);
        assert_eq!(metric.size_mb(), 5.0);
    }

    #[test]
    fn variant_parses_case_insensitively() {
        assert_eq!("JLINK".parse::<Variant>(), Ok(Variant::Jlink));
        assert!("distroless".parse::<Variant>().is_err());
        assert_eq!(Variant::Alpine.image_ref("bookshelf"), "bookshelf:alpine");
    }
}
