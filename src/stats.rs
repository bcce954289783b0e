//! Size comparison arithmetic shared by the chart and HTML reporters.
//!
//! Zero-sized metrics mean "image not found" and never take part in a ratio.

use crate::model::{ImageMetric, ImageReport, Variant};

/// Percentage decrease of `size` relative to `baseline`; 0 when there is no
/// usable baseline.
pub fn reduction_pct(size: f64, baseline: f64) -> f64 {
    if baseline <= 0.0 {
        return 0.0;
    }
    (1.0 - size / baseline) * 100.0
}

/// Size of the baseline image in MB, 0 when it was not found.
pub fn baseline(report: &ImageReport) -> f64 {
    report.size_mb(Variant::BASELINE)
}

/// First metric in variant order with the smallest size among `candidates`.
fn first_min<'a, I>(candidates: I) -> Option<&'a ImageMetric>
where
    I: Iterator<Item = &'a ImageMetric>,
{
    candidates.fold(None, |best: Option<&ImageMetric>, metric| match best {
        Some(current) if current.size_bytes <= metric.size_bytes => Some(current),
        _ => Some(metric),
    })
}

/// Smallest present image. Ties go to the earlier variant.
pub fn smallest(report: &ImageReport) -> Option<&ImageMetric> {
    first_min(report.present())
}

/// Largest present image. Ties go to the earlier variant.
pub fn largest(report: &ImageReport) -> Option<&ImageMetric> {
    report.present().fold(None, |best: Option<&ImageMetric>, metric| match best {
        Some(current) if current.size_bytes >= metric.size_bytes => Some(current),
        _ => Some(metric),
    })
}

/// Smallest present image other than the baseline.
pub fn best_optimized(report: &ImageReport) -> Option<&ImageMetric> {
    first_min(report.present().filter(|metric| !metric.variant.is_baseline()))
}

/// Present images ordered largest first; equal sizes keep variant order.
pub fn ranked_desc(report: &ImageReport) -> Vec<&ImageMetric> {
    let mut ranked: Vec<&ImageMetric> = report.present().collect();
    ranked.sort_by(|a, b| b.size_bytes.cmp(&a.size_bytes));
    ranked
}

/// Baseline compared with the best optimized variant.
#[derive(Debug, Clone, PartialEq)]
pub struct Savings {
    pub best: Variant,
    pub original_mb: f64,
    pub final_mb: f64,
    pub saved_mb: f64,
    pub reduction_pct: f64,
}

impl Savings {
    pub fn from_report(report: &ImageReport) -> Option<Self> {
        let original_mb = baseline(report);
        if original_mb <= 0.0 {
            return None;
        }
        let best = best_optimized(report)?;
        let final_mb = best.size_mb();
        Some(Savings {
            best: best.variant,
            original_mb,
            final_mb,
            saved_mb: original_mb - final_mb,
            reduction_pct: reduction_pct(final_mb, original_mb),
        })
    }

    /// Share of the baseline that remains, in percent.
    pub fn final_share_pct(&self) -> f64 {
        100.0 - self.reduction_pct
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WaterfallStep {
    pub variant: Variant,
    /// Height of the bar; missing variants carry the previous level forward.
    pub level: f64,
    /// Drop from the previous present level, 0 for the baseline and missing
    /// variants. Negative when a stage grew.
    pub delta: f64,
    pub present: bool,
}

/// Stage-by-stage levels, or `None` when there is no baseline to start from.
pub fn waterfall(report: &ImageReport) -> Option<Vec<WaterfallStep>> {
    let start = baseline(report);
    if start <= 0.0 {
        return None;
    }

    let mut steps = Vec::with_capacity(report.len());
    let mut level = start;
    for metric in report.metrics() {
        if metric.variant.is_baseline() {
            steps.push(WaterfallStep { variant: metric.variant, level, delta: 0.0, present: true });
            continue;
        }
        if metric.is_present() {
            let size = metric.size_mb();
            steps.push(WaterfallStep {
                variant: metric.variant,
                level: size,
                delta: level - size,
                present: true,
            });
            level = size;
        } else {
            steps.push(WaterfallStep {
                variant: metric.variant,
                level,
                delta: 0.0,
                present: false,
            });
        }
    }
    Some(steps)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Best,
    Excellent,
    Good,
    Large,
}

impl Badge {
    /// Badge for a present image. The single smallest image wins `Best`
    /// before any threshold is considered.
    pub fn classify(metric: &ImageMetric, report: &ImageReport) -> Self {
        if smallest(report).is_some_and(|best| best.variant == metric.variant) {
            return Badge::Best;
        }
        let reduction = reduction_pct(metric.size_mb(), baseline(report));
        if reduction >= 60.0 {
            Badge::Excellent
        } else if reduction >= 30.0 {
            Badge::Good
        } else {
            Badge::Large
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Badge::Best => "⭐ BEST",
            Badge::Excellent => "EXCELLENT",
            Badge::Good => "GOOD",
            Badge::Large => "LARGE",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Badge::Best => "badge-best",
            Badge::Excellent => "badge-good",
            Badge::Good => "badge-warning",
            Badge::Large => "badge-large",
        }
    }
}

/// Numbers shown on the HTML summary cards.
#[derive(Debug, Clone, PartialEq)]
pub struct Headline {
    pub largest: Option<Variant>,
    pub largest_mb: f64,
    pub smallest: Option<Variant>,
    pub smallest_mb: f64,
    pub saved_mb: f64,
    pub reduction_pct: f64,
}

impl Headline {
    pub fn from_report(report: &ImageReport) -> Self {
        let largest = largest(report);
        let smallest = smallest(report);
        let largest_mb = largest.map(ImageMetric::size_mb).unwrap_or_default();
        let smallest_mb = smallest.map(ImageMetric::size_mb).unwrap_or_default();
        Headline {
            largest: largest.map(|m| m.variant),
            largest_mb,
            smallest: smallest.map(|m| m.variant),
            smallest_mb,
            saved_mb: largest_mb - smallest_mb,
            reduction_pct: reduction_pct(smallest_mb, largest_mb),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_report() -> ImageReport {
        ImageReport::from_sizes_mb(&[
            (Variant::Basic, 1200.0),
            (Variant::Multistage, 700.0),
            (Variant::Jre, 450.0),
            (Variant::Alpine, 300.0),
            (Variant::Jlink, 180.0),
            (Variant::Native, 120.0),
        ])
    }

    #[test]
    fn reduction_is_zero_for_equal_sizes_and_missing_baseline() {
        assert_eq!(reduction_pct(500.0, 500.0), 0.0);
        assert_eq!(reduction_pct(150.0, 0.0), 0.0);
        assert!((reduction_pct(180.0, 1200.0) - 85.0).abs() < 1e-9);
    }

    #[test]
    fn savings_against_best_optimized_variant() {
        let report = ImageReport::from_sizes_mb(&[(Variant::Basic, 1200.0), (Variant::Jlink, 180.0)]);
        let savings = Savings::from_report(&report).expect("savings");
        assert_eq!(savings.best, Variant::Jlink);
        assert!((savings.saved_mb - 1020.0).abs() < 1e-6);
        assert!((savings.reduction_pct - 85.0).abs() < 1e-6);
        assert!((savings.final_share_pct() - 15.0).abs() < 1e-6);
    }

    #[test]
    fn savings_undefined_without_baseline_or_optimized_image() {
        let no_base = ImageReport::from_sizes_mb(&[(Variant::Alpine, 150.0)]);
        assert!(Savings::from_report(&no_base).is_none());
        let only_base = ImageReport::from_sizes_mb(&[(Variant::Basic, 1200.0)]);
        assert!(Savings::from_report(&only_base).is_none());
    }

    #[test]
    fn ties_resolve_to_first_variant() {
        let report = ImageReport::from_sizes_mb(&[
            (Variant::Basic, 900.0),
            (Variant::Alpine, 150.0),
            (Variant::Native, 150.0),
        ]);
        assert_eq!(smallest(&report).map(|m| m.variant), Some(Variant::Alpine));
        assert_eq!(best_optimized(&report).map(|m| m.variant), Some(Variant::Alpine));
        assert_eq!(Badge::classify(report.get(Variant::Native).unwrap(), &report), Badge::Excellent);
    }

    #[test]
    fn smallest_image_is_best_even_below_thresholds() {
        // Only the baseline is present, so it is both the largest and smallest.
        let report = ImageReport::from_sizes_mb(&[(Variant::Basic, 1200.0)]);
        assert_eq!(Badge::classify(report.get(Variant::Basic).unwrap(), &report), Badge::Best);
    }

    #[test]
    fn badges_follow_reduction_thresholds() {
        let report = full_report();
        let badge = |v| Badge::classify(report.get(v).unwrap(), &report);
        assert_eq!(badge(Variant::Native), Badge::Best);
        assert_eq!(badge(Variant::Jlink), Badge::Excellent);
        assert_eq!(badge(Variant::Jre), Badge::Excellent);
        assert_eq!(badge(Variant::Multistage), Badge::Good);
        assert_eq!(badge(Variant::Basic), Badge::Large);
    }

    #[test]
    fn waterfall_deltas_sum_to_total_savings() {
        let report = full_report();
        let steps = waterfall(&report).expect("baseline present");
        assert_eq!(steps.len(), 6);
        let total: f64 = steps.iter().map(|s| s.delta).sum();
        assert!((total - (1200.0 - 120.0)).abs() < 1e-6);
    }

    #[test]
    fn waterfall_carries_level_over_missing_stage() {
        let report = ImageReport::from_sizes_mb(&[
            (Variant::Basic, 1200.0),
            (Variant::Jre, 450.0),
            (Variant::Jlink, 180.0),
        ]);
        let steps = waterfall(&report).unwrap();
        assert!(!steps[1].present);
        assert_eq!(steps[1].level, 1200.0);
        assert!((steps[2].delta - 750.0).abs() < 1e-6);
        assert!(!steps[3].present);
        assert!((steps[3].level - 450.0).abs() < 1e-6);
        assert!((steps[4].delta - 270.0).abs() < 1e-6);
    }

    #[test]
    fn waterfall_skipped_without_baseline() {
        let report = ImageReport::from_sizes_mb(&[(Variant::Alpine, 150.0)]);
        assert!(waterfall(&report).is_none());
    }

    #[test]
    fn ranked_desc_orders_present_images() {
        let report = ImageReport::from_sizes_mb(&[
            (Variant::Native, 120.0),
            (Variant::Basic, 1200.0),
            (Variant::Alpine, 300.0),
        ]);
        let ranked: Vec<Variant> = ranked_desc(&report).iter().map(|m| m.variant).collect();
        assert_eq!(ranked, vec![Variant::Basic, Variant::Alpine, Variant::Native]);
    }

    #[test]
    fn headline_of_empty_report_is_zeroed() {
        let headline = Headline::from_report(&ImageReport::new());
        assert_eq!(headline.largest, None);
        assert_eq!(headline.reduction_pct, 0.0);
        assert_eq!(headline.saved_mb, 0.0);
    }
}
