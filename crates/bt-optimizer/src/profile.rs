use bt_metrics::PathMetrics;
use bt_scorer::{percentile_of, sorted_copy};

use crate::types::HighMultipleConfig;

/// Whether a caller's train-set peak-multiple distribution places them
/// above both percentile thresholds (spec §4.6 step 2, GLOSSARY
/// "High-multiple caller"). Computed from *train* path metrics only, to
/// avoid leaking validation-set information into grid generation.
pub fn is_high_multiple_caller(train_path_metrics: &[&PathMetrics], config: &HighMultipleConfig) -> bool {
    if train_path_metrics.is_empty() {
        return false;
    }
    let peaks: Vec<f64> = train_path_metrics
        .iter()
        .map(|pm| pm.peak_multiple)
        .filter(|p| p.is_finite())
        .collect();
    if peaks.is_empty() {
        return false;
    }
    let sorted = sorted_copy(&peaks);
    let p95 = percentile_of(&sorted, 0.95);
    let p75 = percentile_of(&sorted, 0.75);
    p95 >= config.p95_threshold && p75 >= config.p75_threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pm(peak_multiple: f64) -> PathMetrics {
        PathMetrics {
            call_id: "c".to_string(),
            t0_ms: 0,
            p0: 1.0,
            hit_2x: peak_multiple >= 2.0,
            hit_3x: peak_multiple >= 3.0,
            hit_4x: peak_multiple >= 4.0,
            t_2x_ms: None,
            t_3x_ms: None,
            t_4x_ms: None,
            dd_bps: 0.0,
            dd_to_2x_bps: None,
            alert_to_activity_ms: None,
            peak_multiple,
        }
    }

    #[test]
    fn empty_is_not_high_multiple() {
        assert!(!is_high_multiple_caller(&[], &HighMultipleConfig::default()));
    }

    #[test]
    fn modest_peaks_are_not_high_multiple() {
        let rows: Vec<PathMetrics> = (0..20).map(|i| pm(1.0 + i as f64 * 0.1)).collect();
        let refs: Vec<&PathMetrics> = rows.iter().collect();
        assert!(!is_high_multiple_caller(&refs, &HighMultipleConfig::default()));
    }

    #[test]
    fn consistently_huge_peaks_are_high_multiple() {
        let rows: Vec<PathMetrics> = (0..20).map(|i| pm(25.0 + i as f64)).collect();
        let refs: Vec<&PathMetrics> = rows.iter().collect();
        assert!(is_high_multiple_caller(&refs, &HighMultipleConfig::default()));
    }
}
