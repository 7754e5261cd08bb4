use crate::types::{OverfitConfig, OverfitReport, OverfitSeverity};

/// Compare a policy's train score against its validation score and classify
/// the gap between them (spec §4.5). Pure function: no mutation, no I/O.
///
/// `train_score == 0.0` is a degenerate baseline the relative-gap formula
/// can't divide by cleanly; it is treated as "no gap" when `validation_score`
/// also lands on zero, and otherwise as maximally suspicious (`Severe`,
/// `relative_gap_percent = +inf`) since any nonzero gap against a zero
/// baseline can't be expressed as a meaningful percentage.
pub fn detect_overfitting(
    train_score: f64,
    validation_score: f64,
    config: &OverfitConfig,
) -> OverfitReport {
    let score_gap = train_score - validation_score;

    let relative_gap_percent = if train_score == 0.0 {
        if score_gap == 0.0 {
            0.0
        } else {
            f64::INFINITY
        }
    } else {
        (score_gap / train_score.abs()) * 100.0
    };

    let severity = classify(relative_gap_percent, config);
    let overfitting_detected = severity != OverfitSeverity::None;

    OverfitReport {
        overfitting_detected,
        severity,
        score_gap,
        relative_gap_percent,
    }
}

fn classify(relative_gap_percent: f64, config: &OverfitConfig) -> OverfitSeverity {
    if relative_gap_percent > config.severe_pct {
        OverfitSeverity::Severe
    } else if relative_gap_percent > config.moderate_pct {
        OverfitSeverity::Moderate
    } else if relative_gap_percent > config.mild_pct {
        OverfitSeverity::Mild
    } else {
        OverfitSeverity::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_gap_is_not_flagged() {
        let report = detect_overfitting(1.0, 1.0, &OverfitConfig::default());
        assert!(!report.overfitting_detected);
        assert_eq!(report.severity, OverfitSeverity::None);
    }

    #[test]
    fn small_gap_below_mild_threshold_is_not_flagged() {
        // 3% relative gap, default mild threshold is 5%.
        let report = detect_overfitting(1.0, 0.97, &OverfitConfig::default());
        assert_eq!(report.severity, OverfitSeverity::None);
    }

    #[test]
    fn gap_bands_classify_correctly() {
        let config = OverfitConfig::default();
        assert_eq!(
            detect_overfitting(1.0, 0.90, &config).severity,
            OverfitSeverity::Mild
        );
        assert_eq!(
            detect_overfitting(1.0, 0.80, &config).severity,
            OverfitSeverity::Moderate
        );
        assert_eq!(
            detect_overfitting(1.0, 0.60, &config).severity,
            OverfitSeverity::Severe
        );
    }

    #[test]
    fn zero_train_score_with_nonzero_gap_is_severe() {
        let report = detect_overfitting(0.0, -0.5, &OverfitConfig::default());
        assert_eq!(report.severity, OverfitSeverity::Severe);
        assert!(report.relative_gap_percent.is_infinite());
    }

    #[test]
    fn zero_train_and_validation_score_is_not_flagged() {
        let report = detect_overfitting(0.0, 0.0, &OverfitConfig::default());
        assert_eq!(report.severity, OverfitSeverity::None);
        assert_eq!(report.relative_gap_percent, 0.0);
    }

    #[test]
    fn negative_gap_validation_beats_train_is_not_flagged() {
        // Validation scoring higher than train is not "overfitting" under
        // this formula -- a negative relative gap never exceeds a positive
        // threshold.
        let report = detect_overfitting(1.0, 1.2, &OverfitConfig::default());
        assert_eq!(report.severity, OverfitSeverity::None);
    }
}
