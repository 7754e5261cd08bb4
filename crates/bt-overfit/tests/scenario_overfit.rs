use bt_overfit::{detect_overfitting, OverfitConfig, OverfitSeverity};

#[test]
fn custom_thresholds_are_honored() {
    let config = OverfitConfig {
        mild_pct: 10.0,
        moderate_pct: 20.0,
        severe_pct: 40.0,
    };
    // 15% relative gap: below the custom mild (10%) -> above mild, below moderate.
    let report = detect_overfitting(1.0, 0.85, &config);
    assert_eq!(report.severity, OverfitSeverity::Mild);
    assert!(report.overfitting_detected);
}

#[test]
fn score_gap_sign_matches_train_minus_validation() {
    let report = detect_overfitting(2.0, 1.5, &OverfitConfig::default());
    assert!((report.score_gap - 0.5).abs() < 1e-9);
}
