use bt_engine::{execute, ExitReason, Fees};
use bt_policy::RiskPolicy;
use bt_testkit::{anchor_ms, build_series, Bar};

fn fixed_stop(stop_pct: f64, take_profit_pct: Option<f64>) -> RiskPolicy {
    bt_policy::fixed_stop(stop_pct, take_profit_pct).unwrap()
}

/// S2: fixed-stop loses first. Even though bar 2's high would also hit the
/// take-profit, STOP-first discipline picks the stop.
#[test]
fn s2_fixed_stop_loses_first() {
    let candles = build_series(
        1.0,
        1_000_000,
        60,
        &[Bar::new(1.0, 1.0, 1.0), Bar::new(2.5, 0.7, 1.0)],
    );
    let t0 = anchor_ms(1_000_000);
    let policy = fixed_stop(0.25, Some(1.0));

    let result = execute(&candles, t0, &policy, &Fees::zero()).unwrap();

    assert_eq!(result.exit_reason, ExitReason::StopLoss);
    assert!((result.exit_px.unwrap() - 0.75).abs() < 1e-9);
    assert!(result.stop_out);
}

/// S3: trailing activation, watermark ratchet, and break-even-floored stop.
#[test]
fn s3_trailing_activation_and_breakeven() {
    let candles = build_series(
        1.0,
        1_000_000,
        60,
        &[
            Bar::new(1.0, 1.0, 1.0),
            Bar::new(1.6, 1.5, 1.55),
            Bar::new(1.6, 1.3, 1.5),
            Bar::new(2.0, 1.5, 1.9),
            Bar::new(1.9, 1.55, 1.6),
        ],
    );
    let t0 = anchor_ms(1_000_000);
    let policy = bt_policy::trailing_stop(0.5, 0.2, Some(0.25)).unwrap();
    let fees = Fees::new(30.0, 10.0);

    let result = execute(&candles, t0, &policy, &fees).unwrap();

    assert_eq!(result.exit_reason, ExitReason::TrailingStop);
    assert!((result.exit_px.unwrap() - 1.6).abs() < 1e-9);
    assert!(result.stop_out);

    let expected_bps = ((1.6 * 0.996 - 1.004) / 1.004) * 10_000.0;
    assert!((result.realized_return_bps - expected_bps).abs() < 1e-6);
}

/// S4: ladder realizes two partial exits at the exact level prices and
/// reports the size-weighted average as the exit price.
#[test]
fn s4_ladder_two_legs() {
    let candles = build_series(
        1.0,
        1_000_000,
        60,
        &[
            Bar::new(1.0, 1.0, 1.0),
            Bar::new(2.1, 1.0, 2.0),
            Bar::new(3.1, 2.0, 3.0),
            Bar::new(3.0, 2.4, 2.5),
        ],
    );
    let t0 = anchor_ms(1_000_000);
    let policy = bt_policy::ladder(
        vec![
            bt_policy::LadderLevel::new(2.0, 0.5),
            bt_policy::LadderLevel::new(3.0, 0.5),
        ],
        Some(0.2),
    )
    .unwrap();

    let result = execute(&candles, t0, &policy, &Fees::zero()).unwrap();

    assert_eq!(result.exit_reason, ExitReason::LadderDone);
    assert!((result.exit_px.unwrap() - 2.5).abs() < 1e-9);
}

/// S5: combo picks whichever inner policy fires first. A ladder leg counts
/// as a combo-terminal event even though a standalone ladder would keep
/// running; trailing merely arming on the same candle does not compete.
#[test]
fn s5_combo_first_trigger_prefers_ladder_leg() {
    let trailing = bt_policy::trailing_stop(1.0, 0.15, Some(0.2)).unwrap();
    let ladder = bt_policy::ladder(
        vec![
            bt_policy::LadderLevel::new(2.0, 0.5),
            bt_policy::LadderLevel::new(3.0, 0.3),
        ],
        Some(0.2),
    )
    .unwrap();
    let policy = bt_policy::combo(vec![trailing, ladder]).unwrap();

    let candles = build_series(
        1.0,
        1_000_000,
        60,
        &[
            Bar::new(1.0, 1.0, 1.0),
            Bar::new(1.5, 1.0, 1.4),
            Bar::new(1.8, 1.3, 1.7),
            Bar::new(2.1, 1.5, 2.0),
        ],
    );
    let t0 = anchor_ms(1_000_000);

    let result = execute(&candles, t0, &policy, &Fees::zero()).unwrap();

    assert!((result.exit_px.unwrap() - 2.0).abs() < 1e-9);
    match &result.exit_reason {
        ExitReason::Combo { inner_index, inner_reason } => {
            assert_eq!(*inner_index, 1);
            assert_eq!(inner_reason.canonical_str(), "ladder_leg_0");
        }
        other => panic!("expected Combo exit reason, got {:?}", other),
    }
}

#[test]
fn no_entry_when_t0_after_all_candles() {
    let candles = build_series(1.0, 1_000_000, 60, &[Bar::new(1.0, 1.0, 1.0)]);
    let t0 = anchor_ms(1_000_000) + 10_000_000;
    let policy = fixed_stop(0.25, None);

    let result = execute(&candles, t0, &policy, &Fees::zero()).unwrap();

    assert_eq!(result.exit_reason, ExitReason::NoEntry);
    assert!(result.entry_px.is_none());
    assert!(result.tail_capture.is_none());
}

#[test]
fn end_of_data_forces_exit_at_last_close() {
    let candles = build_series(
        1.0,
        1_000_000,
        60,
        &[Bar::new(1.0, 1.0, 1.0), Bar::new(1.1, 0.95, 1.05)],
    );
    let t0 = anchor_ms(1_000_000);
    let policy = fixed_stop(0.5, Some(2.0)); // neither threshold reached

    let result = execute(&candles, t0, &policy, &Fees::zero()).unwrap();

    assert_eq!(result.exit_reason, ExitReason::EndOfData);
    assert!((result.exit_px.unwrap() - 1.05).abs() < 1e-9);
}
