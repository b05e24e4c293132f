//! Decision engine integration tests
//!
//! Full position lifecycles driven the way the runner drives them: analyze,
//! act on the decision, then record the entry or exit.

use chrono::{DateTime, Duration, TimeZone, Utc};
use microflow_core::{Action, FeatureVector, PositionSide, Reason};
use microflow_decision::{DecisionConfig, DecisionEngine};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
}

fn config() -> DecisionConfig {
    DecisionConfig {
        imbalance_threshold: 0.7,
        delta_threshold: dec!(8),
        trend_periods: 3,
        spread_max_pct: 0.05,
        max_volatility_pct: None,
        min_signal_interval_ms: 30_000,
        confirmation_periods: 1,
        min_hold_ms: 20_000,
        max_hold_ms: 120_000,
        exit_imbalance_threshold: 0.3,
        exit_delta_rate: -10.0,
    }
}

fn features(imbalance: f64, delta: Decimal, spread_pct: f64, at: DateTime<Utc>) -> FeatureVector {
    FeatureVector {
        timestamp: at,
        imbalance,
        spread_pct: Some(spread_pct),
        cumulative_delta: delta,
        delta_per_minute: 0.0,
        volatility: 0.02,
        mid_price: dec!(42000),
        buy_trades: 10,
        sell_trades: 4,
        label: None,
    }
}

// ============================================================================
// End-to-end lifecycle
// ============================================================================

#[test]
fn test_enter_long_then_time_exit() {
    let mut engine = DecisionEngine::new(config());

    let mut decision = None;
    for (i, imbalance) in [0.5, 0.72, 0.75].into_iter().enumerate() {
        let now = t0() + Duration::seconds(i as i64);
        decision = Some(engine.analyze(&features(imbalance, dec!(12), 0.01, now), now));
    }
    let decision = decision.unwrap();
    assert_eq!(decision.action, Action::Enter);
    assert_eq!(decision.side, Some(PositionSide::Long));
    assert_eq!(decision.price, dec!(42000));

    let entry_time = t0() + Duration::seconds(2);
    engine.record_entry(PositionSide::Long, decision.price, dec!(0.01), entry_time);

    // still strongly long, nothing happens until the clock runs out
    let mid_life = entry_time + Duration::seconds(60);
    let hold = engine.analyze(&features(0.8, dec!(12), 0.01, mid_life), mid_life);
    assert_eq!(hold.action, Action::Hold);
    assert_eq!(hold.reason, Reason::Holding);

    let expiry = entry_time + config().max_hold();
    let exit = engine.analyze(&features(0.8, dec!(12), 0.01, expiry), expiry);
    assert_eq!(exit.action, Action::Exit);
    assert_eq!(exit.reason, Reason::TimeExit);
    assert_eq!(exit.reason.as_str(), "time_exit");
    assert_eq!(exit.side, Some(PositionSide::Long));

    let closed = engine.record_exit();
    assert_eq!(closed.entry_time, entry_time);
    assert!(engine.is_flat());
}

#[test]
fn test_short_reversal_exit() {
    let mut engine = DecisionEngine::new(config());
    let mut now = t0();
    let mut last = None;
    for imbalance in [0.5, 0.28, 0.2] {
        last = Some(engine.analyze(&features(imbalance, dec!(-20), 0.01, now), now));
        now += Duration::seconds(1);
    }
    let entry = last.unwrap();
    assert_eq!(entry.side, Some(PositionSide::Short));
    engine.record_entry(PositionSide::Short, entry.price, dec!(1), now);

    let later = now + Duration::seconds(25);
    let mut squeeze = features(0.85, dec!(30), 0.01, later);
    squeeze.delta_per_minute = 90.0;
    let exit = engine.analyze(&squeeze, later);

    assert_eq!(exit.action, Action::Exit);
    assert_eq!(exit.reason, Reason::ReversalExit);
    assert_eq!(exit.side, Some(PositionSide::Short));
}

// ============================================================================
// Invariants over random input
// ============================================================================

/// Random vectors, occasionally malformed, on a jittery one-second clock.
/// The driver obeys every actionable decision.
#[test]
fn test_state_machine_invariants_hold_under_random_input() {
    let config = config();
    let mut engine = DecisionEngine::new(config.clone());
    let mut rng = StdRng::seed_from_u64(7);
    let mut now = t0();
    let mut entries = 0;
    let mut exits = 0;

    for _ in 0..5_000 {
        now += Duration::milliseconds(rng.gen_range(200..3_000));

        let mut vector = features(
            rng.gen_range(0.0..1.0),
            Decimal::from(rng.gen_range(-30..=30)),
            rng.gen_range(0.0..0.08),
            now,
        );
        vector.delta_per_minute = rng.gen_range(-60.0..60.0);
        if rng.gen_bool(0.02) {
            vector.imbalance = f64::NAN;
        }
        if rng.gen_bool(0.05) {
            vector.spread_pct = None;
        }

        let open = engine.position().cloned();
        let decision = engine.analyze(&vector, now);

        match (&open, decision.action) {
            (Some(_), Action::Enter) => panic!("Enter while in position at {now}"),
            (None, Action::Exit) => panic!("Exit while flat at {now}"),
            (Some(position), Action::Exit) => {
                assert!(
                    now - position.entry_time >= config.min_hold(),
                    "exit inside minimum hold"
                );
                assert_eq!(decision.side, Some(position.side));
                engine.record_exit();
                exits += 1;
            }
            (None, Action::Enter) => {
                if let Some(last_entry) = engine.last_entry_time() {
                    assert!(now - last_entry >= config.min_signal_interval());
                }
                let side = decision.side.unwrap();
                engine.record_entry(side, decision.price, dec!(1), now);
                entries += 1;
            }
            (Some(position), Action::Hold) => {
                assert!(now - position.entry_time < config.max_hold());
            }
            (None, Action::Hold) => {}
        }
    }

    assert!(entries > 0, "random walk never entered");
    assert!(exits + 1 >= entries);
}
