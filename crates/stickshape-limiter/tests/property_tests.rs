//! Property-Based Tests for the Limiter
//!
//! These properties hold for arbitrary stick sequences, sample spacings and
//! configurations.

use stickshape_limiter::history::AnalogEntry;
use stickshape_limiter::jitter::Jitter;
use stickshape_limiter::prelude::*;
use stickshape_limiter::travel::travel;

#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    fn coordinate() -> impl Strategy<Value = Coordinate> {
        (any::<u8>(), any::<u8>()).prop_map(|(x, y)| Coordinate::new(x, y))
    }

    fn config() -> impl Strategy<Value = LimiterConfig> {
        (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
            |(sdi, pivot, crouch_jump, jitter, sequential)| LimiterConfig {
                detectors: Detectors {
                    sdi,
                    pivot,
                    crouch_jump,
                },
                jitter,
                wank_rule: if sequential {
                    WankRule::Sequential
                } else {
                    WankRule::Simplified
                },
                ..LimiterConfig::default()
            },
        )
    }

    proptest! {
        #[test]
        fn jitter_moves_at_most_one_unit(seed in any::<u16>(), coord in coordinate()) {
            let mut jitter = Jitter::new();
            jitter.seed(seed);
            for _ in 0..16 {
                let moved = jitter.apply(coord);
                prop_assert!(moved.x.abs_diff(coord.x) <= 1);
                prop_assert!(moved.y.abs_diff(coord.y) <= 1);
                if coord.x == 128 {
                    prop_assert_eq!(moved.x, 128);
                }
                if coord.y == 128 {
                    prop_assert_eq!(moved.y, 128);
                }
            }
        }

        #[test]
        fn linear_travel_is_monotonic(
            start in coordinate(),
            end in coordinate(),
            ms in 1u8..=64,
            spacing in 125u16..=1000,
        ) {
            let entry = AnalogEntry {
                timestamp: 0,
                travel_ms: ms,
                curve: EasingCurve::Linear,
                target: end,
                start,
                end,
            };
            let tb = TimeBase::new(spacing);
            let mut prev = travel(&entry, 0, tb).coord;
            prop_assert_eq!(prev, start);
            let mut finished = false;
            for now in 1..=400u16 {
                let step = travel(&entry, now, tb);
                prop_assert!(step.coord.x.abs_diff(end.x) <= prev.x.abs_diff(end.x));
                prop_assert!(step.coord.y.abs_diff(end.y) <= prev.y.abs_diff(end.y));
                prev = step.coord;
                finished |= step.done;
            }
            prop_assert!(finished);
            prop_assert_eq!(prev, end);
        }

        #[test]
        fn eased_travel_stays_between_anchors(
            start in coordinate(),
            end in coordinate(),
            curve in prop_oneof![
                Just(EasingCurve::Quadratic),
                Just(EasingCurve::Cubic),
                Just(EasingCurve::Quartic),
                Just(EasingCurve::DelayedSnap),
            ],
            now in 0u16..=16,
        ) {
            let entry = AnalogEntry {
                timestamp: 0,
                travel_ms: 16,
                curve,
                target: end,
                start,
                end,
            };
            let out = travel(&entry, now, TimeBase::DEFAULT).coord;
            prop_assert!(out.x >= start.x.min(end.x) && out.x <= start.x.max(end.x));
            prop_assert!(out.y >= start.y.min(end.y) && out.y <= start.y.max(end.y));
        }

        #[test]
        fn limiter_is_total(
            config in config(),
            start in any::<u16>(),
            samples in prop::collection::vec((coordinate(), any::<bool>(), 0u16..2000), 1..200),
        ) {
            let mut limiter = Limiter::with_start_time(config, start);
            for (stick, up, spacing) in samples {
                let raw = OutputState {
                    b: up,
                    ..OutputState::with_left_stick(stick)
                };
                let inputs = InputState { up, ..InputState::default() };
                let out = limiter.limit_outputs(&inputs, &raw, spacing);
                prop_assert_eq!(out.b, up);
                prop_assert_eq!(out.right_stick(), Coordinate::CENTER);
            }
        }

        #[test]
        fn held_stick_settles_on_target(
            config in config(),
            stick in coordinate(),
        ) {
            let config = LimiterConfig { jitter: false, ..config };
            let mut limiter = Limiter::new(config);
            let raw = OutputState::with_left_stick(stick);
            let mut last = Coordinate::CENTER;
            for _ in 0..300 {
                last = limiter.limit_outputs(&InputState::default(), &raw, 250).left_stick();
            }
            prop_assert_eq!(last, stick);
        }

        #[test]
        fn timing_round_trips_through_json(jump_hold_us in 1u32..1_000_000, jitter in any::<bool>()) {
            let mut config = LimiterConfig::default();
            config.timing.jump_hold_us = jump_hold_us;
            config.jitter = jitter;
            let json = serde_json::to_string(&config)
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
            let back: LimiterConfig = serde_json::from_str(&json)
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
            prop_assert_eq!(back, config);
        }
    }
}
