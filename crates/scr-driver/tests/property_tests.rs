//! Property tests: actuator ranges hold for any telemetry sequence.

use openracing_scr_driver::{ControlConfig, Driver, GearboxConfig, TOP_GEAR};
use openracing_scr_protocol::{CarState, decode};
use openracing_test_helpers::fixtures::TelemetryFixture;
use proptest::prelude::*;

fn fixture() -> impl Strategy<Value = TelemetryFixture> {
    (
        -3.2f64..3.2,
        -3.0f64..3.0,
        -50.0f64..350.0,
        -1i32..=7,
        0.0f64..12000.0,
        -2.0f64..300.0,
        proptest::collection::vec(-1.0f64..200.0, 19),
    )
        .prop_map(|(angle, track_pos, speed, gear, rpm, lap, track)| {
            TelemetryFixture::straight()
                .with_angle(angle)
                .with_track_pos(track_pos)
                .with_speed(speed)
                .with_gear(gear, rpm)
                .with_lap_time(lap)
                .with_track(track)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_actuators_stay_in_range(ticks in proptest::collection::vec(fixture(), 1..30)) {
        let mut driver = Driver::new(ControlConfig::default());
        for tick in &ticks {
            let record = decode(&tick.to_datagram())
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
            let state = CarState::from_record(&record)
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
            driver.drive(&state);

            let action = driver.action();
            prop_assert!((-1.0..=1.0).contains(&action.steer), "steer {}", action.steer);
            prop_assert!((0.0..=1.0).contains(&action.accel), "accel {}", action.accel);
            prop_assert!((0.0..=1.0).contains(&action.brake), "brake {}", action.brake);
            prop_assert!((0.0..=1.0).contains(&action.clutch), "clutch {}", action.clutch);
            prop_assert!((1..=TOP_GEAR).contains(&action.gear), "gear {}", action.gear);
        }
    }

    #[test]
    fn prop_gear_changes_by_at_most_one(gear in -1i32..=6, rpm in 0.0f64..20000.0) {
        let next = GearboxConfig::default().select_gear(gear, rpm);
        prop_assert!((1..=TOP_GEAR).contains(&next));
        if gear >= 1 {
            prop_assert!((next - gear).abs() <= 1);
        }
    }
}
