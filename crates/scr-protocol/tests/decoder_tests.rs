//! Integration tests for the `openracing-scr-protocol` crate.
//!
//! These tests decode realistic server datagrams through the public API.

use openracing_scr_protocol::{
    ActionCommand, CarState, FieldValue, ProtocolError, ServerFrame, StateError, decode, encode,
};
use openracing_test_helpers::prelude::*;

/// Datagram captured from a server on the grid, first tick of a race.
const GRID_DATAGRAM: &[u8] = b"(angle 0.00354488)(curLapTime -0.982)(damage 0)(distFromStart 2054.94)(distRaced 0)(fuel 94)(gear 0)(lastLapTime 0)(opponents 200 200 200 200 200 200 200 200 200 200 200 200 200 200 200 200 200 200 200 200 200 200 200 200 200 200 200 200 200 200 200 200 200 200 200 200)(racePos 1)(rpm 942.478)(speedX -0.00276)(speedY 0.00163)(speedZ -0.000166)(track 7.33 7.4 7.66 8.2 9.2 10.68 12.62 15.72 22.17 200 22.24 15.32 12.17 10.27 8.81 7.91 7.42 7.13 7.04)(trackPos -0.0333)(wheelSpinVel 0 0 0 0)(z 0.345)(focus -1 -1 -1 -1 -1)\0";

#[test]
fn test_decode_grid_datagram() -> TestResult {
    let record = decode(GRID_DATAGRAM)?;
    assert_eq!(record.len(), 19);
    assert!(record.coercion_errors().is_empty());
    assert_eq!(record.sequence("track").map(<[f64]>::len), Some(19));
    assert_eq!(record.sequence("opponents").map(<[f64]>::len), Some(36));
    assert_approx_eq!(must_some(record.scalar("curLapTime"), "lap time"), -0.982, 1e-12);
    Ok(())
}

#[test]
fn test_grid_datagram_projects_into_car_state() -> TestResult {
    let record = decode(GRID_DATAGRAM)?;
    let state = CarState::from_record(&record)?;
    assert_eq!(state.gear, 0);
    assert_eq!(state.race_pos, 1);
    assert_approx_eq!(state.rpm, 942.478, 1e-9);
    assert_approx_eq!(must_some(state.rangefinder(9), "center sensor"), 200.0, 1e-12);
    assert_eq!(state.focus, Some(vec![-1.0; 5]));
    Ok(())
}

#[test]
fn test_speed_scalar_and_track_sequence() -> TestResult {
    let record = decode(b"(speedX 42.5)(track 1 2 3)")?;
    assert_eq!(record.get("speedX"), Some(&FieldValue::Scalar(42.5)));
    assert_eq!(record.sequence("track"), Some(&[1.0, 2.0, 3.0][..]));
    Ok(())
}

#[test]
fn test_duplicate_field_last_group_wins() -> TestResult {
    let record = decode(b"(rpm 1000)(gear 1)(rpm 5000)(gear 2 3)")?;
    assert_eq!(record.len(), 2);
    assert_eq!(record.scalar("rpm"), Some(5000.0));
    assert_eq!(record.sequence("gear"), Some(&[2.0, 3.0][..]));
    Ok(())
}

#[test]
fn test_unknown_fields_preserved() -> TestResult {
    let record = decode(b"(angle 0)(turboBoost 1.25)(tyreTemps 80 81 82 83)")?;
    assert_eq!(record.scalar("turboBoost"), Some(1.25));
    let again = decode(record.to_wire().as_bytes())?;
    assert_eq!(again, record);
    Ok(())
}

#[test]
fn test_mixed_bad_tokens_degrade_gracefully() -> TestResult {
    let record = decode(b"(track 1 two 3)(speedX 10)")?;
    assert_eq!(
        record.get("track"),
        Some(&FieldValue::Text(vec![
            "1".to_string(),
            "two".to_string(),
            "3".to_string()
        ]))
    );
    assert_eq!(record.coercion_errors().len(), 1);
    assert_eq!(record.scalar("speedX"), Some(10.0));
    assert!(matches!(
        CarState::from_record(&record),
        Err(StateError::WrongShape { field: "track", .. })
    ));
    Ok(())
}

#[test]
fn test_malformed_payloads_are_rejected() {
    let cases: &[(&[u8], ProtocolError)] = &[
        (b"", ProtocolError::Empty),
        (b"\0", ProtocolError::Empty),
        (b"angle 0.1", ProtocolError::StrayText { offset: 0 }),
        (b"(angle 0.1", ProtocolError::Unterminated { offset: 0 }),
        (b"(angle (0.1))", ProtocolError::NestedGroup { offset: 0 }),
        (b"()", ProtocolError::EmptyGroup { offset: 0 }),
    ];
    for (raw, expected) in cases {
        assert_eq!(
            decode(raw).as_ref().err(),
            Some(expected),
            "payload {:?}",
            String::from_utf8_lossy(raw)
        );
    }
}

#[test]
fn test_control_frames_are_not_telemetry() {
    assert_eq!(ServerFrame::classify(b"***shutdown***"), ServerFrame::Shutdown);
    assert_eq!(ServerFrame::classify(b"***restart***"), ServerFrame::Restart);
    assert!(matches!(decode(b"***identified***"), Err(ProtocolError::StrayText { .. })));
}

#[test]
fn test_fixture_round_trip_through_decoder() -> TestResult {
    let fixture = TelemetryFixture::fast_bend().with_field("z", "0.34");
    let record = decode(&fixture.to_datagram())?;
    let state = CarState::from_record(&record)?;
    assert_approx_eq!(state.speed_x, 120.0, 1e-12);
    assert_approx_eq!(state.track_pos, 0.5, 1e-12);
    assert_eq!(state.z, Some(0.34));
    Ok(())
}

#[test]
fn test_encode_twice_is_byte_identical() {
    let action = ActionCommand {
        accel: 0.734,
        brake: 0.0002,
        clutch: 0.48,
        gear: 3,
        steer: -0.0417,
        ..ActionCommand::default()
    };
    let first = encode(&action);
    let second = encode(&action);
    assert_eq!(first, second);
    assert_eq!(
        String::from_utf8_lossy(&first),
        "(accel 0.734)(brake 0.000)(clutch 0.480)(gear 3.000)(steer -0.042)(focus -90 -45 0 45 90)(meta 0.000)"
    );
}
