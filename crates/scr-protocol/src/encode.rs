//! Action encoder.

use std::fmt::Display;

use crate::ActionCommand;

/// Encode an action as `(accel ..)(brake ..)(clutch ..)(gear ..)(steer ..)(focus ..)(meta ..)`.
///
/// Scalars carry exactly three decimals; focus directions are plain decimals.
/// The output is deterministic and has no trailing delimiter.
pub fn encode(action: &ActionCommand) -> Vec<u8> {
    encode_to_string(action).into_bytes()
}

pub(crate) fn encode_to_string(action: &ActionCommand) -> String {
    let mut out = String::with_capacity(128);
    push_group(&mut out, "accel", &[fixed3(action.accel)]);
    push_group(&mut out, "brake", &[fixed3(action.brake)]);
    push_group(&mut out, "clutch", &[fixed3(action.clutch)]);
    push_group(&mut out, "gear", &[fixed3(f64::from(action.gear))]);
    push_group(&mut out, "steer", &[fixed3(action.steer)]);
    push_group(&mut out, "focus", &action.focus);
    push_group(&mut out, "meta", &[fixed3(f64::from(action.meta))]);
    out
}

/// Append one `(name v1 v2 ...)` group.
pub(crate) fn push_group<T: Display>(out: &mut String, name: &str, values: &[T]) {
    out.push('(');
    out.push_str(name);
    for value in values {
        out.push(' ');
        out.push_str(&value.to_string());
    }
    out.push(')');
}

fn fixed3(value: f64) -> String {
    // `+ 0.0` folds -0.0 into 0.0 so a zeroed actuator never prints "-0.000".
    format!("{:.3}", value + 0.0)
}
