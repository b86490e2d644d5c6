//! Error types for the SCR wire protocol.

use thiserror::Error;

/// A datagram that cannot be split into well-formed groups.
///
/// Fatal to the current decode call only: the caller drops the datagram and
/// waits for the next one. Offsets are byte positions into the payload after
/// the trailing sentinel and surrounding whitespace were stripped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Empty payload")]
    Empty,

    #[error("Payload is not valid UTF-8 (valid up to byte {valid_up_to})")]
    InvalidUtf8 { valid_up_to: usize },

    #[error("Unexpected text outside a group at byte {offset}")]
    StrayText { offset: usize },

    #[error("Group starting at byte {offset} is not terminated")]
    Unterminated { offset: usize },

    #[error("Nested group inside the group starting at byte {offset}")]
    NestedGroup { offset: usize },

    #[error("Group starting at byte {offset} has no field name")]
    EmptyGroup { offset: usize },
}

/// A value token that is not a number.
///
/// Recovered locally: the group keeps its raw tokens as
/// [`FieldValue::Text`](crate::FieldValue::Text) and decoding continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Value `{token}` of field `{field}` is not numeric")]
pub struct ValueCoercionError {
    pub field: String,
    pub token: String,
}

/// A telemetry record that cannot be projected into a [`CarState`](crate::CarState).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("Missing required field `{0}`")]
    MissingField(&'static str),

    #[error("Field `{field}` must be a {expected}")]
    WrongShape {
        field: &'static str,
        expected: &'static str,
    },

    #[error("Track rangefinder has {len} readings, at least {min} required")]
    TrackTooShort { len: usize, min: usize },

    #[error("Field `{0}` is not a finite number")]
    NonFinite(&'static str),
}
