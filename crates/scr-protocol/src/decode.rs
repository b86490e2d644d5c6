//! Telemetry decoder.
//!
//! Splits a datagram into `(name value...)` groups and converts value tokens
//! to numbers. Structural problems abort the decode with a [`ProtocolError`];
//! non-numeric tokens are recorded as [`ValueCoercionError`]s on the record
//! and the raw tokens are kept.

use tracing::debug;

use crate::{FieldValue, ProtocolError, ProtocolResult, TelemetryRecord, ValueCoercionError};

/// Decode one inbound datagram.
///
/// Session-control frames are not telemetry; classify the datagram with
/// [`ServerFrame::classify`](crate::ServerFrame::classify) first.
///
/// # Errors
///
/// Returns [`ProtocolError`] when the payload is empty after trimming, is not
/// UTF-8, or does not split into well-formed groups.
pub fn decode(raw: &[u8]) -> ProtocolResult<TelemetryRecord> {
    let text = std::str::from_utf8(raw).map_err(|e| ProtocolError::InvalidUtf8 {
        valid_up_to: e.valid_up_to(),
    })?;
    decode_str(text)
}

/// Decode a datagram that is already text.
///
/// # Errors
///
/// See [`decode`].
pub fn decode_str(text: &str) -> ProtocolResult<TelemetryRecord> {
    let body = strip_terminator(text);
    if body.is_empty() {
        return Err(ProtocolError::Empty);
    }

    let mut record = TelemetryRecord::new();
    let mut rest = body;

    while !rest.is_empty() {
        let offset = body.len().saturating_sub(rest.len());

        let Some(opened) = rest.strip_prefix('(') else {
            return Err(ProtocolError::StrayText { offset });
        };
        let Some((inner, tail)) = opened.split_once(')') else {
            return Err(ProtocolError::Unterminated { offset });
        };
        if inner.contains('(') {
            return Err(ProtocolError::NestedGroup { offset });
        }

        let mut tokens = inner.split_whitespace();
        let Some(name) = tokens.next() else {
            return Err(ProtocolError::EmptyGroup { offset });
        };

        let (value, errors) = coerce(name, tokens);
        record.insert(name, value, errors);

        rest = tail.trim_start();
    }

    Ok(record)
}

/// Strip surrounding whitespace and one trailing non-parenthesis sentinel.
fn strip_terminator(text: &str) -> &str {
    let trimmed = text.trim();
    match trimmed.chars().next_back() {
        Some(last) if last != ')' && last != '(' => trimmed
            .strip_suffix(last)
            .map_or(trimmed, str::trim_end),
        _ => trimmed,
    }
}

fn coerce<'a>(
    name: &str,
    tokens: impl Iterator<Item = &'a str>,
) -> (FieldValue, Vec<ValueCoercionError>) {
    let raw: Vec<&str> = tokens.collect();
    let mut numbers = Vec::with_capacity(raw.len());
    let mut errors = Vec::new();

    for token in &raw {
        match token.parse::<f64>() {
            Ok(number) => numbers.push(number),
            Err(e) => {
                debug!(field = name, token, error = %e, "Could not parse telemetry value");
                errors.push(ValueCoercionError {
                    field: name.to_owned(),
                    token: (*token).to_owned(),
                });
            }
        }
    }

    if !errors.is_empty() {
        let text = raw.into_iter().map(str::to_owned).collect();
        return (FieldValue::Text(text), errors);
    }

    match numbers.as_slice() {
        [single] => (FieldValue::Scalar(*single), errors),
        _ => (FieldValue::Sequence(numbers), errors),
    }
}
