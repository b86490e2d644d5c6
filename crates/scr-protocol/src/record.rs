//! Decoded telemetry record.

use std::fmt;
use std::str::FromStr;

use crate::encode::push_group;
use crate::{ProtocolError, ValueCoercionError};

/// Value of one telemetry group.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Group with exactly one numeric token.
    Scalar(f64),
    /// Group with zero, two or more numeric tokens.
    Sequence(Vec<f64>),
    /// Group with at least one non-numeric token, kept verbatim.
    Text(Vec<String>),
}

impl FieldValue {
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            FieldValue::Scalar(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[f64]> {
        match self {
            FieldValue::Sequence(values) => Some(values),
            _ => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, FieldValue::Text(_))
    }

    pub(crate) fn tokens(&self) -> Vec<String> {
        match self {
            FieldValue::Scalar(value) => vec![value.to_string()],
            FieldValue::Sequence(values) => values.iter().map(f64::to_string).collect(),
            FieldValue::Text(tokens) => tokens.clone(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tokens().join(" "))
    }
}

/// Field name → value mapping decoded from one datagram.
///
/// Insertion order is kept so a re-encoded record reads like the received datagram,
/// but lookups do not depend on it. A later group with the same name replaces
/// the earlier one in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TelemetryRecord {
    fields: Vec<(String, FieldValue)>,
    coercion_errors: Vec<ValueCoercionError>,
}

impl TelemetryRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn scalar(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(FieldValue::as_scalar)
    }

    pub fn sequence(&self, name: &str) -> Option<&[f64]> {
        self.get(name).and_then(FieldValue::as_sequence)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Tokens that failed numeric conversion while decoding this record.
    ///
    /// Only errors belonging to the surviving value of each field are kept.
    pub fn coercion_errors(&self) -> &[ValueCoercionError] {
        &self.coercion_errors
    }

    /// Insert or replace a field, discarding coercion errors of the value it replaces.
    pub fn insert(
        &mut self,
        name: &str,
        value: FieldValue,
        errors: impl IntoIterator<Item = ValueCoercionError>,
    ) {
        self.coercion_errors.retain(|error| error.field != name);
        self.coercion_errors.extend(errors);

        match self.fields.iter_mut().find(|(field, _)| field == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name.to_owned(), value)),
        }
    }

    /// Re-encode every field, unknown ones included, in group syntax.
    ///
    /// Numbers use their shortest round-trip representation, so
    /// `decode(record.to_wire())` yields an equal record.
    pub fn to_wire(&self) -> String {
        let mut out = String::new();
        for (name, value) in &self.fields {
            push_group(&mut out, name, &value.tokens());
        }
        out
    }
}

impl FromStr for TelemetryRecord {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::decode_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn test_insert_replaces_in_place() {
        let mut record = TelemetryRecord::new();
        record.insert("rpm", FieldValue::Scalar(1000.0), []);
        record.insert("gear", FieldValue::Scalar(2.0), []);
        record.insert("rpm", FieldValue::Scalar(4000.0), []);

        assert_eq!(record.len(), 2);
        assert_eq!(record.scalar("rpm"), Some(4000.0));
        let names: Vec<&str> = record.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["rpm", "gear"]);
    }

    #[test]
    fn test_replacing_text_value_drops_its_coercion_error() {
        let mut record = TelemetryRecord::new();
        record.insert(
            "gear",
            FieldValue::Text(vec!["N".to_string()]),
            [ValueCoercionError {
                field: "gear".to_string(),
                token: "N".to_string(),
            }],
        );
        assert_eq!(record.coercion_errors().len(), 1);

        record.insert("gear", FieldValue::Scalar(1.0), []);
        assert!(record.coercion_errors().is_empty());
    }

    #[test]
    fn test_accessors_respect_shape() {
        let mut record = TelemetryRecord::new();
        record.insert("speedX", FieldValue::Scalar(12.5), []);
        record.insert("track", FieldValue::Sequence(vec![1.0, 2.0]), []);

        assert_eq!(record.sequence("speedX"), None);
        assert_eq!(record.scalar("track"), None);
        assert!(!record.contains("angle"));
    }

    #[test]
    fn test_to_wire_keeps_unknown_fields() -> TestResult {
        let record: TelemetryRecord = "(mystery 1.5)(label a b)(track 1 2.25)".parse()?;
        let again: TelemetryRecord = record.to_wire().parse()?;
        assert_eq!(record, again);
        assert_eq!(record.to_wire(), "(mystery 1.5)(label a b)(track 1 2.25)");
        Ok(())
    }

    #[test]
    fn test_display_joins_tokens() {
        assert_eq!(FieldValue::Sequence(vec![-90.0, 0.5]).to_string(), "-90 0.5");
        assert_eq!(FieldValue::Text(vec!["x".into(), "1".into()]).to_string(), "x 1");
    }
}
