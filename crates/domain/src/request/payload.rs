//! Numeric request payload

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::error::{DomainError, DomainResult};

/// A mapping of field names to numbers.
///
/// Sent as a JSON object for POST and as query parameters for GET.
/// Fields keep the order they were added in, on the wire and in logs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(IndexMap<String, Number>);

impl Payload {
    /// Creates an empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an integer or float field (builder pattern).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Number>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Adds a float field, rejecting NaN and infinities.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPayloadValue` if `value` is not finite.
    pub fn with_f64(mut self, key: impl Into<String>, value: f64) -> DomainResult<Self> {
        let key = key.into();
        let number = Number::from_f64(value).ok_or_else(|| DomainError::InvalidPayloadValue {
            key: key.clone(),
            value: value.to_string(),
        })?;
        self.0.insert(key, number);
        Ok(self)
    }

    /// Returns the value of a field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Number> {
        self.0.get(key)
    }

    /// Returns true if the payload has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Renders the fields as query string pairs.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|(k, v)| (k.clone(), v.to_string()))
            .collect()
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "\"{key}\": {value}")?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_payload_serializes_as_json_object() {
        let payload = Payload::new().with("numerator", 10).with("denominator", 2);
        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(json, r#"{"numerator":10,"denominator":2}"#);
    }

    #[test]
    fn test_payload_display() {
        let payload = Payload::new().with("numerator", 10).with("denominator", 0);
        assert_eq!(payload.to_string(), r#"{"numerator": 10, "denominator": 0}"#);
        assert_eq!(Payload::new().to_string(), "{}");
    }

    #[test]
    fn test_query_pairs() {
        let payload = Payload::new()
            .with("numerator", 7)
            .with_f64("denominator", 0.5)
            .unwrap();
        assert_eq!(
            payload.to_query_pairs(),
            vec![
                ("numerator".to_string(), "7".to_string()),
                ("denominator".to_string(), "0.5".to_string()),
            ]
        );
    }

    #[test]
    fn test_deserialized_order_is_kept() {
        let payload: Payload = serde_json::from_str(r#"{"numerator": 1, "denominator": 3}"#).unwrap();
        assert_eq!(payload.to_string(), r#"{"numerator": 1, "denominator": 3}"#);
    }

    #[test]
    fn test_non_finite_rejected() {
        let err = Payload::new().with_f64("numerator", f64::NAN).unwrap_err();
        assert!(matches!(err, DomainError::InvalidPayloadValue { ref key, .. } if key == "numerator"));
    }

    #[test]
    fn test_payload_rejects_non_numbers() {
        let result = serde_json::from_str::<Payload>(r#"{"numerator": "ten"}"#);
        assert!(result.is_err());
    }
}
