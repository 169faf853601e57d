//! Test cases, expectations and their results.
//!
//! A [`TestCase`] pairs one request with one [`Expectation`]. Checking an
//! expectation against an [`ObservedResult`] is pure and needs no network.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use thiserror::Error;

use crate::error::{DomainError, DomainResult};
use crate::request::{HttpMethod, Payload};
use crate::response::ObservedResult;

/// One fully-specified request/expectation pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    name: String,
    url: String,
    method: String,
    #[serde(default)]
    payload: Payload,
    expect: Expectation,
}

impl TestCase {
    /// Creates a case expecting only a status code.
    ///
    /// The method is kept as given; it is resolved by [`TestCase::http_method`]
    /// when the case runs.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        method: impl Into<String>,
        payload: Payload,
        expected_status: u16,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            method: method.into(),
            payload,
            expect: Expectation::status(expected_status),
        }
    }

    /// Adds an expected top-level body field (builder pattern).
    #[must_use]
    pub fn expecting_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.expect = self.expect.with_field(key, value);
        self
    }

    /// Case name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Target URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Method as declared.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Request payload.
    #[must_use]
    pub const fn payload(&self) -> &Payload {
        &self.payload
    }

    /// What the response must look like.
    #[must_use]
    pub const fn expectation(&self) -> &Expectation {
        &self.expect
    }

    /// Resolves the declared method.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnsupportedMethod` for anything but GET or POST.
    pub fn http_method(&self) -> DomainResult<HttpMethod> {
        self.method.parse()
    }

    /// Checks the case is well formed.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EmptyCaseName` if the name is blank.
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::EmptyCaseName);
        }
        Ok(())
    }
}

/// Expected status plus zero or one expected body field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expectation {
    /// Expected HTTP status code.
    pub status: u16,
    /// Optional single-field equality check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<FieldExpectation>,
}

/// A key that must be present in the JSON body with exactly this value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldExpectation {
    /// Top-level key in the response object.
    pub key: String,
    /// Expected value. Numbers compare by value (`5` equals `5.0`); other
    /// types are never coerced.
    pub value: Value,
}

impl Expectation {
    /// Expect a status code and nothing else.
    #[must_use]
    pub const fn status(status: u16) -> Self {
        Self {
            status,
            field: None,
        }
    }

    /// Also expect a body field (builder pattern).
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.field = Some(FieldExpectation {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    /// Checks an observed result against this expectation.
    ///
    /// The status is checked first, then the field.
    ///
    /// # Errors
    ///
    /// Returns the first [`AssertionFailure`] found.
    pub fn check(&self, observed: &ObservedResult) -> Result<(), AssertionFailure> {
        if observed.status != self.status {
            return Err(AssertionFailure::StatusMismatch {
                expected: self.status,
                actual: observed.status,
            });
        }

        let Some(field) = &self.field else {
            return Ok(());
        };

        if !observed.is_json() {
            return Err(AssertionFailure::NotJson {
                key: field.key.clone(),
            });
        }

        match observed.field(&field.key) {
            None => Err(AssertionFailure::MissingKey {
                key: field.key.clone(),
            }),
            Some(actual) if values_match(&field.value, actual) => Ok(()),
            Some(actual) => Err(AssertionFailure::ValueMismatch {
                key: field.key.clone(),
                expected: field.value.clone(),
                actual: actual.clone(),
            }),
        }
    }
}

/// JSON equality where numbers compare by value, recursively.
fn values_match(expected: &Value, actual: &Value) -> bool {
    match (expected, actual) {
        (Value::Number(e), Value::Number(a)) => numbers_match(e, a),
        (Value::Array(e), Value::Array(a)) => {
            e.len() == a.len() && e.iter().zip(a).all(|(e, a)| values_match(e, a))
        }
        (Value::Object(e), Value::Object(a)) => {
            e.len() == a.len()
                && e.iter()
                    .all(|(key, e)| a.get(key).is_some_and(|a| values_match(e, a)))
        }
        _ => expected == actual,
    }
}

#[allow(clippy::float_cmp)]
fn numbers_match(expected: &Number, actual: &Number) -> bool {
    if let (Some(e), Some(a)) = (expected.as_i64(), actual.as_i64()) {
        return e == a;
    }
    if let (Some(e), Some(a)) = (expected.as_u64(), actual.as_u64()) {
        return e == a;
    }
    match (expected.as_f64(), actual.as_f64()) {
        (Some(e), Some(a)) => e == a,
        _ => false,
    }
}

/// An observed value disagreed with the expected one.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssertionFailure {
    /// Wrong status code.
    #[error("expected status {expected}, got {actual}")]
    StatusMismatch {
        /// Expected status.
        expected: u16,
        /// Observed status.
        actual: u16,
    },

    /// A field was expected but the body is not JSON.
    #[error("expected key '{key}' but the response is not JSON")]
    NotJson {
        /// Expected key.
        key: String,
    },

    /// The JSON body lacks the expected key.
    #[error("expected key '{key}' not found in response")]
    MissingKey {
        /// Expected key.
        key: String,
    },

    /// The key is present with a different value.
    #[error("expected {key}: {expected}, got {actual}")]
    ValueMismatch {
        /// Expected key.
        key: String,
        /// Expected value.
        expected: Value,
        /// Observed value.
        actual: Value,
    },
}

/// Result of running a single test case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseOutcome {
    /// Case name.
    pub name: String,
    /// Whether every assertion passed.
    pub passed: bool,
    /// Observed status, if a response was received.
    pub status: Option<u16>,
    /// Failure message if failed.
    pub error: Option<String>,
    /// Wall time for the case in milliseconds.
    pub duration_ms: u64,
}

impl CaseOutcome {
    /// Create a passed outcome.
    #[must_use]
    pub fn pass(name: impl Into<String>, status: u16, duration_ms: u64) -> Self {
        Self {
            name: name.into(),
            passed: true,
            status: Some(status),
            error: None,
            duration_ms,
        }
    }

    /// Create a failed outcome.
    #[must_use]
    pub fn fail(
        name: impl Into<String>,
        status: Option<u16>,
        error: impl Into<String>,
        duration_ms: u64,
    ) -> Self {
        Self {
            name: name.into(),
            passed: false,
            status,
            error: Some(error.into()),
            duration_ms,
        }
    }
}

/// Results from running a batch of cases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Per-case outcomes in run order.
    pub outcomes: Vec<CaseOutcome>,
    /// Total number of cases.
    pub total: usize,
    /// Number of passed cases.
    pub passed: usize,
    /// Number of failed cases.
    pub failed: usize,
    /// Execution time in milliseconds.
    pub duration_ms: u64,
}

impl RunReport {
    /// Create a report from outcomes.
    #[must_use]
    pub fn new(outcomes: Vec<CaseOutcome>, duration_ms: u64) -> Self {
        let total = outcomes.len();
        let passed = outcomes.iter().filter(|o| o.passed).count();
        let failed = total - passed;

        Self {
            outcomes,
            total,
            passed,
            failed,
            duration_ms,
        }
    }

    /// Check if all cases passed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Outcomes that failed.
    pub fn failures(&self) -> impl Iterator<Item = &CaseOutcome> {
        self.outcomes.iter().filter(|o| !o.passed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn case() -> TestCase {
        TestCase::new(
            "division",
            "http://localhost/divide",
            "POST",
            Payload::new().with("numerator", 10).with("denominator", 2),
            200,
        )
        .expecting_field("result", 5.0)
    }

    #[test]
    fn test_check_passes() {
        let observed = ObservedResult::from_raw(200, r#"{"result": 5.0}"#);
        assert_eq!(case().expectation().check(&observed), Ok(()));
    }

    #[test]
    fn test_status_checked_before_field() {
        let observed = ObservedResult::from_raw(500, r#"{"result": 1.0}"#);
        assert_eq!(
            case().expectation().check(&observed),
            Err(AssertionFailure::StatusMismatch {
                expected: 200,
                actual: 500
            })
        );
    }

    #[test]
    fn test_missing_key() {
        let observed = ObservedResult::from_raw(200, r#"{"value": 5.0}"#);
        assert_eq!(
            case().expectation().check(&observed),
            Err(AssertionFailure::MissingKey {
                key: "result".to_string()
            })
        );
    }

    #[test]
    fn test_value_mismatch() {
        let observed = ObservedResult::from_raw(200, r#"{"result": 4.0}"#);
        let err = case().expectation().check(&observed).unwrap_err();
        assert_eq!(err.to_string(), "expected result: 5.0, got 4.0");
    }

    #[test]
    fn test_whole_number_matches_float() {
        let observed = ObservedResult::from_raw(200, r#"{"result": 5}"#);
        assert_eq!(case().expectation().check(&observed), Ok(()));

        let expectation = Expectation::status(200).with_field("count", 2);
        let observed = ObservedResult::from_raw(200, r#"{"count": 2.0}"#);
        assert_eq!(expectation.check(&observed), Ok(()));
    }

    #[test]
    fn test_numbers_compare_by_value_when_nested() {
        let expectation = Expectation::status(200).with_field("values", json!([1, {"x": 2}]));
        let same = ObservedResult::from_raw(200, r#"{"values": [1.0, {"x": 2.0}]}"#);
        let different = ObservedResult::from_raw(200, r#"{"values": [1.0, {"x": 2.5}]}"#);
        assert_eq!(expectation.check(&same), Ok(()));
        assert!(expectation.check(&different).is_err());
    }

    #[test]
    fn test_comparison_does_not_coerce() {
        let observed = ObservedResult::from_raw(200, r#"{"result": "5.0"}"#);
        assert!(matches!(
            case().expectation().check(&observed),
            Err(AssertionFailure::ValueMismatch { .. })
        ));
    }

    #[test]
    fn test_field_expected_but_not_json() {
        let observed = ObservedResult::from_raw(200, "5.0 exactly");
        assert_eq!(
            case().expectation().check(&observed),
            Err(AssertionFailure::NotJson {
                key: "result".to_string()
            })
        );
    }

    #[test]
    fn test_status_only_ignores_non_json_body() {
        let expectation = Expectation::status(200);
        let observed = ObservedResult::from_raw(200, "plain text");
        assert_eq!(expectation.check(&observed), Ok(()));
    }

    #[test]
    fn test_case_deserializes_from_json() {
        let case: TestCase = serde_json::from_value(json!({
            "name": "division by zero",
            "url": "http://localhost/divide",
            "method": "post",
            "payload": {"numerator": 10, "denominator": 0},
            "expect": {
                "status": 400,
                "field": {"key": "detail", "value": "Division by zero is not permitted."}
            }
        }))
        .unwrap();

        assert_eq!(case.http_method().unwrap(), HttpMethod::Post);
        assert_eq!(
            case.payload().get("denominator"),
            Some(&serde_json::Number::from(0))
        );
        assert_eq!(case.expectation().status, 400);
    }

    #[test]
    fn test_unsupported_method_resolved_lazily() {
        let case = TestCase::new("put", "http://localhost", "PUT", Payload::new(), 200);
        assert_eq!(
            case.http_method(),
            Err(DomainError::UnsupportedMethod("PUT".to_string()))
        );
    }

    #[test]
    fn test_blank_name_invalid() {
        let case = TestCase::new("  ", "http://localhost", "GET", Payload::new(), 200);
        assert_eq!(case.validate(), Err(DomainError::EmptyCaseName));
    }

    #[test]
    fn test_run_report_counts() {
        let report = RunReport::new(
            vec![
                CaseOutcome::pass("a", 200, 3),
                CaseOutcome::fail("b", Some(500), "expected status 200, got 500", 4),
                CaseOutcome::fail("c", None, "connection refused", 1),
            ],
            8,
        );
        assert_eq!(report.total, 3);
        assert_eq!(report.passed, 1);
        assert_eq!(report.failed, 2);
        assert!(!report.all_passed());
        assert_eq!(report.failures().count(), 2);
    }

    #[test]
    fn test_empty_report_passes() {
        assert!(RunReport::new(Vec::new(), 0).all_passed());
    }
}
