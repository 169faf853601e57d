//! The divide service contract.
//!
//! `POST {base}/divide` with `{"numerator": n, "denominator": d}` answers
//! `200 {"result": n / d}`, or `400 {"detail": ...}` when `d` is zero.

use crate::request::{HttpMethod, Payload};
use crate::testing::TestCase;

/// Path of the divide endpoint, relative to the service base URL.
pub const DIVIDE_PATH: &str = "/divide";

/// Detail message returned for a zero denominator.
pub const DIVISION_BY_ZERO_DETAIL: &str = "Division by zero is not permitted.";

/// Joins a base URL and the divide path, tolerating a trailing slash.
#[must_use]
pub fn divide_endpoint(base_url: &str) -> String {
    format!("{}{DIVIDE_PATH}", base_url.trim_end_matches('/'))
}

/// Builds a divide request payload.
#[must_use]
pub fn divide_payload(numerator: i64, denominator: i64) -> Payload {
    Payload::new()
        .with("numerator", numerator)
        .with("denominator", denominator)
}

/// `10 / 2` must succeed with `result == 5.0`.
#[must_use]
pub fn successful_division(endpoint: &str) -> TestCase {
    TestCase::new(
        "successful division",
        endpoint,
        HttpMethod::Post.as_str(),
        divide_payload(10, 2),
        200,
    )
    .expecting_field("result", 5.0)
}

/// `10 / 0` must be rejected with a 400 and the division-by-zero detail.
#[must_use]
pub fn division_by_zero(endpoint: &str) -> TestCase {
    TestCase::new(
        "division by zero",
        endpoint,
        HttpMethod::Post.as_str(),
        divide_payload(10, 0),
        400,
    )
    .expecting_field("detail", DIVISION_BY_ZERO_DETAIL)
}

/// The two canonical cases, in run order.
#[must_use]
pub fn standard_cases(endpoint: &str) -> Vec<TestCase> {
    vec![successful_division(endpoint), division_by_zero(endpoint)]
}
