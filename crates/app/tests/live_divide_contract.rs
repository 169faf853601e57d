//! Contract tests against a running divide service.
//!
//! The service is found through `API_URL`. These are ignored by default:
//!
//! ```text
//! API_URL=http://127.0.0.1:8000 cargo test -p divcheck --test live_divide_contract -- --ignored
//! ```
//!
//! Failures are raised, so any mismatch fails the test with the harness error.

use std::sync::Arc;

use divcheck_application::{FailurePolicy, Harness, HarnessConfig, HarnessError};
use divcheck_domain::divide;
use divcheck_infrastructure::ReqwestHttpClient;

fn live_harness() -> Result<(Harness<ReqwestHttpClient>, String), Box<dyn std::error::Error>> {
    let config = HarnessConfig::from_env()?.with_policy(FailurePolicy::Raise);
    let client = ReqwestHttpClient::new(config.timeout)?;
    Ok((Harness::new(Arc::new(client), config.policy), config.divide_endpoint()))
}

#[test]
#[ignore = "needs a running divide service at $API_URL"]
fn test_successful_division() -> Result<(), Box<dyn std::error::Error>> {
    let (harness, endpoint) = live_harness()?;
    harness.run(&divide::successful_division(&endpoint))?;
    Ok(())
}

#[test]
#[ignore = "needs a running divide service at $API_URL"]
fn test_division_by_zero_error() -> Result<(), Box<dyn std::error::Error>> {
    let (harness, endpoint) = live_harness()?;
    harness.run(&divide::division_by_zero(&endpoint))?;
    Ok(())
}

#[test]
#[ignore = "needs a running divide service at $API_URL"]
fn test_unsupported_method_is_raised() -> Result<(), Box<dyn std::error::Error>> {
    let (harness, endpoint) = live_harness()?;
    let case = divcheck_domain::TestCase::new(
        "put",
        endpoint,
        "PUT",
        divide::divide_payload(10, 2),
        200,
    );
    match harness.run(&case) {
        Err(HarnessError::UnsupportedMethod(method)) if method == "PUT" => Ok(()),
        other => Err(format!("expected unsupported method error, got {other:?}").into()),
    }
}
