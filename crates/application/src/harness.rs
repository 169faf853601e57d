//! The request/assert harness.
//!
//! Sends one request per [`TestCase`], logs every step, and checks the
//! response against the case's expectation. Cases run one after another on
//! the calling thread.

use std::sync::Arc;
use std::time::Instant;

use divcheck_domain::{CaseOutcome, ObservedResult, RunReport, TestCase};
use tracing::{error, info};

use crate::config::FailurePolicy;
use crate::error::{HarnessError, HarnessResult};
use crate::ports::HttpClient;

/// Runs test cases through an `HttpClient`.
///
/// # Example
///
/// ```ignore
/// let harness = Harness::new(Arc::new(ReqwestHttpClient::new(None)?), FailurePolicy::Raise);
/// let passed = harness.run(&divide::successful_division(&endpoint))?;
/// ```
pub struct Harness<C: HttpClient> {
    client: Arc<C>,
    policy: FailurePolicy,
}

impl<C: HttpClient> Harness<C> {
    /// Creates a harness over `client`.
    pub const fn new(client: Arc<C>, policy: FailurePolicy) -> Self {
        Self { client, policy }
    }

    /// Sends the case's request and checks the response.
    ///
    /// Logs the request, the status code, and either the JSON body or the
    /// raw text. Does not log the verdict; see [`Harness::run`].
    ///
    /// # Errors
    ///
    /// Returns the first failure: unsupported method (no request is sent),
    /// connection or transport error, or an assertion failure.
    pub fn execute(&self, case: &TestCase) -> HarnessResult<ObservedResult> {
        info!("Request URL: {}", case.url());
        info!("Request Method: {}", case.method());
        info!("Request Payload: {}", case.payload());

        let method = case
            .http_method()
            .map_err(|_| HarnessError::UnsupportedMethod(case.method().to_string()))?;

        let response = self
            .client
            .send(method, case.url(), case.payload())
            .map_err(|e| HarnessError::from_client(case.url(), e))?;

        info!("HTTP Status Code: {}", response.status);
        let observed = ObservedResult::from_raw(response.status, response.body);
        match &observed.body {
            Some(json) => info!("Full JSON Response: {json}"),
            None => info!("Response is not JSON: {}", observed.raw),
        }

        case.expectation()
            .check(&observed)
            .map_err(|failure| HarnessError::Assertion {
                status: observed.status,
                failure,
            })?;

        Ok(observed)
    }

    /// Runs one case and reports whether it passed.
    ///
    /// Under [`FailurePolicy::ReportAndContinue`] every failure is logged
    /// and becomes `Ok(false)`. Under [`FailurePolicy::Raise`] it is logged
    /// and returned.
    ///
    /// # Errors
    ///
    /// Only under [`FailurePolicy::Raise`], with the failure of the case.
    pub fn run(&self, case: &TestCase) -> HarnessResult<bool> {
        match self.attempt(case) {
            Ok(_) => Ok(true),
            Err(err) => match self.policy {
                FailurePolicy::ReportAndContinue => Ok(false),
                FailurePolicy::Raise => Err(err),
            },
        }
    }

    /// Runs one case and records its outcome. Never fails.
    pub fn evaluate(&self, case: &TestCase) -> CaseOutcome {
        let started = Instant::now();
        let result = self.attempt(case);
        outcome(case, &result, elapsed_ms(started))
    }

    /// Runs cases in order and summarizes them.
    ///
    /// # Errors
    ///
    /// Only under [`FailurePolicy::Raise`]: the first failure stops the
    /// batch and is returned.
    pub fn run_all(&self, cases: &[TestCase]) -> HarnessResult<RunReport> {
        let started = Instant::now();
        let mut outcomes = Vec::with_capacity(cases.len());

        for case in cases {
            let case_started = Instant::now();
            let result = self.attempt(case);
            let case_outcome = outcome(case, &result, elapsed_ms(case_started));

            if let (Err(err), FailurePolicy::Raise) = (result, self.policy) {
                return Err(err);
            }
            outcomes.push(case_outcome);
        }

        let report = RunReport::new(outcomes, elapsed_ms(started));
        info!(
            "Summary: {} passed, {} failed, {} total in {}ms",
            report.passed, report.failed, report.total, report.duration_ms
        );
        Ok(report)
    }

    /// Executes a case and logs its verdict.
    fn attempt(&self, case: &TestCase) -> HarnessResult<ObservedResult> {
        info!("Running test: {}", case.name());
        let result = self.execute(case);
        match &result {
            Ok(_) => info!("PASS: {}", case.name()),
            Err(err) => {
                log_failure(err);
                error!("FAIL: {}", case.name());
            }
        }
        result
    }
}

fn log_failure(err: &HarnessError) {
    match err {
        HarnessError::Connection { url, source } => {
            error!("Connection error: could not reach {url} ({source}). Is the service running?");
        }
        HarnessError::Assertion { failure, .. } => error!("Assertion failed: {failure}"),
        HarnessError::UnsupportedMethod(method) => {
            error!("Unsupported HTTP method: {method}");
        }
        HarnessError::Other(message) => error!("Unexpected error: {message}"),
    }
}

fn outcome(case: &TestCase, result: &HarnessResult<ObservedResult>, duration_ms: u64) -> CaseOutcome {
    match result {
        Ok(observed) => CaseOutcome::pass(case.name(), observed.status, duration_ms),
        Err(err) => CaseOutcome::fail(case.name(), err.status(), err.to_string(), duration_ms),
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
