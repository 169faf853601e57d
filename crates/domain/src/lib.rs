//! Divcheck Domain - Core types
//!
//! This crate defines the domain model for the divcheck harness:
//! test cases, expectations, observed results and the divide contract.
//! All types here are pure Rust with no I/O dependencies.

pub mod divide;
pub mod error;
pub mod request;
pub mod response;
pub mod testing;

pub use divide::{divide_endpoint, standard_cases};
pub use error::{DomainError, DomainResult};
pub use request::{HttpMethod, Payload};
pub use response::ObservedResult;
pub use testing::{
    AssertionFailure, CaseOutcome, Expectation, FieldExpectation, RunReport, TestCase,
};
