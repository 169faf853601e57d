//! Divcheck Application - Harness and ports
//!
//! This crate defines the application layer with:
//! - The `HttpClient` port
//! - The request/assert `Harness`
//! - Configuration and harness-level error handling

pub mod config;
pub mod error;
pub mod harness;
pub mod ports;

pub use config::{ConfigError, FailurePolicy, HarnessConfig};
pub use error::{HarnessError, HarnessResult};
pub use harness::Harness;
pub use ports::{HttpClient, HttpClientError, RawResponse};
