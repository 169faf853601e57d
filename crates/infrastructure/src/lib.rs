//! Divcheck Infrastructure - Adapters and implementations
//!
//! This crate provides the concrete pieces around the harness:
//! the reqwest HTTP adapter, the console and file log session, and the
//! JSON case-file loader.

pub mod adapters;
pub mod logging;
pub mod persistence;

pub use adapters::ReqwestHttpClient;
pub use logging::{LogSession, LoggingError};
pub use persistence::{CaseFileError, load_cases, parse_cases};
