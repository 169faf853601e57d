//! JSON case files.
//!
//! A case file is a JSON array of cases:
//!
//! ```json
//! [
//!   {
//!     "name": "successful division",
//!     "method": "POST",
//!     "payload": {"numerator": 10, "denominator": 2},
//!     "expect": {"status": 200, "field": {"key": "result", "value": 5.0}}
//!   }
//! ]
//! ```
//!
//! `url` may be omitted and defaults to the configured divide endpoint;
//! `method` defaults to POST.

use std::fs;
use std::path::{Path, PathBuf};

use divcheck_domain::{DomainError, Expectation, HttpMethod, Payload, TestCase};
use serde::Deserialize;
use thiserror::Error;

/// Errors loading a case file.
#[derive(Debug, Error)]
pub enum CaseFileError {
    /// The file could not be read.
    #[error("cannot read case file {path}: {source}")]
    Read {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The content is not a valid case list.
    #[error("invalid case file: {0}")]
    Parse(#[from] serde_json::Error),

    /// A case is malformed.
    #[error("case #{index}: {source}")]
    InvalidCase {
        /// Zero-based position in the file.
        index: usize,
        /// What is wrong with it.
        source: DomainError,
    },

    /// The file holds no cases.
    #[error("case file contains no cases")]
    Empty,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CaseEntry {
    name: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default = "default_method")]
    method: String,
    #[serde(default)]
    payload: Payload,
    expect: Expectation,
}

fn default_method() -> String {
    HttpMethod::Post.as_str().to_string()
}

impl CaseEntry {
    fn into_case(self, default_url: &str) -> TestCase {
        let url = self.url.unwrap_or_else(|| default_url.to_string());
        let case = TestCase::new(self.name, url, self.method, self.payload, self.expect.status);
        match self.expect.field {
            Some(field) => case.expecting_field(field.key, field.value),
            None => case,
        }
    }
}

/// Reads cases from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, if it is empty,
/// or if a case has a blank name.
pub fn load_cases(path: &Path, default_url: &str) -> Result<Vec<TestCase>, CaseFileError> {
    let content = fs::read_to_string(path).map_err(|source| CaseFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_cases(&content, default_url)
}

/// Parses cases from JSON text.
///
/// Unsupported methods are kept; the harness reports them when the case runs.
///
/// # Errors
///
/// Returns an error if the text is not a case list, if it is empty, or if
/// a case has a blank name.
pub fn parse_cases(json: &str, default_url: &str) -> Result<Vec<TestCase>, CaseFileError> {
    let entries: Vec<CaseEntry> = serde_json::from_str(json)?;
    if entries.is_empty() {
        return Err(CaseFileError::Empty);
    }

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let case = entry.into_case(default_url);
            case.validate()
                .map_err(|source| CaseFileError::InvalidCase { index, source })?;
            Ok(case)
        })
        .collect()
}
