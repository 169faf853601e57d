//! File-backed inputs.

mod case_file;

pub use case_file::{CaseFileError, load_cases, parse_cases};
