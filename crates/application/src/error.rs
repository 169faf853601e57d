//! Application error types

use divcheck_domain::AssertionFailure;
use thiserror::Error;

use crate::ports::HttpClientError;

/// Why a test case failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HarnessError {
    /// The target service could not be reached.
    #[error("could not reach {url} ({source}); is the service running?")]
    Connection {
        /// Target URL.
        url: String,
        /// Underlying client error.
        source: HttpClientError,
    },

    /// An observed value disagreed with the expected one.
    #[error("assertion failed: {failure}")]
    Assertion {
        /// Status code of the response that failed.
        status: u16,
        /// What disagreed.
        failure: AssertionFailure,
    },

    /// The case declares a method other than GET or POST.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// Any other failure, such as a timeout or an unreadable body.
    #[error("unexpected error: {0}")]
    Other(String),
}

impl HarnessError {
    /// Maps a client error for `url` to the harness error kind.
    #[must_use]
    pub fn from_client(url: &str, source: HttpClientError) -> Self {
        if source.is_unreachable() {
            Self::Connection {
                url: url.to_string(),
                source,
            }
        } else {
            Self::Other(source.to_string())
        }
    }

    /// Status code of the response, when one was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Assertion { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for harness operations.
pub type HarnessResult<T> = Result<T, HarnessError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_refused_maps_to_connection() {
        let err = HarnessError::from_client(
            "http://127.0.0.1:9/divide",
            HttpClientError::ConnectionRefused {
                host: "127.0.0.1".to_string(),
                port: 9,
            },
        );
        assert!(matches!(err, HarnessError::Connection { .. }));
        assert!(err.to_string().contains("is the service running?"));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_timeout_maps_to_other() {
        let err = HarnessError::from_client(
            "http://127.0.0.1:9/divide",
            HttpClientError::Timeout { timeout_ms: 50 },
        );
        assert_eq!(
            err,
            HarnessError::Other("request timed out after 50ms".to_string())
        );
    }

    #[test]
    fn test_assertion_carries_status() {
        let err = HarnessError::Assertion {
            status: 500,
            failure: AssertionFailure::StatusMismatch {
                expected: 200,
                actual: 500,
            },
        };
        assert_eq!(err.status(), Some(500));
        assert_eq!(
            err.to_string(),
            "assertion failed: expected status 200, got 500"
        );
    }
}
