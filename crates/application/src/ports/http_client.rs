//! HTTP Client port

use divcheck_domain::{HttpMethod, Payload};
use thiserror::Error;

/// Status and body text of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body decoded as text
    pub body: String,
}

impl RawResponse {
    /// Creates a raw response.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Errors raised by an `HttpClient` before a response is available.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpClientError {
    /// The request did not finish within the configured timeout.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// Timeout that elapsed.
        timeout_ms: u64,
    },

    /// The host actively refused the connection.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// The host name could not be resolved.
    #[error("could not resolve {host}: {message}")]
    DnsError {
        /// Target host.
        host: String,
        /// Resolver message.
        message: String,
    },

    /// Any other failure to establish a connection.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The target URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Anything else, such as a body that could not be read.
    #[error("{0}")]
    Other(String),
}

impl HttpClientError {
    /// Returns true when the target service could not be reached at all.
    #[must_use]
    pub const fn is_unreachable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionRefused { .. } | Self::DnsError { .. } | Self::ConnectionFailed(_)
        )
    }
}

/// Port for sending one blocking HTTP request.
///
/// This trait abstracts the HTTP client implementation, allowing
/// the harness to be tested without a network.
pub trait HttpClient: Send + Sync {
    /// Sends `payload` to `url`: as a JSON body for POST, as query
    /// parameters for GET.
    ///
    /// # Errors
    ///
    /// Returns an error if no response could be obtained. Any status code,
    /// including 4xx and 5xx, is a successful exchange.
    fn send(
        &self,
        method: HttpMethod,
        url: &str,
        payload: &Payload,
    ) -> Result<RawResponse, HttpClientError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreachable_kinds() {
        assert!(
            HttpClientError::ConnectionRefused {
                host: "127.0.0.1".to_string(),
                port: 8000,
            }
            .is_unreachable()
        );
        assert!(HttpClientError::ConnectionFailed("reset".to_string()).is_unreachable());
        assert!(!HttpClientError::Timeout { timeout_ms: 10 }.is_unreachable());
        assert!(!HttpClientError::Other("body".to_string()).is_unreachable());
    }
}
