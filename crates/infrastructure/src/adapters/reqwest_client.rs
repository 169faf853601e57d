//! HTTP Client implementation using reqwest.
//!
//! This adapter implements the `HttpClient` port with the blocking reqwest
//! client. Each call sends exactly one request; nothing is retried.

use std::error::Error as _;
use std::io;
use std::time::Duration;

use divcheck_application::ports::{HttpClient, HttpClientError, RawResponse};
use divcheck_domain::{HttpMethod, Payload};
use reqwest::Url;
use reqwest::blocking::{Client, RequestBuilder};

/// Blocking HTTP client implementation using reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Client,
    timeout: Option<Duration>,
}

impl ReqwestHttpClient {
    /// Creates a new HTTP client.
    ///
    /// Configuration:
    /// - Timeout: `timeout`, or none at all when `None`
    /// - Follow redirects: up to 10
    /// - User-Agent: "divcheck/<version>"
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new(timeout: Option<Duration>) -> Result<Self, HttpClientError> {
        let client = Client::builder()
            .user_agent(concat!("divcheck/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(10))
            .timeout(timeout)
            .build()
            .map_err(|e| HttpClientError::Other(e.to_string()))?;

        Ok(Self { client, timeout })
    }

    /// Attaches the payload the way the method expects it.
    fn build_request(&self, method: HttpMethod, url: Url, payload: &Payload) -> RequestBuilder {
        match method {
            HttpMethod::Post => self.client.post(url).json(payload),
            HttpMethod::Get => {
                let mut url = url;
                if !payload.is_empty() {
                    url.query_pairs_mut().extend_pairs(payload.to_query_pairs());
                }
                self.client.get(url)
            }
        }
    }

    /// Maps reqwest errors to port `HttpClientError`.
    fn map_error(&self, error: &reqwest::Error) -> HttpClientError {
        let host = || {
            error
                .url()
                .and_then(Url::host_str)
                .unwrap_or("unknown")
                .to_string()
        };
        let port = || {
            error
                .url()
                .and_then(Url::port_or_known_default)
                .unwrap_or(80)
        };

        if error.is_connect() && error.is_timeout() {
            return HttpClientError::ConnectionFailed(format!(
                "timed out connecting to {}: {}",
                host(),
                error_chain(error)
            ));
        }

        // Resets and aborts can surface after the connection was established.
        match io_error_kind(error) {
            Some(io::ErrorKind::ConnectionRefused) => {
                return HttpClientError::ConnectionRefused {
                    host: host(),
                    port: port(),
                };
            }
            Some(
                io::ErrorKind::ConnectionReset
                | io::ErrorKind::ConnectionAborted
                | io::ErrorKind::BrokenPipe,
            ) => {
                return HttpClientError::ConnectionFailed(error_chain(error));
            }
            _ => {}
        }

        if error.is_timeout() {
            let timeout_ms = self
                .timeout
                .map_or(0, |t| u64::try_from(t.as_millis()).unwrap_or(u64::MAX));
            return HttpClientError::Timeout { timeout_ms };
        }

        if error.is_connect() {
            let message = error_chain(error);
            let lower = message.to_lowercase();

            if lower.contains("dns") || lower.contains("resolve") {
                return HttpClientError::DnsError {
                    host: host(),
                    message,
                };
            }
            if lower.contains("refused") {
                return HttpClientError::ConnectionRefused {
                    host: host(),
                    port: port(),
                };
            }
            return HttpClientError::ConnectionFailed(message);
        }

        let message = error_chain(error);
        if message.contains("connection closed before message completed") {
            return HttpClientError::ConnectionFailed(message);
        }

        if error.is_redirect() {
            return HttpClientError::Other("too many redirects (max 10)".to_string());
        }

        HttpClientError::Other(message)
    }
}

/// Finds the first I/O error in the source chain.
fn io_error_kind(error: &reqwest::Error) -> Option<io::ErrorKind> {
    let mut source = error.source();
    while let Some(cause) = source {
        if let Some(io_error) = cause.downcast_ref::<io::Error>() {
            return Some(io_error.kind());
        }
        source = cause.source();
    }
    None
}

/// Joins an error and all of its sources into one line.
fn error_chain(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

impl HttpClient for ReqwestHttpClient {
    fn send(
        &self,
        method: HttpMethod,
        url: &str,
        payload: &Payload,
    ) -> Result<RawResponse, HttpClientError> {
        let parsed_url =
            Url::parse(url).map_err(|e| HttpClientError::InvalidUrl(format!("{e}: {url}")))?;

        let response = self
            .build_request(method, parsed_url, payload)
            .send()
            .map_err(|e| self.map_error(&e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| HttpClientError::Other(format!("Failed to read body: {e}")))?;

        Ok(RawResponse { status, body })
    }
}
