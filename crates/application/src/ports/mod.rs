//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the harness and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod http_client;

pub use http_client::{HttpClient, HttpClientError, RawResponse};
