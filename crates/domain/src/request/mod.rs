//! Request-side types: the method and the numeric payload.

mod method;
mod payload;

pub use method::HttpMethod;
pub use payload::Payload;
