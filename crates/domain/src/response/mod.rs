//! Response-side types.

mod observed;

pub use observed::ObservedResult;
