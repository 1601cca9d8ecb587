pub mod domain;
pub mod enums;
pub mod error;
pub mod keys;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use domain::{DomainPolicy, ParameterDomain, ParameterRange};
pub use enums::{Column, Status};
pub use error::CoreError;
pub use keys::{GroupKey, KeyValue, OrderedF64};
pub use structs::Record;
