//! Error types for hub operations

mod builders;
mod types;

pub use types::{BoxError, HubError, Result, SharedError};
