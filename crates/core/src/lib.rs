//! Core domain types, errors, and constants for `evhub`.
//!
//! ## Key Components
//!
//! - **`errors`**: Defines `HubError` and the `Result` alias shared by every
//!   hub operation.
//! - **`types`**: Validated `EventName`, the `Args` carried by an emission and
//!   the `DispatchResult` it resolves to.
//! - **`constants`**: Environment variable names and defaults.

pub mod constants;
pub mod errors;
pub mod types;

pub use self::{
    constants::*,
    errors::{BoxError, HubError, Result, SharedError},
    types::*,
};
