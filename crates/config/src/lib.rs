//! Configuration for evhub hubs
//!
//! This crate defines `HubConfig` and the loaders that build it from JSON or
//! from `EVHUB_*` environment variables.

pub mod config;
pub mod loader;


pub use config::HubConfig;
pub use loader::ConfigError;
