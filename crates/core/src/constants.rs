/// Constants used throughout the evhub codebase
// Environment variable names
pub const EVHUB_LOG_VAR: &str = "EVHUB_LOG";
pub const EVHUB_LABEL_VAR: &str = "EVHUB_LABEL";
pub const EVHUB_MAX_LISTENERS_VAR: &str = "EVHUB_MAX_LISTENERS";
pub const EVHUB_TRACE_DISPATCH_VAR: &str = "EVHUB_TRACE_DISPATCH";

// Hub defaults
pub const DEFAULT_HUB_LABEL: &str = "evhub";
pub const DEFAULT_MAX_LISTENERS: usize = 32;

// Log filter used when no environment filter is set
pub const DEFAULT_LOG_FILTER: &str = "info";
