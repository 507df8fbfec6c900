use evhub_core::constants::{DEFAULT_LOG_FILTER, EVHUB_LOG_VAR};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Re-export tracing macros for convenience
pub use tracing::{debug, error, info, instrument, span, trace, warn, Level, Span};

/// Initialize the tracing system
///
/// The filter is read from `EVHUB_LOG`, then `RUST_LOG`, and falls back to
/// `info`. Records go to stderr through a compact formatter. Calling this
/// more than once returns an error instead of replacing the subscriber.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let filter = EnvFilter::try_from_env(EVHUB_LOG_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))?;

    install(filter)
}

/// Initialize the tracing system with an explicit filter directive
pub fn init_with_filter(
    directive: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    install(EnvFilter::try_new(directive)?)
}

fn install(filter: EnvFilter) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(is_tty())
        .compact()
        .with_target(true)
        .with_thread_ids(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Check if we're running in a TTY environment
fn is_tty() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stderr())
}

/// Create a span covering one emission of `event` on the hub labelled `hub`
pub fn dispatch_span(hub: &str, event: &str, handlers: usize) -> Span {
    span!(Level::DEBUG, "dispatch", hub = %hub, event = %event, handlers = handlers)
}

/// Create a span covering a registry mutation such as bind or rename
pub fn registry_span(hub: &str, operation: &'static str, event: &str) -> Span {
    span!(Level::TRACE, "registry", hub = %hub, operation = operation, event = %event)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_directive_is_an_error() {
        assert!(init_with_filter("evhub=loudest").is_err());
    }

    #[test]
    fn test_second_init_is_an_error() {
        let _ = init_with_filter("debug");
        assert!(init_with_filter("debug").is_err());
    }

    #[test]
    fn test_spans_can_be_entered_without_subscriber() {
        let span = dispatch_span("evhub", "ready", 2);
        let _guard = span.enter();
        let span = registry_span("evhub", "bind", "ready");
        let _guard = span.enter();
    }
}
