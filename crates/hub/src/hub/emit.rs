//! Emission of logical events

use super::Hub;
use evhub_core::{Args, DispatchResult, HubError, Result};
use evhub_utils::dispatch_span;
use futures::future::join_all;
use tracing::{debug, error, Instrument};

impl Hub {
    /// Invoke every handler registered for `logical` and wait for all of them.
    ///
    /// Handlers are started in registration order against a snapshot of the
    /// listener list, so listens and unlistens made while handlers run only
    /// affect later emissions. Every handler is awaited even when one fails.
    /// On success the result carries `args` and one value per handler, in
    /// registration order. On failure the first failing handler (by
    /// registration order) becomes a [`HubError::Handler`], which is passed
    /// to the uncaught handler once and returned.
    pub async fn emit(&self, logical: &str, args: Args) -> Result<DispatchResult> {
        let handlers = self.inner.snapshot(logical);
        if handlers.is_empty() {
            if self.inner.config.trace_dispatch {
                debug!(event = %logical, "Emitted with no listeners");
            }
            return Ok(DispatchResult::unheard(args));
        }

        let span = dispatch_span(&self.inner.config.label, logical, handlers.len());
        let pending: Vec<_> = handlers
            .iter()
            .map(|record| record.invoke_deferred(args.clone()))
            .collect();
        let outcomes = join_all(pending).instrument(span).await;

        let mut results = Vec::with_capacity(outcomes.len());
        let mut failure = None;
        for (index, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Ok(value) => results.push(value),
                Err(source) if failure.is_none() => {
                    failure = Some(HubError::handler(logical, index, source));
                }
                Err(_) => {}
            }
        }

        match failure {
            None => {
                if self.inner.config.trace_dispatch {
                    debug!(event = %logical, handlers = results.len(), "Emit resolved");
                }
                Ok(DispatchResult::new(args, results))
            }
            Some(err) => {
                error!(hub = %self.inner.config.label, event = %logical, error = %err, "Event handler failed");
                self.inner.report_uncaught(&err);
                Err(err)
            }
        }
    }
}
