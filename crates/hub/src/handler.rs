//! Custom event handlers
//!
//! Every handler resolves through the same async [`EventHandler`] trait, so
//! the hub composes synchronous closures, async closures and user types the
//! same way.

use async_trait::async_trait;
use evhub_core::{Args, BoxError};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

/// Outcome of one handler invocation
pub type HandlerResult = Result<Value, BoxError>;

/// Trait for custom event handlers
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Handle one emission of the event this handler listens on
    async fn handle(&self, args: Args) -> HandlerResult;
}

#[async_trait]
impl<H: EventHandler + ?Sized> EventHandler for Arc<H> {
    async fn handle(&self, args: Args) -> HandlerResult {
        (**self).handle(args).await
    }
}

/// Handler backed by a synchronous closure
pub struct FnHandler<F>(F);

#[async_trait]
impl<F> EventHandler for FnHandler<F>
where
    F: Fn(Args) -> HandlerResult + Send + Sync,
{
    async fn handle(&self, args: Args) -> HandlerResult {
        (self.0)(args)
    }
}

/// Adapt a synchronous closure into an [`EventHandler`]
pub fn handler_fn<F>(f: F) -> FnHandler<F>
where
    F: Fn(Args) -> HandlerResult + Send + Sync,
{
    FnHandler(f)
}

/// Handler backed by a closure returning a future
pub struct AsyncFnHandler<F>(F);

#[async_trait]
impl<F, Fut> EventHandler for AsyncFnHandler<F>
where
    F: Fn(Args) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send,
{
    async fn handle(&self, args: Args) -> HandlerResult {
        (self.0)(args).await
    }
}

/// Adapt a future-returning closure into an [`EventHandler`]
pub fn async_handler_fn<F, Fut>(f: F) -> AsyncFnHandler<F>
where
    F: Fn(Args) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send,
{
    AsyncFnHandler(f)
}

/// Handler that runs a side-effecting callback and always succeeds
pub struct Wrapped<F>(F);

#[async_trait]
impl<F, R> EventHandler for Wrapped<F>
where
    F: Fn(Args) -> R + Send + Sync,
{
    async fn handle(&self, args: Args) -> HandlerResult {
        drop((self.0)(args));
        Ok(Value::Null)
    }
}

/// Wrap a synchronous callback so it resolves like any other handler. The
/// callback's return value is discarded and the handler resolves to `null`.
pub fn wrap<F, R>(f: F) -> Wrapped<F>
where
    F: Fn(Args) -> R + Send + Sync,
{
    Wrapped(f)
}

/// Handler that ignores its arguments and resolves to a fixed value
#[derive(Debug, Clone)]
pub struct Next(Value);

#[async_trait]
impl EventHandler for Next {
    async fn handle(&self, _args: Args) -> HandlerResult {
        Ok(self.0.clone())
    }
}

/// Build a handler that always resolves to `value`
pub fn next(value: Value) -> Next {
    Next(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_sync_handler() {
        let handler = handler_fn(|args| Ok(json!(args.len())));
        let result = handler.handle(vec![json!(1), json!(2)]).await.unwrap();
        assert_eq!(result, json!(2));
    }

    #[tokio::test]
    async fn test_async_handler() {
        let handler = async_handler_fn(|args: Args| async move {
            tokio::task::yield_now().await;
            Ok(args.into_iter().next().unwrap_or(Value::Null))
        });
        let result = handler.handle(vec![json!("first")]).await.unwrap();
        assert_eq!(result, json!("first"));
    }

    #[tokio::test]
    async fn test_wrap_discards_return_value() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let handler = wrap(move |_args| counter.fetch_add(1, Ordering::SeqCst));

        assert_eq!(handler.handle(vec![]).await.unwrap(), Value::Null);
        assert_eq!(handler.handle(vec![]).await.unwrap(), Value::Null);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_next_returns_fixed_value() {
        let handler = next(json!({ "ok": true }));
        let result = handler.handle(vec![json!("ignored")]).await.unwrap();
        assert_eq!(result, json!({ "ok": true }));
    }

    #[tokio::test]
    async fn test_shared_handler_delegates() {
        let shared: Arc<dyn EventHandler> = Arc::new(next(json!(7)));
        assert_eq!(shared.handle(vec![]).await.unwrap(), json!(7));
    }
}
