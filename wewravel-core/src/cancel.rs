//! Every request issued on behalf of a view is bound to that view's
//! [`CancellationToken`]. Dropping out of a view cancels the token and any
//! outstanding request resolves to [`CancelAware::Cancelled`] instead of
//! writing into state that no longer exists.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::{CoreError, CoreResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelAware<T> {
    Value(T),
    Cancelled,
}

pub async fn await_or_cancel<T, F>(token: &CancellationToken, fut: F) -> CancelAware<T>
where
    F: Future<Output = T>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => CancelAware::Cancelled,
        value = fut => CancelAware::Value(value),
    }
}

/// Runs a fallible request under `token`, folding cancellation into
/// [`CoreError::Cancelled`]. An already-cancelled token never polls `fut`.
pub async fn guarded<T, F>(token: &CancellationToken, fut: F) -> CoreResult<T>
where
    F: Future<Output = CoreResult<T>>,
{
    if token.is_cancelled() {
        return Err(CoreError::Cancelled);
    }
    match await_or_cancel(token, fut).await {
        CancelAware::Value(result) => result,
        CancelAware::Cancelled => Err(CoreError::Cancelled),
    }
}
