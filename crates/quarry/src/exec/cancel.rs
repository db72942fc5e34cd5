use crate::Result;

use quarry_core::Error;

use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Runs `fut`, resolving to `Error::cancelled()` if `token` fires first.
///
/// Dropping `fut` on cancellation runs the same cleanup as any other early
/// exit.
pub(crate) async fn cancelable<T>(
    token: Option<&CancellationToken>,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    let Some(token) = token else {
        return fut.await;
    };

    tokio::select! {
        biased;
        _ = token.cancelled() => Err(Error::cancelled()),
        res = fut => res,
    }
}
