//! Download stream: one GET with byte-level progress.

use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::callbacks::DownloadCallbacks;
use crate::handle::{TransferHandle, TransferOutcome};
use crate::{BlobFetcher, StoreResponse, TransferError};

/// Upper bound for preallocating the body from an announced length.
const MAX_PREALLOCATION: u64 = 64 * 1024 * 1024;

/// Starts downloading from `fetcher` on a new tokio task.
///
/// # Panics
///
/// Panics when called outside a tokio runtime.
pub fn start_download<F>(fetcher: F, callbacks: DownloadCallbacks) -> TransferHandle
where
    F: BlobFetcher + 'static,
{
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    TransferHandle::spawn(cancel, async move {
        run_download(&fetcher, token, callbacks).await
    })
}

/// Runs a download to completion on the current task.
///
/// Cancellation drops the in-flight request and fires `on_cancelled`.
/// Progress is only reported when the server announces the body size.
pub async fn run_download<F>(
    fetcher: &F,
    cancel: CancellationToken,
    mut callbacks: DownloadCallbacks,
) -> TransferOutcome
where
    F: BlobFetcher + ?Sized,
{
    let fetched = tokio::select! {
        biased;
        _ = cancel.cancelled() => return aborted(&mut callbacks, 0),
        result = fetcher.fetch() => result,
    };

    let response = match fetched {
        Ok(response) => response,
        Err(e) => return failed(&mut callbacks, TransferError::Download(e)),
    };

    let total = response.total.filter(|t| *t > 0);
    debug!(status = response.status, total = ?response.total, "download started");

    let mut body = Vec::with_capacity(total.unwrap_or(0).min(MAX_PREALLOCATION) as usize);
    let mut stream = response.body;

    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => return aborted(&mut callbacks, body.len()),
            next = stream.next() => next,
        };

        match next {
            Some(Ok(piece)) => {
                body.extend_from_slice(&piece);
                if let Some(total) = total {
                    callbacks.progress(body.len() as f64 / total as f64 * 100.0);
                }
            }
            Some(Err(e)) => return failed(&mut callbacks, TransferError::Download(e)),
            None => break,
        }
    }

    info!(bytes = body.len(), "download complete");
    let response = StoreResponse {
        status: response.status,
        headers: response.headers,
        body,
    };
    callbacks.complete(&response);
    TransferOutcome::Completed(response)
}

fn aborted(callbacks: &mut DownloadCallbacks, received: usize) -> TransferOutcome {
    info!(received, "download cancelled");
    callbacks.cancelled();
    TransferOutcome::Cancelled
}

fn failed(callbacks: &mut DownloadCallbacks, err: TransferError) -> TransferOutcome {
    warn!(error = %err, "download failed");
    callbacks.error(&err);
    TransferOutcome::Failed(err)
}
