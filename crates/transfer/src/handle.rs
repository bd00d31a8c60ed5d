//! Externally visible handle to a running transfer.

use std::future::Future;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{StoreResponse, TransferError};

/// How a transfer ended.
#[derive(Debug)]
pub enum TransferOutcome {
    /// Upload committed, or download fully received.
    Completed(StoreResponse),
    /// A transport or read failure ended the transfer.
    Failed(TransferError),
    /// Stopped by [`TransferHandle::cancel`].
    Cancelled,
}

impl TransferOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Handle returned before any transfer I/O happens.
///
/// Dropping the handle does not stop the transfer; call
/// [`cancel`](Self::cancel) for that.
pub struct TransferHandle {
    cancel: CancellationToken,
    task: JoinHandle<TransferOutcome>,
}

impl TransferHandle {
    /// Spawns `work` on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub(crate) fn spawn<F>(cancel: CancellationToken, work: F) -> Self
    where
        F: Future<Output = TransferOutcome> + Send + 'static,
    {
        Self {
            cancel,
            task: tokio::spawn(work),
        }
    }

    /// Requests cancellation.
    ///
    /// Uploads stop before their next read, send or commit; an in-flight
    /// block send is allowed to finish. Downloads abort the in-flight
    /// request immediately.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Returns a token that cancels this transfer when triggered.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Waits for the transfer to reach its terminal outcome.
    pub async fn wait(self) -> TransferOutcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(e) => TransferOutcome::Failed(TransferError::Task(e.to_string())),
        }
    }
}
