//! Caller-supplied notification hooks.
//!
//! Completion and error hooks are `FnOnce`: a transfer reaches at most one
//! terminal outcome, so each fires at most once.

use crate::{StoreResponse, TransferError};

/// Invoked after each acknowledged chunk with `(percent, response)`.
pub type UploadProgressCallback = Box<dyn FnMut(f64, &StoreResponse) + Send>;

/// Invoked with the percentage of the body received so far.
pub type DownloadProgressCallback = Box<dyn FnMut(f64) + Send>;

/// Invoked once with the final response.
pub type CompleteCallback = Box<dyn FnOnce(&StoreResponse) + Send>;

/// Invoked once with the error that ended the transfer.
pub type ErrorCallback = Box<dyn FnOnce(&TransferError) + Send>;

/// Invoked once when cancellation aborted an in-flight download.
pub type CancelledCallback = Box<dyn FnOnce() + Send>;

/// Hooks for an upload. Every hook is optional.
#[derive(Default)]
pub struct UploadCallbacks {
    progress: Option<UploadProgressCallback>,
    complete: Option<CompleteCallback>,
    error: Option<ErrorCallback>,
}

impl UploadCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_progress(mut self, f: impl FnMut(f64, &StoreResponse) + Send + 'static) -> Self {
        self.progress = Some(Box::new(f));
        self
    }

    pub fn on_complete(mut self, f: impl FnOnce(&StoreResponse) + Send + 'static) -> Self {
        self.complete = Some(Box::new(f));
        self
    }

    pub fn on_error(mut self, f: impl FnOnce(&TransferError) + Send + 'static) -> Self {
        self.error = Some(Box::new(f));
        self
    }

    pub(crate) fn progress(&mut self, percent: f64, response: &StoreResponse) {
        if let Some(cb) = self.progress.as_mut() {
            cb(percent, response);
        }
    }

    pub(crate) fn complete(&mut self, response: &StoreResponse) {
        if let Some(cb) = self.complete.take() {
            cb(response);
        }
    }

    pub(crate) fn error(&mut self, err: &TransferError) {
        if let Some(cb) = self.error.take() {
            cb(err);
        }
    }
}

/// Hooks for a download. Error and cancellation are separate channels.
#[derive(Default)]
pub struct DownloadCallbacks {
    progress: Option<DownloadProgressCallback>,
    complete: Option<CompleteCallback>,
    error: Option<ErrorCallback>,
    cancelled: Option<CancelledCallback>,
}

impl DownloadCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_progress(mut self, f: impl FnMut(f64) + Send + 'static) -> Self {
        self.progress = Some(Box::new(f));
        self
    }

    pub fn on_complete(mut self, f: impl FnOnce(&StoreResponse) + Send + 'static) -> Self {
        self.complete = Some(Box::new(f));
        self
    }

    pub fn on_error(mut self, f: impl FnOnce(&TransferError) + Send + 'static) -> Self {
        self.error = Some(Box::new(f));
        self
    }

    pub fn on_cancelled(mut self, f: impl FnOnce() + Send + 'static) -> Self {
        self.cancelled = Some(Box::new(f));
        self
    }

    pub(crate) fn progress(&mut self, percent: f64) {
        if let Some(cb) = self.progress.as_mut() {
            cb(percent);
        }
    }

    pub(crate) fn complete(&mut self, response: &StoreResponse) {
        if let Some(cb) = self.complete.take() {
            cb(response);
        }
    }

    pub(crate) fn error(&mut self, err: &TransferError) {
        if let Some(cb) = self.error.take() {
            cb(err);
        }
    }

    pub(crate) fn cancelled(&mut self) {
        if let Some(cb) = self.cancelled.take() {
            cb();
        }
    }
}
