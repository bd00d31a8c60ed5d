//! Transfer error types.

use blockxfer_protocol::ProtocolError;

/// Failure reported by a store or fetcher for one request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("store returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request timed out")]
    Timeout,
}

/// Errors that end a transfer.
///
/// Cancellation is not among them; it is a
/// [`TransferOutcome`](crate::TransferOutcome) of its own.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("sending block {index} failed: {source}")]
    Block {
        index: usize,
        #[source]
        source: TransportError,
    },

    #[error("committing block list failed: {0}")]
    Commit(#[source] TransportError),

    #[error("download failed: {0}")]
    Download(#[source] TransportError),

    #[error("reading chunk {index} failed: {source}")]
    Read {
        index: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("transfer task failed: {0}")]
    Task(String),
}
