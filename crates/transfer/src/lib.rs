//! Chunked blob transfer engine.
//!
//! Two independent pipelines live here:
//!
//! - **Upload**: a file is split into bounded chunks by the block sequencer
//!   ([`TransferPlan`]), sent one at a time by the chunk loop
//!   ([`ChunkLoop`]), then committed as an ordered block list.
//! - **Download**: a single GET whose body is collected while byte-level
//!   progress is reported.
//!
//! The engine never talks HTTP itself. Stores implement [`BlockStore`] and
//! [`BlobFetcher`]; file contents come from a [`ByteSource`]. Both
//! pipelines return a [`TransferHandle`] immediately and run on a spawned
//! tokio task.

mod callbacks;
mod commit;
mod download;
mod error;
mod handle;
mod plan;
mod source;
mod store;
mod upload;

#[cfg(test)]
mod testing;

pub use callbacks::{DownloadCallbacks, UploadCallbacks};
pub use download::{run_download, start_download};
pub use error::{TransferError, TransportError};
pub use handle::{TransferHandle, TransferOutcome};
pub use plan::{ChunkSpec, TransferPlan};
pub use source::{ByteSource, FileSource, MemorySource};
pub use store::{BlobFetcher, BlockStore, BodyStream, BoxFuture, FetchResponse, StoreResponse};
pub use upload::{ChunkLoop, Phase, TransferState, UploadOptions, start_upload};

/// Default chunk size: 32 KiB.
///
/// Used when no chunk size is configured or the configured size is 0.
pub const DEFAULT_CHUNK_SIZE: usize = 32 * 1024;
