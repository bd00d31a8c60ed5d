//! Chunk transfer loop: the upload state machine.
//!
//! One [`ChunkLoop`] owns all mutable state of one upload. It moves through
//! [`Phase`]s via a single transition function, [`ChunkLoop::advance`]:
//!
//! ```text
//! Reading --read ok--> Sending --send ok--> Reading ... --all acked--> Committing --> Done
//!    |                    |                                               |
//!    +--------------------+------ failure ------> Failed <----------------+
//!    +--------------------+------ cancelled ----> Cancelled <-------------+
//! ```
//!
//! Chunks are strictly sequential: chunk n+1 is not read before chunk n is
//! acknowledged, so at most one chunk buffer is alive at a time and block
//! ids are appended in upload order.

use blockxfer_protocol::BlockId;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::callbacks::UploadCallbacks;
use crate::commit::commit_blocks;
use crate::handle::{TransferHandle, TransferOutcome};
use crate::plan::{ChunkSpec, TransferPlan};
use crate::{BlockStore, ByteSource, StoreResponse, TransferError};

/// Per-upload settings besides the store and the source.
#[derive(Debug, Clone, Default)]
pub struct UploadOptions {
    /// MIME type declared on every block and on the committed blob.
    pub content_type: String,
    /// Chunk size override; `None` or 0 selects the default.
    pub chunk_size: Option<usize>,
}

/// Mutable progress of one upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferState {
    cursor: u64,
    bytes_remaining: u64,
    bytes_acknowledged: u64,
    block_ids: Vec<BlockId>,
}

impl TransferState {
    fn new(plan: &TransferPlan) -> Self {
        Self {
            cursor: 0,
            bytes_remaining: plan.file_size(),
            bytes_acknowledged: 0,
            block_ids: Vec::with_capacity(plan.chunk_count()),
        }
    }

    /// Byte offset of the next unread chunk.
    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    pub fn bytes_remaining(&self) -> u64 {
        self.bytes_remaining
    }

    /// Bytes whose block send succeeded.
    pub fn bytes_acknowledged(&self) -> u64 {
        self.bytes_acknowledged
    }

    /// Block ids in generation order.
    pub fn block_ids(&self) -> &[BlockId] {
        &self.block_ids
    }

    /// Acknowledged share of `file_size`; an empty file counts as 100.
    fn percent(&self, file_size: u64) -> f64 {
        if file_size == 0 {
            100.0
        } else {
            self.bytes_acknowledged as f64 / file_size as f64 * 100.0
        }
    }

    fn acknowledge(&mut self, len: u64) {
        self.cursor += len;
        self.bytes_remaining -= len;
        self.bytes_acknowledged += len;
    }
}

/// Where the chunk loop stands.
#[derive(Debug)]
pub enum Phase {
    /// Next step reads a chunk, or commits once every chunk is acknowledged.
    Reading,
    /// A chunk has been read and awaits sending.
    Sending { chunk: ChunkSpec, data: Vec<u8> },
    /// All chunks acknowledged; the block list is next.
    Committing,
    Done(StoreResponse),
    Failed(TransferError),
    Cancelled,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done(_) | Self::Failed(_) | Self::Cancelled)
    }
}

/// Drives one upload from first read to commit.
pub struct ChunkLoop<S, B> {
    plan: TransferPlan,
    state: TransferState,
    store: S,
    source: B,
    content_type: String,
    cancel: CancellationToken,
    callbacks: UploadCallbacks,
}

impl<S, B> ChunkLoop<S, B>
where
    S: BlockStore,
    B: ByteSource,
{
    pub fn new(
        plan: TransferPlan,
        store: S,
        source: B,
        content_type: impl Into<String>,
        cancel: CancellationToken,
        callbacks: UploadCallbacks,
    ) -> Self {
        let state = TransferState::new(&plan);
        Self {
            plan,
            state,
            store,
            source,
            content_type: content_type.into(),
            cancel,
            callbacks,
        }
    }

    pub fn plan(&self) -> &TransferPlan {
        &self.plan
    }

    pub fn state(&self) -> &TransferState {
        &self.state
    }

    /// Runs the loop to a terminal phase.
    pub async fn run(mut self) -> TransferOutcome {
        debug!(
            file_size = self.plan.file_size(),
            chunk_size = self.plan.effective_chunk_size(),
            chunks = self.plan.chunk_count(),
            "upload started"
        );

        let mut phase = Phase::Reading;
        loop {
            phase = match phase {
                Phase::Done(response) => return TransferOutcome::Completed(response),
                Phase::Failed(err) => return TransferOutcome::Failed(err),
                Phase::Cancelled => return TransferOutcome::Cancelled,
                active => self.advance(active).await,
            };
        }
    }

    /// Performs one transition. Terminal phases are returned unchanged.
    pub async fn advance(&mut self, phase: Phase) -> Phase {
        match phase {
            Phase::Reading => self.read_next().await,
            Phase::Sending { chunk, data } => self.send(chunk, data).await,
            Phase::Committing => self.commit().await,
            terminal => terminal,
        }
    }

    async fn read_next(&mut self) -> Phase {
        if self.cancel.is_cancelled() {
            return self.cancelled();
        }

        let index = self.state.block_ids.len();
        if index >= self.plan.chunk_count() {
            return Phase::Committing;
        }

        let chunk = ChunkSpec {
            index,
            offset: self.state.cursor,
            len: (self.plan.effective_chunk_size() as u64).min(self.state.bytes_remaining)
                as usize,
        };

        // The id is recorded before any I/O for this chunk starts.
        let id = match BlockId::from_sequence(index as u32) {
            Ok(id) => id,
            Err(e) => return self.fail(e.into()),
        };
        self.state.block_ids.push(id);

        match self.source.read_range(chunk.offset, chunk.len).await {
            Ok(data) => Phase::Sending { chunk, data },
            Err(source) => self.fail(TransferError::Read { index, source }),
        }
    }

    async fn send(&mut self, chunk: ChunkSpec, data: Vec<u8>) -> Phase {
        if self.cancel.is_cancelled() {
            return self.cancelled();
        }

        let id = &self.state.block_ids[chunk.index];
        let result = self.store.put_block(id, &self.content_type, data).await;

        match result {
            Ok(response) => {
                self.state.acknowledge(chunk.len as u64);
                let percent = self.state.percent(self.plan.file_size());
                debug!(
                    index = chunk.index,
                    len = chunk.len,
                    acknowledged = self.state.bytes_acknowledged,
                    "block sent"
                );
                self.callbacks.progress(percent, &response);
                Phase::Reading
            }
            Err(source) => self.fail(TransferError::Block {
                index: chunk.index,
                source,
            }),
        }
    }

    async fn commit(&mut self) -> Phase {
        if self.cancel.is_cancelled() {
            return self.cancelled();
        }

        match commit_blocks(&self.store, &self.state.block_ids, &self.content_type).await {
            Ok(response) => {
                self.callbacks.complete(&response);
                Phase::Done(response)
            }
            Err(e) => self.fail(e),
        }
    }

    fn fail(&mut self, err: TransferError) -> Phase {
        warn!(error = %err, acknowledged = self.state.bytes_acknowledged, "upload failed");
        self.callbacks.error(&err);
        Phase::Failed(err)
    }

    fn cancelled(&self) -> Phase {
        info!(
            acknowledged = self.state.bytes_acknowledged,
            blocks = self.state.block_ids.len(),
            "upload cancelled"
        );
        Phase::Cancelled
    }
}

/// Starts uploading `source` to `store` on a new tokio task.
///
/// Returns immediately. Outcomes are reported through `callbacks` and
/// through [`TransferHandle::wait`]. Cancellation fires no callback.
///
/// # Panics
///
/// Panics when called outside a tokio runtime.
pub fn start_upload<S, B>(
    store: S,
    source: B,
    options: UploadOptions,
    callbacks: UploadCallbacks,
) -> TransferHandle
where
    S: BlockStore + 'static,
    B: ByteSource + 'static,
{
    let cancel = CancellationToken::new();
    let token = cancel.clone();

    TransferHandle::spawn(cancel, async move {
        let plan = TransferPlan::new(source.size(), options.chunk_size);
        ChunkLoop::new(plan, store, source, options.content_type, token, callbacks)
            .run()
            .await
    })
}
