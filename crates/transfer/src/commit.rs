//! Commit coordinator: turns acknowledged blocks into a visible blob.

use blockxfer_protocol::BlockId;
use tracing::{debug, info};

use crate::{BlockStore, StoreResponse, TransferError};

/// Commits `ids` in append order with a single request.
///
/// Never retried; a failure leaves the uploaded blocks uncommitted, which
/// keeps them invisible to readers.
pub(crate) async fn commit_blocks<S>(
    store: &S,
    ids: &[BlockId],
    content_type: &str,
) -> Result<StoreResponse, TransferError>
where
    S: BlockStore + ?Sized,
{
    debug!(blocks = ids.len(), content_type, "committing block list");

    let response = store
        .commit_block_list(ids, content_type)
        .await
        .map_err(TransferError::Commit)?;

    info!(blocks = ids.len(), status = response.status, "block list committed");
    Ok(response)
}
