//! Wire-level vocabulary of the block blob protocol.
//!
//! Everything here is pure data: block identifiers, request URLs, header
//! names and the block list document sent on commit. No I/O happens in
//! this crate.

pub mod block_id;
pub mod block_list;
pub mod constants;
pub mod url;

// Re-export primary types for convenience.
pub use block_id::BlockId;
pub use block_list::BlockList;
pub use url::BlobUrl;

/// Errors produced while building or parsing wire data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    #[error("block sequence {0} does not fit the block id width")]
    SequenceOverflow(u32),

    #[error("invalid block id: {0}")]
    InvalidBlockId(String),

    #[error("malformed block list: {0}")]
    MalformedBlockList(String),
}
