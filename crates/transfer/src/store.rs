//! Seams between the transfer engine and a concrete blob store.
//!
//! The store implementations own the wire format; the engine only decides
//! what to send and in which order. Using traits keeps the chunk loop
//! testable with in-memory fakes.

use std::future::Future;
use std::pin::Pin;

use blockxfer_protocol::BlockId;
use futures_util::Stream;

use crate::TransportError;

/// Boxed future returned by store and source methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Response body delivered piece by piece.
pub type BodyStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>, TransportError>> + Send>>;

/// Raw response from the store, handed to callbacks untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl StoreResponse {
    /// Returns the first header named `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A store that accepts blocks and assembles them on commit.
pub trait BlockStore: Send + Sync {
    /// Uploads one uncommitted block.
    fn put_block<'a>(
        &'a self,
        id: &'a BlockId,
        content_type: &'a str,
        data: Vec<u8>,
    ) -> BoxFuture<'a, Result<StoreResponse, TransportError>>;

    /// Commits `ids` in the given order as the blob's content.
    fn commit_block_list<'a>(
        &'a self,
        ids: &'a [BlockId],
        content_type: &'a str,
    ) -> BoxFuture<'a, Result<StoreResponse, TransportError>>;
}

/// Response head of a download plus its streaming body.
pub struct FetchResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    /// Total body size announced by the server, if any.
    pub total: Option<u64>,
    pub body: BodyStream,
}

/// A store that serves a whole blob with one request.
pub trait BlobFetcher: Send + Sync {
    fn fetch(&self) -> BoxFuture<'_, Result<FetchResponse, TransportError>>;
}
