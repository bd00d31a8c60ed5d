//! In-memory store fakes shared by unit tests.

use std::sync::{Arc, Mutex};

use blockxfer_protocol::BlockId;
use tokio_util::sync::CancellationToken;

use crate::{BlockStore, BoxFuture, StoreResponse, TransportError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Block {
        id: BlockId,
        content_type: String,
        data: Vec<u8>,
    },
    Commit {
        ids: Vec<BlockId>,
        content_type: String,
    },
}

/// Records every call; can fail or cancel on demand.
#[derive(Clone, Default)]
pub(crate) struct FakeStore {
    calls: Arc<Mutex<Vec<Call>>>,
    fail_block: Option<usize>,
    fail_commit: bool,
    cancel_during_block: Option<(usize, CancellationToken)>,
}

impl FakeStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Fails the block send with this index.
    pub(crate) fn fail_block(mut self, index: usize) -> Self {
        self.fail_block = Some(index);
        self
    }

    pub(crate) fn fail_commit(mut self) -> Self {
        self.fail_commit = true;
        self
    }

    /// Triggers `token` while block `index` is being sent.
    pub(crate) fn cancel_during_block(mut self, index: usize, token: CancellationToken) -> Self {
        self.cancel_during_block = Some((index, token));
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn blocks(&self) -> Vec<(BlockId, Vec<u8>)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Block { id, data, .. } => Some((id, data)),
                Call::Commit { .. } => None,
            })
            .collect()
    }

    pub(crate) fn commits(&self) -> Vec<Vec<BlockId>> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Commit { ids, .. } => Some(ids),
                Call::Block { .. } => None,
            })
            .collect()
    }
}

fn ok(status: u16, body: &str) -> StoreResponse {
    StoreResponse {
        status,
        headers: vec![("x-ms-request-id".into(), "fake".into())],
        body: body.as_bytes().to_vec(),
    }
}

impl BlockStore for FakeStore {
    fn put_block<'a>(
        &'a self,
        id: &'a BlockId,
        content_type: &'a str,
        data: Vec<u8>,
    ) -> BoxFuture<'a, Result<StoreResponse, TransportError>> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(Call::Block {
                id: id.clone(),
                content_type: content_type.to_string(),
                data,
            });
            calls
                .iter()
                .filter(|c| matches!(c, Call::Block { .. }))
                .count()
                - 1
        };

        if let Some((at, token)) = &self.cancel_during_block
            && *at == index
        {
            token.cancel();
        }

        let result = if self.fail_block == Some(index) {
            Err(TransportError::Status {
                status: 403,
                body: "AuthenticationFailed".into(),
            })
        } else {
            Ok(ok(201, ""))
        };
        Box::pin(async move { result })
    }

    fn commit_block_list<'a>(
        &'a self,
        ids: &'a [BlockId],
        content_type: &'a str,
    ) -> BoxFuture<'a, Result<StoreResponse, TransportError>> {
        self.calls.lock().unwrap().push(Call::Commit {
            ids: ids.to_vec(),
            content_type: content_type.to_string(),
        });

        let result = if self.fail_commit {
            Err(TransportError::Status {
                status: 500,
                body: "InternalError".into(),
            })
        } else {
            Ok(ok(201, "committed"))
        };
        Box::pin(async move { result })
    }
}
