//! Block blob requests built on top of an [`HttpTransport`].

use std::sync::Arc;

use blockxfer_protocol::constants::{
    BLOB_TYPE_BLOCK, HEADER_BLOB_CONTENT_TYPE, HEADER_BLOB_TYPE, HEADER_CONTENT_TYPE,
};
use blockxfer_protocol::{BlobUrl, BlockId, BlockList};
use blockxfer_transfer::{
    BlobFetcher, BlockStore, BoxFuture, FetchResponse, StoreResponse, TransportError,
};
use tracing::debug;

use crate::transport::{HttpRequest, HttpTransport};

/// One blob on an Azure-compatible block store.
#[derive(Clone)]
pub struct AzureBlockStore {
    transport: Arc<dyn HttpTransport>,
    url: BlobUrl,
}

impl AzureBlockStore {
    pub fn new(transport: Arc<dyn HttpTransport>, url: BlobUrl) -> Self {
        Self { transport, url }
    }

    pub fn url(&self) -> &BlobUrl {
        &self.url
    }
}

impl BlockStore for AzureBlockStore {
    fn put_block<'a>(
        &'a self,
        id: &'a BlockId,
        content_type: &'a str,
        data: Vec<u8>,
    ) -> BoxFuture<'a, Result<StoreResponse, TransportError>> {
        let request = HttpRequest::put(self.url.block_url(id))
            .header(HEADER_BLOB_TYPE, BLOB_TYPE_BLOCK)
            .header(HEADER_CONTENT_TYPE, content_type)
            .body(data);
        self.transport.send(request)
    }

    fn commit_block_list<'a>(
        &'a self,
        ids: &'a [BlockId],
        content_type: &'a str,
    ) -> BoxFuture<'a, Result<StoreResponse, TransportError>> {
        let body = BlockList::from_ids(ids).to_xml();
        debug!(blocks = ids.len(), bytes = body.len(), "put block list");

        let request = HttpRequest::put(self.url.block_list_url())
            .header(HEADER_BLOB_CONTENT_TYPE, content_type)
            .body(body.into_bytes());
        self.transport.send(request)
    }
}

impl BlobFetcher for AzureBlockStore {
    fn fetch(&self) -> BoxFuture<'_, Result<FetchResponse, TransportError>> {
        self.transport.stream(HttpRequest::get(self.url.object_url()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;
    use std::sync::Mutex;

    /// Records requests and answers 201 with an empty body.
    #[derive(Default)]
    struct RecordingTransport {
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl RecordingTransport {
        fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl HttpTransport for RecordingTransport {
        fn send(&self, request: HttpRequest) -> BoxFuture<'_, Result<StoreResponse, TransportError>> {
            self.requests.lock().unwrap().push(request);
            Box::pin(async {
                Ok(StoreResponse {
                    status: 201,
                    ..Default::default()
                })
            })
        }

        fn stream(&self, request: HttpRequest) -> BoxFuture<'_, Result<FetchResponse, TransportError>> {
            self.requests.lock().unwrap().push(request);
            Box::pin(async {
                Ok(FetchResponse {
                    status: 200,
                    headers: Vec::new(),
                    total: Some(2),
                    body: Box::pin(stream::iter(vec![Ok(b"hi".to_vec())])),
                })
            })
        }
    }

    fn store() -> (Arc<RecordingTransport>, AzureBlockStore) {
        let transport = Arc::new(RecordingTransport::default());
        let url = BlobUrl::new("https://acct.blob.core.windows.net/c/pic.png", "?sv=1&sig=abc");
        (transport.clone(), AzureBlockStore::new(transport, url))
    }

    #[tokio::test]
    async fn put_block_request_shape() {
        let (transport, store) = store();
        let id = BlockId::from_sequence(3).unwrap();

        store
            .put_block(&id, "image/png", vec![9, 8, 7])
            .await
            .unwrap();

        let reqs = transport.requests();
        assert_eq!(reqs.len(), 1);
        assert_eq!(
            reqs[0].url,
            "https://acct.blob.core.windows.net/c/pic.png?sv=1&sig=abc&comp=block&blockid=YmxvY2stMDAwMDAz"
        );
        assert_eq!(
            reqs[0].headers,
            vec![
                ("x-ms-blob-type", "BlockBlob".to_string()),
                ("Content-Type", "image/png".to_string()),
            ]
        );
        assert_eq!(reqs[0].body, vec![9, 8, 7]);
    }

    #[tokio::test]
    async fn commit_request_shape() {
        let (transport, store) = store();
        let ids: Vec<BlockId> = (0..2).map(|i| BlockId::from_sequence(i).unwrap()).collect();

        store.commit_block_list(&ids, "image/png").await.unwrap();

        let reqs = transport.requests();
        assert_eq!(
            reqs[0].url,
            "https://acct.blob.core.windows.net/c/pic.png?sv=1&sig=abc&comp=blocklist"
        );
        assert_eq!(
            reqs[0].headers,
            vec![("x-ms-blob-content-type", "image/png".to_string())]
        );
        assert_eq!(
            String::from_utf8(reqs[0].body.clone()).unwrap(),
            "<?xml version=\"1.0\" encoding=\"utf-8\"?><BlockList>\
             <Latest>YmxvY2stMDAwMDAw</Latest>\
             <Latest>YmxvY2stMDAwMDAx</Latest>\
             </BlockList>"
        );
    }

    #[tokio::test]
    async fn fetch_uses_object_url() {
        let (transport, store) = store();

        let resp = store.fetch().await.unwrap();
        assert_eq!(resp.total, Some(2));

        let reqs = transport.requests();
        assert_eq!(reqs[0].method, crate::Method::Get);
        assert_eq!(
            reqs[0].url,
            "https://acct.blob.core.windows.net/c/pic.png?sv=1&sig=abc"
        );
        assert!(reqs[0].body.is_empty());
    }

    #[tokio::test]
    async fn empty_suffix_starts_query() {
        let transport = Arc::new(RecordingTransport::default());
        let store = AzureBlockStore::new(transport.clone(), BlobUrl::new("http://local/blob", ""));
        let id = BlockId::from_sequence(0).unwrap();

        store.put_block(&id, "text/plain", Vec::new()).await.unwrap();
        assert_eq!(
            transport.requests()[0].url,
            "http://local/blob?comp=block&blockid=YmxvY2stMDAwMDAw"
        );
    }
}
