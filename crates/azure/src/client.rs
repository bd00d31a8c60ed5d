//! Entry point for hosts: starts uploads and downloads against one account.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use blockxfer_protocol::BlobUrl;
use blockxfer_protocol::constants::MAX_BLOCK_COUNT;
use blockxfer_transfer::{
    ByteSource, DEFAULT_CHUNK_SIZE, DownloadCallbacks, FileSource, TransferHandle,
    UploadCallbacks, UploadOptions,
};
use tracing::info;

use crate::Error;
use crate::store::AzureBlockStore;
use crate::transport::{HttpTransport, ReqwestTransport};

/// Everything an upload needs besides the bytes and the callbacks.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Blob URL without the authorization suffix.
    pub base_url: String,
    /// Opaque suffix appended to every request URL, e.g. a SAS query.
    pub auth_suffix: String,
    pub content_type: String,
    /// `None` or 0 selects the default chunk size.
    pub chunk_size: Option<usize>,
}

impl UploadConfig {
    pub fn new(
        base_url: impl Into<String>,
        auth_suffix: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            auth_suffix: auth_suffix.into(),
            content_type: content_type.into(),
            chunk_size: None,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = Some(chunk_size);
        self
    }

    fn url(&self) -> BlobUrl {
        BlobUrl::new(self.base_url.clone(), self.auth_suffix.clone())
    }
}

/// Shares one transport across every transfer it starts.
#[derive(Clone)]
pub struct AzureBlobClient {
    transport: Arc<dyn HttpTransport>,
}

impl AzureBlobClient {
    /// Creates a client backed by [`ReqwestTransport`].
    pub fn new(timeout: Option<Duration>) -> Result<Self, Error> {
        Ok(Self::with_transport(Arc::new(ReqwestTransport::new(timeout)?)))
    }

    pub fn with_transport(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    pub fn store(&self, url: BlobUrl) -> AzureBlockStore {
        AzureBlockStore::new(self.transport.clone(), url)
    }

    /// Starts a chunked upload of `source`.
    ///
    /// Returns immediately; the transfer runs on a spawned tokio task. The
    /// chunk size is raised when needed so the blob fits in
    /// [`MAX_BLOCK_COUNT`] blocks.
    pub fn start_upload<B>(
        &self,
        config: UploadConfig,
        source: B,
        callbacks: UploadCallbacks,
    ) -> TransferHandle
    where
        B: ByteSource + 'static,
    {
        let size = source.size();
        let chunk_size = fit_chunk_size(size, config.chunk_size);
        info!(url = %config.base_url, size, chunk_size, "starting upload");

        let store = self.store(config.url());
        let options = UploadOptions {
            content_type: config.content_type,
            chunk_size: Some(chunk_size),
        };
        blockxfer_transfer::start_upload(store, source, options, callbacks)
    }

    /// Opens `path` and uploads it.
    pub async fn start_file_upload(
        &self,
        config: UploadConfig,
        path: impl AsRef<Path>,
        callbacks: UploadCallbacks,
    ) -> std::io::Result<TransferHandle> {
        let source = FileSource::open(path).await?;
        Ok(self.start_upload(config, source, callbacks))
    }

    /// Starts downloading the blob at `url`.
    pub fn start_download(&self, url: BlobUrl, callbacks: DownloadCallbacks) -> TransferHandle {
        info!(url = %url.base_url(), "starting download");
        blockxfer_transfer::start_download(self.store(url), callbacks)
    }
}

/// Smallest chunk size at or above the requested one that keeps a
/// `file_size` upload within the store's block cap.
fn fit_chunk_size(file_size: u64, requested: Option<usize>) -> usize {
    let requested = requested.filter(|s| *s > 0).unwrap_or(DEFAULT_CHUNK_SIZE);
    let minimum = file_size.div_ceil(MAX_BLOCK_COUNT as u64);
    if minimum > requested as u64 {
        info!(requested, minimum, "raising chunk size to fit the block cap");
        usize::try_from(minimum).unwrap_or(usize::MAX)
    } else {
        requested
    }
}
