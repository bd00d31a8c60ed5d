//! Azure block blob adapter for the blockxfer engine.
//!
//! [`AzureBlockStore`] turns the engine's protocol-agnostic calls into the
//! exact put-block / put-block-list / get requests of the block blob
//! protocol. Requests go through an [`HttpTransport`], normally
//! [`ReqwestTransport`].

pub mod client;
pub mod store;
pub mod transport;

pub use client::{AzureBlobClient, UploadConfig};
pub use store::AzureBlockStore;
pub use transport::{HttpRequest, HttpTransport, Method, ReqwestTransport};

/// Errors from building the HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

#[cfg(test)]
mod test_server;
