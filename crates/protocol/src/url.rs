//! Request URLs for one blob.

use crate::block_id::BlockId;
use crate::constants::{BLOCK_ID_PARAM, COMP_BLOCK, COMP_BLOCKLIST};

/// Address of a blob plus its access-authorization suffix.
///
/// The suffix (typically a SAS query string starting with `?`) is opaque
/// and appended verbatim to the base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobUrl {
    base_url: String,
    auth_suffix: String,
}

impl BlobUrl {
    pub fn new(base_url: impl Into<String>, auth_suffix: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            auth_suffix: auth_suffix.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth_suffix(&self) -> &str {
        &self.auth_suffix
    }

    /// `<base><suffix>`, used for downloads.
    pub fn object_url(&self) -> String {
        format!("{}{}", self.base_url, self.auth_suffix)
    }

    /// `<base><suffix>&comp=block&blockid=<id>`.
    pub fn block_url(&self, id: &BlockId) -> String {
        let object = self.object_url();
        let sep = query_separator(&object);
        format!(
            "{object}{sep}{COMP_BLOCK}&{BLOCK_ID_PARAM}={}",
            id.encoded()
        )
    }

    /// `<base><suffix>&comp=blocklist`.
    pub fn block_list_url(&self) -> String {
        let object = self.object_url();
        let sep = query_separator(&object);
        format!("{object}{sep}{COMP_BLOCKLIST}")
    }
}

/// `&` when the URL already carries a query, `?` otherwise.
fn query_separator(url: &str) -> char {
    if url.contains('?') { '&' } else { '?' }
}
