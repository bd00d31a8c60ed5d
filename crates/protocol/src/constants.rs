/// Prefix of every raw block identifier.
pub const BLOCK_ID_PREFIX: &str = "block-";

/// Number of digits the block sequence number is zero-padded to.
///
/// The store requires all block ids of a blob to share one length, and a
/// fixed width keeps lexicographic order equal to upload order.
pub const BLOCK_ID_WIDTH: usize = 6;

/// Maximum number of uncommitted blocks the store accepts per blob.
pub const MAX_BLOCK_COUNT: usize = 50_000;

/// Header declaring the blob type on every block PUT.
pub const HEADER_BLOB_TYPE: &str = "x-ms-blob-type";

/// Value of [`HEADER_BLOB_TYPE`] for block blobs.
pub const BLOB_TYPE_BLOCK: &str = "BlockBlob";

/// Standard content type header, sent with each block.
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";

/// Content type stored on the committed blob.
pub const HEADER_BLOB_CONTENT_TYPE: &str = "x-ms-blob-content-type";

/// Query fragment selecting the put-block operation.
pub const COMP_BLOCK: &str = "comp=block";

/// Query fragment selecting the put-block-list operation.
pub const COMP_BLOCKLIST: &str = "comp=blocklist";

/// Query key carrying the encoded block id.
pub const BLOCK_ID_PARAM: &str = "blockid";

/// XML declaration prepended to the block list body.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

/// Fallback content type when nothing better is known.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";
