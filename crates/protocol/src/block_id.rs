//! Deterministic block identifiers.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::ProtocolError;
use crate::constants::{BLOCK_ID_PREFIX, BLOCK_ID_WIDTH};

/// Largest sequence number representable in [`BLOCK_ID_WIDTH`] digits.
const MAX_SEQUENCE: u32 = 999_999;

/// Identifier of one uploaded block.
///
/// The raw form is `block-NNNNNN`; the store only ever sees the base64
/// encoding of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId {
    sequence: u32,
    encoded: String,
}

impl BlockId {
    /// Builds the identifier for the block at position `sequence`.
    pub fn from_sequence(sequence: u32) -> Result<Self, ProtocolError> {
        if sequence > MAX_SEQUENCE {
            return Err(ProtocolError::SequenceOverflow(sequence));
        }
        let raw = format_raw(sequence);
        Ok(Self {
            sequence,
            encoded: STANDARD.encode(raw.as_bytes()),
        })
    }

    /// Parses an encoded identifier produced by [`BlockId::encoded`].
    pub fn decode(encoded: &str) -> Result<Self, ProtocolError> {
        let bytes = STANDARD
            .decode(encoded)
            .map_err(|e| ProtocolError::InvalidBlockId(format!("{encoded}: {e}")))?;
        let raw = String::from_utf8(bytes)
            .map_err(|_| ProtocolError::InvalidBlockId(format!("{encoded}: not utf-8")))?;

        let digits = raw
            .strip_prefix(BLOCK_ID_PREFIX)
            .filter(|d| d.len() == BLOCK_ID_WIDTH && d.bytes().all(|b| b.is_ascii_digit()))
            .ok_or_else(|| ProtocolError::InvalidBlockId(raw.clone()))?;
        let sequence = digits
            .parse::<u32>()
            .map_err(|_| ProtocolError::InvalidBlockId(raw.clone()))?;

        Self::from_sequence(sequence)
    }

    /// Position of this block in upload order.
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    /// Unencoded form, e.g. `block-000007`.
    pub fn raw(&self) -> String {
        format_raw(self.sequence)
    }

    /// Base64 form sent on the wire.
    pub fn encoded(&self) -> &str {
        &self.encoded
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}

fn format_raw(sequence: u32) -> String {
    format!("{BLOCK_ID_PREFIX}{sequence:0width$}", width = BLOCK_ID_WIDTH)
}
