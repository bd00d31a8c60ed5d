//! Block sequencer: chunk boundaries for one upload.

use std::ops::Range;

use crate::DEFAULT_CHUNK_SIZE;

/// One chunk of the upload, as planned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSpec {
    /// Position in upload order; also the block id sequence number.
    pub index: usize,
    /// Byte offset within the file.
    pub offset: u64,
    /// Size of this chunk in bytes.
    pub len: usize,
}

impl ChunkSpec {
    /// Byte range `[offset, offset + len)`.
    pub fn range(&self) -> Range<u64> {
        self.offset..self.offset + self.len as u64
    }
}

/// Immutable chunk layout derived once at the start of an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferPlan {
    file_size: u64,
    chunk_size: usize,
    effective_chunk_size: usize,
    chunk_count: usize,
}

impl TransferPlan {
    /// Plans an upload of `file_size` bytes.
    ///
    /// `chunk_size` of `None` or `Some(0)` selects [`DEFAULT_CHUNK_SIZE`].
    /// A file smaller than the chunk size is a single chunk, and an empty
    /// file is still one (empty) chunk. Store-specific block caps are the
    /// caller's concern.
    pub fn new(file_size: u64, chunk_size: Option<usize>) -> Self {
        let chunk_size = match chunk_size {
            Some(size) if size > 0 => size,
            _ => DEFAULT_CHUNK_SIZE,
        };

        let effective_chunk_size = if file_size < chunk_size as u64 {
            file_size as usize
        } else {
            chunk_size
        };

        let chunk_count = if file_size == 0 {
            1
        } else {
            file_size.div_ceil(effective_chunk_size as u64) as usize
        };

        Self {
            file_size,
            chunk_size,
            effective_chunk_size,
            chunk_count,
        }
    }

    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Chunk size as requested (after defaulting).
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Chunk size actually used: the requested size clamped to the file size.
    pub fn effective_chunk_size(&self) -> usize {
        self.effective_chunk_size
    }

    pub fn chunk_count(&self) -> usize {
        self.chunk_count
    }

    /// Returns the chunk at `index`, or `None` past the last chunk.
    pub fn chunk(&self, index: usize) -> Option<ChunkSpec> {
        if index >= self.chunk_count {
            return None;
        }
        let offset = index as u64 * self.effective_chunk_size as u64;
        let remaining = self.file_size - offset;
        Some(ChunkSpec {
            index,
            offset,
            len: remaining.min(self.effective_chunk_size as u64) as usize,
        })
    }

    /// Iterates over every chunk in upload order.
    pub fn chunks(&self) -> impl Iterator<Item = ChunkSpec> + '_ {
        (0..self.chunk_count).filter_map(|i| self.chunk(i))
    }
}
