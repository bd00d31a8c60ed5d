//! Byte sources: "read this range, get a buffer".

use std::io::{self, SeekFrom};
use std::path::{Path, PathBuf};

use tokio::io::{AsyncReadExt, AsyncSeekExt};

use crate::store::BoxFuture;

/// Random-access source of upload bytes.
///
/// The chunk loop owns its source exclusively, hence `&mut self`.
pub trait ByteSource: Send {
    /// Total size in bytes.
    fn size(&self) -> u64;

    /// Reads exactly `len` bytes starting at `offset`.
    fn read_range(&mut self, offset: u64, len: usize) -> BoxFuture<'_, io::Result<Vec<u8>>>;
}

/// Reads ranges from a file on disk.
pub struct FileSource {
    file: tokio::fs::File,
    path: PathBuf,
    size: u64,
}

impl FileSource {
    /// Opens `path` and records its current size.
    pub async fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = tokio::fs::File::open(&path).await?;
        let size = file.metadata().await?.len();
        Ok(Self { file, path, size })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ByteSource for FileSource {
    fn size(&self) -> u64 {
        self.size
    }

    fn read_range(&mut self, offset: u64, len: usize) -> BoxFuture<'_, io::Result<Vec<u8>>> {
        Box::pin(async move {
            let mut buf = vec![0u8; len];
            if len > 0 {
                self.file.seek(SeekFrom::Start(offset)).await?;
                // Fails with UnexpectedEof if the file shrank since open.
                self.file.read_exact(&mut buf).await?;
            }
            Ok(buf)
        })
    }
}

/// In-memory source, mostly for tests and small payloads.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    data: Vec<u8>,
}

impl MemorySource {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }
}

impl ByteSource for MemorySource {
    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    fn read_range(&mut self, offset: u64, len: usize) -> BoxFuture<'_, io::Result<Vec<u8>>> {
        let start = offset as usize;
        let result = start
            .checked_add(len)
            .and_then(|end| self.data.get(start..end))
            .map(<[u8]>::to_vec)
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("range {start}+{len} beyond {} bytes", self.data.len()),
                )
            });
        Box::pin(async move { result })
    }
}
