//! CLI configuration.
//!
//! Stored as TOML at `$XDG_CONFIG_HOME/blockxfer/config.toml`, falling back
//! to `~/.config/blockxfer/config.toml`. A missing default file means
//! defaults; a missing `--config` file is an error.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use blockxfer_protocol::constants::DEFAULT_CONTENT_TYPE;
use blockxfer_transfer::DEFAULT_CHUNK_SIZE;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Bytes per uploaded block (0 = engine default).
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Whole-request timeout in seconds (0 = no timeout).
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// MIME type used when none is given and the extension is unknown.
    #[serde(default = "default_content_type")]
    pub default_content_type: String,
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_request_timeout() -> u64 {
    300
}

fn default_content_type() -> String {
    DEFAULT_CONTENT_TYPE.into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            request_timeout_secs: default_request_timeout(),
            default_content_type: default_content_type(),
        }
    }
}

impl Config {
    /// Loads `explicit`, or the default file when it exists.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => match config_path() {
                Some(path) if path.exists() => Self::load_from(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "configuration read");
        Ok(config)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    /// Resolves the upload content type: explicit flag, then the file
    /// extension, then the configured default.
    pub fn content_type_for(&self, explicit: Option<&str>, path: &Path) -> String {
        explicit
            .map(str::to_string)
            .or_else(|| detect_content_type(path).map(str::to_string))
            .unwrap_or_else(|| self.default_content_type.clone())
    }
}

/// Guesses a MIME type from the file extension.
pub fn detect_content_type(path: &Path) -> Option<&'static str> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match ext.as_deref() {
        Some("png") => Some("image/png"),
        Some("jpg" | "jpeg") => Some("image/jpeg"),
        Some("webp") => Some("image/webp"),
        Some("gif") => Some("image/gif"),
        Some("svg") => Some("image/svg+xml"),
        Some("mp4") => Some("video/mp4"),
        Some("webm") => Some("video/webm"),
        Some("mp3") => Some("audio/mpeg"),
        Some("pdf") => Some("application/pdf"),
        Some("json") => Some("application/json"),
        Some("zip") => Some("application/zip"),
        Some("txt") => Some("text/plain"),
        Some("csv") => Some("text/csv"),
        Some("html" | "htm") => Some("text/html"),
        _ => None,
    }
}

fn config_path() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
    Some(base.join("blockxfer").join("config.toml"))
}
