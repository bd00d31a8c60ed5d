//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "blockxfer", version, about = "Chunked block blob uploads and downloads")]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of the default location.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn default_log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Upload a local file as a block blob.
    Upload(UploadArgs),
    /// Download a blob.
    Download(DownloadArgs),
}

/// Target blob and its authorization.
#[derive(Args, Debug, Clone)]
pub struct BlobArgs {
    /// Blob URL without the SAS query.
    pub url: String,

    /// Authorization suffix appended to every request URL, e.g. `?sv=...&sig=...`.
    #[arg(long, env = "BLOCKXFER_SAS", default_value = "", hide_env_values = true)]
    pub sas: String,
}

#[derive(Args, Debug)]
pub struct UploadArgs {
    /// File to upload.
    pub file: PathBuf,

    #[command(flatten)]
    pub blob: BlobArgs,

    /// Bytes per block; overrides the config file.
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// MIME type of the blob; detected from the file extension when omitted.
    #[arg(long)]
    pub content_type: Option<String>,
}

#[derive(Args, Debug)]
pub struct DownloadArgs {
    #[command(flatten)]
    pub blob: BlobArgs,

    /// Output file; the body goes to stdout when omitted.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
