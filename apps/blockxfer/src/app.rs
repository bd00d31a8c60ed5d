//! Runs one CLI command to completion.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, bail};
use blockxfer_azure::{AzureBlobClient, UploadConfig};
use blockxfer_protocol::BlobUrl;
use blockxfer_transfer::{
    DownloadCallbacks, StoreResponse, TransferHandle, TransferOutcome, UploadCallbacks,
};
use tracing::{info, warn};

use crate::cli::{Command, DownloadArgs, UploadArgs};
use crate::config::Config;

pub async fn run(command: Command, config: Config) -> anyhow::Result<()> {
    let client = AzureBlobClient::new(config.request_timeout())?;
    match command {
        Command::Upload(args) => upload(&client, &config, args).await,
        Command::Download(args) => download(&client, args).await,
    }
}

async fn upload(
    client: &AzureBlobClient,
    config: &Config,
    args: UploadArgs,
) -> anyhow::Result<()> {
    let content_type = config.content_type_for(args.content_type.as_deref(), &args.file);
    let chunk_size = args.chunk_size.unwrap_or(config.chunk_size);
    info!(file = %args.file.display(), %content_type, chunk_size, "uploading");

    let upload = UploadConfig::new(args.blob.url, args.blob.sas, content_type)
        .with_chunk_size(chunk_size);
    let callbacks = UploadCallbacks::new()
        .on_progress(|percent, _| print_progress(percent))
        .on_complete(|resp| {
            info!(status = resp.status, request_id = ?request_id(resp), "blob committed");
        });

    let handle = client
        .start_file_upload(upload, &args.file, callbacks)
        .await
        .with_context(|| format!("opening {}", args.file.display()))?;

    upload_result(wait_interruptible(handle).await)
}

fn upload_result(outcome: TransferOutcome) -> anyhow::Result<()> {
    match outcome {
        TransferOutcome::Completed(_) => {
            eprintln!();
            Ok(())
        }
        TransferOutcome::Failed(e) => Err(e).context("upload failed"),
        TransferOutcome::Cancelled => bail!("upload cancelled; sent blocks remain uncommitted"),
    }
}

async fn download(client: &AzureBlobClient, args: DownloadArgs) -> anyhow::Result<()> {
    let url = BlobUrl::new(args.blob.url, args.blob.sas);
    let callbacks = DownloadCallbacks::new()
        .on_progress(print_progress)
        .on_complete(|resp| {
            info!(status = resp.status, bytes = resp.body.len(), "download finished");
        });

    match wait_interruptible(client.start_download(url, callbacks)).await {
        TransferOutcome::Completed(resp) => {
            eprintln!();
            write_output(args.output.as_deref(), &resp.body).await
        }
        TransferOutcome::Failed(e) => Err(e).context("download failed"),
        TransferOutcome::Cancelled => bail!("download cancelled"),
    }
}

/// Waits for the transfer, cancelling it on Ctrl-C.
async fn wait_interruptible(handle: TransferHandle) -> TransferOutcome {
    let cancel = handle.cancel_token();
    let wait = handle.wait();
    tokio::pin!(wait);

    tokio::select! {
        outcome = &mut wait => outcome,
        _ = tokio::signal::ctrl_c() => {
            warn!("interrupted, cancelling transfer");
            cancel.cancel();
            wait.await
        }
    }
}

async fn write_output(path: Option<&Path>, body: &[u8]) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            tokio::fs::write(path, body)
                .await
                .with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), bytes = body.len(), "saved");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(body)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn print_progress(percent: f64) {
    eprint!("\r{percent:6.2}%");
}

fn request_id(resp: &StoreResponse) -> Option<&str> {
    resp.header("x-ms-request-id")
}
