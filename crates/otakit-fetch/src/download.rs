use std::path::Path;
use std::sync::Arc;

use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;

use crate::client::HttpClient;
use crate::error::{FetchError, Result};

/// State of an in-flight transfer, passed to progress callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferProgress {
    /// Bytes written to the destination file so far.
    pub bytes_written: u64,

    /// Total expected bytes, if known from Content-Length.
    ///
    /// `None` when the server uses chunked transfer encoding.
    pub content_length: Option<u64>,
}

/// Progress callback invoked after each chunk write.
///
/// The callback receives a reference to avoid cloning on every invocation.
pub type ProgressFn = Arc<dyn Fn(&TransferProgress) + Send + Sync>;

/// Result of a completed transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadOutcome {
    /// HTTP status code of the response whose body was written.
    pub status_code: u16,

    /// Total bytes written to the destination file.
    pub bytes_written: u64,
}

/// Download `url` into `dest`, streaming chunks straight to disk.
///
/// The body is written regardless of the response status; the status code
/// is reported in the outcome so the caller can reject non-200 responses
/// and discard the file. Existing content at `dest` is truncated.
pub async fn download_to_file<C: HttpClient>(
    client: &C,
    url: &str,
    dest: &Path,
    on_progress: Option<&ProgressFn>,
) -> Result<DownloadOutcome> {
    let response = client
        .get(url)
        .await
        .map_err(|e| FetchError::Network(e.to_string()))?;

    let status = response.status;
    let content_length = response.content_length;
    tracing::debug!(url, status, ?content_length, dest = %dest.display(), "download started");

    let mut file = tokio::fs::File::create(dest).await.map_err(|e| FetchError::Io {
        path:   dest.to_path_buf(),
        source: e,
    })?;

    let mut body = response.body;
    let mut bytes_written = 0u64;

    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(|e| FetchError::Network(e.to_string()))?;
        file.write_all(&chunk).await.map_err(|e| FetchError::Io {
            path:   dest.to_path_buf(),
            source: e,
        })?;
        bytes_written += chunk.len() as u64;

        if let Some(callback) = on_progress {
            callback(&TransferProgress {
                bytes_written,
                content_length,
            });
        }
    }

    file.flush().await.map_err(|e| FetchError::Io {
        path:   dest.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(url, status, bytes_written, "download finished");

    Ok(DownloadOutcome {
        status_code: status,
        bytes_written,
    })
}
