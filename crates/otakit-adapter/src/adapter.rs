use std::future::Future;
use std::path::Path;

use otakit_fetch::{DownloadOutcome, ProgressFn};

use crate::error::{AdapterError, Result};

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name:         String,
    pub size:         u64,
    pub is_file:      bool,
    pub is_directory: bool,
}

/// A request to download a remote payload into a local file.
pub struct DownloadRequest<'a> {
    pub from_url:    &'a str,
    pub to_file:     &'a Path,
    /// Invoked per chunk with `{bytes_written, content_length}`.
    pub on_progress: Option<&'a ProgressFn>,
}

/// Filesystem, network, and process capabilities the update engine
/// consumes. One implementation per target platform.
///
/// All paths are absolute; relative layout decisions (where the bundle
/// directory lives, what the entry file is called) belong to the engine.
pub trait StorageAdapter: Send + Sync {
    /// Base directory for app-private files. The bundle layout is rooted
    /// under it.
    fn document_directory(&self) -> &Path;

    /// Platform tag used in the entry-file naming convention and the
    /// server check query, e.g. "android" or "ios".
    fn platform(&self) -> &str;

    fn exists(&self, path: &Path) -> impl Future<Output = Result<bool>> + Send;

    /// Create a directory, including missing parents.
    fn mkdir(&self, path: &Path) -> impl Future<Output = Result<()>> + Send;

    /// Remove a file or an entire directory tree.
    fn unlink(&self, path: &Path) -> impl Future<Output = Result<()>> + Send;

    fn move_file(&self, from: &Path, to: &Path) -> impl Future<Output = Result<()>> + Send;

    /// Extract a zip archive into `target_dir`, which must already exist.
    fn unzip_file(
        &self,
        zip_path: &Path,
        target_dir: &Path,
    ) -> impl Future<Output = Result<()>> + Send;

    fn read_dir(&self, path: &Path) -> impl Future<Output = Result<Vec<FileEntry>>> + Send;

    /// Stream a remote payload to a local file, reporting the response
    /// status rather than judging it.
    fn download_file(
        &self,
        request: DownloadRequest<'_>,
    ) -> impl Future<Output = Result<DownloadOutcome>> + Send;

    /// Whether this platform can install a downloaded native package.
    /// `false` signals "redirect to the store instead".
    fn supports_install(&self) -> bool { false }

    /// Hand a downloaded native package to the platform installer.
    fn install_package(&self, _path: &Path) -> impl Future<Output = Result<()>> + Send {
        async { Err(AdapterError::InstallUnsupported) }
    }

    /// Send the user to the platform's store page for a full update.
    fn open_store(&self, url: &str) -> impl Future<Output = Result<()>> + Send;

    /// Relaunch the application so the replaced bundle is picked up.
    ///
    /// On production adapters this terminates the current execution
    /// context and does not return; callers must not rely on code running
    /// after it.
    fn restart(&self);
}
