use std::io;
use std::path::{Path, PathBuf};

use otakit_fetch::{DownloadOutcome, HttpClient, ReqwestClient, download_to_file};

use crate::adapter::{DownloadRequest, FileEntry, StorageAdapter};
use crate::error::{AdapterError, Result, io_at};
use crate::extract;

/// Hands a downloaded native package to the platform installer.
pub type InstallHook = Box<dyn Fn(&Path) -> io::Result<()> + Send + Sync>;

/// Opens the platform's store page.
pub type StoreHook = Box<dyn Fn(&str) -> io::Result<()> + Send + Sync>;

/// Relaunches the application. Expected not to return.
pub type RestartHook = Box<dyn Fn() + Send + Sync>;

/// Production [`StorageAdapter`] for ordinary hosts.
///
/// Filesystem primitives go through `tokio::fs`, downloads stream through
/// `otakit-fetch`, and zip extraction runs on a blocking task. The
/// platform-destructive capabilities are injected:
///
/// - no install hook means [`StorageAdapter::supports_install`] is false
///   and force updates redirect to the store;
/// - no restart hook demotes [`StorageAdapter::restart`] to a logged no-op,
///   which is only acceptable in tests and demos.
pub struct HostAdapter<C = ReqwestClient> {
    document_dir: PathBuf,
    platform:     String,
    client:       C,
    install:      Option<InstallHook>,
    store:        Option<StoreHook>,
    restart:      Option<RestartHook>,
}

impl HostAdapter<ReqwestClient> {
    pub fn new(document_dir: impl Into<PathBuf>, platform: impl Into<String>) -> Self {
        Self::with_client(document_dir, platform, ReqwestClient::new())
    }
}

impl<C: HttpClient> HostAdapter<C> {
    pub fn with_client(
        document_dir: impl Into<PathBuf>,
        platform: impl Into<String>,
        client: C,
    ) -> Self {
        Self {
            document_dir: document_dir.into(),
            platform: platform.into(),
            client,
            install: None,
            store: None,
            restart: None,
        }
    }

    #[must_use]
    pub fn install_hook(mut self, hook: InstallHook) -> Self {
        self.install = Some(hook);
        self
    }

    #[must_use]
    pub fn store_hook(mut self, hook: StoreHook) -> Self {
        self.store = Some(hook);
        self
    }

    #[must_use]
    pub fn restart_hook(mut self, hook: RestartHook) -> Self {
        self.restart = Some(hook);
        self
    }
}

impl<C: HttpClient> StorageAdapter for HostAdapter<C> {
    fn document_directory(&self) -> &Path { &self.document_dir }

    fn platform(&self) -> &str { &self.platform }

    async fn exists(&self, path: &Path) -> Result<bool> {
        tokio::fs::try_exists(path).await.map_err(|e| io_at(path, e))
    }

    async fn mkdir(&self, path: &Path) -> Result<()> {
        tokio::fs::create_dir_all(path).await.map_err(|e| io_at(path, e))
    }

    async fn unlink(&self, path: &Path) -> Result<()> {
        let meta = tokio::fs::symlink_metadata(path).await.map_err(|e| io_at(path, e))?;
        if meta.is_dir() {
            tokio::fs::remove_dir_all(path).await.map_err(|e| io_at(path, e))
        } else {
            tokio::fs::remove_file(path).await.map_err(|e| io_at(path, e))
        }
    }

    async fn move_file(&self, from: &Path, to: &Path) -> Result<()> {
        tokio::fs::rename(from, to).await.map_err(|e| io_at(from, e))
    }

    async fn unzip_file(&self, zip_path: &Path, target_dir: &Path) -> Result<()> {
        let zip_path = zip_path.to_path_buf();
        let target_dir = target_dir.to_path_buf();

        tokio::task::spawn_blocking(move || extract::unzip_blocking(&zip_path, &target_dir))
            .await
            .map_err(|e| AdapterError::Io {
                path:   PathBuf::new(),
                source: io::Error::other(e),
            })?
    }

    async fn read_dir(&self, path: &Path) -> Result<Vec<FileEntry>> {
        let mut entries = Vec::new();
        let mut reader = tokio::fs::read_dir(path).await.map_err(|e| io_at(path, e))?;

        while let Some(entry) = reader.next_entry().await.map_err(|e| io_at(path, e))? {
            let meta = entry.metadata().await.map_err(|e| io_at(entry.path(), e))?;
            entries.push(FileEntry {
                name:         entry.file_name().to_string_lossy().into_owned(),
                size:         meta.len(),
                is_file:      meta.is_file(),
                is_directory: meta.is_dir(),
            });
        }

        Ok(entries)
    }

    async fn download_file(&self, request: DownloadRequest<'_>) -> Result<DownloadOutcome> {
        let outcome = download_to_file(
            &self.client,
            request.from_url,
            request.to_file,
            request.on_progress,
        )
        .await?;
        Ok(outcome)
    }

    fn supports_install(&self) -> bool { self.install.is_some() }

    async fn install_package(&self, path: &Path) -> Result<()> {
        let Some(hook) = &self.install else {
            return Err(AdapterError::InstallUnsupported);
        };
        hook(path).map_err(|e| AdapterError::InstallFailed {
            path:   path.to_path_buf(),
            source: e,
        })
    }

    async fn open_store(&self, url: &str) -> Result<()> {
        let Some(hook) = &self.store else {
            return Err(AdapterError::StoreFailed {
                url:    url.to_string(),
                reason: "no store hook configured".to_string(),
            });
        };
        hook(url).map_err(|e| AdapterError::StoreFailed {
            url:    url.to_string(),
            reason: e.to_string(),
        })
    }

    fn restart(&self) {
        match &self.restart {
            Some(hook) => hook(),
            None => tracing::warn!("restart requested but no restart hook is configured"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter(dir: &Path) -> HostAdapter {
        HostAdapter::new(dir, "android")
    }

    #[tokio::test]
    async fn test_mkdir_exists_unlink() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = adapter(dir.path());
        let nested = dir.path().join("bundle/temp_extract");

        adapter.mkdir(&nested).await.unwrap();
        assert!(adapter.exists(&nested).await.unwrap());

        adapter.unlink(dir.path().join("bundle").as_path()).await.unwrap();
        assert!(!adapter.exists(&nested).await.unwrap());
    }

    #[tokio::test]
    async fn test_unlink_removes_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = adapter(dir.path());
        let file = dir.path().join("temp.zip");
        std::fs::write(&file, b"zip").unwrap();

        adapter.unlink(&file).await.unwrap();
        assert!(!file.exists());
    }

    #[tokio::test]
    async fn test_move_file_replaces_nothing_extra() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = adapter(dir.path());
        let from = dir.path().join("index.android.bundle");
        let to = dir.path().join("bundle/index.android.bundle");
        std::fs::write(&from, b"v2").unwrap();
        std::fs::create_dir_all(dir.path().join("bundle")).unwrap();

        adapter.move_file(&from, &to).await.unwrap();

        assert!(!from.exists());
        assert_eq!(std::fs::read(&to).unwrap(), b"v2");
    }

    #[tokio::test]
    async fn test_read_dir_reports_kind_and_size() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = adapter(dir.path());
        std::fs::write(dir.path().join("a.bundle"), b"12345").unwrap();
        std::fs::create_dir(dir.path().join("assets")).unwrap();

        let mut entries = adapter.read_dir(dir.path()).await.unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(entries.len(), 2);
        assert!(entries[0].is_file && entries[0].size == 5);
        assert!(entries[1].is_directory);
    }

    #[tokio::test]
    async fn test_install_without_hook_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = adapter(dir.path());

        assert!(!adapter.supports_install());
        let err = adapter.install_package(Path::new("/tmp/u.apk")).await.unwrap_err();
        assert!(matches!(err, AdapterError::InstallUnsupported));
    }
}
