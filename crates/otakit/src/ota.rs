//! OTA apply engine: download, extract, and atomically supersede the
//! active bundle.

use std::sync::Arc;

use otakit_adapter::{DownloadRequest, StorageAdapter};
use otakit_fetch::{HttpClient, ProgressFn, TransferProgress};

use crate::descriptor::UpdateDescriptor;
use crate::error::{EngineError, Result};
use crate::layout::BundleLayout;
use crate::notify::NoticePatch;
use crate::session::{SessionGuard, UpdatePhase};
use crate::updater::Updater;

/// Share of overall progress assigned to the download; it dominates
/// perceived time.
const DOWNLOAD_SHARE: f32 = 0.70;

const PROGRESS_EXTRACT_START: f32 = 0.75;
const PROGRESS_EXTRACT_DONE: f32 = 0.85;
const PROGRESS_REPLACED: f32 = 0.95;

impl<A: StorageAdapter, C: HttpClient> Updater<A, C> {
    /// Download and apply a bundle-patch update.
    ///
    /// Fails fast with [`EngineError::AlreadyInProgress`] if a session is
    /// in flight. On any failure the temp artifacts are removed before the
    /// error propagates; the session returns to `Idle` on every exit path.
    pub async fn apply_ota(&self, descriptor: &UpdateDescriptor) -> Result<()> {
        let guard = self.session.begin()?;

        let result = self.apply_ota_steps(descriptor, &guard).await;
        if result.is_err() {
            self.cleanup_temp().await;
        }
        result
    }

    async fn apply_ota_steps(
        &self,
        descriptor: &UpdateDescriptor,
        guard: &SessionGuard,
    ) -> Result<()> {
        let root = self.layout.root().to_path_buf();
        if !self.adapter.exists(&root).await? {
            self.adapter.mkdir(&root).await?;
        }

        let download_url = self.config.resolve_download_url(&descriptor.download_url);
        let temp_zip = self.layout.temp_zip();
        tracing::info!(url = %download_url, version = %descriptor.target_version, "downloading OTA bundle");

        let outcome = {
            let progress = self.download_progress_sink(DOWNLOAD_SHARE);
            self.adapter
                .download_file(DownloadRequest {
                    from_url:    &download_url,
                    to_file:     &temp_zip,
                    on_progress: Some(&progress),
                })
                .await?
        };

        if outcome.status_code != 200 {
            return Err(EngineError::DownloadFailed {
                status: outcome.status_code,
            });
        }

        guard.set_phase(UpdatePhase::Extracting);
        self.report_progress(PROGRESS_EXTRACT_START);

        let temp_extract = self.layout.temp_extract();
        if self.adapter.exists(&temp_extract).await? {
            self.adapter.unlink(&temp_extract).await?;
        }
        self.adapter.mkdir(&temp_extract).await?;
        self.adapter.unzip_file(&temp_zip, &temp_extract).await?;
        self.report_progress(PROGRESS_EXTRACT_DONE);

        let extracted = self.adapter.read_dir(&temp_extract).await?;
        let entry_file = extracted
            .iter()
            .filter(|e| e.is_file && BundleLayout::is_bundle_candidate(&e.name))
            .max_by_key(|e| e.size)
            .ok_or(EngineError::BundleNotFound)?
            .clone();
        tracing::debug!(entry = %entry_file.name, size = entry_file.size, "bundle entry file selected");

        guard.set_phase(UpdatePhase::Replacing);

        // Supersede the previous entry file. The filename of the new one
        // is preserved; some runtimes require the bytecode extension to
        // match exactly.
        for existing in self.adapter.read_dir(&root).await? {
            if existing.is_file && BundleLayout::is_bundle_candidate(&existing.name) {
                self.adapter.unlink(&root.join(&existing.name)).await?;
            }
        }
        self.adapter
            .move_file(&temp_extract.join(&entry_file.name), &root.join(&entry_file.name))
            .await?;

        // Flush all previous resource content, then move the extracted
        // resources in. Lesser bundle candidates stay behind as scrap so
        // exactly one entry file remains.
        //
        // A crash between the entry move above and this loop leaves the
        // new bundle next to stale resources; there is no journal, and the
        // next successful apply (or clear_ota_updates) heals it.
        for existing in self.adapter.read_dir(&root).await? {
            if existing.name == entry_file.name || BundleLayout::is_temp_artifact(&existing.name) {
                continue;
            }
            self.adapter.unlink(&root.join(&existing.name)).await?;
        }

        for item in self.adapter.read_dir(&temp_extract).await? {
            if item.name == entry_file.name {
                continue;
            }
            if item.is_file && BundleLayout::is_bundle_candidate(&item.name) {
                continue;
            }
            self.adapter
                .move_file(&temp_extract.join(&item.name), &root.join(&item.name))
                .await?;
        }

        self.report_progress(PROGRESS_REPLACED);
        self.cleanup_temp().await;
        self.report_progress(1.0);

        tracing::info!(version = %descriptor.target_version, "OTA bundle applied");
        Ok(())
    }

    /// Progress callback for a download scaled into `[0, share]` of the
    /// overall session progress.
    pub(crate) fn download_progress_sink(&self, share: f32) -> ProgressFn {
        let session = self.session.clone();
        let channel = self.channel.clone();

        Arc::new(move |progress: &TransferProgress| {
            let Some(total) = progress.content_length else {
                return;
            };
            if total == 0 {
                return;
            }
            let fraction = (progress.bytes_written as f64 / total as f64) as f32 * share;
            let effective = session.advance_progress(fraction);
            channel.emit(&NoticePatch::progress(effective));
        })
    }

    pub(crate) fn report_progress(&self, fraction: f32) {
        let effective = self.session.advance_progress(fraction);
        self.channel.emit(&NoticePatch::progress(effective));
    }

    /// Best-effort removal of the session temp artifacts. Failures are
    /// logged, never escalated: on the success path the functional update
    /// already landed, on the failure path the primary error must
    /// propagate.
    pub(crate) async fn cleanup_temp(&self) {
        for path in [self.layout.temp_zip(), self.layout.temp_extract()] {
            match self.adapter.exists(&path).await {
                Ok(true) => {
                    if let Err(error) = self.adapter.unlink(&path).await {
                        tracing::warn!(path = %path.display(), %error, "failed to remove temp artifact");
                    }
                }
                Ok(false) => {}
                Err(error) => {
                    tracing::warn!(path = %path.display(), %error, "could not check temp artifact");
                }
            }
        }
    }
}
