//! Force update engine: fetch a full native package, or redirect to the
//! store when the platform cannot install one.

use std::path::PathBuf;

use otakit_adapter::{DownloadRequest, StorageAdapter};
use otakit_fetch::HttpClient;

use crate::descriptor::UpdateDescriptor;
use crate::error::{EngineError, Result};
use crate::session::UpdatePhase;
use crate::updater::Updater;

/// Fixed download target under the document directory.
const INSTALLER_FILE: &str = "update.apk";

impl<A: StorageAdapter, C: HttpClient> Updater<A, C> {
    /// Download a full native package and report it ready.
    ///
    /// Returns the local installer path; installing is NOT triggered here.
    /// The caller decides when to hand it to
    /// [`Updater::install_package`], typically behind a user confirmation.
    ///
    /// When the adapter cannot install packages at all, the store page is
    /// opened instead, nothing is downloaded, and `None` is returned.
    pub async fn apply_force(&self, descriptor: &UpdateDescriptor) -> Result<Option<PathBuf>> {
        if !self.adapter.supports_install() {
            tracing::info!(url = %descriptor.download_url, "package install unsupported, redirecting to store");
            self.adapter.open_store(&descriptor.download_url).await?;
            return Ok(None);
        }

        let guard = self.session.begin()?;

        let download_url = self.config.resolve_download_url(&descriptor.download_url);
        let dest = self.adapter.document_directory().join(INSTALLER_FILE);
        tracing::info!(url = %download_url, version = %descriptor.target_version, "downloading installer package");

        let outcome = {
            // No extraction phase: the download spans the whole bar.
            let progress = self.download_progress_sink(1.0);
            self.adapter
                .download_file(DownloadRequest {
                    from_url:    &download_url,
                    to_file:     &dest,
                    on_progress: Some(&progress),
                })
                .await?
        };

        if outcome.status_code != 200 {
            return Err(EngineError::DownloadFailed {
                status: outcome.status_code,
            });
        }

        guard.set_phase(UpdatePhase::AwaitingInstall);
        self.report_progress(1.0);
        tracing::info!(path = %dest.display(), "installer package ready");

        Ok(Some(dest))
    }
}
