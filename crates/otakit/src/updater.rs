use std::path::Path;

use futures_util::StreamExt;
use otakit_adapter::StorageAdapter;
use otakit_fetch::{HttpClient, ReqwestClient};
use url::Url;

use crate::classify::{Action, classify};
use crate::config::UpdaterConfig;
use crate::descriptor::{CheckEnvelope, UpdateDescriptor};
use crate::error::{EngineError, Result};
use crate::layout::BundleLayout;
use crate::notify::{NotificationChannel, NoticePatch, Subscriber, Subscription};
use crate::session::{Session, UpdatePhase};

/// Snapshot of the on-device bundle state, for diagnosing stale-asset
/// problems.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleStatus {
    pub bundle_present: bool,
    /// Entry-file candidates found at the bundle root. More than one means
    /// a previous apply was interrupted.
    pub bundle_files:   Vec<String>,
    /// Known resource directories and whether each is present.
    pub resource_dirs:  Vec<(String, bool)>,
    /// Full bundle-root listing.
    pub listing:        Vec<String>,
}

/// The updater: one instance per running application.
///
/// Holds the injected [`StorageAdapter`], the check-endpoint HTTP client,
/// the single update [session](UpdatePhase), and the notification channel
/// UI layers subscribe to. The public check/show surface never lets an
/// internal failure escape; errors become notifications. The typed
/// contracts are [`Updater::apply_ota`] and [`Updater::apply_force`].
pub struct Updater<A: StorageAdapter, C: HttpClient = ReqwestClient> {
    pub(crate) adapter:      A,
    pub(crate) check_client: C,
    pub(crate) config:       UpdaterConfig,
    pub(crate) layout:       BundleLayout,
    pub(crate) session:      Session,
    pub(crate) channel:      NotificationChannel,
}

impl<A: StorageAdapter> Updater<A, ReqwestClient> {
    /// Build an updater and bootstrap the bundle directory.
    pub async fn new(adapter: A, config: UpdaterConfig) -> Result<Self> {
        Self::with_check_client(adapter, config, ReqwestClient::new()).await
    }
}

impl<A: StorageAdapter, C: HttpClient> Updater<A, C> {
    /// Like [`Updater::new`] with an explicit client for the check
    /// endpoint, which is how tests substitute the server.
    pub async fn with_check_client(adapter: A, config: UpdaterConfig, check_client: C) -> Result<Self> {
        let layout = BundleLayout::new(adapter.document_directory());

        if !adapter.exists(layout.root()).await? {
            adapter.mkdir(layout.root()).await?;
        }

        Ok(Self {
            adapter,
            check_client,
            config,
            layout,
            session: Session::new(),
            channel: NotificationChannel::new(),
        })
    }

    /// Register a notification subscriber, replacing any previous one.
    pub fn subscribe(&self, subscriber: Subscriber) -> Subscription {
        self.channel.subscribe(subscriber)
    }

    /// Phase of the in-flight session, `Idle` when none.
    pub fn phase(&self) -> UpdatePhase { self.session.phase() }

    /// Progress of the in-flight session in [0, 1].
    pub fn progress(&self) -> f32 { self.session.progress() }

    /// Ask the server for an update and, if one is offered, classify and
    /// apply it. Returns the offered descriptor, or `None` when the server
    /// has nothing newer. `None` is also returned when the check itself
    /// failed; the failure is logged and surfaced as a notification rather
    /// than returned.
    pub async fn check_for_updates(&self) -> Option<UpdateDescriptor> {
        match self.fetch_descriptor().await {
            Ok(Some(descriptor)) => {
                self.show_update(&descriptor).await;
                Some(descriptor)
            }
            Ok(None) => {
                tracing::debug!("no update offered");
                None
            }
            Err(error) => {
                tracing::warn!(%error, "update check failed");
                self.notify_failure(&error);
                None
            }
        }
    }

    /// Manual trigger with a descriptor obtained out of band (e.g. from a
    /// push notification), bypassing the server check. Failures surface
    /// through the notification channel, never as a return value.
    pub async fn show_update(&self, descriptor: &UpdateDescriptor) {
        match classify(&self.config, descriptor) {
            Action::NoOp => {
                tracing::debug!(
                    offered = %descriptor.target_version,
                    current = %self.config.current_version,
                    "offered version is not newer"
                );
            }
            Action::RunOtaUpdate => self.run_ota(descriptor).await,
            Action::RunForceUpdate => self.run_force(descriptor).await,
        }
    }

    async fn run_ota(&self, descriptor: &UpdateDescriptor) {
        self.channel.emit(
            &NoticePatch::dialog("Update available", announcement(descriptor)).with_progress_bar(),
        );

        match self.apply_ota(descriptor).await {
            Ok(()) => {
                self.channel.emit(
                    &NoticePatch::dialog("Update installed", "Restart the app to finish updating.")
                        .confirmable(true)
                        .cancelable(true),
                );
            }
            Err(error) => {
                tracing::warn!(%error, "OTA update failed");
                self.notify_failure(&error);
            }
        }
    }

    async fn run_force(&self, descriptor: &UpdateDescriptor) {
        if self.adapter.supports_install() {
            self.channel.emit(
                &NoticePatch::dialog("Update required", announcement(descriptor))
                    .with_progress_bar(),
            );
        }

        match self.apply_force(descriptor).await {
            Ok(Some(path)) => {
                tracing::debug!(path = %path.display(), "installer downloaded, awaiting trigger");
                self.channel.emit(
                    &NoticePatch::dialog(
                        "Update downloaded",
                        "The new version is ready to install.",
                    )
                    .confirmable(true),
                );
            }
            Ok(None) => {
                // Store redirect: nothing to render locally.
                self.channel.emit(&NoticePatch {
                    visible: Some(false),
                    ..NoticePatch::default()
                });
            }
            Err(error) => {
                tracing::warn!(%error, "force update failed");
                self.notify_failure(&error);
            }
        }
    }

    async fn fetch_descriptor(&self) -> Result<Option<UpdateDescriptor>> {
        let base = self.config.server_url.trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}/ota/check"))
            .map_err(|e| EngineError::CheckFailed(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("appName", &self.config.app_identifier)
            .append_pair("platform", self.adapter.platform())
            .append_pair("version", &self.config.current_version);

        let response = self
            .check_client
            .get(url.as_str())
            .await
            .map_err(|e| EngineError::CheckFailed(e.to_string()))?;

        if response.status != 200 {
            return Err(EngineError::CheckFailed(format!("HTTP {}", response.status)));
        }

        let mut body = response.body;
        let mut raw = Vec::new();
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| EngineError::CheckFailed(e.to_string()))?;
            raw.extend_from_slice(&chunk);
        }

        let envelope: CheckEnvelope =
            serde_json::from_slice(&raw).map_err(|e| EngineError::CheckFailed(e.to_string()))?;
        tracing::debug!(code = envelope.code, msg = %envelope.msg, "update check answered");

        match envelope {
            CheckEnvelope {
                code: 200,
                data: Some(data),
                ..
            } => Ok(Some(data.into())),
            _ => Ok(None),
        }
    }

    /// Delete the active bundle file and known resource directories,
    /// falling back to the native bundle on the next launch.
    pub async fn clear_ota_updates(&self) -> Result<()> {
        let root = self.layout.root();
        if !self.adapter.exists(root).await? {
            return Ok(());
        }

        for entry in self.adapter.read_dir(root).await? {
            if entry.is_file && BundleLayout::is_bundle_candidate(&entry.name) {
                self.adapter.unlink(&root.join(&entry.name)).await?;
            }
        }

        for dir in BundleLayout::resource_dirs(self.config.framework_kind) {
            let path = root.join(dir);
            if self.adapter.exists(&path).await? {
                self.adapter.unlink(&path).await?;
            }
        }

        tracing::info!("OTA state cleared, native bundle active on next launch");
        Ok(())
    }

    /// Report the on-device bundle state.
    pub async fn inspect(&self) -> Result<BundleStatus> {
        let root = self.layout.root();

        let listing: Vec<String> = if self.adapter.exists(root).await? {
            self.adapter
                .read_dir(root)
                .await?
                .into_iter()
                .map(|entry| entry.name)
                .collect()
        } else {
            Vec::new()
        };

        let bundle_files: Vec<String> = listing
            .iter()
            .filter(|name| BundleLayout::is_bundle_candidate(name))
            .cloned()
            .collect();

        let mut resource_dirs = Vec::new();
        for dir in BundleLayout::resource_dirs(self.config.framework_kind) {
            let present = self.adapter.exists(&root.join(dir)).await?;
            resource_dirs.push((dir.to_string(), present));
        }

        Ok(BundleStatus {
            bundle_present: !bundle_files.is_empty(),
            bundle_files,
            resource_dirs,
            listing,
        })
    }

    /// Explicitly hand a downloaded installer to the platform. The one
    /// trigger for the package [`Updater::apply_force`] left waiting.
    pub async fn install_package(&self, path: &Path) -> Result<()> {
        self.adapter.install_package(path).await.map_err(Into::into)
    }

    /// Relaunch the application to pick up the replaced bundle. Final
    /// action: on production adapters nothing runs after it.
    pub fn restart(&self) {
        tracing::info!("restarting to apply update");
        self.adapter.restart();
    }

    pub(crate) fn notify_failure(&self, error: &EngineError) {
        self.channel.emit(
            &NoticePatch::dialog("Update failed", error.user_message())
                .confirmable(true)
                .cancelable(true),
        );
    }
}

fn announcement(descriptor: &UpdateDescriptor) -> String {
    match &descriptor.changelog {
        Some(changelog) => format!("Version {}\n{}", descriptor.target_version, changelog),
        None => format!("Version {}", descriptor.target_version),
    }
}
