//! Client-side OTA update engine.
//!
//! The engine checks an update server and classifies what it offers. A
//! bundle patch (OTA) is downloaded and unpacked over the active bundle
//! through an injected [`StorageAdapter`]. A full native package (force)
//! is downloaded and handed to the platform installer, or redirected to
//! the store. Progress and dialog state flow through a per-updater
//! [notification channel](notify); the engine has no UI dependency.
//!
//! # Flow
//!
//! ```text
//! check_for_updates ── server ──> UpdateDescriptor
//!        │                             │
//!        └──────> classify ────────────┤
//!                    │ NoOp            │
//!                    │ RunOtaUpdate ──> apply_ota   (download → extract → replace)
//!                    │ RunForceUpdate > apply_force (download → awaiting install)
//! ```
//!
//! One update session runs at a time per [`Updater`]; a second apply call
//! while one is in flight fails fast with
//! [`EngineError::AlreadyInProgress`]. Temp artifacts (`bundle/temp.zip`,
//! `bundle/temp_extract/`) are removed on every exit path.

mod classify;
mod config;
mod descriptor;
mod error;
mod force;
mod layout;
mod notify;
mod ota;
mod session;
mod updater;

pub use classify::{Action, classify};
pub use config::{FrameworkKind, UpdaterConfig};
pub use descriptor::{UpdateDescriptor, UpdateKind};
pub use error::{EngineError, Result};
pub use notify::{NoticePatch, NotificationChannel, Subscriber, Subscription};
pub use session::UpdatePhase;
pub use updater::{BundleStatus, Updater};

pub use otakit_adapter::{
    AdapterError, DownloadRequest, FileEntry, HostAdapter, StorageAdapter,
};
pub use otakit_fetch::{HttpClient, ReqwestClient};
