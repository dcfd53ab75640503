//! Storage adapter capability set and host implementation.
//!
//! The update engine never touches the filesystem, the network, or the
//! process directly; it drives a [`StorageAdapter`], the capability set a
//! target platform must provide. Which adapter backs an updater is an
//! explicit construction-time choice of the embedding application; there
//! is no environment sniffing.
//!
//! [`HostAdapter`] is the production implementation for ordinary hosts:
//! `tokio::fs` primitives, streaming downloads via `otakit-fetch`, and zip
//! extraction offloaded to a blocking task. Platform-destructive
//! capabilities (package install, store redirect, process restart) are
//! injected as hooks because their meaning is application-specific.

mod adapter;
mod error;
mod extract;
mod host;

pub use adapter::{DownloadRequest, FileEntry, StorageAdapter};
pub use error::{AdapterError, Result};
pub use host::{HostAdapter, InstallHook, RestartHook, StoreHook};
