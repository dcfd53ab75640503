use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("file I/O error at {path}: {source}")]
    Io {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("archive is corrupted")]
    Corrupted,

    #[error("archive entry escapes extraction root")]
    EntryEscapes,

    #[error(transparent)]
    Download(#[from] otakit_fetch::FetchError),

    #[error("package install is not supported by this adapter")]
    InstallUnsupported,

    #[error("failed to open store URL {url}: {reason}")]
    StoreFailed { url: String, reason: String },

    #[error("package install failed for {path}: {source}")]
    InstallFailed {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, AdapterError>;

pub(crate) fn io_at(path: impl AsRef<Path>, source: io::Error) -> AdapterError {
    AdapterError::Io {
        path: path.as_ref().to_path_buf(),
        source,
    }
}
