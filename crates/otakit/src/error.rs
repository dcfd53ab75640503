use otakit_adapter::AdapterError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// A second apply was attempted while a session is in flight. Rejected
    /// synchronously; the running session is untouched.
    #[error("an update operation is already in progress")]
    AlreadyInProgress,

    #[error("update download failed: HTTP {status}")]
    DownloadFailed { status: u16 },

    #[error("update download failed: {0}")]
    Network(String),

    #[error("update check failed: {0}")]
    CheckFailed(String),

    #[error("no bundle entry file found in the update archive")]
    BundleNotFound,

    #[error("failed to extract the update archive")]
    ExtractFailed(#[source] AdapterError),

    #[error("this platform cannot install update packages")]
    PlatformUnsupported,

    #[error(transparent)]
    FileSystem(AdapterError),
}

impl From<AdapterError> for EngineError {
    fn from(e: AdapterError) -> Self {
        match e {
            AdapterError::Corrupted | AdapterError::EntryEscapes => EngineError::ExtractFailed(e),
            AdapterError::Download(source) => EngineError::Network(source.to_string()),
            AdapterError::InstallUnsupported => EngineError::PlatformUnsupported,
            other => EngineError::FileSystem(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

impl EngineError {
    /// Short, user-presentable failure text for the notification channel.
    /// The full error chain goes to the log, not the dialog.
    pub(crate) fn user_message(&self) -> String {
        match self {
            EngineError::AlreadyInProgress => "An update is already running.".to_string(),
            EngineError::DownloadFailed { status } => {
                format!("Download failed (HTTP {status}). Please try again later.")
            }
            EngineError::Network(_) | EngineError::CheckFailed(_) => {
                "Could not reach the update server. Please try again later.".to_string()
            }
            EngineError::BundleNotFound | EngineError::ExtractFailed(_) => {
                "The downloaded update was invalid.".to_string()
            }
            EngineError::PlatformUnsupported => {
                "Updates must be installed from the store on this platform.".to_string()
            }
            EngineError::FileSystem(_) => "Could not apply the update.".to_string(),
        }
    }
}
