use serde::{Deserialize, Serialize};

/// How an update is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateKind {
    /// Bundle patch: replace the interpreted bundle and its resources
    /// without reinstalling the native shell.
    Ota,
    /// Full native package (or store redirect).
    Force,
}

/// A server-offered update. Immutable once produced from the check
/// response; the engine never mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateDescriptor {
    pub target_version:     String,
    pub kind:               UpdateKind,
    /// May reference a dev-host placeholder (`localhost`) that is
    /// substituted before download, since the download runs on a device
    /// rather than the build host.
    pub download_url:       String,
    pub changelog:          Option<String>,
    pub min_native_version: Option<String>,
}

/// Wire envelope of `GET /ota/check`.
#[derive(Debug, Deserialize)]
pub(crate) struct CheckEnvelope {
    pub code: u32,
    #[serde(default)]
    pub msg:  String,
    pub data: Option<CheckData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CheckData {
    pub version:         String,
    #[serde(default)]
    pub update_type:     Option<String>,
    pub download_url:    String,
    #[serde(default)]
    pub description:     Option<String>,
    #[serde(default)]
    pub min_app_version: Option<String>,
}

impl From<CheckData> for UpdateDescriptor {
    fn from(data: CheckData) -> Self {
        // Anything other than an explicit "full" is a bundle patch.
        let kind = match data.update_type.as_deref() {
            Some("full") => UpdateKind::Force,
            _ => UpdateKind::Ota,
        };

        UpdateDescriptor {
            target_version: data.version,
            kind,
            download_url: data.download_url,
            changelog: data.description,
            min_native_version: data.min_app_version,
        }
    }
}
