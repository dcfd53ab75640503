use url::Url;

/// Whether the embedding app is a bare framework build or a managed one.
/// Decides which resource directories ride along with the bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameworkKind {
    Bare,
    Managed,
}

/// Construction-time updater configuration. Set once; `current_version` is
/// the comparison baseline and is never mutated by an in-flight update.
/// Only a successful restart picks up the new baseline.
#[derive(Debug, Clone)]
pub struct UpdaterConfig {
    pub server_url:      String,
    pub app_identifier:  String,
    pub current_version: String,
    /// Development host substituted for `localhost` in download URLs,
    /// e.g. "192.168.1.100" or "10.0.2.2".
    pub dev_server_host: Option<String>,
    pub framework_kind:  Option<FrameworkKind>,
}

impl UpdaterConfig {
    pub fn new(
        server_url: impl Into<String>,
        app_identifier: impl Into<String>,
        current_version: impl Into<String>,
    ) -> Self {
        Self {
            server_url:      server_url.into(),
            app_identifier:  app_identifier.into(),
            current_version: current_version.into(),
            dev_server_host: None,
            framework_kind:  None,
        }
    }

    #[must_use]
    pub fn dev_server_host(mut self, host: impl Into<String>) -> Self {
        self.dev_server_host = Some(host.into());
        self
    }

    #[must_use]
    pub fn framework_kind(mut self, kind: FrameworkKind) -> Self {
        self.framework_kind = Some(kind);
        self
    }

    /// Rewrite `localhost`/`127.0.0.1` download URLs to the configured dev
    /// host. URLs that do not parse are passed through untouched and left
    /// to fail at download time.
    pub(crate) fn resolve_download_url(&self, raw: &str) -> String {
        let Some(dev_host) = &self.dev_server_host else {
            return raw.to_string();
        };

        let Ok(mut url) = Url::parse(raw) else {
            return raw.to_string();
        };

        match url.host_str() {
            Some("localhost") | Some("127.0.0.1") => {
                if url.set_host(Some(dev_host)).is_ok() {
                    url.to_string()
                } else {
                    raw.to_string()
                }
            }
            _ => raw.to_string(),
        }
    }
}
