use std::path::{Path, PathBuf};

use crate::config::FrameworkKind;

/// Directory under the document directory holding the active bundle.
const BUNDLE_DIR: &str = "bundle";

/// Session-scoped download target.
const TEMP_ZIP: &str = "temp.zip";

/// Session-scoped extraction scratch directory.
const TEMP_EXTRACT: &str = "temp_extract";

/// Resource directories shipped next to the bundle in bare builds:
/// density-qualified drawables plus raw resources.
const BARE_RESOURCE_DIRS: &[&str] = &[
    "drawable-mdpi",
    "drawable-hdpi",
    "drawable-xhdpi",
    "drawable-xxhdpi",
    "drawable-xxxhdpi",
    "raw",
];

/// Managed builds keep everything under a generic assets directory.
const MANAGED_RESOURCE_DIRS: &[&str] = &["assets"];

/// On-device bundle storage layout: one root, one active entry file, the
/// framework's resource directories next to it, and the two temp
/// artifacts used while a session is in flight.
#[derive(Debug, Clone)]
pub(crate) struct BundleLayout {
    root: PathBuf,
}

impl BundleLayout {
    pub fn new(document_dir: &Path) -> Self {
        Self {
            root: document_dir.join(BUNDLE_DIR),
        }
    }

    pub fn root(&self) -> &Path { &self.root }

    pub fn temp_zip(&self) -> PathBuf { self.root.join(TEMP_ZIP) }

    pub fn temp_extract(&self) -> PathBuf { self.root.join(TEMP_EXTRACT) }

    /// Resource directory names known to belong to a framework kind. With
    /// no kind configured the union is used, so recovery paths clear
    /// everything either layout could have written.
    pub fn resource_dirs(framework: Option<FrameworkKind>) -> Vec<&'static str> {
        match framework {
            Some(FrameworkKind::Bare) => BARE_RESOURCE_DIRS.to_vec(),
            Some(FrameworkKind::Managed) => MANAGED_RESOURCE_DIRS.to_vec(),
            None => {
                let mut all = BARE_RESOURCE_DIRS.to_vec();
                all.extend_from_slice(MANAGED_RESOURCE_DIRS);
                all
            }
        }
    }

    /// Whether a file name looks like a bundle entry file: the bundle
    /// marker anywhere in the name, or the bytecode-package extension.
    pub fn is_bundle_candidate(name: &str) -> bool {
        name.contains(".bundle") || name.ends_with(".hbc")
    }

    /// Temp artifacts are session-scoped and never treated as bundle
    /// content.
    pub fn is_temp_artifact(name: &str) -> bool {
        name == TEMP_ZIP || name == TEMP_EXTRACT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_hang_off_document_dir() {
        let layout = BundleLayout::new(Path::new("/data/app"));
        assert_eq!(layout.root(), Path::new("/data/app/bundle"));
        assert_eq!(layout.temp_zip(), Path::new("/data/app/bundle/temp.zip"));
        assert_eq!(layout.temp_extract(), Path::new("/data/app/bundle/temp_extract"));
    }

    #[test]
    fn test_bundle_candidates() {
        assert!(BundleLayout::is_bundle_candidate("index.android.bundle"));
        assert!(BundleLayout::is_bundle_candidate("index.ios.bundle.meta"));
        assert!(BundleLayout::is_bundle_candidate("app.hbc"));
        assert!(!BundleLayout::is_bundle_candidate("logo.png"));
        assert!(!BundleLayout::is_bundle_candidate("assets"));
    }

    #[test]
    fn test_temp_artifacts() {
        assert!(BundleLayout::is_temp_artifact("temp.zip"));
        assert!(BundleLayout::is_temp_artifact("temp_extract"));
        assert!(!BundleLayout::is_temp_artifact("index.android.bundle"));
    }

    #[test]
    fn test_resource_dirs_per_framework() {
        assert_eq!(
            BundleLayout::resource_dirs(Some(FrameworkKind::Managed)),
            vec!["assets"]
        );
        assert!(BundleLayout::resource_dirs(Some(FrameworkKind::Bare)).contains(&"raw"));
        assert_eq!(BundleLayout::resource_dirs(None).len(), 7);
    }
}
