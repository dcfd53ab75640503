use std::io;
use std::path::Path;

use crate::error::{AdapterError, Result, io_at};

/// Extract a zip archive into `target_dir`.
///
/// Entry paths are resolved through `enclosed_name`, so entries that would
/// escape the extraction root (zip-slip) are rejected rather than written.
/// Runs synchronously; callers offload it to a blocking task.
pub(crate) fn unzip_blocking(zip_path: &Path, target_dir: &Path) -> Result<()> {
    let file = std::fs::File::open(zip_path).map_err(|e| io_at(zip_path, e))?;
    let mut archive = zip::ZipArchive::new(file).map_err(|_| AdapterError::Corrupted)?;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(|_| AdapterError::Corrupted)?;

        let relative = entry.enclosed_name().ok_or(AdapterError::EntryEscapes)?;
        let dest = target_dir.join(relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&dest).map_err(|e| io_at(&dest, e))?;
            continue;
        }

        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).map_err(|e| io_at(parent, e))?;
        }

        let mut out = std::fs::File::create(&dest).map_err(|e| io_at(&dest, e))?;
        io::copy(&mut entry, &mut out).map_err(|e| io_at(&dest, e))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn fixture_zip(dir: &Path) -> std::path::PathBuf {
        let zip_path = dir.join("fixture.zip");
        let file = std::fs::File::create(&zip_path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();

        writer.start_file("index.android.bundle", options).unwrap();
        writer.write_all(b"bundle-bytes").unwrap();
        writer.add_directory("assets", options).unwrap();
        writer.start_file("assets/logo.png", options).unwrap();
        writer.write_all(b"png-bytes").unwrap();
        writer.finish().unwrap();

        zip_path
    }

    #[test]
    fn test_unzip_extracts_files_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        let zip_path = fixture_zip(dir.path());
        let target = dir.path().join("out");
        std::fs::create_dir_all(&target).unwrap();

        unzip_blocking(&zip_path, &target).unwrap();

        assert_eq!(
            std::fs::read(target.join("index.android.bundle")).unwrap(),
            b"bundle-bytes"
        );
        assert_eq!(std::fs::read(target.join("assets/logo.png")).unwrap(), b"png-bytes");
    }

    #[test]
    fn test_unzip_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let zip_path = dir.path().join("broken.zip");
        std::fs::write(&zip_path, b"definitely not a zip").unwrap();
        let target = dir.path().join("out");
        std::fs::create_dir_all(&target).unwrap();

        let err = unzip_blocking(&zip_path, &target).unwrap_err();
        assert!(matches!(err, AdapterError::Corrupted));
    }
}
