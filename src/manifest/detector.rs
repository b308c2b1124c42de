//! go.mod location
//!
//! Resolves the manifest location handed in by the caller:
//! - no location: `./go.mod`
//! - a directory: `<dir>/go.mod`
//! - a file: used as given

use crate::error::CheckError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File name of a Go module manifest
pub const MANIFEST_FILE_NAME: &str = "go.mod";

/// Resolve the manifest path for a location without touching the network
pub fn locate_manifest(location: Option<&Path>) -> Result<PathBuf, CheckError> {
    let location = location.unwrap_or_else(|| Path::new("."));

    let path = if location.is_dir() {
        location.join(MANIFEST_FILE_NAME)
    } else {
        location.to_path_buf()
    };

    if !path.is_file() {
        return Err(CheckError::not_found(path));
    }

    Ok(path)
}

/// Directory containing the manifest, used for config lookup and temp files
pub fn manifest_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Read a manifest, mapping a missing file to `ManifestNotFound`
pub fn read_manifest(path: &Path) -> Result<String, CheckError> {
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            CheckError::not_found(path)
        } else {
            CheckError::ManifestRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_locate_in_directory() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("go.mod"), "module example.com/m\n").unwrap();

        let path = locate_manifest(Some(dir.path())).unwrap();
        assert_eq!(path, dir.path().join("go.mod"));
    }

    #[test]
    fn test_locate_explicit_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("custom.mod");
        fs::write(&file, "module example.com/m\n").unwrap();

        assert_eq!(locate_manifest(Some(&file)).unwrap(), file);
    }

    #[test]
    fn test_locate_missing() {
        let dir = TempDir::new().unwrap();
        let err = locate_manifest(Some(dir.path())).unwrap_err();
        assert!(matches!(err, CheckError::ManifestNotFound { .. }));

        let err = locate_manifest(Some(&dir.path().join("nope/go.mod"))).unwrap_err();
        assert!(matches!(err, CheckError::ManifestNotFound { .. }));
    }

    #[test]
    fn test_manifest_dir() {
        assert_eq!(manifest_dir(Path::new("go.mod")), Path::new("."));
        assert_eq!(manifest_dir(Path::new("/a/b/go.mod")), Path::new("/a/b"));
    }

    #[test]
    fn test_read_manifest_not_found() {
        let err = read_manifest(Path::new("/nonexistent/path/go.mod")).unwrap_err();
        assert!(matches!(err, CheckError::ManifestNotFound { .. }));
    }
}
