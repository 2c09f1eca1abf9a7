//! Library archive discovery

use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// Library archives at `location`.
///
/// A file is included only if it has `extension`; a directory contributes
/// every matching file beneath it. Results are sorted.
pub fn collect_libraries(location: &Path, extension: &str) -> Vec<PathBuf> {
    let extension = extension.trim_start_matches('.');

    if location.is_file() {
        return if has_extension(location, extension) {
            vec![location.to_path_buf()]
        } else {
            Vec::new()
        };
    }

    if !location.is_dir() {
        warn!(location = %location.display(), "Library location does not exist");
        return Vec::new();
    }

    let mut libraries: Vec<PathBuf> = WalkDir::new(location)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(location = %location.display(), error = %e, "Skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && has_extension(entry.path(), extension))
        .map(|entry| entry.into_path())
        .collect();
    libraries.sort();
    libraries
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, "").unwrap();
    }

    #[test]
    fn test_directory_keeps_only_archives() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("a.jar"));
        touch(&dir.path().join("b.jar"));
        touch(&dir.path().join("c.txt"));

        assert_eq!(
            collect_libraries(dir.path(), "jar"),
            vec![dir.path().join("a.jar"), dir.path().join("b.jar")]
        );
    }

    #[test]
    fn test_directory_is_recursive() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("nested/deeper/x.jar"));
        assert_eq!(
            collect_libraries(dir.path(), ".jar"),
            vec![dir.path().join("nested/deeper/x.jar")]
        );
    }

    #[test]
    fn test_single_archive_file() {
        let dir = TempDir::new().unwrap();
        let jar = dir.path().join("a.jar");
        touch(&jar);
        assert_eq!(collect_libraries(&jar, "jar"), vec![jar]);
    }

    #[test]
    fn test_single_non_archive_file() {
        let dir = TempDir::new().unwrap();
        let txt = dir.path().join("a.txt");
        touch(&txt);
        assert!(collect_libraries(&txt, "jar").is_empty());
    }

    #[test]
    fn test_missing_location() {
        let dir = TempDir::new().unwrap();
        assert!(collect_libraries(&dir.path().join("libs"), "jar").is_empty());
    }
}
