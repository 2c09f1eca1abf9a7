//! Source discovery

use crate::build::SourceUnit;
use std::path::Path;
use tracing::{debug, error};
use walkdir::WalkDir;

/// Finds the source units of a build.
///
/// `None` means indexing itself failed and nothing should be compiled. An
/// empty vector is a successful index of an empty tree.
pub trait SourceIndexer: Send + Sync {
    fn index_files(&self, input_dir: &Path) -> Option<Vec<SourceUnit>>;
}

/// Indexes files by extension under the input directory
#[derive(Debug, Clone)]
pub struct FileSystemIndexer {
    extensions: Vec<String>,
}

impl FileSystemIndexer {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|ext| ext.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_ascii_lowercase();
                self.extensions.iter().any(|wanted| *wanted == ext)
            })
            .unwrap_or(false)
    }
}

impl SourceIndexer for FileSystemIndexer {
    fn index_files(&self, input_dir: &Path) -> Option<Vec<SourceUnit>> {
        if !input_dir.is_dir() {
            error!(input = %input_dir.display(), "Input directory does not exist");
            return None;
        }

        let mut units = Vec::new();
        for entry in WalkDir::new(input_dir).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    error!(input = %input_dir.display(), error = %e, "Failed to index sources");
                    return None;
                }
            };
            if !entry.file_type().is_file() || !self.matches(entry.path()) {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(input_dir)
                .unwrap_or(entry.path())
                .to_path_buf();
            units.push(SourceUnit::new(entry.path(), relative));
        }
        units.sort();

        debug!(input = %input_dir.display(), units = units.len(), "Indexed sources");
        Some(units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_indexes_nested_matching_files() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("com/example")).unwrap();
        std::fs::write(dir.path().join("Main.java"), "").unwrap();
        std::fs::write(dir.path().join("com/example/Util.JAVA"), "").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();

        let units = FileSystemIndexer::new([".java"])
            .index_files(dir.path())
            .unwrap();
        let relative: Vec<_> = units.into_iter().map(|u| u.relative).collect();

        assert_eq!(
            relative,
            vec![
                PathBuf::from("Main.java"),
                PathBuf::from("com/example/Util.JAVA"),
            ]
        );
    }

    #[test]
    fn test_missing_directory_is_failure() {
        let dir = TempDir::new().unwrap();
        assert!(FileSystemIndexer::new(["py"])
            .index_files(&dir.path().join("absent"))
            .is_none());
    }

    #[test]
    fn test_empty_directory_is_empty_index() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            FileSystemIndexer::new(["py"]).index_files(dir.path()),
            Some(Vec::new())
        );
    }
}
