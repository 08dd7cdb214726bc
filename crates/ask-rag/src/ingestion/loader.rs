//! Plain-text document loading from the data directory

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::types::Document;

/// Loads every file with a given extension from a single directory
pub struct DocumentLoader {
    extension: String,
}

impl DocumentLoader {
    /// Create a loader for files ending in `.{extension}`
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into().trim_start_matches('.').to_lowercase(),
        }
    }

    /// Load all matching files directly inside `dir`.
    ///
    /// Subdirectories are not descended into. Files are returned sorted by
    /// name. A missing directory is an error.
    pub fn load_dir(&self, dir: &Path) -> Result<Vec<Document>> {
        if !dir.is_dir() {
            return Err(Error::DataDirNotFound(dir.to_path_buf()));
        }

        let paths: Vec<PathBuf> = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| self.matches(path))
            .collect();

        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            documents.push(self.load_file(&path)?);
        }

        tracing::info!(
            "Loaded {} .{} documents from {}",
            documents.len(),
            self.extension,
            dir.display()
        );

        Ok(documents)
    }

    /// Load a single file as UTF-8 text
    pub fn load_file(&self, path: &Path) -> Result<Document> {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        let bytes = std::fs::read(path).map_err(|e| Error::document_load(&filename, e.to_string()))?;
        let content = String::from_utf8(bytes)
            .map_err(|e| Error::document_load(&filename, format!("not valid UTF-8: {}", e)))?;

        tracing::debug!("Loaded {} ({} bytes)", filename, content.len());

        Ok(Document::new(path, content))
    }

    fn matches(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase() == self.extension)
            .unwrap_or(false)
    }
}

impl Default for DocumentLoader {
    fn default() -> Self {
        Self::new("txt")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_loads_only_top_level_txt_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "second").unwrap();
        fs::write(dir.path().join("a.txt"), "first").unwrap();
        fs::write(dir.path().join("notes.md"), "ignored").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("c.txt"), "ignored too").unwrap();

        let docs = DocumentLoader::default().load_dir(dir.path()).unwrap();
        let names: Vec<&str> = docs.iter().map(|d| d.filename.as_str()).collect();

        assert_eq!(names, vec!["a.txt", "b.txt"]);
        assert_eq!(docs[0].content, "first");
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("data");

        let result = DocumentLoader::default().load_dir(&missing);
        assert!(matches!(result, Err(Error::DataDirNotFound(p)) if p == missing));
    }

    #[test]
    fn test_file_is_not_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("data");
        fs::write(&file, "not a dir").unwrap();

        assert!(DocumentLoader::default().load_dir(&file).is_err());
    }

    #[test]
    fn test_invalid_utf8_fails() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.txt"), [0xff, 0xfe, 0x00]).unwrap();

        let result = DocumentLoader::default().load_dir(dir.path());
        assert!(matches!(result, Err(Error::DocumentLoad { filename, .. }) if filename == "bad.txt"));
    }

    #[test]
    fn test_extension_normalized() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("UPPER.TXT"), "shout").unwrap();

        let docs = DocumentLoader::new(".txt").load_dir(dir.path()).unwrap();
        assert_eq!(docs.len(), 1);
    }
}
