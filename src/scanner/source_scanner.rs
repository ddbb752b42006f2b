use crate::error::{ConverterError, Result};
use crate::scanner::file_filter::FileFilter;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::{DirEntry, WalkDir};

/// A raw acquisition file selected for conversion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceFile {
    pub source_path: PathBuf,
    pub relative_path: PathBuf,
    pub filename: String,
    /// File name without its extension; acquisition runs share it.
    pub stem: String,
    pub extension: String,
    pub size: u64,
    pub modified: SystemTime,
}

impl SourceFile {
    pub fn new(
        source_path: PathBuf,
        relative_path: PathBuf,
        size: u64,
        modified: SystemTime,
    ) -> Self {
        let filename = source_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_string();

        let stem = source_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();

        let extension = source_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        Self {
            source_path,
            relative_path,
            filename,
            stem,
            extension,
            size,
            modified,
        }
    }
}

/// Acquisition software writes every file of a folder at its top level.
const SCAN_DEPTH: usize = 1;

pub struct SourceScanner {
    filter: FileFilter,
}

impl SourceScanner {
    /// Scans only the files directly inside the root folder.
    pub fn new(filter: FileFilter) -> Self {
        Self { filter }
    }

    pub fn scan_directory<P: AsRef<Path>>(&self, root: P) -> Result<Vec<SourceFile>> {
        let root_path = root.as_ref();

        if !root_path.is_dir() {
            return Err(ConverterError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} is not a directory", root_path.display()),
            )));
        }

        let mut sources = Vec::new();

        let walker = WalkDir::new(root_path)
            .max_depth(SCAN_DEPTH)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| self.should_traverse(e));

        for entry in walker {
            let entry = entry.map_err(|err| {
                let message = format!("Scan error in {}: {}", root_path.display(), err);
                ConverterError::Io(
                    err.into_io_error()
                        .unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, message)),
                )
            })?;

            if entry.file_type().is_file() {
                if let Some(source) = self.process_file(&entry, root_path)? {
                    sources.push(source);
                }
            }
        }

        // Sort by relative path for consistent output
        sources.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

        log::debug!(
            "Found {} source files in {} (extensions: {})",
            sources.len(),
            root_path.display(),
            self.filter.extensions().join(", ")
        );

        Ok(sources)
    }

    /// Like `scan_directory`, but a missing root yields no files.
    pub fn scan_optional_directory<P: AsRef<Path>>(&self, root: P) -> Result<Vec<SourceFile>> {
        let root_path = root.as_ref();
        if !root_path.exists() {
            log::warn!("Skipping missing folder {}", root_path.display());
            return Ok(Vec::new());
        }
        self.scan_directory(root_path)
    }

    fn should_traverse(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || entry.file_type().is_file() {
            return true;
        }

        if entry.file_type().is_dir() {
            return self.filter.should_traverse_directory(entry.path());
        }

        true
    }

    fn process_file(&self, entry: &DirEntry, root_path: &Path) -> Result<Option<SourceFile>> {
        let path = entry.path();

        if !self.filter.is_source_file(path) {
            log::trace!("Ignoring {}", path.display());
            return Ok(None);
        }

        let metadata = entry.metadata().map_err(|e| {
            ConverterError::Io(
                e.into_io_error()
                    .unwrap_or_else(|| std::io::Error::from(std::io::ErrorKind::Other)),
            )
        })?;

        let relative_path = path
            .strip_prefix(root_path)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| PathBuf::from(entry.file_name()));

        let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);

        Ok(Some(SourceFile::new(
            path.to_path_buf(),
            relative_path,
            metadata.len(),
            modified,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn scanner() -> SourceScanner {
        SourceScanner::new(FileFilter::new(["x0", "x1", "r8"]).with_exclude_dir("standards"))
    }

    #[test]
    fn test_source_file_creation() {
        let doc = SourceFile::new(
            PathBuf::from("/data/20230101_0001_OBJ_IBA.X0"),
            PathBuf::from("20230101_0001_OBJ_IBA.X0"),
            100,
            SystemTime::UNIX_EPOCH,
        );

        assert_eq!(doc.filename, "20230101_0001_OBJ_IBA.X0");
        assert_eq!(doc.stem, "20230101_0001_OBJ_IBA");
        assert_eq!(doc.extension, "x0");
        assert_eq!(doc.size, 100);
    }

    #[test]
    fn test_scan_finds_matching_files_sorted() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join("run_b.x1"), "b").unwrap();
        fs::write(root.join("run_a.x0"), "aa").unwrap();
        fs::write(root.join("run_a.lst"), "lst").unwrap();
        fs::write(root.join("notes.txt"), "ignored").unwrap();

        let sources = scanner().scan_directory(root).unwrap();
        let names: Vec<_> = sources.iter().map(|s| s.filename.as_str()).collect();

        assert_eq!(names, vec!["run_a.x0", "run_b.x1"]);
        assert_eq!(sources[0].size, 2);
    }

    #[test]
    fn test_scan_does_not_descend_into_subfolders() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let nested = root.join("session");
        fs::create_dir(&nested).unwrap();
        fs::write(nested.join("deep.x0"), "x").unwrap();

        assert!(scanner().scan_directory(root).unwrap().is_empty());
    }

    #[test]
    fn test_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");

        assert!(scanner().scan_directory(&missing).is_err());
        assert!(scanner().scan_optional_directory(&missing).unwrap().is_empty());
    }
}
