use regex::Regex;
use std::path::Path;

/// Decides which files of an acquisition folder belong to an extraction.
#[derive(Debug, Clone)]
pub struct FileFilter {
    extensions: Vec<String>,
    exclude_dirs: Vec<String>,
    exclude_patterns: Vec<Regex>,
}

impl FileFilter {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|ext| ext.as_ref().trim_start_matches('.').to_lowercase())
                .filter(|ext| !ext.is_empty())
                .collect(),
            exclude_dirs: Vec::new(),
            exclude_patterns: Vec::new(),
        }
    }

    /// Patterns that fail to compile are dropped; `Config::validate` reports them.
    pub fn with_exclude_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.exclude_patterns = patterns
            .into_iter()
            .filter_map(|pattern| Regex::new(pattern.as_ref()).ok())
            .collect();
        self
    }

    pub fn with_exclude_dir<S: Into<String>>(mut self, directory: S) -> Self {
        let dir = directory.into().to_lowercase();
        if !self.exclude_dirs.contains(&dir) {
            self.exclude_dirs.push(dir);
        }
        self
    }

    pub fn is_source_file(&self, path: &Path) -> bool {
        let Some(filename) = path.file_name().and_then(|s| s.to_str()) else {
            return false;
        };

        if self.matches_any_pattern(filename) {
            return false;
        }

        path.extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| self.extensions.contains(&ext.to_lowercase()))
    }

    pub fn should_traverse_directory(&self, path: &Path) -> bool {
        if let Some(dir_name) = path.file_name().and_then(|s| s.to_str()) {
            let dir_name_lower = dir_name.to_lowercase();

            if self.exclude_dirs.contains(&dir_name_lower) {
                return false;
            }

            // Hidden folders hold acquisition software state, never spectra
            if dir_name.starts_with('.') && dir_name != "." && dir_name != ".." {
                return false;
            }
        }

        true
    }

    pub fn matches_any_pattern(&self, text: &str) -> bool {
        self.exclude_patterns
            .iter()
            .any(|pattern| pattern.is_match(text))
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }
}
