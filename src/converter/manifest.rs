use crate::config::{DetectorConfig, MapConfig};
use crate::converter::{Container, ContainerWriter};
use crate::error::{ConverterError, Result};
use crate::extraction::ExtractionType;
use crate::scanner::SourceFile;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// JSON description of a container, written in place of the encoded file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerManifest {
    pub name: String,
    pub kind: ExtractionType,
    pub created_at: DateTime<Utc>,
    pub total_bytes: u64,
    pub files: Vec<FileInfo>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub detectors: BTreeMap<String, DetectorConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<MapConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileInfo {
    pub filename: String,
    pub relative_path: String,
    pub extension: String,
    pub size: u64,
    pub modified: SystemTime,
}

impl From<&SourceFile> for FileInfo {
    fn from(source: &SourceFile) -> Self {
        Self {
            filename: source.filename.clone(),
            relative_path: source.relative_path.to_string_lossy().to_string(),
            extension: source.extension.clone(),
            size: source.size,
            modified: source.modified,
        }
    }
}

impl From<&Container> for ContainerManifest {
    fn from(container: &Container) -> Self {
        Self {
            name: container.name.clone(),
            kind: container.kind,
            created_at: Utc::now(),
            total_bytes: container.total_bytes(),
            files: container.sources.iter().map(FileInfo::from).collect(),
            detectors: container.detectors.clone(),
            map: container.map,
        }
    }
}

/// Writes one `<name>.<kind>.json` manifest per container.
#[derive(Debug, Clone, Default)]
pub struct ManifestWriter {
    overwrite: bool,
}

impl ManifestWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace manifests left by an earlier run instead of failing.
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

impl ContainerWriter for ManifestWriter {
    fn target_path(&self, container: &Container, output_path: &Path) -> PathBuf {
        output_path.join(format!(
            "{}.{}.json",
            sanitize_name(&container.name),
            container.kind
        ))
    }

    fn write(&self, container: &Container, output_path: &Path) -> Result<PathBuf> {
        let path = self.target_path(container, output_path);

        if path.exists() && !self.overwrite {
            return Err(ConverterError::Io(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                format!("{} already exists", path.display()),
            )));
        }

        let manifest = ContainerManifest::from(container);
        let json_content = serde_json::to_string_pretty(&manifest)?;
        fs::write(&path, json_content)?;

        log::debug!(
            "Wrote {} container {} ({} files)",
            container.kind,
            path.display(),
            manifest.files.len()
        );

        Ok(path)
    }
}

fn sanitize_name(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.is_empty() {
        "unnamed".to_string()
    } else {
        sanitized
    }
}
