//! Converters invoked by the orchestrator and the container seam they write through.
//!
//! The orchestrator only knows the two collaborator traits. The built-in
//! implementations discover source files and group them into [`Container`]s;
//! encoding a container is delegated to a [`ContainerWriter`].

pub mod globals;
pub mod lst;
pub mod manifest;

pub use globals::GlobalsFileConverter;
pub use lst::LstFileConverter;
pub use manifest::{ContainerManifest, ManifestWriter};

use crate::config::{Config, DetectorConfig, MapConfig};
use crate::error::{ConverterError, Result};
use crate::extraction::{ExtractionType, ExtractionTypes};
use crate::scanner::SourceFile;
use crate::ui::progress::finish_progress_with_summary;
use crate::ui::{GracefulShutdown, ProgressManager};
use indicatif::ProgressBar;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Converts globals and standards spectra. Receives the full requested set and
/// picks the kinds it handles.
pub trait GlobalsConverter {
    fn convert(
        &self,
        kinds: &ExtractionTypes,
        data_path: &Path,
        output_path: &Path,
        config: &Config,
    ) -> Result<usize>;
}

/// Converts list-mode event files.
pub trait LstConverter {
    fn convert(&self, data_path: &Path, output_path: &Path, config: &Config) -> Result<usize>;
}

impl<F> GlobalsConverter for F
where
    F: Fn(&ExtractionTypes, &Path, &Path, &Config) -> Result<usize>,
{
    fn convert(
        &self,
        kinds: &ExtractionTypes,
        data_path: &Path,
        output_path: &Path,
        config: &Config,
    ) -> Result<usize> {
        self(kinds, data_path, output_path, config)
    }
}

impl<F> LstConverter for F
where
    F: Fn(&Path, &Path, &Config) -> Result<usize>,
{
    fn convert(&self, data_path: &Path, output_path: &Path, config: &Config) -> Result<usize> {
        self(data_path, output_path, config)
    }
}

/// One output unit built from a group of source files.
#[derive(Debug, Clone, Serialize)]
pub struct Container {
    pub name: String,
    pub kind: ExtractionType,
    pub sources: Vec<SourceFile>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub detectors: BTreeMap<String, DetectorConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map: Option<MapConfig>,
}

impl Container {
    pub fn new<S: Into<String>>(name: S, kind: ExtractionType, sources: Vec<SourceFile>) -> Self {
        Self {
            name: name.into(),
            kind,
            sources,
            detectors: BTreeMap::new(),
            map: None,
        }
    }

    pub fn with_detectors(mut self, detectors: BTreeMap<String, DetectorConfig>) -> Self {
        self.detectors = detectors;
        self
    }

    pub fn with_map(mut self, map: MapConfig) -> Self {
        self.map = Some(map);
        self
    }

    pub fn total_bytes(&self) -> u64 {
        self.sources.iter().map(|s| s.size).sum()
    }
}

/// Encodes a container into the output folder and returns the written path.
pub trait ContainerWriter {
    /// Path `write` produces for `container`.
    fn target_path(&self, container: &Container, output_path: &Path) -> PathBuf;

    fn write(&self, container: &Container, output_path: &Path) -> Result<PathBuf>;
}

/// Groups files sharing a stem, keeping groups in stem order.
pub fn group_by_stem(sources: Vec<SourceFile>) -> BTreeMap<String, Vec<SourceFile>> {
    let mut groups: BTreeMap<String, Vec<SourceFile>> = BTreeMap::new();
    for source in sources {
        groups.entry(source.stem.clone()).or_default().push(source);
    }
    groups
}

/// Fails when two containers would land on the same file. Targets are
/// compared ignoring case so the check holds on case-insensitive filesystems.
pub fn check_target_collisions<W: ContainerWriter + ?Sized>(
    writer: &W,
    containers: &[Container],
    output_path: &Path,
) -> Result<()> {
    let mut seen: HashMap<String, &str> = HashMap::new();

    for container in containers {
        let target = writer.target_path(container, output_path);
        let key = target.to_string_lossy().to_lowercase();

        if let Some(first) = seen.insert(key, container.name.as_str()) {
            return Err(ConverterError::NameCollision {
                target,
                first: first.to_string(),
                second: container.name.clone(),
            });
        }
    }

    Ok(())
}

/// Writes containers in order and returns the number of source files they hold.
/// Nothing is written when two containers collide. The shutdown flag is
/// checked before each container.
pub(crate) fn write_containers<W: ContainerWriter + ?Sized>(
    writer: &W,
    containers: &[Container],
    output_path: &Path,
    progress: &ProgressManager,
    shutdown: &GracefulShutdown,
    label: &str,
) -> Result<usize> {
    check_target_collisions(writer, containers, output_path)?;

    let start = Instant::now();
    let total_files: usize = containers.iter().map(|c| c.sources.len()).sum();
    let pb = progress.create_file_progress(total_files as u64, label);

    let result = write_each(writer, containers, output_path, &pb, shutdown);
    settle_progress(&pb, result, label, start)
}

fn write_each<W: ContainerWriter + ?Sized>(
    writer: &W,
    containers: &[Container],
    output_path: &Path,
    pb: &ProgressBar,
    shutdown: &GracefulShutdown,
) -> Result<usize> {
    let mut processed = 0;
    for container in containers {
        shutdown.check_shutdown()?;
        pb.set_message(container.name.clone());

        let written = writer.write(container, output_path)?;
        log::debug!("{} -> {}", container.name, written.display());

        processed += container.sources.len();
        pb.inc(container.sources.len() as u64);
    }
    Ok(processed)
}

fn settle_progress(
    pb: &ProgressBar,
    result: Result<usize>,
    label: &str,
    start: Instant,
) -> Result<usize> {
    match result {
        Ok(processed) => {
            finish_progress_with_summary(
                pb,
                &format!("Converted {} {} files", processed, label),
                start.elapsed(),
            );
            Ok(processed)
        }
        Err(e) => {
            pb.abandon_with_message(format!("{} conversion stopped: {}", label, e));
            Err(e)
        }
    }
}
