use crate::config::Config;
use crate::converter::{group_by_stem, write_containers, Container, ContainerWriter, GlobalsConverter};
use crate::converter::manifest::ManifestWriter;
use crate::error::Result;
use crate::extraction::{ExtractionType, ExtractionTypes};
use crate::scanner::{FileFilter, SourceScanner};
use crate::ui::{GracefulShutdown, ProgressManager};
use std::path::Path;

/// Name of the single container holding every standards spectrum.
pub const STANDARDS_CONTAINER: &str = "standards";

/// Converts the spectra of an acquisition folder.
///
/// Globals spectra sit directly in the data folder and are grouped per
/// acquisition run (files sharing a stem). Standards spectra sit in the
/// configured standards subfolder and are gathered in one container.
pub struct GlobalsFileConverter<W: ContainerWriter = ManifestWriter> {
    writer: W,
    progress: ProgressManager,
    shutdown: GracefulShutdown,
}

impl GlobalsFileConverter<ManifestWriter> {
    pub fn new() -> Self {
        Self::with_writer(ManifestWriter::new())
    }
}

impl Default for GlobalsFileConverter<ManifestWriter> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: ContainerWriter> GlobalsFileConverter<W> {
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            progress: ProgressManager::hidden(),
            shutdown: GracefulShutdown::detached(),
        }
    }

    pub fn with_progress(mut self, progress: ProgressManager) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_shutdown(mut self, shutdown: GracefulShutdown) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Containers the given kinds produce, without writing anything.
    pub fn plan(
        &self,
        kinds: &ExtractionTypes,
        data_path: &Path,
        config: &Config,
    ) -> Result<Vec<Container>> {
        let scanner = SourceScanner::new(
            FileFilter::new(config.globals_extensions())
                .with_exclude_patterns(&config.globals.exclude_patterns)
                .with_exclude_dir(config.globals.standards_dir.clone()),
        );

        let mut containers = Vec::new();

        if kinds.contains(ExtractionType::Globals) {
            let sources = scanner.scan_directory(data_path)?;
            if sources.is_empty() {
                log::warn!("No globals files found in {}", data_path.display());
            }
            containers.extend(
                group_by_stem(sources)
                    .into_iter()
                    .map(|(stem, files)| Container::new(stem, ExtractionType::Globals, files)),
            );
        }

        if kinds.contains(ExtractionType::Standards) {
            let standards_path = data_path.join(&config.globals.standards_dir);
            let sources = scanner.scan_optional_directory(&standards_path)?;
            if sources.is_empty() {
                log::warn!("No standards files found in {}", standards_path.display());
            } else {
                containers.push(Container::new(
                    STANDARDS_CONTAINER,
                    ExtractionType::Standards,
                    sources,
                ));
            }
        }

        Ok(containers)
    }
}

impl<W: ContainerWriter> GlobalsConverter for GlobalsFileConverter<W> {
    fn convert(
        &self,
        kinds: &ExtractionTypes,
        data_path: &Path,
        output_path: &Path,
        config: &Config,
    ) -> Result<usize> {
        let containers = self.plan(kinds, data_path, config)?;
        write_containers(
            &self.writer,
            &containers,
            output_path,
            &self.progress,
            &self.shutdown,
            "globals",
        )
    }
}
