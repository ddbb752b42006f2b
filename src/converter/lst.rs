use crate::config::Config;
use crate::converter::manifest::ManifestWriter;
use crate::converter::{write_containers, Container, ContainerWriter, LstConverter};
use crate::error::{ConverterError, Result};
use crate::extraction::ExtractionType;
use crate::scanner::{FileFilter, SourceScanner};
use crate::ui::{GracefulShutdown, ProgressManager};
use std::path::Path;

/// Converts each list-mode file of the data folder into its own container,
/// tagged with the configured detectors and map dimensions.
pub struct LstFileConverter<W: ContainerWriter = ManifestWriter> {
    writer: W,
    progress: ProgressManager,
    shutdown: GracefulShutdown,
}

impl LstFileConverter<ManifestWriter> {
    pub fn new() -> Self {
        Self::with_writer(ManifestWriter::new())
    }
}

impl Default for LstFileConverter<ManifestWriter> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: ContainerWriter> LstFileConverter<W> {
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

    pub fn plan(&self, data_path: &Path, config: &Config) -> Result<Vec<Container>> {
        let scanner = SourceScanner::new(FileFilter::new([config.lst_extension()]));
        let sources = scanner.scan_directory(data_path)?;

        if sources.is_empty() {
            log::warn!("No lst files found in {}", data_path.display());
        }

        sources
            .into_iter()
            .map(|source| {
                // An lst file always starts with its acquisition header
                if source.size == 0 {
                    return Err(ConverterError::MalformedSource {
                        path: source.source_path.clone(),
                        message: "file is empty".to_string(),
                    });
                }

                Ok(Container::new(source.stem.clone(), ExtractionType::Lst, vec![source])
                    .with_detectors(config.lst.detectors.clone())
                    .with_map(config.lst.map))
            })
            .collect()
    }
}

impl<W: ContainerWriter> LstConverter for LstFileConverter<W> {
    fn convert(&self, data_path: &Path, output_path: &Path, config: &Config) -> Result<usize> {
        let containers = self.plan(data_path, config)?;
        write_containers(
            &self.writer,
            &containers,
            output_path,
            &self.progress,
            &self.shutdown,
            "lst",
        )
    }
}
