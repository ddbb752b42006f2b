pub mod cli;
pub mod config;
pub mod converter;
pub mod error;
pub mod extraction;
pub mod orchestrator;
pub mod scanner;
pub mod ui;

// Public API re-exports
pub use cli::Cli;
pub use config::{default_config_path, Config, DetectorConfig, GlobalsConfig, LstConfig, MapConfig};
pub use error::{ConverterError, PathRole, Result, UserFriendlyError};
pub use extraction::{ExtractionType, ExtractionTypes};

// Core functionality re-exports
pub use converter::{
    Container, ContainerWriter, GlobalsConverter, GlobalsFileConverter, LstConverter,
    LstFileConverter, ManifestWriter,
};
pub use orchestrator::{ConversionRequest, DispatchPlan, Orchestrator, PreparedRun};
pub use scanner::{FileFilter, SourceFile, SourceScanner};
pub use ui::{GracefulShutdown, OutputFormatter, ProgressManager};

use std::path::Path;

/// Orchestrator wired with the built-in converters. Outputs left by an
/// earlier run into the same folder are rewritten.
pub fn default_orchestrator(
    output: OutputFormatter,
    progress: ProgressManager,
    shutdown: GracefulShutdown,
) -> Orchestrator {
    let writer = ManifestWriter::new().with_overwrite(true);

    let globals = GlobalsFileConverter::with_writer(writer.clone())
        .with_progress(progress.clone())
        .with_shutdown(shutdown.clone());
    let lst = LstFileConverter::with_writer(writer)
        .with_progress(progress)
        .with_shutdown(shutdown);

    Orchestrator::new(globals, lst).with_output(output)
}

/// Converts the requested kinds found in `data_path` into `output_path` with
/// the built-in converters and no terminal output. Returns the number of
/// processed files.
pub fn convert(
    extraction_types: ExtractionTypes,
    data_path: &Path,
    output_path: &Path,
    config_path: Option<&Path>,
) -> Result<usize> {
    let request =
        ConversionRequest::new(extraction_types, data_path, output_path).with_config(config_path);

    default_orchestrator(
        OutputFormatter::silent(),
        ProgressManager::hidden(),
        GracefulShutdown::detached(),
    )
    .orchestrate(&request)
}
