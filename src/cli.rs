use crate::extraction::{ExtractionType, ExtractionTypes};
use crate::orchestrator::ConversionRequest;
use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "aglae-convert")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Create HDF5 files from AGLAE globals, standards and lst files")]
#[command(
    long_about = "Extracts the acquisition files of an AGLAE data folder and converts each \
                  requested kind (globals, standards, lst) into containers saved to the \
                  output folder."
)]
#[command(after_help = "EXAMPLES:\n  \
    aglae-convert -d ./data -o ./hdf5\n  \
    aglae-convert -e lst globals -d ./data -o ./hdf5 --log debug\n  \
    aglae-convert -e standards -d ./data -o ./hdf5 -c config.toml")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// The data types to extract and convert
    #[arg(
        short,
        long,
        value_enum,
        num_args = 1..,
        ignore_case = true,
        value_name = "EXTRACTION_TYPES",
        default_values_t = ExtractionType::ALL
    )]
    pub extraction_types: Vec<ExtractionType>,

    /// Path to the data folder
    #[arg(short, long)]
    pub data_path: PathBuf,

    /// Path to the folder where converted files are saved
    #[arg(short, long)]
    pub output_path: PathBuf,

    /// Path to the configuration file (default: config.toml next to the executable)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (default: INFO)
    #[arg(long, default_value = "INFO")]
    pub log: String,
}

impl Cli {
    pub fn extraction_types(&self) -> ExtractionTypes {
        self.extraction_types.iter().collect()
    }

    pub fn conversion_request(&self) -> ConversionRequest {
        ConversionRequest::new(
            self.extraction_types(),
            self.data_path.clone(),
            self.output_path.clone(),
        )
        .with_config(self.config.clone())
    }

    /// Severity requested with `--log`; `None` when the name is not a level.
    pub fn log_level(&self) -> Option<LevelFilter> {
        parse_log_level(&self.log)
    }
}

/// Parses a severity name case-insensitively. Accepts the `log` level names
/// plus `warning`, `critical`, `fatal` and `notset`.
pub fn parse_log_level(name: &str) -> Option<LevelFilter> {
    match name.trim().to_lowercase().as_str() {
        "warning" => Some(LevelFilter::Warn),
        "critical" | "fatal" => Some(LevelFilter::Error),
        "notset" => Some(LevelFilter::Trace),
        other => other.parse().ok(),
    }
}
