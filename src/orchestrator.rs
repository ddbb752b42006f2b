//! Extraction orchestration: path validation, configuration loading and
//! dispatch of the requested extraction kinds to the converters.

use crate::config::{default_config_path, Config};
use crate::converter::{GlobalsConverter, LstConverter};
use crate::error::{ConverterError, PathRole, Result};
use crate::extraction::{ExtractionType, ExtractionTypes};
use crate::ui::OutputFormatter;
use std::path::{Path, PathBuf};

/// One conversion invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub extraction_types: ExtractionTypes,
    pub data_path: PathBuf,
    pub output_path: PathBuf,
    pub config_path: Option<PathBuf>,
}

impl ConversionRequest {
    pub fn new<D, O>(extraction_types: ExtractionTypes, data_path: D, output_path: O) -> Self
    where
        D: Into<PathBuf>,
        O: Into<PathBuf>,
    {
        Self {
            extraction_types,
            data_path: data_path.into(),
            output_path: output_path.into(),
            config_path: None,
        }
    }

    pub fn with_config<P: Into<PathBuf>>(mut self, config_path: Option<P>) -> Self {
        self.config_path = config_path.map(Into::into);
        self
    }
}

/// Which converters a kind set selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchPlan {
    pub globals: bool,
    pub lst: bool,
}

impl DispatchPlan {
    pub fn for_kinds(kinds: &ExtractionTypes) -> Self {
        let spectra = ExtractionTypes::empty()
            .with(ExtractionType::Globals)
            .with(ExtractionType::Standards);

        Self {
            globals: kinds.intersects(&spectra),
            lst: kinds.contains(ExtractionType::Lst),
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.globals && !self.lst
    }
}

/// A validated request with its configuration loaded.
#[derive(Debug, Clone)]
pub struct PreparedRun {
    pub request: ConversionRequest,
    pub config_path: PathBuf,
    pub config: Config,
    pub plan: DispatchPlan,
}

pub struct Orchestrator {
    globals: Box<dyn GlobalsConverter>,
    lst: Box<dyn LstConverter>,
    default_config_path: PathBuf,
    output: OutputFormatter,
}

impl Orchestrator {
    pub fn new<G, L>(globals: G, lst: L) -> Self
    where
        G: GlobalsConverter + 'static,
        L: LstConverter + 'static,
    {
        Self {
            globals: Box::new(globals),
            lst: Box::new(lst),
            default_config_path: default_config_path(),
            output: OutputFormatter::silent(),
        }
    }

    /// Configuration used when a request names none.
    pub fn with_default_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.default_config_path = path.into();
        self
    }

    pub fn with_output(mut self, output: OutputFormatter) -> Self {
        self.output = output;
        self
    }

    /// Validates the request and loads its configuration without converting.
    pub fn prepare(&self, request: &ConversionRequest) -> Result<PreparedRun> {
        ensure_exists(&request.data_path, PathRole::Data)?;
        ensure_exists(&request.output_path, PathRole::Output)?;

        self.output
            .info(&format!("Reading from : {}", request.data_path.display()));
        self.output
            .info(&format!("Saving files to : {}", request.output_path.display()));

        let (config_path, explicit) = match &request.config_path {
            Some(path) => (path.clone(), true),
            None => (self.default_config_path.clone(), false),
        };

        if !config_path.exists() {
            return Err(ConverterError::MissingConfiguration {
                path: config_path,
                explicit,
            });
        }

        let config = Config::load_from_file(&config_path)?;
        self.output
            .debug(&format!("Using configuration {}", config_path.display()));

        Ok(PreparedRun {
            request: request.clone(),
            config_path,
            config,
            plan: DispatchPlan::for_kinds(&request.extraction_types),
        })
    }

    /// Runs the converters selected by the request and returns the number of
    /// files they processed.
    pub fn orchestrate(&self, request: &ConversionRequest) -> Result<usize> {
        let run = self.prepare(request)?;
        self.execute(&run)
    }

    pub fn execute(&self, run: &PreparedRun) -> Result<usize> {
        let request = &run.request;
        let mut processed_files = 0;

        if run.plan.globals {
            self.output.start_operation("Converting globals and standards files");
            processed_files += self.globals.convert(
                &request.extraction_types,
                &request.data_path,
                &request.output_path,
                &run.config,
            )?;
        }

        if run.plan.lst {
            self.output.start_operation("Converting lst files");
            processed_files +=
                self.lst
                    .convert(&request.data_path, &request.output_path, &run.config)?;
        }

        Ok(processed_files)
    }
}

fn ensure_exists(path: &Path, role: PathRole) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(ConverterError::PathNotFound {
            role,
            path: path.to_path_buf(),
        })
    }
}
