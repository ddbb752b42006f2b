use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which of the two request locations failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathRole {
    Data,
    Output,
}

impl fmt::Display for PathRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathRole::Data => write!(f, "data"),
            PathRole::Output => write!(f, "output"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConverterError {
    #[error("{role} path not found: {}", path.display())]
    PathNotFound { role: PathRole, path: PathBuf },

    #[error("Configuration file is missing: {}", path.display())]
    MissingConfiguration { path: PathBuf, explicit: bool },

    #[error("Invalid configuration {}: {message}", path.display())]
    ConfigurationInvalid { path: PathBuf, message: String },

    #[error("Unknown extraction type: {name}")]
    UnknownExtractionType { name: String },

    #[error("Malformed source file {}: {message}", path.display())]
    MalformedSource { path: PathBuf, message: String },

    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization failed: {message}")]
    Serialization { message: String },

    #[error("{first} and {second} would both be written to {}", target.display())]
    NameCollision {
        target: PathBuf,
        first: String,
        second: String,
    },

    #[error("Operation was cancelled by user")]
    Cancelled,

    #[error("{converter} converter failed: {source}")]
    Converter {
        converter: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ConverterError {
    /// Wraps an error raised by a converter living outside this crate.
    pub fn external<S, E>(converter: S, error: E) -> Self
    where
        S: Into<String>,
        E: Into<anyhow::Error>,
    {
        let error: anyhow::Error = error.into();
        ConverterError::Converter {
            converter: converter.into(),
            source: error.into(),
        }
    }
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for ConverterError {
    fn user_message(&self) -> String {
        match self {
            ConverterError::PathNotFound { role, path } => {
                format!("The {} path does not exist: {}", role, path.display())
            }
            ConverterError::MissingConfiguration { path, explicit: false } => {
                format!(
                    "Default config file is missing ({}). Provide a config file.",
                    path.display()
                )
            }
            ConverterError::MissingConfiguration { path, explicit: true } => {
                format!("Config file not found: {}", path.display())
            }
            ConverterError::ConfigurationInvalid { path, message } => {
                format!("Invalid config file {}: {}", path.display(), message)
            }
            ConverterError::MalformedSource { path, message } => {
                format!("Cannot convert {}: {}", path.display(), message)
            }
            ConverterError::NameCollision { target, first, second } => {
                format!(
                    "Source groups '{}' and '{}' map to the same output file {}",
                    first,
                    second,
                    target.display()
                )
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            ConverterError::PathNotFound { role: PathRole::Data, .. } => Some(
                "Check the --data-path argument points to the folder holding the acquisition files.".to_string()
            ),
            ConverterError::PathNotFound { role: PathRole::Output, .. } => Some(
                "Create the output folder first; it is not created automatically.".to_string()
            ),
            ConverterError::MissingConfiguration { .. } => Some(
                "Pass a configuration file with --config, or restore config.toml next to the aglae-convert executable.".to_string()
            ),
            ConverterError::ConfigurationInvalid { .. } => Some(
                "Check your configuration file syntax and ensure all required fields are present.".to_string()
            ),
            ConverterError::UnknownExtractionType { .. } => Some(
                "Valid extraction types are: lst, globals, standards.".to_string()
            ),
            ConverterError::NameCollision { .. } => Some(
                "Rename one of the source files so their names differ by more than case or punctuation.".to_string()
            ),
            ConverterError::Cancelled => Some(
                "Containers written before the interruption are left in the output folder.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConverterError {
    fn from(error: serde_json::Error) -> Self {
        ConverterError::Serialization {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConverterError>;
