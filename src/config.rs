use crate::error::{ConverterError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// File name of the bundled configuration shipped next to the executable.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    pub globals: GlobalsConfig,
    pub lst: LstConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GlobalsConfig {
    /// Spectrum file extensions written by the acquisition software.
    pub extensions: Vec<String>,
    /// Subfolder of the data path holding the standards spectra.
    pub standards_dir: String,
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LstConfig {
    pub extension: String,
    pub map: MapConfig,
    pub detectors: BTreeMap<String, DetectorConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct MapConfig {
    pub x: u32,
    pub y: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DetectorConfig {
    pub adc: u8,
    pub channels: u32,
    pub file_extension: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            globals: GlobalsConfig::default(),
            lst: LstConfig::default(),
        }
    }
}

impl Default for GlobalsConfig {
    fn default() -> Self {
        Self {
            extensions: [
                "x0", "x1", "x2", "x3", "x4", "x10", "x11", "x12", "x13", "g7", "g70", "g71",
                "r8", "r9", "r150",
            ]
            .iter()
            .map(|ext| ext.to_string())
            .collect(),
            standards_dir: "standards".to_string(),
            exclude_patterns: vec![r"^\..*".to_string(), r".*~$".to_string()],
        }
    }
}

impl Default for LstConfig {
    fn default() -> Self {
        let detector = |adc: u8, channels: u32, ext: &str| DetectorConfig {
            adc,
            channels,
            file_extension: ext.to_string(),
        };

        let mut detectors = BTreeMap::new();
        detectors.insert("LE0".to_string(), detector(2, 2048, "x0"));
        detectors.insert("HE1".to_string(), detector(0, 2048, "x1"));
        detectors.insert("HE2".to_string(), detector(1, 2048, "x2"));
        detectors.insert("HE3".to_string(), detector(3, 2048, "x3"));
        detectors.insert("HE4".to_string(), detector(4, 2048, "x4"));
        detectors.insert("GAMMA".to_string(), detector(5, 2048, "g7"));
        detectors.insert("RBS".to_string(), detector(6, 512, "r8"));

        Self {
            extension: "lst".to_string(),
            map: MapConfig { x: 256, y: 256 },
            detectors,
        }
    }
}

impl Config {
    /// Reads, parses and validates a configuration file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let invalid = |message: String| ConverterError::ConfigurationInvalid {
            path: path.to_path_buf(),
            message,
        };

        let content = std::fs::read_to_string(path)
            .map_err(|e| invalid(format!("failed to read file: {}", e)))?;

        let config: Config =
            toml::from_str(&content).map_err(|e| invalid(format!("failed to parse: {}", e)))?;

        config.validate().map_err(invalid)?;

        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Checks the invariants converters rely on.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.globals.extensions.iter().all(|ext| ext.trim().is_empty()) {
            return Err("At least one globals extension must be specified".to_string());
        }

        if self.globals.standards_dir.trim().is_empty() {
            return Err("The standards directory name cannot be empty".to_string());
        }

        for pattern in &self.globals.exclude_patterns {
            Regex::new(pattern)
                .map_err(|e| format!("Invalid exclude pattern '{}': {}", pattern, e))?;
        }

        if self.lst.extension.trim().is_empty() {
            return Err("The lst file extension cannot be empty".to_string());
        }

        if self.lst.map.x == 0 || self.lst.map.y == 0 {
            return Err("Map dimensions must be greater than 0".to_string());
        }

        if self.lst.detectors.is_empty() {
            return Err("At least one lst detector must be configured".to_string());
        }

        let mut seen_adcs = BTreeMap::new();
        for (name, detector) in &self.lst.detectors {
            if detector.channels == 0 {
                return Err(format!("Detector {} must have at least one channel", name));
            }
            if let Some(other) = seen_adcs.insert(detector.adc, name) {
                return Err(format!(
                    "Detectors {} and {} share ADC {}",
                    other, name, detector.adc
                ));
            }
        }

        Ok(())
    }

    /// Globals extensions, lowercased for case-insensitive matching.
    pub fn globals_extensions(&self) -> Vec<String> {
        self.globals
            .extensions
            .iter()
            .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect()
    }

    pub fn lst_extension(&self) -> String {
        self.lst.extension.trim().trim_start_matches('.').to_lowercase()
    }
}

/// Location of the bundled configuration: `config.toml` beside the running
/// executable, or in the working directory when the executable path is unknown.
pub fn default_config_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_CONFIG_FILE)))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Copies the bundled configuration into `dir` and returns the copy's path.
#[cfg(test)]
pub(crate) fn write_default_config(dir: &Path) -> PathBuf {
    let bundled = Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_CONFIG_FILE);
    let path = dir.join(DEFAULT_CONFIG_FILE);
    std::fs::copy(bundled, &path).unwrap();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!(config.globals_extensions().contains(&"x0".to_string()));
        assert_eq!(config.lst_extension(), "lst");
    }

    #[test]
    fn test_bundled_config_matches_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_default_config(dir.path());

        assert_eq!(Config::load_from_file(path).unwrap(), Config::default());
    }

    #[test]
    fn test_load_minimal_config() {
        let file = write_config(
            r#"
            [globals]
            extensions = ["X0", ".r8"]
            standards_dir = "std"

            [lst]
            extension = "LST"
            map = { x = 10, y = 20 }

            [lst.detectors.LE0]
            adc = 2
            channels = 2048
            file_extension = "x0"
            "#,
        );

        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.globals_extensions(), vec!["x0", "r8"]);
        assert!(config.globals.exclude_patterns.is_empty());
        assert_eq!(config.lst_extension(), "lst");
        assert_eq!(config.lst.map, MapConfig { x: 10, y: 20 });
    }

    #[test]
    fn test_unparsable_config_is_invalid() {
        let file = write_config("this is = = not toml");

        let err = Config::load_from_file(file.path()).unwrap_err();
        match err {
            ConverterError::ConfigurationInvalid { path, .. } => assert_eq!(path, file.path()),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_section_is_invalid() {
        let file = write_config("[globals]\nextensions = [\"x0\"]\nstandards_dir = \"std\"\n");
        assert!(matches!(
            Config::load_from_file(file.path()),
            Err(ConverterError::ConfigurationInvalid { .. })
        ));
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        config.lst.detectors.clear();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.globals.extensions.clear();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.lst.map.x = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.globals.exclude_patterns.push("(".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_adc_is_rejected() {
        let mut config = Config::default();
        if let Some(detector) = config.lst.detectors.get_mut("HE1") {
            detector.adc = 2;
        }
        let message = config.validate().unwrap_err();
        assert!(message.contains("ADC 2"));
    }

    #[test]
    fn test_default_config_path_file_name() {
        assert!(default_config_path().ends_with(DEFAULT_CONFIG_FILE));
    }
}
