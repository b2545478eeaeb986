use serde::Deserialize;
use serde::Deserializer;
use serde::de::Error;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

pub mod error;
pub use error::ConfigError;

pub const SUSPECT_FLAG_NAME: &str = "l1_flags.SUSPECT";
pub const SUSPECT_EXPRESSION_TERM: &str = "and not l1_flags.SUSPECT";
pub const DEFAULT_VALID_PIXEL_EXPRESSION: &str =
    "not l1_flags.GLINT_RISK and not l1_flags.BRIGHT and not l1_flags.INVALID and not l1_flags.SUSPECT";

fn enabled() -> bool {
    true
}

fn default_expression() -> String {
    DEFAULT_VALID_PIXEL_EXPRESSION.to_string()
}

/// Per-scene processing switches. Field names on the wire follow the processor's
/// historical parameter names.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ProcessingOptions {
    #[serde(rename = "computeCHL", default = "enabled")]
    pub compute_chl: bool,
    #[serde(rename = "computeYS", default = "enabled")]
    pub compute_ys: bool,
    #[serde(rename = "computeTSM", default = "enabled")]
    pub compute_tsm: bool,
    #[serde(rename = "computeAtmCorr", default = "enabled")]
    pub compute_atm_corr: bool,
    #[serde(
        rename = "validPixelExpression",
        alias = "expression",
        default = "default_expression"
    )]
    pub valid_pixel_expression: String,
    #[serde(rename = "suspectFlagCheck", default = "enabled")]
    pub suspect_flag_check: bool,
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        Self {
            compute_chl: true,
            compute_ys: true,
            compute_tsm: true,
            compute_atm_corr: true,
            valid_pixel_expression: default_expression(),
            suspect_flag_check: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    scene_directory: PathBuf,
    output_directory: PathBuf,
    estimators: PathBuf,
    threads: Option<usize>,
    processing: ProcessingOptions,
}

// Relative paths in the file are resolved by the caller; here we only make sure the
// mandatory entries are present and the thread count is usable.
impl<'de> Deserialize<'de> for Config {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ConfigHelper {
            scene_directory: String,
            output_directory: String,
            estimators: String,
            threads: Option<usize>,
            #[serde(default)]
            processing: ProcessingOptions,
        }

        let helper = ConfigHelper::deserialize(deserializer)?;

        for (key, value) in [
            ("scene_directory", &helper.scene_directory),
            ("output_directory", &helper.output_directory),
            ("estimators", &helper.estimators),
        ] {
            if value.trim().is_empty() {
                return Err(D::Error::custom(format!("{key} must not be empty")));
            }
        }

        if helper.threads == Some(0) {
            return Err(D::Error::custom(ConfigError::Threads));
        }

        Ok(Config {
            scene_directory: PathBuf::from(helper.scene_directory),
            output_directory: PathBuf::from(helper.output_directory),
            estimators: PathBuf::from(helper.estimators),
            threads: helper.threads,
            processing: helper.processing,
        })
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let config: Config = serde_json::from_reader(reader).map_err(ConfigError::from)?;

        Ok(config)
    }

    pub fn scene_directory(&self) -> &Path {
        &self.scene_directory
    }

    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    pub fn estimators(&self) -> &Path {
        &self.estimators
    }

    pub fn threads(&self) -> Option<usize> {
        self.threads
    }

    pub fn set_threads(&mut self, threads: usize) -> Result<(), ConfigError> {
        if threads == 0 {
            return Err(ConfigError::Threads);
        }
        self.threads = Some(threads);
        Ok(())
    }

    pub fn processing(&self) -> &ProcessingOptions {
        &self.processing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_from_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("config.json");
        let mut file = File::create(&file_path).unwrap();

        let config_data = r#"
    {
        "scene_directory": "./data/MER_RR__1P",
        "output_directory": "./out",
        "estimators": "./data/networks.json",
        "threads": 4,
        "processing": {
            "computeYS": false,
            "validPixelExpression": "not l1_flags.INVALID"
        }
    }
    "#;

        file.write_all(config_data.as_bytes()).unwrap();

        let config = Config::from_file(file_path).unwrap();

        assert_eq!(config.scene_directory(), Path::new("./data/MER_RR__1P"));
        assert_eq!(config.threads(), Some(4));

        let processing = config.processing();
        assert!(processing.compute_chl);
        assert!(!processing.compute_ys);
        assert!(processing.compute_tsm);
        assert!(processing.compute_atm_corr);
        assert!(processing.suspect_flag_check);
        assert_eq!(processing.valid_pixel_expression, "not l1_flags.INVALID");
    }

    #[test]
    fn test_processing_defaults() {
        let options: ProcessingOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, ProcessingOptions::default());
        assert!(
            options
                .valid_pixel_expression
                .ends_with(SUSPECT_EXPRESSION_TERM)
        );
    }

    #[test]
    fn test_expression_alias() {
        let options: ProcessingOptions =
            serde_json::from_str(r#"{ "expression": "not l1_flags.BRIGHT" }"#).unwrap();
        assert_eq!(options.valid_pixel_expression, "not l1_flags.BRIGHT");
    }

    #[test]
    fn test_zero_threads_rejected() {
        let data = r#"{
            "scene_directory": "a",
            "output_directory": "b",
            "estimators": "c",
            "threads": 0
        }"#;
        let result: Result<Config, _> = serde_json::from_str(data);
        assert!(result.is_err());
    }

    #[test]
    fn test_thread_override() {
        let data = r#"{
            "scene_directory": "a",
            "output_directory": "b",
            "estimators": "c",
            "threads": 4
        }"#;
        let mut config: Config = serde_json::from_str(data).unwrap();
        config.set_threads(2).unwrap();
        assert_eq!(config.threads(), Some(2));

        assert!(matches!(config.set_threads(0), Err(ConfigError::Threads)));
        assert_eq!(config.threads(), Some(2));
    }

    #[test]
    fn test_empty_path_rejected() {
        let data = r#"{ "scene_directory": " ", "output_directory": "b", "estimators": "c" }"#;
        let result: Result<Config, _> = serde_json::from_str(data);
        assert!(result.is_err());
    }
}
