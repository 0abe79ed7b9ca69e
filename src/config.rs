//! Configuration for GRP generation and dataset paths.
//!
//! Defaults reproduce the repository layout the tool was built around
//! (`lightning_modules/datasets/train.json` feeding `extracted_xlsx/train`).
//! Every value can be overridden from the environment, and CLI flags override
//! both.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    /// Configuration validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Default number of words kept when a title falls back to a paragraph.
pub const DEFAULT_TITLE_MAX_WORDS: usize = 15;

/// Settings for building GRP task files.
#[derive(Debug, Clone, PartialEq)]
pub struct ForgeConfig {
    /// Source dataset (JSON array of records).
    pub dataset_path: PathBuf,
    /// Directory holding one `<folder_prefix><uid>` folder of workbooks per record.
    pub xlsx_dir: PathBuf,
    /// Where the GRP JSON is written.
    pub grp_output: PathBuf,
    /// Prefix of per-record workbook folders.
    pub folder_prefix: String,
    /// Prefix of the emitted `task_id`.
    pub task_id_prefix: String,
    /// Word limit for titles derived from a leading paragraph.
    pub title_max_words: usize,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("lightning_modules/datasets/train.json"),
            xlsx_dir: PathBuf::from("extracted_xlsx/train"),
            grp_output: PathBuf::from("train_GRP.json"),
            folder_prefix: "Train_".to_string(),
            task_id_prefix: "Test ".to_string(),
            title_max_words: DEFAULT_TITLE_MAX_WORDS,
        }
    }
}

impl ForgeConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `HIERTT_DATASET_PATH`: Source dataset (default: lightning_modules/datasets/train.json)
    /// - `HIERTT_XLSX_DIR`: Workbook base directory (default: extracted_xlsx/train)
    /// - `HIERTT_GRP_OUTPUT`: GRP output file (default: train_GRP.json)
    /// - `HIERTT_FOLDER_PREFIX`: Workbook folder prefix (default: Train_)
    /// - `HIERTT_TASK_ID_PREFIX`: Task id prefix (default: "Test ")
    /// - `HIERTT_TITLE_MAX_WORDS`: Title word limit (default: 15)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable has an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(val) = lookup("HIERTT_DATASET_PATH") {
            config.dataset_path = PathBuf::from(val);
        }

        if let Some(val) = lookup("HIERTT_XLSX_DIR") {
            config.xlsx_dir = PathBuf::from(val);
        }

        if let Some(val) = lookup("HIERTT_GRP_OUTPUT") {
            config.grp_output = PathBuf::from(val);
        }

        if let Some(val) = lookup("HIERTT_FOLDER_PREFIX") {
            config.folder_prefix = val;
        }

        if let Some(val) = lookup("HIERTT_TASK_ID_PREFIX") {
            config.task_id_prefix = val;
        }

        if let Some(val) = lookup("HIERTT_TITLE_MAX_WORDS") {
            config.title_max_words = parse_env_value(&val, "HIERTT_TITLE_MAX_WORDS")?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationFailed` if any values are invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.title_max_words == 0 {
            return Err(ConfigError::ValidationFailed(
                "title_max_words must be greater than 0".to_string(),
            ));
        }

        if self.folder_prefix.contains('/') || self.folder_prefix.contains('\\') {
            return Err(ConfigError::ValidationFailed(format!(
                "folder_prefix must not contain path separators: '{}'",
                self.folder_prefix
            )));
        }

        if self.dataset_path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "dataset_path cannot be empty".to_string(),
            ));
        }

        if self.grp_output.as_os_str().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "grp_output cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_env_value<T: std::str::FromStr>(val: &str, key: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    val.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = ForgeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.folder_prefix, "Train_");
        assert_eq!(config.task_id_prefix, "Test ");
        assert_eq!(config.title_max_words, 15);
    }

    #[test]
    fn test_lookup_overrides() {
        let config = ForgeConfig::from_lookup(lookup_from(&[
            ("HIERTT_XLSX_DIR", "extracted_xlsx/test"),
            ("HIERTT_FOLDER_PREFIX", "Test_"),
            ("HIERTT_TITLE_MAX_WORDS", " 8 "),
        ]))
        .expect("config should load");

        assert_eq!(config.xlsx_dir, PathBuf::from("extracted_xlsx/test"));
        assert_eq!(config.folder_prefix, "Test_");
        assert_eq!(config.title_max_words, 8);
        assert_eq!(config.grp_output, PathBuf::from("train_GRP.json"));
    }

    #[test]
    fn test_invalid_number_rejected() {
        let err = ForgeConfig::from_lookup(lookup_from(&[("HIERTT_TITLE_MAX_WORDS", "many")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "HIERTT_TITLE_MAX_WORDS"));
    }

    #[test]
    fn test_zero_title_words_rejected() {
        let err =
            ForgeConfig::from_lookup(lookup_from(&[("HIERTT_TITLE_MAX_WORDS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationFailed(_)));
    }

    #[test]
    fn test_prefix_with_separator_rejected() {
        let config = ForgeConfig {
            folder_prefix: "a/b".to_string(),
            ..ForgeConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
