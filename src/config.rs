use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable that points at an explicit config file
pub const CONFIG_ENV_VAR: &str = "I2B2PREP_CONFIG";

/// Config file picked up from the working directory when nothing else is given
pub const DEFAULT_CONFIG_FILE: &str = "i2b2prep.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub prep: PrepConfig,
    #[serde(default)]
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// General settings
#[derive(Debug, Clone, Deserialize)]
pub struct PrepConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for PrepConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Input corpus locations
#[derive(Debug, Clone, Deserialize)]
pub struct CorpusConfig {
    /// Directory tree holding the training annotations
    #[serde(default = "default_train_dir")]
    pub train_dir: PathBuf,
    /// Directory tree holding the ground-truth (test) annotations
    #[serde(default = "default_test_dir")]
    pub test_dir: PathBuf,
    /// Extension (without the dot) of annotation files
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Sort filenames before processing so output is identical across filesystems
    #[serde(default = "default_sort_files")]
    pub sort_files: bool,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            train_dir: default_train_dir(),
            test_dir: default_test_dir(),
            extension: default_extension(),
            sort_files: default_sort_files(),
        }
    }
}

/// Output file locations
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_save_dir")]
    pub save_dir: PathBuf,
    #[serde(default = "default_train_file")]
    pub train_file: String,
    #[serde(default = "default_test_file")]
    pub test_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            save_dir: default_save_dir(),
            train_file: default_train_file(),
            test_file: default_test_file(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_train_dir() -> PathBuf {
    PathBuf::from("./corpus/i2b2/2012-07-15.original-annotation.release/")
}

fn default_test_dir() -> PathBuf {
    PathBuf::from("./corpus/i2b2/ground_truth/merged_xml/")
}

fn default_extension() -> String {
    "xml".to_string()
}

fn default_sort_files() -> bool {
    true
}

fn default_save_dir() -> PathBuf {
    PathBuf::from("./corpus/i2b2/")
}

fn default_train_file() -> String {
    "train.txt".to_string()
}

fn default_test_file() -> String {
    "test.txt".to_string()
}

impl Config {
    /// Load configuration
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. `explicit` path (the `--config` flag)
    /// 2. Path specified in I2B2PREP_CONFIG environment variable
    /// 3. ./i2b2prep.toml in current directory, if it exists
    ///
    /// With none of these, the built-in corpus paths are used.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let _ = dotenv::dotenv();

        let config_path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => match std::env::var(CONFIG_ENV_VAR) {
                Ok(path) => Some(PathBuf::from(path)),
                Err(_) => {
                    let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                    fallback.is_file().then_some(fallback)
                }
            },
        };

        let config = match config_path {
            Some(path) => Self::from_file(&path)?,
            None => {
                log::debug!("No config file found, using built-in corpus paths");
                Config::default()
            }
        };

        config.validate()?;

        Ok(config)
    }

    /// Parse a TOML config file without validating it
    pub fn from_file(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let ext = &self.corpus.extension;
        if ext.is_empty() {
            anyhow::bail!("corpus.extension must not be empty");
        }
        if ext.starts_with('.') {
            anyhow::bail!("corpus.extension must be given without the leading dot (got {:?})", ext);
        }

        if self.output.train_file.is_empty() || self.output.test_file.is_empty() {
            anyhow::bail!("output.train_file and output.test_file must not be empty");
        }
        if self.output.train_file == self.output.test_file {
            anyhow::bail!(
                "output.train_file and output.test_file must differ (both are {:?})",
                self.output.train_file
            );
        }

        Ok(())
    }

    /// Full path of the training output file
    pub fn train_output(&self) -> PathBuf {
        self.output.save_dir.join(&self.output.train_file)
    }

    /// Full path of the test output file
    pub fn test_output(&self) -> PathBuf {
        self.output.save_dir.join(&self.output.test_file)
    }
}
