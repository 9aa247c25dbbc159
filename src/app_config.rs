/*!
 * Application configuration: corpus locations, parity settings and log level.
 */

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

use crate::parity::ParityConfig;

/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Corpus locations
    #[serde(default)]
    pub corpus: CorpusConfig,

    /// Parity check settings
    #[serde(default)]
    pub parity: ParityConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Where the source and translated entries live
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CorpusConfig {
    // @field: Directory of source (English) entries
    #[serde(default = "default_source_dir")]
    pub source_dir: String,

    // @field: Directory of translated (French) entries
    #[serde(default = "default_target_dir")]
    pub target_dir: String,

    // @field: Entry file extension
    #[serde(default = "default_extension")]
    pub extension: String,

    // @field: JSON lines report written by a corpus run
    #[serde(default = "default_report_path")]
    pub report_path: String,

    // @field: Clean cache file, no cache when absent
    #[serde(default)]
    pub cache_path: Option<String>,

    // @field: Plain-text translations the targets are assembled from
    #[serde(default)]
    pub text_dir: Option<String>,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            target_dir: default_target_dir(),
            extension: default_extension(),
            report_path: default_report_path(),
            cache_path: None,
            text_dir: None,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_source_dir() -> String {
    "Entries".to_string()
}

fn default_target_dir() -> String {
    "Entries.fr".to_string()
}

fn default_extension() -> String {
    "html".to_string()
}

fn default_report_path() -> String {
    "parity_report.jsonl".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.corpus.source_dir.trim().is_empty() {
            return Err(anyhow!("Source directory must not be empty"));
        }

        if self.corpus.target_dir.trim().is_empty() {
            return Err(anyhow!("Target directory must not be empty"));
        }

        let source = Path::new(&self.corpus.source_dir);
        let target = Path::new(&self.corpus.target_dir);
        if source == target {
            return Err(anyhow!(
                "Source and target directories must differ: {}",
                self.corpus.source_dir
            ));
        }

        // Sources are listed recursively, so a nested target would be listed too
        if target.starts_with(source) {
            return Err(anyhow!(
                "Target directory {} must not be inside source directory {}",
                self.corpus.target_dir,
                self.corpus.source_dir
            ));
        }

        if let Some(text_dir) = &self.corpus.text_dir {
            if text_dir.trim().is_empty() {
                return Err(anyhow!("Text directory must not be empty when set"));
            }
        }

        if self.corpus.extension.trim_start_matches('.').is_empty() {
            return Err(anyhow!("Entry file extension must not be empty"));
        }

        self.parity.validate()?;

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            corpus: CorpusConfig::default(),
            parity: ParityConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
