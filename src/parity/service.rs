/*!
 * Parity service that runs every check on one entry pair.
 *
 * This module provides a single entry point combining structural token
 * comparison with the protected-script and length checks.
 */

use log::debug;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::errors::{ConfigError, PairError, Side};
use crate::markup::tags::default_rules;
use crate::markup::{Extractor, TagRule, TagTable};

use super::compare::{Comparator, DEFAULT_LOOKAHEAD};
use super::presence::check_text_presence;
use super::report::ParityReport;
use super::script::{default_ranges, ScriptChecker, ScriptRange, DEFAULT_CONTEXT_CHARS, DEFAULT_RATIO_TOLERANCE};

/// Configuration for the parity checks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParityConfig {
    /// Tag classification rules
    #[serde(default = "default_rules")]
    pub tags: Vec<TagRule>,

    /// Protected script ranges
    #[serde(default = "default_ranges")]
    pub scripts: Vec<ScriptRange>,

    /// Minimum acceptable length ratio (target / source)
    #[serde(default = "default_ratio_tolerance")]
    pub ratio_tolerance: f64,

    /// Maximum acceptable length ratio, unchecked when absent
    #[serde(default)]
    pub ratio_ceiling: Option<f64>,

    /// Tokens scanned ahead on each side when resynchronizing
    #[serde(default = "default_lookahead")]
    pub lookahead: usize,

    /// Codepoints of context on each side of a script difference
    #[serde(default = "default_context_chars")]
    pub context_chars: usize,

    /// Report differing counts of translate tags
    #[serde(default)]
    pub flag_translate_drift: bool,
}

fn default_ratio_tolerance() -> f64 {
    DEFAULT_RATIO_TOLERANCE
}

fn default_lookahead() -> usize {
    DEFAULT_LOOKAHEAD
}

fn default_context_chars() -> usize {
    DEFAULT_CONTEXT_CHARS
}

impl Default for ParityConfig {
    fn default() -> Self {
        Self {
            tags: default_rules(),
            scripts: default_ranges(),
            ratio_tolerance: default_ratio_tolerance(),
            ratio_ceiling: None,
            lookahead: default_lookahead(),
            context_chars: default_context_chars(),
            flag_translate_drift: false,
        }
    }
}

impl ParityConfig {
    /// Check the configuration and build its tag table
    pub fn validate(&self) -> Result<TagTable, ConfigError> {
        let table = TagTable::from_rules(&self.tags)?;

        for range in &self.scripts {
            range.validate()?;
        }

        if !self.ratio_tolerance.is_finite() || self.ratio_tolerance < 0.0 {
            return Err(ConfigError::InvalidRatio(format!(
                "ratio_tolerance must be a non-negative number, got {}",
                self.ratio_tolerance
            )));
        }

        if let Some(ceiling) = self.ratio_ceiling {
            if !ceiling.is_finite() || ceiling < self.ratio_tolerance {
                return Err(ConfigError::InvalidRatio(format!(
                    "ratio_ceiling {} must be finite and not below ratio_tolerance {}",
                    ceiling, self.ratio_tolerance
                )));
            }
        }

        Ok(table)
    }

    /// Stable digest of the settings, changing whenever a check would
    pub fn fingerprint(&self) -> String {
        let json = serde_json::to_string(self).unwrap_or_default();
        hex::encode(Sha256::digest(json.as_bytes()))
    }
}

/// Runs extraction, comparison and script checks for entry pairs
#[derive(Debug, Clone)]
pub struct ParityChecker {
    extractor: Extractor,
    comparator: Comparator,
    scripts: ScriptChecker,
}

impl ParityChecker {
    /// Create a checker from a configuration, validating it first
    pub fn with_config(config: &ParityConfig) -> Result<Self, ConfigError> {
        let table = config.validate()?;
        debug!(
            "Parity checker: {} tag rules, {} script ranges, tolerance {}",
            table.len(),
            config.scripts.len(),
            config.ratio_tolerance
        );

        Ok(Self {
            extractor: Extractor::new(table),
            comparator: Comparator::new()
                .with_lookahead(config.lookahead)
                .with_translate_drift(config.flag_translate_drift),
            scripts: ScriptChecker::new(config.scripts.clone(), config.ratio_tolerance)
                .with_ceiling(config.ratio_ceiling)
                .with_context_chars(config.context_chars),
        })
    }

    pub fn extractor(&self) -> &Extractor {
        &self.extractor
    }

    /// Check one source/target pair
    pub fn check_pair(&self, entry: &str, source: &str, target: &str) -> Result<ParityReport, PairError> {
        self.check_pair_with_text(entry, source, target, None)
    }

    /// Check a pair, and the target against its plain-text translation when given
    pub fn check_pair_with_text(
        &self,
        entry: &str,
        source: &str,
        target: &str,
        text: Option<&str>,
    ) -> Result<ParityReport, PairError> {
        let source_tokens = self
            .extractor
            .extract(source)
            .map_err(|error| PairError::Markup { side: Side::Source, error })?;
        let target_tokens = self
            .extractor
            .extract(target)
            .map_err(|error| PairError::Markup { side: Side::Target, error })?;

        let mut discrepancies = self.comparator.compare(&source_tokens, &target_tokens);
        let structural = discrepancies.len();
        discrepancies.extend(self.scripts.check(source, target));
        if let Some(text) = text {
            discrepancies.extend(check_text_presence(text, target));
        }

        debug!(
            "{}: {} source tokens, {} target tokens, {} structural and {} other discrepancies",
            entry,
            source_tokens.len(),
            target_tokens.len(),
            structural,
            discrepancies.len() - structural
        );

        Ok(ParityReport::new(entry, discrepancies))
    }
}

impl Default for ParityChecker {
    fn default() -> Self {
        Self {
            extractor: Extractor::default(),
            comparator: Comparator::default(),
            scripts: ScriptChecker::default(),
        }
    }
}
