/*!
 * Per-pair outcomes and the corpus summary folded from them.
 */

use std::collections::BTreeMap;

use serde::Serialize;

use crate::errors::{PairError, Side};
use crate::parity::{DiscrepancyKind, ParityReport};

/// How one corpus pair ended
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PairOutcome {
    /// Both sides were tokenized and compared
    Checked(ParityReport),
    /// One side could not be read as markup
    Unprocessable {
        entry: String,
        side: Side,
        reason: String,
    },
}

impl PairOutcome {
    pub fn from_result(entry: &str, result: Result<ParityReport, PairError>) -> Self {
        match result {
            Ok(report) => Self::Checked(report),
            Err(error) => Self::Unprocessable {
                entry: entry.to_string(),
                side: error.side(),
                reason: error.to_string(),
            },
        }
    }

    pub fn entry(&self) -> &str {
        match self {
            Self::Checked(report) => &report.entry,
            Self::Unprocessable { entry, .. } => entry,
        }
    }

    pub fn is_clean(&self) -> bool {
        matches!(self, Self::Checked(report) if report.is_clean())
    }
}

/// Totals over a corpus run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CorpusSummary {
    /// Pairs with a clean verdict, cache hits included
    pub clean: usize,
    /// Entry keys with a flagged verdict, in run order
    pub flagged: Vec<String>,
    /// Entry keys that could not be tokenized, in run order
    pub unprocessable: Vec<String>,
    /// Discrepancy tally over all flagged pairs
    pub by_kind: BTreeMap<DiscrepancyKind, usize>,
    /// Selected source entries without a target
    pub untranslated: usize,
    /// Clean pairs taken from the cache without re-checking
    pub cache_hits: usize,
}

impl CorpusSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold outcomes into a summary
    pub fn from_outcomes<'a, I: IntoIterator<Item = &'a PairOutcome>>(outcomes: I) -> Self {
        let mut summary = Self::new();
        for outcome in outcomes {
            summary.record(outcome);
        }
        summary
    }

    pub fn record(&mut self, outcome: &PairOutcome) {
        match outcome {
            PairOutcome::Checked(report) if report.is_clean() => self.clean += 1,
            PairOutcome::Checked(report) => {
                self.flagged.push(report.entry.clone());
                for discrepancy in &report.discrepancies {
                    *self.by_kind.entry(discrepancy.kind()).or_insert(0) += 1;
                }
            }
            PairOutcome::Unprocessable { entry, .. } => self.unprocessable.push(entry.clone()),
        }
    }

    pub fn record_cache_hit(&mut self) {
        self.cache_hits += 1;
    }

    /// Pairs that reached a verdict or failed
    pub fn checked(&self) -> usize {
        self.clean + self.flagged.len() + self.unprocessable.len()
    }

    /// Anything flagged, unprocessable or untranslated
    pub fn has_failures(&self) -> bool {
        !self.flagged.is_empty() || !self.unprocessable.is_empty() || self.untranslated > 0
    }

    /// Human-readable summary lines
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "{} pairs: {} clean ({} cached), {} flagged, {} unprocessable; {} untranslated",
            self.checked(),
            self.clean,
            self.cache_hits,
            self.flagged.len(),
            self.unprocessable.len(),
            self.untranslated
        )];
        for (kind, count) in &self.by_kind {
            lines.push(format!("  {:<22} {}", kind.as_str(), count));
        }
        lines
    }
}
