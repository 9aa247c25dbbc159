/*!
 * Per-entry parity report.
 */

use serde::Serialize;

use super::discrepancy::{Discrepancy, DiscrepancyKind};

/// Overall verdict for one entry pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// No discrepancies
    Clean,
    /// At least one discrepancy
    Flagged,
}

/// Result of checking one source/target entry pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParityReport {
    /// Entry key, e.g. `BDB17`
    pub entry: String,
    pub verdict: Verdict,
    pub discrepancies: Vec<Discrepancy>,
}

impl ParityReport {
    /// Build a report; the verdict follows from the discrepancies
    pub fn new(entry: impl Into<String>, discrepancies: Vec<Discrepancy>) -> Self {
        let verdict = if discrepancies.is_empty() {
            Verdict::Clean
        } else {
            Verdict::Flagged
        };
        Self {
            entry: entry.into(),
            verdict,
            discrepancies,
        }
    }

    /// A clean report with no discrepancies
    pub fn clean(entry: impl Into<String>) -> Self {
        Self::new(entry, Vec::new())
    }

    pub fn is_clean(&self) -> bool {
        self.verdict == Verdict::Clean
    }

    pub fn count_of(&self, kind: DiscrepancyKind) -> usize {
        self.discrepancies.iter().filter(|d| d.kind() == kind).count()
    }

    /// One line per discrepancy, prefixed with the entry key
    pub fn describe(&self) -> Vec<String> {
        self.discrepancies
            .iter()
            .map(|d| format!("{}: {}", self.entry, d))
            .collect()
    }
}
