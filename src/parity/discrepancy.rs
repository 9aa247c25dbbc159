/*!
 * Discrepancy records produced by the parity checks.
 */

use std::fmt;

use serde::Serialize;

/// Which length ratio bound was crossed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RatioBound {
    /// Target shorter than the tolerance allows
    Floor,
    /// Target longer than the ceiling allows
    Ceiling,
}

/// One detected inconsistency between a source and a target entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Discrepancy {
    /// Source token with no counterpart in the target
    MissingToken {
        position: usize,
        tag: String,
        payload: String,
    },
    /// Target token with no counterpart in the source
    ExtraToken {
        position: usize,
        tag: String,
        payload: String,
    },
    /// Aligned tokens whose payloads differ
    PayloadMismatch {
        source_position: usize,
        target_position: usize,
        tag: String,
        source_payload: String,
        target_payload: String,
    },
    /// Aligned tokens whose attribute differs or is absent on one side
    AttributeMismatch {
        source_position: usize,
        target_position: usize,
        tag: String,
        attribute: String,
        source_value: Option<String>,
        target_value: Option<String>,
    },
    /// Protected script stream differs
    ScriptAltered {
        script: String,
        index: usize,
        source_len: usize,
        target_len: usize,
        source_context: String,
        target_context: String,
    },
    /// Visible length ratio outside the accepted bounds
    LengthRatioExceeded {
        ratio: f64,
        bound: RatioBound,
        limit: f64,
        source_len: usize,
        target_len: usize,
    },
    /// Count of a translate-kind tag differs between the sides
    TranslateCountDrift {
        tag: String,
        source_count: usize,
        target_count: usize,
    },
    /// A line of the plain-text translation has a word absent from the target
    TextMissing { line: usize, word: String },
}

/// Discriminant of a `Discrepancy`, used for tallies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiscrepancyKind {
    MissingToken,
    ExtraToken,
    PayloadMismatch,
    AttributeMismatch,
    ScriptAltered,
    LengthRatioExceeded,
    TranslateCountDrift,
    TextMissing,
}

impl DiscrepancyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingToken => "missing-token",
            Self::ExtraToken => "extra-token",
            Self::PayloadMismatch => "payload-mismatch",
            Self::AttributeMismatch => "attribute-mismatch",
            Self::ScriptAltered => "script-altered",
            Self::LengthRatioExceeded => "length-ratio-exceeded",
            Self::TranslateCountDrift => "translate-count-drift",
            Self::TextMissing => "text-missing",
        }
    }
}

impl fmt::Display for DiscrepancyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Discrepancy {
    pub fn kind(&self) -> DiscrepancyKind {
        match self {
            Self::MissingToken { .. } => DiscrepancyKind::MissingToken,
            Self::ExtraToken { .. } => DiscrepancyKind::ExtraToken,
            Self::PayloadMismatch { .. } => DiscrepancyKind::PayloadMismatch,
            Self::AttributeMismatch { .. } => DiscrepancyKind::AttributeMismatch,
            Self::ScriptAltered { .. } => DiscrepancyKind::ScriptAltered,
            Self::LengthRatioExceeded { .. } => DiscrepancyKind::LengthRatioExceeded,
            Self::TranslateCountDrift { .. } => DiscrepancyKind::TranslateCountDrift,
            Self::TextMissing { .. } => DiscrepancyKind::TextMissing,
        }
    }
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingToken {
                position,
                tag,
                payload,
            } => write!(f, "missing <{}> at position {}: '{}'", tag, position, payload),
            Self::ExtraToken {
                position,
                tag,
                payload,
            } => write!(f, "extra <{}> at target position {}: '{}'", tag, position, payload),
            Self::PayloadMismatch {
                source_position,
                tag,
                source_payload,
                target_payload,
                ..
            } => write!(
                f,
                "<{}> at position {} changed: '{}' -> '{}'",
                tag, source_position, source_payload, target_payload
            ),
            Self::AttributeMismatch {
                source_position,
                tag,
                attribute,
                source_value,
                target_value,
                ..
            } => write!(
                f,
                "<{}> at position {} attribute {} changed: {} -> {}",
                tag,
                source_position,
                attribute,
                source_value.as_deref().unwrap_or("(absent)"),
                target_value.as_deref().unwrap_or("(absent)")
            ),
            Self::ScriptAltered {
                script,
                index,
                source_len,
                target_len,
                source_context,
                target_context,
            } => write!(
                f,
                "{} text altered at char {} (len {} -> {}): ...{}... vs ...{}...",
                script, index, source_len, target_len, source_context, target_context
            ),
            Self::LengthRatioExceeded {
                ratio,
                bound,
                limit,
                source_len,
                target_len,
            } => {
                let op = match bound {
                    RatioBound::Floor => "<",
                    RatioBound::Ceiling => ">",
                };
                write!(
                    f,
                    "length ratio {:.2} {} {:.2} ({} -> {} chars)",
                    ratio, op, limit, source_len, target_len
                )
            }
            Self::TranslateCountDrift {
                tag,
                source_count,
                target_count,
            } => write!(
                f,
                "<{}> count changed: {} -> {}",
                tag, source_count, target_count
            ),
            Self::TextMissing { line, word } => {
                write!(f, "text line {} missing from target: '{}'", line, word)
            }
        }
    }
}
