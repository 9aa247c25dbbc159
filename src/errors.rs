/*!
 * Error types for the lexparity application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions. Content mismatches
 * between a source and a target entry are never errors: they are reported as
 * `Discrepancy` values by the parity module.
 */

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Errors raised while tokenizing a marked-up entry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarkupError {
    /// The markup is not well-formed at the given byte offset
    #[error("Malformed markup at byte {offset}: {reason}")]
    Malformed {
        /// Byte offset of the first structural violation
        offset: usize,
        /// What was wrong at that offset
        reason: String,
    },

    /// A tag name that the tag table does not classify
    #[error("Unknown tag <{tag}> at byte {offset}")]
    UnknownTag {
        /// Tag name as written
        tag: String,
        /// Byte offset of the opening tag
        offset: usize,
    },
}

impl MarkupError {
    /// Byte offset the error points at
    pub fn offset(&self) -> usize {
        match self {
            Self::Malformed { offset, .. } | Self::UnknownTag { offset, .. } => *offset,
        }
    }

    pub(crate) fn malformed(offset: usize, reason: impl Into<String>) -> Self {
        Self::Malformed {
            offset,
            reason: reason.into(),
        }
    }
}

/// Errors in the checker configuration, detected at startup
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A tag rule name is empty or contains characters a tag name cannot hold
    #[error("Invalid tag rule name: '{0}'")]
    InvalidTagName(String),

    /// Two tag rules claim the same name
    #[error("Duplicate tag rule: '{0}'")]
    DuplicateTag(String),

    /// A protected script range is unusable
    #[error("Invalid script range '{id}': {reason}")]
    InvalidRange {
        /// Script identifier of the range
        id: String,
        /// Why the range was rejected
        reason: String,
    },

    /// The length ratio bounds are out of range
    #[error("Invalid length ratio bound: {0}")]
    InvalidRatio(String),

    /// An entry filter digit outside 0-9
    #[error("Invalid entry digit: {0} (expected 0-9)")]
    InvalidDigit(u8),
}

/// Which side of a document pair an error belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Source,
    Target,
    /// Plain-text translation the target was assembled from
    Text,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => write!(f, "source"),
            Self::Target => write!(f, "target"),
            Self::Text => write!(f, "text"),
        }
    }
}

/// Errors that make a document pair unprocessable
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PairError {
    /// One side of the pair could not be tokenized
    #[error("{side} markup error: {error}")]
    Markup {
        /// Side that failed
        side: Side,
        /// Underlying markup error
        #[source]
        error: MarkupError,
    },
}

impl PairError {
    /// Side that failed
    pub fn side(&self) -> Side {
        match self {
            Self::Markup { side, .. } => *side,
        }
    }
}
