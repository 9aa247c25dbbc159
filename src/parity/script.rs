/*!
 * Protected-script integrity and length sanity checks.
 *
 * Hebrew and Aramaic text, including its vowel points and cantillation
 * marks, must come through translation unchanged. For each protected script
 * the codepoints of the designated ranges are collected in document order
 * and the two streams must be identical. A visible-length ratio catches
 * truncation that no structural check reveals.
 */

use std::fmt;

use log::debug;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::ConfigError;
use crate::markup::visible_len;

use super::discrepancy::{Discrepancy, RatioBound};

/// Default minimum length ratio (target / source)
pub const DEFAULT_RATIO_TOLERANCE: f64 = 0.85;

/// Default number of codepoints shown on each side of a script difference
pub const DEFAULT_CONTEXT_CHARS: usize = 20;

/// A Unicode codepoint, written `U+05D0` in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Codepoint(pub u32);

impl Serialize for Codepoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("U+{:04X}", self.0))
    }
}

impl<'de> Deserialize<'de> for Codepoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CodepointVisitor;

        impl Visitor<'_> for CodepointVisitor {
            type Value = Codepoint;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "a codepoint such as \"U+05D0\" or an integer")
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Codepoint, E> {
                u32::try_from(value)
                    .map(Codepoint)
                    .map_err(|_| E::custom(format!("codepoint out of range: {}", value)))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Codepoint, E> {
                let hex = value
                    .strip_prefix("U+")
                    .or_else(|| value.strip_prefix("u+"))
                    .or_else(|| value.strip_prefix("0x"))
                    .unwrap_or(value);
                u32::from_str_radix(hex, 16)
                    .map(Codepoint)
                    .map_err(|_| E::custom(format!("invalid codepoint: {}", value)))
            }
        }

        deserializer.deserialize_any(CodepointVisitor)
    }
}

/// Inclusive codepoint range belonging to a protected script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptRange {
    /// Script identifier; ranges sharing it form one stream
    pub id: String,
    pub start: Codepoint,
    pub end: Codepoint,
}

impl ScriptRange {
    pub fn new(id: &str, start: u32, end: u32) -> Self {
        Self {
            id: id.to_string(),
            start: Codepoint(start),
            end: Codepoint(end),
        }
    }

    pub fn contains(&self, c: char) -> bool {
        (self.start.0..=self.end.0).contains(&(c as u32))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidRange {
            id: self.id.clone(),
            reason: reason.to_string(),
        };
        if self.id.trim().is_empty() {
            return Err(invalid("empty script id"));
        }
        if self.start > self.end {
            return Err(invalid("start is after end"));
        }
        if self.end.0 > char::MAX as u32 {
            return Err(invalid("end is beyond the last codepoint"));
        }
        Ok(())
    }
}

/// Hebrew block plus Hebrew presentation forms
pub fn default_ranges() -> Vec<ScriptRange> {
    vec![
        ScriptRange::new("hebrew", 0x0590, 0x05FF),
        ScriptRange::new("hebrew", 0xFB1D, 0xFB4F),
    ]
}

/// Maximal run of codepoints from one protected script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRun {
    pub range_id: String,
    /// Byte offset of the run in the text
    pub offset: usize,
    pub codepoints: String,
}

/// Protected-script runs of a text in document order
pub fn script_runs(text: &str, ranges: &[ScriptRange]) -> Vec<ScriptRun> {
    let mut runs: Vec<ScriptRun> = Vec::new();
    let mut previous_end = usize::MAX;

    for (offset, c) in text.char_indices() {
        let Some(range) = ranges.iter().find(|r| r.contains(c)) else {
            continue;
        };
        match runs.last_mut() {
            Some(run) if previous_end == offset && run.range_id == range.id => {
                run.codepoints.push(c);
            }
            _ => runs.push(ScriptRun {
                range_id: range.id.clone(),
                offset,
                codepoints: c.to_string(),
            }),
        }
        previous_end = offset + c.len_utf8();
    }

    runs
}

/// All protected codepoints of one script, in document order
pub fn script_stream(text: &str, ranges: &[ScriptRange], script: &str) -> Vec<char> {
    script_runs(text, ranges)
        .into_iter()
        .filter(|run| run.range_id == script)
        .flat_map(|run| run.codepoints.chars().collect::<Vec<_>>())
        .collect()
}

/// Script integrity and length ratio checker
#[derive(Debug, Clone)]
pub struct ScriptChecker {
    ranges: Vec<ScriptRange>,
    ratio_tolerance: f64,
    ratio_ceiling: Option<f64>,
    context_chars: usize,
}

impl ScriptChecker {
    pub fn new(ranges: Vec<ScriptRange>, ratio_tolerance: f64) -> Self {
        Self {
            ranges,
            ratio_tolerance,
            ratio_ceiling: None,
            context_chars: DEFAULT_CONTEXT_CHARS,
        }
    }

    /// Also flag ratios above `ceiling`
    pub fn with_ceiling(mut self, ceiling: Option<f64>) -> Self {
        self.ratio_ceiling = ceiling;
        self
    }

    pub fn with_context_chars(mut self, context_chars: usize) -> Self {
        self.context_chars = context_chars;
        self
    }

    pub fn ranges(&self) -> &[ScriptRange] {
        &self.ranges
    }

    /// Script ids in configuration order, without repeats
    fn scripts(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for range in &self.ranges {
            if !ids.contains(&range.id.as_str()) {
                ids.push(&range.id);
            }
        }
        ids
    }

    pub fn check(&self, source_text: &str, target_text: &str) -> Vec<Discrepancy> {
        let mut out = Vec::new();

        for script in self.scripts() {
            let source = script_stream(source_text, &self.ranges, script);
            let target = script_stream(target_text, &self.ranges, script);
            if source == target {
                continue;
            }

            let index = source
                .iter()
                .zip(target.iter())
                .position(|(a, b)| a != b)
                .unwrap_or_else(|| source.len().min(target.len()));

            debug!(
                "{} stream differs at {} ({} vs {} codepoints)",
                script,
                index,
                source.len(),
                target.len()
            );

            out.push(Discrepancy::ScriptAltered {
                script: script.to_string(),
                index,
                source_len: source.len(),
                target_len: target.len(),
                source_context: context(&source, index, self.context_chars),
                target_context: context(&target, index, self.context_chars),
            });
        }

        out.extend(self.check_length(source_text, target_text));
        out
    }

    fn check_length(&self, source_text: &str, target_text: &str) -> Option<Discrepancy> {
        let source_len = visible_len(source_text);
        let target_len = visible_len(target_text);

        let exceeded = |ratio: f64, bound: RatioBound, limit: f64| Discrepancy::LengthRatioExceeded {
            ratio,
            bound,
            limit,
            source_len,
            target_len,
        };

        if target_len == 0 {
            return Some(exceeded(0.0, RatioBound::Floor, self.ratio_tolerance));
        }
        // No baseline to measure against
        if source_len == 0 {
            return None;
        }

        let ratio = target_len as f64 / source_len as f64;
        if ratio < self.ratio_tolerance {
            return Some(exceeded(ratio, RatioBound::Floor, self.ratio_tolerance));
        }
        match self.ratio_ceiling {
            Some(ceiling) if ratio > ceiling => Some(exceeded(ratio, RatioBound::Ceiling, ceiling)),
            _ => None,
        }
    }
}

impl Default for ScriptChecker {
    fn default() -> Self {
        Self::new(default_ranges(), DEFAULT_RATIO_TOLERANCE)
    }
}

/// Check protected scripts and the length ratio with default context
pub fn check_script_integrity(
    source_text: &str,
    target_text: &str,
    ranges: &[ScriptRange],
    ratio_tolerance: f64,
) -> Vec<Discrepancy> {
    ScriptChecker::new(ranges.to_vec(), ratio_tolerance).check(source_text, target_text)
}

fn context(stream: &[char], index: usize, width: usize) -> String {
    let start = index.saturating_sub(width);
    let end = index.saturating_add(width).min(stream.len());
    if start >= end {
        return String::new();
    }
    stream[start..end].iter().collect()
}
