/*!
 * Positional comparison of token sequences.
 *
 * Translate-kind tokens are left out of the alignment. The remaining tokens
 * are walked in lockstep; when the two sides disagree the comparator looks a
 * few tokens ahead on each side for a resynchronization point, so a single
 * dropped or inserted token is reported once instead of shifting every later
 * pair out of alignment.
 */

use std::collections::BTreeMap;

use log::debug;

use crate::markup::{Token, TokenKind};

use super::discrepancy::Discrepancy;

/// Default number of tokens scanned ahead when resynchronizing
pub const DEFAULT_LOOKAHEAD: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resync {
    /// Source tokens skipped before the sides line up again
    SkipSource(usize),
    /// Target tokens skipped before the sides line up again
    SkipTarget(usize),
}

/// Token sequence comparator
#[derive(Debug, Clone)]
pub struct Comparator {
    lookahead: usize,
    flag_translate_drift: bool,
}

impl Comparator {
    /// Create a comparator with the default lookahead window
    pub fn new() -> Self {
        Self {
            lookahead: DEFAULT_LOOKAHEAD,
            flag_translate_drift: false,
        }
    }

    pub fn with_lookahead(mut self, lookahead: usize) -> Self {
        self.lookahead = lookahead;
        self
    }

    /// Also report differing translate-tag counts
    pub fn with_translate_drift(mut self, enabled: bool) -> Self {
        self.flag_translate_drift = enabled;
        self
    }

    pub fn lookahead(&self) -> usize {
        self.lookahead
    }

    pub fn compare(&self, source: &[Token], target: &[Token]) -> Vec<Discrepancy> {
        let src: Vec<&Token> = source.iter().filter(|t| t.is_anchored()).collect();
        let tgt: Vec<&Token> = target.iter().filter(|t| t.is_anchored()).collect();
        let mut out = Vec::new();

        let (mut i, mut j) = (0, 0);
        while i < src.len() && j < tgt.len() {
            let (s, t) = (src[i], tgt[j]);

            if s.same_slot(t) && s.payload == t.payload {
                out.extend(attribute_mismatches(s, t));
                i += 1;
                j += 1;
                continue;
            }

            let same_kind = s.kind == t.kind;
            let resync = if same_kind {
                self.resync(&src[i..], &tgt[j..], Token::matches_exactly)
            } else {
                self.resync(&src[i..], &tgt[j..], Token::matches_exactly)
                    .or_else(|| self.resync(&src[i..], &tgt[j..], Token::same_slot))
            };

            match resync {
                Some(Resync::SkipSource(k)) => {
                    out.extend(src[i..i + k].iter().map(|s| missing(s)));
                    i += k;
                }
                Some(Resync::SkipTarget(k)) => {
                    out.extend(tgt[j..j + k].iter().map(|t| extra(t)));
                    j += k;
                }
                // Same kind at the same position: a substitution, not a gap
                None if same_kind => {
                    out.push(payload_mismatch(s, t));
                    i += 1;
                    j += 1;
                }
                None => {
                    debug!(
                        "No resynchronization within {} tokens at source {} / target {}",
                        self.lookahead, s.position, t.position
                    );
                    break;
                }
            }
        }

        out.extend(src[i..].iter().map(|s| missing(s)));
        out.extend(tgt[j..].iter().map(|t| extra(t)));

        if self.flag_translate_drift {
            out.extend(translate_drift(source, target));
        }

        debug!(
            "Compared {} / {} anchored tokens: {} discrepancies",
            src.len(),
            tgt.len(),
            out.len()
        );
        out
    }

    /// Nearest point within the window where the sides match again
    fn resync(
        &self,
        src: &[&Token],
        tgt: &[&Token],
        matches: fn(&Token, &Token) -> bool,
    ) -> Option<Resync> {
        for k in 1..=self.lookahead {
            if k < src.len() && matches(src[k], tgt[0]) {
                return Some(Resync::SkipSource(k));
            }
            if k < tgt.len() && matches(src[0], tgt[k]) {
                return Some(Resync::SkipTarget(k));
            }
        }
        None
    }
}

impl Default for Comparator {
    fn default() -> Self {
        Self::new()
    }
}

/// Compare with the default lookahead window
pub fn compare(source: &[Token], target: &[Token]) -> Vec<Discrepancy> {
    Comparator::new().compare(source, target)
}

fn missing(token: &Token) -> Discrepancy {
    Discrepancy::MissingToken {
        position: token.position,
        tag: token.tag.clone(),
        payload: token.payload_str().to_string(),
    }
}

fn extra(token: &Token) -> Discrepancy {
    Discrepancy::ExtraToken {
        position: token.position,
        tag: token.tag.clone(),
        payload: token.payload_str().to_string(),
    }
}

fn payload_mismatch(source: &Token, target: &Token) -> Discrepancy {
    Discrepancy::PayloadMismatch {
        source_position: source.position,
        target_position: target.position,
        tag: source.tag.clone(),
        source_payload: slot_payload(source, target),
        target_payload: slot_payload(target, source),
    }
}

/// Payload as reported, qualified by the tag name when the tags differ
fn slot_payload(token: &Token, other: &Token) -> String {
    if token.tag == other.tag || token.kind == TokenKind::AttributeOpaque {
        token.payload_str().to_string()
    } else {
        format!("<{}>{}", token.tag, token.payload_str())
    }
}

fn attribute_mismatches(source: &Token, target: &Token) -> Vec<Discrepancy> {
    if source.attributes == target.attributes {
        return vec![];
    }

    let mismatch = |attribute: &str, source_value: Option<&str>, target_value: Option<&str>| {
        Discrepancy::AttributeMismatch {
            source_position: source.position,
            target_position: target.position,
            tag: source.tag.clone(),
            attribute: attribute.to_string(),
            source_value: source_value.map(str::to_string),
            target_value: target_value.map(str::to_string),
        }
    };

    let mut out = Vec::new();
    for (name, value) in &source.attributes {
        let other = target.attribute(name);
        if other != Some(value.as_str()) {
            out.push(mismatch(name.as_str(), Some(value.as_str()), other));
        }
    }
    for (name, value) in &target.attributes {
        if source.attribute(name).is_none() {
            out.push(mismatch(name.as_str(), None, Some(value.as_str())));
        }
    }
    out
}

fn translate_drift(source: &[Token], target: &[Token]) -> Vec<Discrepancy> {
    let count = |tokens: &[Token]| {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for token in tokens.iter().filter(|t| !t.is_anchored()) {
            *counts.entry(token.tag.clone()).or_default() += 1;
        }
        counts
    };
    let source_counts = count(source);
    let target_counts = count(target);

    let mut tags: Vec<&String> = source_counts.keys().chain(target_counts.keys()).collect();
    tags.sort();
    tags.dedup();

    tags.into_iter()
        .filter_map(|tag| {
            let source_count = source_counts.get(tag).copied().unwrap_or(0);
            let target_count = target_counts.get(tag).copied().unwrap_or(0);
            (source_count != target_count).then(|| Discrepancy::TranslateCountDrift {
                tag: tag.clone(),
                source_count,
                target_count,
            })
        })
        .collect()
}
