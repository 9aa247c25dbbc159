/*!
 * Presence of the plain-text translation in the assembled target.
 *
 * French entries are written as plain text first and then reassembled into
 * markup. Every prose line of the text must still be found in the target,
 * otherwise the reassembly dropped or rewrote part of the translation.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::markup::visible_text;

use super::discrepancy::Discrepancy;

/// Words checked for presence: three letters or more, Latin with accents
static WORD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z\u{00C0}-\u{024F}]{3,}").expect("Invalid word regex")
});

/// Lines made only of Hebrew or Arabic script and punctuation
static SCRIPT_ONLY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\u{0590}-\u{05FF}\u{0600}-\u{06FF}\s\[\]:./, ]+$").expect("Invalid script line regex")
});

/// Section rulers and separators carry no translated text
fn is_skipped(line: &str) -> bool {
    line.is_empty() || line.starts_with("===") || line == "---" || SCRIPT_ONLY_REGEX.is_match(line)
}

/// Report, per text line, the first word that the target does not contain
///
/// Words are looked up in the raw target and in its visible text, so an
/// accented letter written as an entity still counts as present.
pub fn check_text_presence(text: &str, target: &str) -> Vec<Discrepancy> {
    let visible = visible_text(target);
    let present = |word: &str| target.contains(word) || visible.contains(word);

    let mut out = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if is_skipped(line) {
            continue;
        }
        if let Some(word) = WORD_REGEX.find_iter(line).map(|m| m.as_str()).find(|w| !present(w)) {
            out.push(Discrepancy::TextMissing {
                line: index + 1,
                word: word.to_string(),
            });
        }
    }

    debug!("Text presence: {} lines with missing words", out.len());
    out
}
