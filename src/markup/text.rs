/*!
 * Human-visible text of a document.
 *
 * Used for the length ratio check: tags, comments and declarations are
 * dropped, entities are decoded and whitespace is collapsed. This never
 * fails; after a structural error the rest of the input counts as text.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use super::scanner::{Event, Scanner};

/// Regex for whitespace runs
static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+").expect("Invalid whitespace regex")
});

/// Regex for named and numeric character references
static ENTITY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z]{2,6});").expect("Invalid entity regex")
});

/// Visible text with whitespace collapsed
pub fn visible_text(document: &str) -> String {
    let mut raw = String::with_capacity(document.len());
    let mut consumed = 0;

    let mut scanner = Scanner::new(document);
    loop {
        match scanner.next() {
            None => break,
            Some(Ok(Event::Text { text })) => raw.push_str(text),
            Some(Ok(_)) => {}
            Some(Err(_)) => {
                raw.push_str(&document[consumed..]);
                break;
            }
        }
        consumed = scanner.position();
    }

    let decoded = decode_entities(&raw);
    WHITESPACE_REGEX.replace_all(decoded.trim(), " ").into_owned()
}

/// Count of codepoints in the visible text
pub fn visible_len(document: &str) -> usize {
    visible_text(document).chars().count()
}

/// Decode the common named entities and all numeric references
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    ENTITY_REGEX
        .replace_all(text, |caps: &regex::Captures| {
            let body = &caps[1];
            let decoded = if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = body.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                named_entity(body)
            };
            match decoded {
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn named_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{00A0}'),
        "ndash" => Some('\u{2013}'),
        "mdash" => Some('\u{2014}'),
        _ => None,
    }
}
