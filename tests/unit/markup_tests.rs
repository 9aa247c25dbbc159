/*!
 * Tests for markup extraction through the public API
 */

use lexparity::errors::MarkupError;
use lexparity::markup::{extract, visible_len, visible_text, TokenKind};
use crate::common;

/// Test that the sample entry yields the anchored tokens in document order
#[test]
fn test_extract_withSampleEntry_shouldListAnchoredTokens() {
    let tokens = extract(common::sample_source_entry()).unwrap();

    let anchored: Vec<(&str, &str)> = tokens
        .iter()
        .filter(|t| t.is_anchored())
        .map(|t| (t.tag.as_str(), t.payload_str()))
        .collect();

    assert_eq!(
        anchored,
        vec![
            ("entry", "BDB17"),
            ("bdbheb", "אָב"),
            ("ref", "ref"),
            ("lookup", "אבה"),
            ("placeholder1", "placeholder1"),
        ]
    );
}

/// Test that positions index the full token sequence, translate tokens included
#[test]
fn test_extract_withSampleEntry_shouldNumberEveryToken() {
    let tokens = extract(common::sample_source_entry()).unwrap();

    for (index, token) in tokens.iter().enumerate() {
        assert_eq!(token.position, index);
    }
    assert_eq!(tokens[0].tag, "html");
    assert_eq!(tokens[0].kind, TokenKind::Translate);
}

/// Test that translate-kind content is not part of any token
#[test]
fn test_extract_withTranslateContent_shouldCarryNoPayload() {
    let tokens = common::ab_extractor().extract("<A>x</A><B>y</B>").unwrap();

    assert_eq!(tokens[1].kind, TokenKind::Translate);
    assert_eq!(tokens[1].payload, None);
}

/// Test that a mismatched closing tag is reported at its own offset
#[test]
fn test_extract_withMismatchedCloseTag_shouldReportItsOffset() {
    let error = common::ab_extractor().extract("<A>x</B>").unwrap_err();

    assert!(matches!(error, MarkupError::Malformed { offset: 4, .. }));
}

/// Test that an unknown tag in the BDB table fails loudly
#[test]
fn test_extract_withUnknownBdbTag_shouldFail() {
    let error = extract("<p>see <marquee>x</marquee></p>").unwrap_err();

    assert_eq!(
        error,
        MarkupError::UnknownTag {
            tag: "marquee".to_string(),
            offset: 7
        }
    );
}

/// Test that comments, doctype and raw text bodies are not tokenized
#[test]
fn test_extract_withCommentsAndScript_shouldSkipThem() {
    let html = "<!DOCTYPE html><!-- <bogus> --><script>if (a < b) { x('<p>'); }</script><p>x</p>";
    let tokens = extract(html).unwrap();

    let tags: Vec<&str> = tokens.iter().map(|t| t.tag.as_str()).collect();
    assert_eq!(tags, vec!["script", "p"]);
}

/// Test that an unterminated tag is malformed at the '<'
#[test]
fn test_extract_withUnterminatedTag_shouldFailAtItsStart() {
    let error = extract("<p>x</p><bdbheb").unwrap_err();
    assert_eq!(error.offset(), 8);
}

/// Test visible text of the sample entry
#[test]
fn test_visible_text_withSampleEntry_shouldDropMarkup() {
    let text = visible_text(common::sample_source_entry());

    assert!(text.starts_with("BDB17 BDB17 אָב n.m. father"));
    assert!(!text.contains('<'));
    assert!(!text.contains('\n'));
    assert_eq!(visible_len("<p>a &amp; b</p>"), 5);
}
