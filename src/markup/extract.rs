/*!
 * Structural token extraction.
 *
 * Turns an entry's markup into the ordered token sequence the comparator
 * aligns. Only tag-delimited spans produce tokens; free text is ignored.
 */

use log::trace;
use serde::Serialize;

use crate::errors::MarkupError;

use super::scanner::{Event, Scanner};
use super::tags::{TagTable, TokenKind};

/// One structural unit of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// Classification of the tag
    pub kind: TokenKind,
    /// Tag name, lowercased
    pub tag: String,
    /// Raw content for preserve-verbatim, tag name for attribute-opaque, none for translate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    /// Attributes in document order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<(String, String)>,
    /// Index within the document's token sequence
    pub position: usize,
    /// Byte offset of the opening tag
    pub offset: usize,
}

impl Token {
    pub fn is_anchored(&self) -> bool {
        self.kind.is_anchored()
    }

    /// Same kind and tag name
    pub fn same_slot(&self, other: &Token) -> bool {
        self.kind == other.kind && self.tag == other.tag
    }

    /// Same slot, payload and attributes
    pub fn matches_exactly(&self, other: &Token) -> bool {
        self.same_slot(other) && self.payload == other.payload && self.attributes == other.attributes
    }

    pub fn payload_str(&self) -> &str {
        self.payload.as_deref().unwrap_or("")
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

struct Frame {
    tag: String,
    offset: usize,
}

/// An open preserve-verbatim element whose payload is still being collected
struct Verbatim {
    token: usize,
    content_start: usize,
    depth: usize,
}

/// Token extractor driven by a tag table
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    table: TagTable,
}

impl Extractor {
    pub fn new(table: TagTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &TagTable {
        &self.table
    }

    /// Extract the token sequence of a document
    ///
    /// Fails on the first structural violation; no partial result is returned.
    pub fn extract(&self, document: &str) -> Result<Vec<Token>, MarkupError> {
        let mut tokens: Vec<Token> = Vec::new();
        let mut stack: Vec<Frame> = Vec::new();
        let mut verbatim: Option<Verbatim> = None;

        for event in Scanner::new(document) {
            match event? {
                Event::Text { .. } => {}
                Event::Open {
                    name,
                    attributes,
                    self_closing,
                    start,
                    end,
                } => {
                    let tag = name.to_ascii_lowercase();

                    if verbatim.is_some() {
                        // Swallowed into the enclosing payload; only balance matters
                        let void = self.table.classify(&tag).is_some_and(|rule| rule.void);
                        if !self_closing && !void {
                            stack.push(Frame { tag, offset: start });
                        }
                        continue;
                    }

                    let rule = self.table.classify(&tag).ok_or_else(|| MarkupError::UnknownTag {
                        tag: name.to_string(),
                        offset: start,
                    })?;
                    let has_content = !self_closing && !rule.void;
                    let position = tokens.len();

                    let payload = match rule.kind {
                        TokenKind::PreserveVerbatim => Some(String::new()),
                        TokenKind::AttributeOpaque => Some(tag.clone()),
                        TokenKind::Translate => None,
                    };
                    tokens.push(Token {
                        kind: rule.kind,
                        tag: tag.clone(),
                        payload,
                        attributes,
                        position,
                        offset: start,
                    });

                    if has_content {
                        stack.push(Frame { tag, offset: start });
                        if rule.kind == TokenKind::PreserveVerbatim {
                            verbatim = Some(Verbatim {
                                token: position,
                                content_start: end,
                                depth: stack.len(),
                            });
                        }
                    }
                }
                Event::Close { name, start } => {
                    let tag = name.to_ascii_lowercase();
                    match stack.last() {
                        None => {
                            return Err(MarkupError::malformed(
                                start,
                                format!("unexpected closing tag </{}>", name),
                            ));
                        }
                        Some(top) if top.tag != tag => {
                            return Err(MarkupError::malformed(
                                start,
                                format!("unexpected closing tag </{}>, expected </{}>", name, top.tag),
                            ));
                        }
                        Some(_) => {
                            stack.pop();
                        }
                    }

                    if let Some(open) = verbatim.as_ref() {
                        if stack.len() < open.depth {
                            tokens[open.token].payload =
                                Some(document[open.content_start..start].to_string());
                            verbatim = None;
                        }
                    }
                }
            }
        }

        if let Some(top) = stack.last() {
            return Err(MarkupError::malformed(
                top.offset,
                format!("unclosed tag <{}>", top.tag),
            ));
        }

        trace!("Extracted {} tokens from {} bytes", tokens.len(), document.len());
        Ok(tokens)
    }
}

/// Extract tokens with the default BDB tag table
pub fn extract(document: &str) -> Result<Vec<Token>, MarkupError> {
    Extractor::default().extract(document)
}
