/*!
 * Low-level markup scanner.
 *
 * Splits a document into opening tags, closing tags and text runs, with the
 * byte offsets of each. Comments, `<!...>` and `<?...?>` declarations are
 * skipped, and the bodies of `script`/`style` elements are skipped up to
 * their closing tag. Nesting is not checked here; that is the extractor's job.
 */

use crate::errors::MarkupError;

/// Elements whose bodies are raw text rather than markup
const RAW_TEXT_ELEMENTS: [&str; 2] = ["script", "style"];

/// One lexical unit of a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Event<'a> {
    /// Opening or self-closing tag; `end` is the byte just past `>`
    Open {
        name: &'a str,
        attributes: Vec<(String, String)>,
        self_closing: bool,
        start: usize,
        end: usize,
    },
    /// Closing tag starting at `start`
    Close { name: &'a str, start: usize },
    /// Character data between tags
    Text { text: &'a str },
}

pub(crate) struct Scanner<'a> {
    src: &'a str,
    pos: usize,
    raw_text_close: Option<(&'a str, usize)>,
    failed: bool,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            raw_text_close: None,
            failed: false,
        }
    }

    /// Byte offset of the next unread input
    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    fn fail(&mut self, error: MarkupError) -> Option<Result<Event<'a>, MarkupError>> {
        self.failed = true;
        Some(Err(error))
    }

    /// Skip a raw text body up to (not including) its closing tag
    fn skip_raw_text(&mut self, name: &str, open_start: usize) -> Result<(), MarkupError> {
        let needle = format!("</{}", name.to_ascii_lowercase());
        let rest = self.src[self.pos..].to_ascii_lowercase();
        match rest.find(&needle) {
            Some(found) => {
                self.pos += found;
                Ok(())
            }
            None => Err(MarkupError::malformed(
                open_start,
                format!("unclosed tag <{}>", name),
            )),
        }
    }

    fn scan_close(&mut self, start: usize) -> Result<Event<'a>, MarkupError> {
        let src = self.src;
        let bytes = src.as_bytes();
        let name_start = start + 2;
        let mut i = name_start;
        while i < bytes.len() && is_name_byte(bytes[i]) {
            i += 1;
        }
        let name = &src[name_start..i];
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() {
            return Err(MarkupError::malformed(start, "unterminated closing tag"));
        }
        if name.is_empty() || bytes[i] != b'>' {
            return Err(MarkupError::malformed(start, "invalid closing tag"));
        }
        self.pos = i + 1;
        Ok(Event::Close { name, start })
    }

    fn scan_open(&mut self, start: usize) -> Result<Event<'a>, MarkupError> {
        let src = self.src;
        let bytes = src.as_bytes();
        let name_start = start + 1;
        let mut i = name_start;
        while i < bytes.len() && is_name_byte(bytes[i]) {
            i += 1;
        }
        let name = &src[name_start..i];
        let mut attributes = Vec::new();

        loop {
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            if i >= bytes.len() {
                return Err(MarkupError::malformed(start, format!("unterminated tag <{}", name)));
            }
            match bytes[i] {
                b'>' => {
                    self.pos = i + 1;
                    return Ok(Event::Open {
                        name,
                        attributes,
                        self_closing: false,
                        start,
                        end: i + 1,
                    });
                }
                b'/' if bytes.get(i + 1) == Some(&b'>') => {
                    self.pos = i + 2;
                    return Ok(Event::Open {
                        name,
                        attributes,
                        self_closing: true,
                        start,
                        end: i + 2,
                    });
                }
                b'/' => {
                    i += 1;
                }
                _ => {
                    let attr_start = i;
                    while i < bytes.len()
                        && !bytes[i].is_ascii_whitespace()
                        && !matches!(bytes[i], b'=' | b'>' | b'/')
                    {
                        i += 1;
                    }
                    let attr_name = src[attr_start..i].to_string();
                    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                        i += 1;
                    }
                    let mut value = String::new();
                    if i < bytes.len() && bytes[i] == b'=' {
                        i += 1;
                        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                            i += 1;
                        }
                        if i < bytes.len() && matches!(bytes[i], b'"' | b'\'') {
                            let quote = bytes[i];
                            let value_start = i + 1;
                            let Some(len) = bytes[value_start..].iter().position(|&b| b == quote)
                            else {
                                return Err(MarkupError::malformed(
                                    attr_start,
                                    "unterminated attribute value",
                                ));
                            };
                            value = src[value_start..value_start + len].to_string();
                            i = value_start + len + 1;
                        } else {
                            let value_start = i;
                            while i < bytes.len()
                                && !bytes[i].is_ascii_whitespace()
                                && bytes[i] != b'>'
                            {
                                i += 1;
                            }
                            value = src[value_start..i].to_string();
                        }
                    }
                    attributes.push((attr_name, value));
                }
            }
        }
    }

    /// Skip `<!-- -->`, `<!...>` and `<?...>`; returns false when `start` is not one
    fn skip_declaration(&mut self, start: usize) -> Result<bool, MarkupError> {
        let rest = &self.src[start..];
        if rest.starts_with("<!--") {
            return match rest[4..].find("-->") {
                Some(end) => {
                    self.pos = start + 4 + end + 3;
                    Ok(true)
                }
                None => Err(MarkupError::malformed(start, "unterminated comment")),
            };
        }
        if rest.starts_with("<!") || rest.starts_with("<?") {
            return match rest.find('>') {
                Some(end) => {
                    self.pos = start + end + 1;
                    Ok(true)
                }
                None => Err(MarkupError::malformed(start, "unterminated declaration")),
            };
        }
        Ok(false)
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Event<'a>, MarkupError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        if let Some((name, open_start)) = self.raw_text_close.take() {
            if let Err(error) = self.skip_raw_text(name, open_start) {
                return self.fail(error);
            }
        }

        loop {
            if self.pos >= self.src.len() {
                return None;
            }

            let src = self.src;
            let rest = &src[self.pos..];
            let Some(lt) = rest.find('<') else {
                self.pos = self.src.len();
                return Some(Ok(Event::Text { text: rest }));
            };
            if lt > 0 {
                self.pos += lt;
                return Some(Ok(Event::Text { text: &rest[..lt] }));
            }

            let start = self.pos;
            match self.skip_declaration(start) {
                Ok(true) => continue,
                Ok(false) => {}
                Err(error) => return self.fail(error),
            }

            let next = src.as_bytes().get(start + 1).copied();
            let result = match next {
                Some(b'/') => self.scan_close(start),
                Some(b) if b.is_ascii_alphabetic() => self.scan_open(start),
                _ => {
                    // A lone '<' is character data
                    self.pos = start + 1;
                    return Some(Ok(Event::Text {
                        text: &src[start..start + 1],
                    }));
                }
            };

            return match result {
                Ok(event) => {
                    if let Event::Open {
                        name,
                        self_closing: false,
                        start,
                        ..
                    } = &event
                    {
                        if RAW_TEXT_ELEMENTS.iter().any(|raw| raw.eq_ignore_ascii_case(name)) {
                            self.raw_text_close = Some((*name, *start));
                        }
                    }
                    Some(Ok(event))
                }
                Err(error) => self.fail(error),
            };
        }
    }
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b':' | b'.')
}
