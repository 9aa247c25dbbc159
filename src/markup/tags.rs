/*!
 * Tag classification table.
 *
 * Every tag name that may appear in an entry is mapped to one of three
 * token kinds. The table is built once at startup from configuration and
 * rejects malformed or duplicate rules, so an unexpected tag in a document
 * surfaces as an `UnknownTag` error instead of being guessed at.
 */

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// How the content of a tag is treated for parity purposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenKind {
    /// Content must be byte-identical between source and target
    PreserveVerbatim,
    /// Human-language prose, expected to differ
    Translate,
    /// Marker whose identity is its tag name and attributes
    AttributeOpaque,
}

impl TokenKind {
    /// Whether tokens of this kind take part in positional alignment
    pub fn is_anchored(&self) -> bool {
        !matches!(self, Self::Translate)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PreserveVerbatim => "preserve-verbatim",
            Self::Translate => "translate",
            Self::AttributeOpaque => "attribute-opaque",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry of the classification table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRule {
    /// Tag name, matched case-insensitively
    pub name: String,

    /// Kind assigned to tags with this name
    pub kind: TokenKind,

    /// Also match the name followed by a numeric suffix (`placeholder8`)
    #[serde(default)]
    pub numbered: bool,

    /// Element never has content or a closing tag (`<br>`, `<hr>`)
    #[serde(default)]
    pub void: bool,
}

impl TagRule {
    pub fn new(name: &str, kind: TokenKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            numbered: false,
            void: false,
        }
    }

    pub fn numbered(mut self) -> Self {
        self.numbered = true;
        self
    }

    pub fn void(mut self) -> Self {
        self.void = true;
        self
    }
}

/// Validated tag-name to kind mapping
#[derive(Debug, Clone)]
pub struct TagTable {
    rules: Vec<TagRule>,
    exact: HashMap<String, usize>,
    numbered: HashMap<String, usize>,
}

impl TagTable {
    /// Build a table from rules, rejecting invalid names and duplicates
    pub fn from_rules(rules: &[TagRule]) -> Result<Self, ConfigError> {
        let mut table = Self::empty();
        for rule in rules {
            if !is_valid_rule_name(&rule.name, rule.numbered) {
                return Err(ConfigError::InvalidTagName(rule.name.clone()));
            }
            let key = rule.name.to_ascii_lowercase();
            if table.exact.contains_key(&key) {
                return Err(ConfigError::DuplicateTag(rule.name.clone()));
            }
            table.insert(key, rule.clone());
        }
        Ok(table)
    }

    /// Table for the BDB lexicon entries
    pub fn bdb_default() -> Self {
        let mut table = Self::empty();
        for rule in default_rules() {
            table.insert(rule.name.clone(), rule);
        }
        table
    }

    /// Find the rule classifying a tag name
    pub fn classify(&self, tag: &str) -> Option<&TagRule> {
        let key = tag.to_ascii_lowercase();
        if let Some(&index) = self.exact.get(&key) {
            return Some(&self.rules[index]);
        }

        let base = key.trim_end_matches(|c: char| c.is_ascii_digit());
        if base.is_empty() || base.len() == key.len() {
            return None;
        }
        self.numbered.get(base).map(|&index| &self.rules[index])
    }

    pub fn rules(&self) -> &[TagRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn empty() -> Self {
        Self {
            rules: Vec::new(),
            exact: HashMap::new(),
            numbered: HashMap::new(),
        }
    }

    fn insert(&mut self, key: String, mut rule: TagRule) {
        rule.name = key.clone();
        let index = self.rules.len();
        if rule.numbered {
            self.numbered.insert(key.clone(), index);
        }
        self.exact.insert(key, index);
        self.rules.push(rule);
    }
}

impl Default for TagTable {
    fn default() -> Self {
        Self::bdb_default()
    }
}

fn is_valid_rule_name(name: &str, numbered: bool) -> bool {
    let mut chars = name.chars();
    let starts_alpha = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    let rest_valid = chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'));
    // A numbered family name ending in a digit would be ambiguous
    let suffix_ok = !numbered || !name.ends_with(|c: char| c.is_ascii_digit());
    starts_alpha && rest_valid && suffix_ok
}

/// Rules for the BDB HTML entries
pub fn default_rules() -> Vec<TagRule> {
    use TokenKind::{AttributeOpaque, PreserveVerbatim, Translate};

    let mut rules: Vec<TagRule> = [
        "bdbheb",
        "bdbarc",
        "entry",
        "lookup",
        "reflink",
        "transliteration",
        "grk",
    ]
    .iter()
    .map(|name| TagRule::new(name, PreserveVerbatim))
    .collect();

    rules.push(TagRule::new("placeholder", AttributeOpaque).numbered());
    rules.push(TagRule::new("checkingneeded", AttributeOpaque));
    rules.push(TagRule::new("wrongreferenceremoved", AttributeOpaque));
    rules.push(TagRule::new("ref", AttributeOpaque));

    rules.extend(
        [
            "html", "head", "body", "title", "style", "script", "h1", "h2", "h3", "p", "div",
            "span", "a", "b", "i", "u", "em", "strong", "small", "sub", "sup", "table", "thead",
            "tbody", "tr", "th", "td", "ul", "ol", "li", "language", "pos", "primary", "descrip",
            "highlight", "stem", "sense", "meaning", "gloss",
        ]
        .iter()
        .map(|name| TagRule::new(name, Translate)),
    );

    rules.extend(
        ["br", "hr", "meta", "link", "img", "input"]
            .iter()
            .map(|name| TagRule::new(name, Translate).void()),
    );

    rules
}
