/*!
 * Corpus layout: where entries live and how they pair up.
 *
 * A source entry `Entries/BDB17.html` pairs with the target entry at the
 * same relative path under the target directory. Entries are ordered by
 * their BDB number so `BDB2` comes before `BDB10`. An optional text
 * directory holds the plain-text translation `BDB17.txt` that the target
 * entry is assembled from.
 */

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::app_config::CorpusConfig;
use crate::errors::ConfigError;
use crate::file_utils::FileManager;

/// Extension of plain-text translations
pub const TEXT_EXTENSION: &str = "txt";

/// Regex for the numeric part of an entry key
static ENTRY_NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:BDB)?(\d+)$").expect("Invalid entry number regex")
});

/// Numeric BDB id of an entry key (`BDB17` -> 17)
pub fn entry_number(entry: &str) -> Option<u64> {
    ENTRY_NUMBER_REGEX
        .captures(entry)
        .and_then(|caps| caps[1].parse().ok())
}

/// Selects entries by the last digit of their BDB number
///
/// Lets several workers split the corpus without overlap. An empty filter
/// selects every entry, including those without a number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DigitFilter {
    digits: BTreeSet<u8>,
}

impl DigitFilter {
    /// Filter accepting every entry
    pub fn all() -> Self {
        Self::default()
    }

    pub fn from_digits<I: IntoIterator<Item = u8>>(digits: I) -> Result<Self, ConfigError> {
        let mut set = BTreeSet::new();
        for digit in digits {
            if digit > 9 {
                return Err(ConfigError::InvalidDigit(digit));
            }
            set.insert(digit);
        }
        Ok(Self { digits: set })
    }

    pub fn is_all(&self) -> bool {
        self.digits.is_empty()
    }

    pub fn matches(&self, entry: &str) -> bool {
        if self.is_all() {
            return true;
        }
        match entry_number(entry) {
            Some(n) => self.digits.contains(&((n % 10) as u8)),
            None => false,
        }
    }

    /// Comma separated digits, `all` when unfiltered
    pub fn label(&self) -> String {
        if self.is_all() {
            return "all".to_string();
        }
        self.digits
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// A source entry and the path its translation is expected at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPair {
    /// Entry key, the file stem
    pub entry: String,
    pub source: PathBuf,
    pub target: PathBuf,
    /// Plain-text translation, when the layout has a text directory
    pub text: Option<PathBuf>,
}

impl EntryPair {
    pub fn has_target(&self) -> bool {
        FileManager::file_exists(&self.target)
    }

    /// Text path, only when the file exists
    pub fn existing_text(&self) -> Option<&Path> {
        self.text.as_deref().filter(|path| FileManager::file_exists(path))
    }

    /// Untranslated and its plain-text translation is not written yet
    pub fn awaits_text(&self) -> bool {
        self.text.is_some() && self.existing_text().is_none() && !self.has_target()
    }

    pub fn number(&self) -> Option<u64> {
        entry_number(&self.entry)
    }
}

/// Source and target directories of a corpus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusLayout {
    pub source_dir: PathBuf,
    pub target_dir: PathBuf,
    /// Entry file extension, without the dot
    pub extension: String,
    /// Plain-text translations, not checked when absent
    pub text_dir: Option<PathBuf>,
}

impl CorpusLayout {
    pub fn new<P1: AsRef<Path>, P2: AsRef<Path>>(source_dir: P1, target_dir: P2, extension: &str) -> Self {
        Self {
            source_dir: source_dir.as_ref().to_path_buf(),
            target_dir: target_dir.as_ref().to_path_buf(),
            extension: extension.trim_start_matches('.').to_string(),
            text_dir: None,
        }
    }

    pub fn with_text_dir<P: AsRef<Path>>(mut self, text_dir: Option<P>) -> Self {
        self.text_dir = text_dir.map(|dir| dir.as_ref().to_path_buf());
        self
    }

    pub fn from_config(config: &CorpusConfig) -> Self {
        Self::new(&config.source_dir, &config.target_dir, &config.extension)
            .with_text_dir(config.text_dir.as_ref())
    }

    /// Plain-text translation path of an entry
    pub fn text_path(&self, entry: &str) -> Option<PathBuf> {
        self.text_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.{}", entry, TEXT_EXTENSION)))
    }

    /// Expected target path of a source file
    pub fn target_path(&self, source: &Path) -> PathBuf {
        let relative = source
            .strip_prefix(&self.source_dir)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| source.file_name().map(PathBuf::from).unwrap_or_default());
        self.target_dir.join(relative)
    }

    /// Source entries selected by `filter`, sorted by BDB number
    pub fn source_entries(&self, filter: &DigitFilter) -> Result<Vec<EntryPair>> {
        if !FileManager::dir_exists(&self.source_dir) {
            return Err(anyhow::anyhow!("Source directory does not exist: {:?}", self.source_dir));
        }

        let files = FileManager::find_files(&self.source_dir, &self.extension)
            .with_context(|| format!("Failed to list entries in {:?}", self.source_dir))?;

        let mut pairs: Vec<EntryPair> = files
            .into_iter()
            // A target tree nested in the source tree is not made of sources
            .filter(|source| !source.starts_with(&self.target_dir))
            .filter_map(|source| {
                let entry = FileManager::file_stem(&source)?;
                if !filter.matches(&entry) {
                    return None;
                }
                let target = self.target_path(&source);
                let text = self.text_path(&entry);
                Some(EntryPair {
                    entry,
                    source,
                    target,
                    text,
                })
            })
            .collect();

        pairs.sort_by(|a, b| {
            let key = |p: &EntryPair| p.number().unwrap_or(u64::MAX);
            key(a).cmp(&key(b)).then_with(|| a.entry.cmp(&b.entry))
        });

        debug!(
            "Found {} source entries in {:?} (digits: {})",
            pairs.len(),
            self.source_dir,
            filter.label()
        );
        Ok(pairs)
    }
}

/// Selected source entries and those still lacking a translation
#[derive(Debug, Clone, Default)]
pub struct UntranslatedReport {
    /// Number of selected source entries
    pub total: usize,
    /// Entries without a target, in BDB order
    pub missing: Vec<EntryPair>,
}

impl UntranslatedReport {
    pub fn translated(&self) -> usize {
        self.total - self.missing.len()
    }

    /// Missing entries whose plain-text translation is not written yet
    pub fn awaiting_text(&self) -> usize {
        self.missing.iter().filter(|p| p.awaits_text()).count()
    }
}

/// Source entries that have no translation yet
pub fn find_untranslated(layout: &CorpusLayout, filter: &DigitFilter) -> Result<UntranslatedReport> {
    let entries = layout.source_entries(filter)?;
    let total = entries.len();
    let missing: Vec<EntryPair> = entries.into_iter().filter(|p| !p.has_target()).collect();

    let report = UntranslatedReport { total, missing };
    debug!(
        "{}/{} entries translated, {} awaiting text",
        report.translated(),
        total,
        report.awaiting_text()
    );
    Ok(report)
}
