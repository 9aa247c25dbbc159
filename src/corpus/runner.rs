/*!
 * Corpus run: check every translated entry pair.
 *
 * Pairs are processed one after another. Each ends in exactly one outcome;
 * malformed markup marks the pair unprocessable and the run moves on.
 */

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, warn};

use crate::errors::Side;
use crate::file_utils::FileManager;
use crate::parity::{ParityChecker, ParityReport};

use super::cache::CleanCache;
use super::layout::{CorpusLayout, DigitFilter, EntryPair};
use super::summary::{CorpusSummary, PairOutcome};

/// Outcomes of a corpus run and their summary
#[derive(Debug, Clone, Default)]
pub struct CorpusRun {
    pub outcomes: Vec<PairOutcome>,
    pub summary: CorpusSummary,
}

/// Drives the parity checker over a corpus
pub struct CorpusRunner {
    checker: ParityChecker,
    cache: CleanCache,
    show_progress: bool,
}

impl CorpusRunner {
    pub fn new(checker: ParityChecker) -> Self {
        Self {
            checker,
            cache: CleanCache::disabled(),
            show_progress: false,
        }
    }

    pub fn with_cache(mut self, cache: CleanCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn cache(&self) -> &CleanCache {
        &self.cache
    }

    /// Check every selected pair that has a target
    pub fn run(&mut self, layout: &CorpusLayout, filter: &DigitFilter) -> Result<CorpusRun> {
        let start_time = Instant::now();
        let entries = layout.source_entries(filter)?;
        let (pairs, untranslated): (Vec<EntryPair>, Vec<EntryPair>) =
            entries.into_iter().partition(EntryPair::has_target);

        let progress_bar = self.progress_bar(pairs.len() as u64);
        progress_bar.set_message("Checking");

        let mut run = CorpusRun::default();
        run.summary.untranslated = untranslated.len();

        for pair in &pairs {
            progress_bar.set_message(pair.entry.clone());
            let (outcome, cached) = self.check_entry(pair)?;
            if cached {
                run.summary.record_cache_hit();
            }
            run.summary.record(&outcome);
            run.outcomes.push(outcome);
            progress_bar.inc(1);
        }

        progress_bar.finish_and_clear();
        debug!(
            "Checked {} pairs in {:.2}s",
            pairs.len(),
            start_time.elapsed().as_secs_f64()
        );
        Ok(run)
    }

    /// Check one pair; the flag reports whether the cache answered
    pub fn check_entry(&mut self, pair: &EntryPair) -> Result<(PairOutcome, bool)> {
        let source = std::fs::read(&pair.source)
            .with_context(|| format!("Failed to read source entry: {:?}", pair.source))?;
        let target = std::fs::read(&pair.target)
            .with_context(|| format!("Failed to read target entry: {:?}", pair.target))?;

        let text = pair
            .existing_text()
            .map(|path| std::fs::read(path).with_context(|| format!("Failed to read text entry: {:?}", path)))
            .transpose()?;

        let hash = self.cache.hash(&source, &target, text.as_deref());
        if self.cache.is_clean(&pair.entry, &hash) {
            debug!("{}: clean (cached)", pair.entry);
            return Ok((PairOutcome::Checked(ParityReport::clean(&pair.entry)), true));
        }

        let (source_text, target_text) = match (std::str::from_utf8(&source), std::str::from_utf8(&target)) {
            (Ok(s), Ok(t)) => (s, t),
            (Err(e), _) => return Ok((self.unreadable(pair, Side::Source, e), false)),
            (_, Err(e)) => return Ok((self.unreadable(pair, Side::Target, e), false)),
        };
        let text = match text.as_deref().map(std::str::from_utf8).transpose() {
            Ok(text) => text,
            Err(e) => return Ok((self.unreadable(pair, Side::Text, e), false)),
        };

        let outcome = PairOutcome::from_result(
            &pair.entry,
            self.checker
                .check_pair_with_text(&pair.entry, source_text, target_text, text),
        );

        match &outcome {
            PairOutcome::Checked(report) if report.is_clean() => {
                self.cache.record_clean(&pair.entry, &hash)?;
            }
            PairOutcome::Checked(report) => {
                for line in report.describe() {
                    debug!("{}", line);
                }
            }
            PairOutcome::Unprocessable { reason, .. } => {
                warn!("{}: unprocessable: {}", pair.entry, reason);
            }
        }

        Ok((outcome, false))
    }

    fn unreadable(&self, pair: &EntryPair, side: Side, error: std::str::Utf8Error) -> PairOutcome {
        warn!("{}: {} is not valid UTF-8: {}", pair.entry, side, error);
        PairOutcome::Unprocessable {
            entry: pair.entry.clone(),
            side,
            reason: format!("invalid UTF-8: {}", error),
        }
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let progress_bar = ProgressBar::new(len);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} entries ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar
    }
}

/// Write outcomes as JSON lines, one outcome per line
pub fn write_report<P: AsRef<Path>>(path: P, outcomes: &[PairOutcome]) -> Result<()> {
    let mut content = String::new();
    for outcome in outcomes {
        let line = serde_json::to_string(outcome)
            .with_context(|| format!("Failed to serialize outcome for {}", outcome.entry()))?;
        content.push_str(&line);
        content.push('\n');
    }
    FileManager::write_to_file(path, &content)
}
