/*!
 * Corpus-level orchestration.
 *
 * - `layout`: Entry discovery, numeric ordering and digit filters
 * - `cache`: Clean-entry cache keyed by content hash
 * - `summary`: Per-pair outcomes and their totals
 * - `runner`: Sequential corpus run and JSON lines report
 */

pub mod cache;
pub mod layout;
pub mod runner;
pub mod summary;

// Re-export main types
pub use cache::CleanCache;
pub use layout::{entry_number, find_untranslated, CorpusLayout, DigitFilter, EntryPair, UntranslatedReport};
pub use runner::{write_report, CorpusRun, CorpusRunner};
pub use summary::{CorpusSummary, PairOutcome};
