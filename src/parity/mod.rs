/*!
 * Parity checks between a source entry and its translation.
 *
 * This module contains the checks run on every entry pair:
 * - Structural token comparison with resynchronization
 * - Protected-script integrity
 * - Visible length ratio
 * - Presence of the plain-text translation
 */

pub mod compare;
pub mod discrepancy;
pub mod presence;
pub mod report;
pub mod script;
pub mod service;

// Re-export main types
pub use compare::{compare, Comparator};
pub use discrepancy::{Discrepancy, DiscrepancyKind, RatioBound};
pub use presence::check_text_presence;
pub use report::{ParityReport, Verdict};
pub use script::{check_script_integrity, default_ranges, ScriptChecker, ScriptRange, ScriptRun};
pub use service::{ParityChecker, ParityConfig};
