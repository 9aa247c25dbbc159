/*!
 * Markup handling for lexicon entries.
 *
 * - `tags`: Tag name to token kind classification
 * - `scanner`: Lexical scan of tags and text
 * - `extract`: Structural token extraction
 * - `text`: Human-visible text for length checks
 */

pub mod extract;
mod scanner;
pub mod tags;
pub mod text;

// Re-export main types
pub use extract::{extract, Extractor, Token};
pub use tags::{TagRule, TagTable, TokenKind};
pub use text::{visible_len, visible_text};
