//! Keyword highlighting
//!
//! Highlighting is plain keyword matching: a table of (word, color) pairs
//! is loaded once per session from a per-language config file and queried
//! at each offset the compositor draws.

mod keywords;
mod language;

pub use keywords::{HighlightError, KeywordMatch, KeywordTable, MAX_KEYWORDS, MAX_WORD_LEN};
pub use language::{languages_dir, Language};
