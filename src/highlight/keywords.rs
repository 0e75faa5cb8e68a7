//! Keyword table and word-boundary matching

use std::fs;
use std::path::Path;

/// Entries beyond this count are not loaded
pub const MAX_KEYWORDS: usize = 256;

/// Longest keyword accepted, in bytes
pub const MAX_WORD_LEN: usize = 31;

/// Bytes that may follow a keyword besides whitespace and end of text
const DELIMITERS: &[u8] = b"();{}[]<>+-*/%=!&|^,.";

/// Keyword loading error
#[derive(Debug, thiserror::Error)]
pub enum HighlightError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Keyword {
    word: Vec<u8>,
    /// Complete SGR sequence, e.g. `\x1b[32m`
    color: String,
}

/// A keyword found at an offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordMatch<'a> {
    /// Length of the keyword in bytes
    pub len: usize,
    /// SGR sequence to draw it with
    pub color: &'a str,
}

/// Ordered (word, color) pairs; the first matching entry wins
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordTable {
    keywords: Vec<Keyword>,
}

impl KeywordTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the line-oriented config format `<word> <ansi-code>`.
    ///
    /// Blank and single-column lines are skipped, extra columns ignored.
    pub fn parse(source: &str) -> Self {
        let mut table = Self::new();
        for line in source.lines() {
            let mut fields = line.split_whitespace();
            let (Some(word), Some(code)) = (fields.next(), fields.next()) else {
                continue;
            };
            if table.len() >= MAX_KEYWORDS {
                tracing::warn!(limit = MAX_KEYWORDS, "keyword table full, ignoring the rest");
                break;
            }
            table.push(word, code);
        }
        table
    }

    /// Load a keyword file
    pub fn load(path: &Path) -> Result<Self, HighlightError> {
        let content = fs::read_to_string(path)?;
        let table = Self::parse(&content);
        tracing::info!(path = %path.display(), keywords = table.len(), "loaded keywords");
        Ok(table)
    }

    /// Load a keyword file, falling back to an empty table
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(table) => table,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "no keyword table");
                Self::new()
            }
        }
    }

    /// Add an entry. Words longer than [`MAX_WORD_LEN`] bytes are cut at
    /// the last character boundary that fits; empty words and a full table
    /// are ignored.
    pub fn push(&mut self, word: &str, code: &str) -> bool {
        if word.is_empty() || self.keywords.len() >= MAX_KEYWORDS {
            return false;
        }
        let mut end = word.len().min(MAX_WORD_LEN);
        while !word.is_char_boundary(end) {
            end -= 1;
        }
        self.keywords.push(Keyword {
            word: word[..end].as_bytes().to_vec(),
            color: format!("\x1b[{}m", code),
        });
        true
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Keyword starting exactly at `offset`, if any
    pub fn match_at<'a>(&'a self, buf: &[u8], offset: usize) -> Option<KeywordMatch<'a>> {
        if offset >= buf.len() {
            return None;
        }
        if offset > 0 && is_identifier_byte(buf[offset - 1]) {
            return None;
        }

        let rest = &buf[offset..];
        self.keywords
            .iter()
            .find(|kw| rest.starts_with(&kw.word) && ends_word(rest.get(kw.word.len())))
            .map(|kw| KeywordMatch {
                len: kw.word.len(),
                color: &kw.color,
            })
    }
}

fn is_identifier_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

fn ends_word(next: Option<&u8>) -> bool {
    match next {
        None => true,
        Some(&b) => b.is_ascii_whitespace() || DELIMITERS.contains(&b),
    }
}
