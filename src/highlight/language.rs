//! Language selection by file extension

use std::path::{Path, PathBuf};

use super::keywords::KeywordTable;

/// Languages with a keyword table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    C,
    Python,
    Text,
}

impl Language {
    /// Pick the language from a file extension
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("c" | "h") => Language::C,
            Some("py") => Language::Python,
            _ => Language::Text,
        }
    }

    /// Name used for the keyword file and the status line
    pub fn name(self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Python => "python",
            Language::Text => "text",
        }
    }

    /// Keyword file inside `dir`
    pub fn config_path(self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.config", self.name()))
    }

    /// Load this language's keywords from `dir`; a missing file yields an
    /// empty table
    pub fn keywords(self, dir: &Path) -> KeywordTable {
        KeywordTable::load_or_empty(&self.config_path(dir))
    }
}

/// Default keyword directory, `<config-dir>/zt/languages`
pub fn languages_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("zt").join("languages"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_path() {
        assert_eq!(Language::from_path(Path::new("main.c")), Language::C);
        assert_eq!(Language::from_path(Path::new("inc/zt.h")), Language::C);
        assert_eq!(Language::from_path(Path::new("setup.py")), Language::Python);
        assert_eq!(Language::from_path(Path::new("README")), Language::Text);
        assert_eq!(Language::from_path(Path::new("notes.md")), Language::Text);
    }

    #[test]
    fn test_keywords_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("python.config"), "def 34\n").unwrap();

        assert_eq!(Language::Python.keywords(dir.path()).len(), 1);
        assert!(Language::C.keywords(dir.path()).is_empty());
        assert_eq!(
            Language::C.config_path(dir.path()),
            dir.path().join("c.config")
        );
    }
}
