//! Deterministic editor snapshots
//!
//! Snapshots capture the observable editor state in a serializable format
//! for testing and debugging. Given the same input bytes, the editor must
//! produce identical snapshots.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::Editor;
use crate::renderer::{Size, Viewport};

/// A complete snapshot of the editor state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Document content, invalid UTF-8 replaced
    pub text: String,
    pub length: usize,
    pub caret: usize,
    /// Caret line and visual column, 0-based
    pub caret_position: (usize, usize),
    pub selection: Option<Range<usize>>,
    pub clipboard: String,
    pub status: String,
    pub persistent_selection: bool,
    pub undo_depth: usize,
    pub redo_depth: usize,
    pub viewport: Viewport,
    pub size: Size,
    /// Rendered screen rows, trailing blanks trimmed
    pub screen: Vec<String>,
    /// Cursor cell on screen, 0-based (row, col)
    pub cursor: Option<(usize, usize)>,
}

impl Snapshot {
    /// Compose a frame and capture the resulting state
    pub fn capture(editor: &mut Editor) -> Self {
        let frame = editor.frame();
        let text = editor.text();
        let history = editor.buffer().history();

        Self {
            text: String::from_utf8_lossy(text).into_owned(),
            length: text.len(),
            caret: editor.caret(),
            caret_position: crate::core::motion::locate(text, editor.caret()),
            selection: editor.selection(),
            clipboard: String::from_utf8_lossy(editor.clipboard()).into_owned(),
            status: editor.status().to_string(),
            persistent_selection: editor.is_persistent(),
            undo_depth: history.undo_depth(),
            redo_depth: history.redo_depth(),
            viewport: frame.viewport,
            size: frame.size,
            screen: frame.to_lines(),
            cursor: frame.cursor(),
        }
    }

    /// Serialize snapshot to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse snapshot from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The rendered screen as text, one row per line
    pub fn to_text(&self) -> String {
        let mut result = String::new();
        for row in &self.screen {
            result.push_str(row);
            result.push('\n');
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Config;
    use crate::parser::InputEvent;
    use crate::storage::MemoryStorage;

    fn sample() -> Snapshot {
        let mut editor = Editor::new(&Config::default());
        editor.resize(Size::new(20, 4));
        let mut storage = MemoryStorage::new();
        for c in "hi\nyo".chars() {
            let event = if c == '\n' {
                InputEvent::Command(crate::parser::Command::NewLine)
            } else {
                InputEvent::InsertChar(c)
            };
            editor.handle(event, &mut storage);
        }
        Snapshot::capture(&mut editor)
    }

    #[test]
    fn test_snapshot_capture() {
        let snapshot = sample();
        assert_eq!(snapshot.text, "hi\nyo");
        assert_eq!(snapshot.caret, 5);
        assert_eq!(snapshot.caret_position, (1, 2));
        assert_eq!(snapshot.undo_depth, 5);
        assert_eq!(snapshot.cursor, Some((1, 8)));
        assert_eq!(snapshot.screen[0], "   1 │hi");
        assert_eq!(snapshot.screen[1], "   2 │yo");
    }

    #[test]
    fn test_snapshot_to_text() {
        let text = sample().to_text();
        assert!(text.starts_with("   1 │hi\n   2 │yo\n"));
        assert!(text.contains("file:[no name]"));
    }

    #[test]
    fn test_snapshot_json_roundtrip() {
        let snapshot = sample();
        let json = snapshot.to_json().unwrap();
        assert_eq!(Snapshot::from_json(&json).unwrap(), snapshot);
    }
}
