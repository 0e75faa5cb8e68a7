//! Selection handling
//!
//! A selection is an anchor plus the caret end. The anchor stays where the
//! selection was started (Shift+arrow, mouse press, double click) while the
//! caret end follows further movement.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// How the selection was created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SelectionKind {
    /// Character-level selection (default)
    #[default]
    Normal,
    /// Word-level selection (double-click)
    Word,
    /// Line-level selection (triple-click)
    Line,
    /// Whole document (select all)
    Document,
}

/// A text selection as byte offsets into the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// Where the selection was started
    pub anchor: usize,
    /// The moving end, always equal to the caret
    pub caret: usize,
    /// Type of selection
    pub kind: SelectionKind,
}

impl Selection {
    /// Create an empty selection anchored at `anchor`
    pub fn new(anchor: usize, kind: SelectionKind) -> Self {
        Self {
            anchor,
            caret: anchor,
            kind,
        }
    }

    /// Create a selection covering `range`, caret at its end
    pub fn spanning(range: Range<usize>, kind: SelectionKind) -> Self {
        Self {
            anchor: range.start,
            caret: range.end,
            kind,
        }
    }

    /// Check if the selection is empty (anchor == caret)
    pub fn is_empty(&self) -> bool {
        self.anchor == self.caret
    }

    /// Get the normalized range `[min, max)`
    pub fn range(&self) -> Range<usize> {
        self.anchor.min(self.caret)..self.anchor.max(self.caret)
    }
}
