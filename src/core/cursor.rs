//! Caret state management
//!
//! The cursor tracks the caret byte offset, the optional selection anchored
//! behind it, and the preferred visual column used by vertical movement.
//! The caret is always on a code-point boundary.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::motion::{self, Direction};
use super::selection::{Selection, SelectionKind};

/// A caret movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    LineStart,
    LineEnd,
    DocumentStart,
    DocumentEnd,
    /// Move up by this many lines
    PageUp(usize),
    /// Move down by this many lines
    PageDown(usize),
    /// Jump to an offset (floored to a boundary)
    To(usize),
}

impl Motion {
    fn is_vertical(self) -> bool {
        matches!(
            self,
            Motion::Up | Motion::Down | Motion::PageUp(_) | Motion::PageDown(_)
        )
    }
}

/// Caret plus selection state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    caret: usize,
    selection: Option<Selection>,
    /// Column kept across consecutive vertical moves
    preferred_column: Option<usize>,
}

impl Cursor {
    /// Create a cursor at the start of the document
    pub fn new() -> Self {
        Self::default()
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// The normalized selected range, if a non-empty selection exists
    pub fn selected_range(&self) -> Option<Range<usize>> {
        self.selection
            .filter(|s| !s.is_empty())
            .map(|s| s.range())
    }

    pub fn has_selection(&self) -> bool {
        self.selected_range().is_some()
    }

    /// Move the caret, dropping any selection
    pub fn set(&mut self, buf: &[u8], pos: usize) {
        self.caret = motion::floor_boundary(buf, pos);
        self.selection = None;
        self.preferred_column = None;
    }

    /// Drop the selection, keeping the caret
    pub fn collapse(&mut self) {
        self.selection = None;
    }

    /// Select `range` with the caret at its end
    pub fn select(&mut self, buf: &[u8], range: Range<usize>, kind: SelectionKind) {
        let start = motion::floor_boundary(buf, range.start);
        let end = motion::floor_boundary(buf, range.end);
        self.selection = Some(Selection::spanning(start..end, kind));
        self.caret = end;
        self.preferred_column = None;
    }

    /// Start an empty selection at the caret unless one exists
    pub fn anchor(&mut self) {
        if self.selection.is_none() {
            self.selection = Some(Selection::new(self.caret, SelectionKind::Normal));
        }
    }

    /// Apply a motion. With `extend` the selection anchor is kept (or
    /// created at the old caret) and only the caret end moves; otherwise
    /// the selection collapses.
    pub fn apply(&mut self, buf: &[u8], motion: Motion, extend: bool) {
        if extend {
            self.anchor();
        } else {
            self.selection = None;
        }

        if !motion.is_vertical() {
            self.preferred_column = None;
        }

        let caret = motion::floor_boundary(buf, self.caret);
        self.caret = match motion {
            Motion::Left => motion::prev_boundary(buf, caret),
            Motion::Right => motion::next_boundary(buf, caret),
            Motion::Up => self.vertical(buf, caret, Direction::Up, 1),
            Motion::Down => self.vertical(buf, caret, Direction::Down, 1),
            Motion::PageUp(n) => self.vertical(buf, caret, Direction::Up, n),
            Motion::PageDown(n) => self.vertical(buf, caret, Direction::Down, n),
            Motion::LineStart => motion::line_start(buf, caret),
            Motion::LineEnd => motion::line_end(buf, caret),
            Motion::DocumentStart => 0,
            Motion::DocumentEnd => buf.len(),
            Motion::To(pos) => motion::floor_boundary(buf, pos),
        };

        if let Some(selection) = self.selection.as_mut() {
            selection.caret = self.caret;
            selection.kind = SelectionKind::Normal;
        }
    }

    fn vertical(&mut self, buf: &[u8], from: usize, dir: Direction, lines: usize) -> usize {
        let column = *self
            .preferred_column
            .get_or_insert_with(|| motion::column_of(buf, from));
        let mut pos = from;
        for _ in 0..lines {
            match motion::vertical(buf, pos, dir, column) {
                Some(next) => pos = next,
                None => break,
            }
        }
        pos
    }

    /// Re-validate offsets against a document that changed underneath
    pub fn clamp(&mut self, buf: &[u8]) {
        self.caret = motion::floor_boundary(buf, self.caret);
        if let Some(selection) = self.selection.as_mut() {
            selection.anchor = motion::floor_boundary(buf, selection.anchor);
            selection.caret = self.caret;
        }
    }
}
