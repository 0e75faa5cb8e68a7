//! Text buffer with change log
//!
//! [`TextBuffer`] couples a [`Document`] with its [`History`]. The only
//! mutating primitive is [`TextBuffer::replace`]; insert and delete are thin
//! wrappers over it. Every successful replace records an [`EditRecord`]
//! before the document changes, and undo/redo replay records as exact
//! inverses.

use super::document::{Document, EditError};
use super::history::{EditRecord, History};

/// Errors from undo and redo
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    #[error("nothing to undo")]
    NothingToUndo,

    #[error("nothing to redo")]
    NothingToRedo,

    #[error(transparent)]
    Edit(#[from] EditError),
}

/// An editable document with bounded undo/redo
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    document: Document,
    history: History,
}

impl TextBuffer {
    /// Create an empty buffer
    pub fn new(capacity: usize, history_capacity: usize) -> Self {
        Self {
            document: Document::new(capacity),
            history: History::new(history_capacity),
        }
    }

    /// Create a buffer holding `bytes`, truncated at capacity.
    ///
    /// Returns the buffer and whether the content was truncated.
    pub fn from_bytes(bytes: Vec<u8>, capacity: usize, history_capacity: usize) -> (Self, bool) {
        let (document, truncated) = Document::from_bytes(bytes, capacity);
        (
            Self {
                document,
                history: History::new(history_capacity),
            },
            truncated,
        )
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.document.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.document.len()
    }

    pub fn is_empty(&self) -> bool {
        self.document.is_empty()
    }

    /// Replace `removed_len` bytes at `offset` with `inserted`.
    ///
    /// The removed length is clamped at the end of the document. On success
    /// the edit is recorded and the caret position after the edit is
    /// returned. A replace that removes and inserts nothing records nothing.
    pub fn replace(
        &mut self,
        offset: usize,
        removed_len: usize,
        inserted: &[u8],
    ) -> Result<usize, EditError> {
        let removed_len = removed_len.min(self.document.len().saturating_sub(offset));
        if removed_len == 0 && inserted.is_empty() {
            if offset > self.document.len() {
                return Err(EditError::OutOfBounds {
                    offset,
                    len: self.document.len(),
                });
            }
            return Ok(offset);
        }

        let removed = self.document.splice(offset, removed_len, inserted)?;
        let record = EditRecord::new(offset, removed, inserted.to_vec());
        let caret = record.redo_caret();
        self.history.record(record);
        Ok(caret)
    }

    /// Insert bytes at `offset`
    pub fn insert(&mut self, offset: usize, bytes: &[u8]) -> Result<usize, EditError> {
        self.replace(offset, 0, bytes)
    }

    /// Delete up to `count` bytes at `offset`, clamped at the document end
    pub fn delete(&mut self, offset: usize, count: usize) -> Result<usize, EditError> {
        self.replace(offset, count, &[])
    }

    /// Revert the most recent edit. Returns the new caret position.
    pub fn undo(&mut self) -> Result<usize, HistoryError> {
        let record = self.history.pop_undo().ok_or(HistoryError::NothingToUndo)?;
        if let Err(e) =
            self.document
                .splice(record.offset, record.inserted.len(), &record.removed)
        {
            self.history.push_undo(record);
            return Err(e.into());
        }
        let caret = record.undo_caret();
        self.history.push_redo(record);
        Ok(caret)
    }

    /// Reapply the most recently undone edit. Returns the new caret position.
    pub fn redo(&mut self) -> Result<usize, HistoryError> {
        let record = self.history.pop_redo().ok_or(HistoryError::NothingToRedo)?;
        if let Err(e) =
            self.document
                .splice(record.offset, record.removed.len(), &record.inserted)
        {
            self.history.push_redo(record);
            return Err(e.into());
        }
        let caret = record.redo_caret();
        self.history.push_undo(record);
        Ok(caret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(text: &str) -> TextBuffer {
        TextBuffer::from_bytes(text.as_bytes().to_vec(), 1024, 16).0
    }

    #[test]
    fn test_insert_and_undo() {
        let mut buf = buffer("");
        assert_eq!(buf.insert(0, b"abc"), Ok(3));
        assert_eq!(buf.insert(3, b"def"), Ok(6));
        assert_eq!(buf.as_bytes(), b"abcdef");

        assert_eq!(buf.undo(), Ok(3));
        assert_eq!(buf.as_bytes(), b"abc");
        assert_eq!(buf.undo(), Ok(0));
        assert_eq!(buf.as_bytes(), b"");
        assert_eq!(buf.undo(), Err(HistoryError::NothingToUndo));
    }

    #[test]
    fn test_insert_inside_char_is_rejected() {
        let mut buf = buffer("世");
        assert_eq!(
            buf.insert(1, b"x"),
            Err(EditError::NotOnBoundary { offset: 1 })
        );
        assert_eq!(buf.as_bytes(), "世".as_bytes());
        assert_eq!(buf.undo(), Err(HistoryError::NothingToUndo));
    }

    #[test]
    fn test_redo_caret() {
        let mut buf = buffer("hello");
        assert_eq!(buf.replace(1, 3, b"EY"), Ok(3));
        assert_eq!(buf.as_bytes(), b"hEYo");

        assert_eq!(buf.undo(), Ok(4));
        assert_eq!(buf.as_bytes(), b"hello");
        assert_eq!(buf.redo(), Ok(3));
        assert_eq!(buf.as_bytes(), b"hEYo");
        assert_eq!(buf.redo(), Err(HistoryError::NothingToRedo));
    }

    #[test]
    fn test_delete_clamps_at_end() {
        let mut buf = buffer("abc");
        assert_eq!(buf.delete(1, 10), Ok(1));
        assert_eq!(buf.as_bytes(), b"a");
        assert_eq!(buf.undo(), Ok(3));
        assert_eq!(buf.as_bytes(), b"abc");
    }

    #[test]
    fn test_noop_replace_not_recorded() {
        let mut buf = buffer("abc");
        assert_eq!(buf.delete(3, 5), Ok(3));
        assert_eq!(buf.history().undo_depth(), 0);
        assert!(buf.delete(9, 1).is_err());
    }

    #[test]
    fn test_capacity_exceeded_is_noop() {
        let mut buf = TextBuffer::new(2, 16);
        buf.insert(0, b"ab").unwrap();
        assert!(matches!(
            buf.insert(1, b"c"),
            Err(EditError::CapacityExceeded { .. })
        ));
        assert_eq!(buf.as_bytes(), b"ab");
        assert_eq!(buf.history().undo_depth(), 1);
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let mut buf = buffer("");
        buf.insert(0, b"a").unwrap();
        buf.undo().unwrap();
        buf.insert(0, b"b").unwrap();
        assert_eq!(buf.redo(), Err(HistoryError::NothingToRedo));
        assert_eq!(buf.as_bytes(), b"b");
    }

    #[test]
    fn test_history_eviction() {
        let mut buf = TextBuffer::new(4096, 1024);
        for i in 0..1025 {
            buf.insert(i, b"x").unwrap();
        }
        for _ in 0..1024 {
            buf.undo().unwrap();
        }
        assert_eq!(buf.len(), 1);
        assert_eq!(buf.undo(), Err(HistoryError::NothingToUndo));
    }

    #[test]
    fn test_large_paste_fully_recoverable() {
        let mut buf = buffer("start");
        let paste = vec![b'p'; 900];
        buf.insert(5, &paste).unwrap();
        buf.delete(0, 905).unwrap();
        assert!(buf.is_empty());

        buf.undo().unwrap();
        buf.undo().unwrap();
        assert_eq!(buf.as_bytes(), b"start");
    }
}
