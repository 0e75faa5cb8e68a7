//! Undo/redo history
//!
//! Every buffer mutation is described by an [`EditRecord`] holding the exact
//! bytes removed and inserted at an offset, so applying a record and its
//! inverse always restores the previous bytes. Records are kept in two
//! [`BoundedStack`]s; once a stack is full the oldest record is evicted.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Default number of records kept on each stack
pub const DEFAULT_HISTORY_CAPACITY: usize = 1024;

/// A reversible description of one buffer mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditRecord {
    /// Byte offset where the edit starts
    pub offset: usize,
    /// Bytes present before the edit
    pub removed: Vec<u8>,
    /// Bytes present after the edit
    pub inserted: Vec<u8>,
}

impl EditRecord {
    pub fn new(offset: usize, removed: Vec<u8>, inserted: Vec<u8>) -> Self {
        Self {
            offset,
            removed,
            inserted,
        }
    }

    /// Caret position after the edit has been undone
    pub fn undo_caret(&self) -> usize {
        self.offset + self.removed.len()
    }

    /// Caret position after the edit has been (re)applied
    pub fn redo_caret(&self) -> usize {
        self.offset + self.inserted.len()
    }
}

/// A LIFO stack with a fixed capacity that drops its oldest entry on overflow
#[derive(Debug, Clone)]
pub struct BoundedStack<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedStack<T> {
    /// Create a stack holding at most `capacity` items (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: VecDeque::with_capacity(capacity.min(DEFAULT_HISTORY_CAPACITY)),
            capacity,
        }
    }

    /// Push an item, returning the evicted oldest item if the stack was full
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = if self.items.len() == self.capacity {
            self.items.pop_front()
        } else {
            None
        };
        self.items.push_back(item);
        evicted
    }

    pub fn pop(&mut self) -> Option<T> {
        self.items.pop_back()
    }

    pub fn peek(&self) -> Option<&T> {
        self.items.back()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Paired undo and redo stacks
#[derive(Debug, Clone)]
pub struct History {
    undo: BoundedStack<EditRecord>,
    redo: BoundedStack<EditRecord>,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            undo: BoundedStack::new(capacity),
            redo: BoundedStack::new(capacity),
        }
    }

    /// Record a fresh edit. Clears the redo stack.
    pub fn record(&mut self, record: EditRecord) {
        if let Some(evicted) = self.undo.push(record) {
            tracing::debug!(offset = evicted.offset, "history full, dropped oldest edit");
        }
        self.redo.clear();
    }

    /// Take the most recent edit for undoing
    pub fn pop_undo(&mut self) -> Option<EditRecord> {
        self.undo.pop()
    }

    /// Take the most recently undone edit for redoing
    pub fn pop_redo(&mut self) -> Option<EditRecord> {
        self.redo.pop()
    }

    /// Push an edit that was just undone
    pub fn push_redo(&mut self, record: EditRecord) {
        self.redo.push(record);
    }

    /// Push an edit that was just redone, keeping the redo stack intact
    pub fn push_undo(&mut self, record: EditRecord) {
        self.undo.push(record);
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    pub fn capacity(&self) -> usize {
        self.undo.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_stack_evicts_oldest() {
        let mut stack = BoundedStack::new(3);
        assert_eq!(stack.push(1), None);
        assert_eq!(stack.push(2), None);
        assert_eq!(stack.push(3), None);
        assert_eq!(stack.push(4), Some(1));

        assert_eq!(stack.len(), 3);
        assert_eq!(stack.peek(), Some(&4));
        assert_eq!(stack.pop(), Some(4));
        assert_eq!(stack.pop(), Some(3));
        assert_eq!(stack.pop(), Some(2));
        assert_eq!(stack.pop(), None);
    }

    #[test]
    fn test_bounded_stack_zero_capacity() {
        let mut stack = BoundedStack::new(0);
        assert_eq!(stack.capacity(), 1);
        stack.push('a');
        assert_eq!(stack.push('b'), Some('a'));
    }

    #[test]
    fn test_record_clears_redo() {
        let mut history = History::new(8);
        history.record(EditRecord::new(0, vec![], b"a".to_vec()));
        let rec = history.pop_undo().unwrap();
        history.push_redo(rec);
        assert_eq!(history.redo_depth(), 1);

        history.record(EditRecord::new(0, vec![], b"b".to_vec()));
        assert_eq!(history.redo_depth(), 0);
        assert_eq!(history.undo_depth(), 1);
    }

    #[test]
    fn test_record_carets() {
        let rec = EditRecord::new(4, b"xy".to_vec(), b"abc".to_vec());
        assert_eq!(rec.undo_caret(), 6);
        assert_eq!(rec.redo_caret(), 7);
    }
}
