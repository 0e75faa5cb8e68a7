//! Document storage
//!
//! The document is a single owned byte vector with a fixed upper bound on
//! its length. All mutation goes through [`Document::splice`], which is
//! bounds checked and never leaves the buffer partially modified.


use super::motion;

/// Default maximum document size in bytes
pub const DEFAULT_CAPACITY: usize = 64 * 1024;

/// Errors produced by document mutation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("buffer full: {len} + {requested} bytes exceeds capacity {capacity}")]
    CapacityExceeded {
        len: usize,
        requested: usize,
        capacity: usize,
    },

    #[error("offset {offset} is past the end of the document ({len} bytes)")]
    OutOfBounds { offset: usize, len: usize },

    #[error("offset {offset} splits a multi-byte character")]
    NotOnBoundary { offset: usize },
}

/// A bounded, growable byte buffer holding the edited text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    bytes: Vec<u8>,
    capacity: usize,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl Document {
    /// Create an empty document
    pub fn new(capacity: usize) -> Self {
        Self {
            bytes: Vec::new(),
            capacity,
        }
    }

    /// Create a document from existing content.
    ///
    /// Content longer than `capacity` is cut at the last character boundary
    /// that fits. Returns the document and whether anything was dropped.
    pub fn from_bytes(mut bytes: Vec<u8>, capacity: usize) -> (Self, bool) {
        let truncated = bytes.len() > capacity;
        if truncated {
            let end = motion::floor_boundary(&bytes, capacity);
            bytes.truncate(end);
        }
        (Self { bytes, capacity }, truncated)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes that can still be added before the document is full
    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.bytes.len())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Replace `removed_len` bytes at `offset` with `inserted`.
    ///
    /// `removed_len` is clamped at the end of the document. Both ends of the
    /// removed range must fall on character boundaries. Returns the bytes
    /// that were removed.
    pub fn splice(
        &mut self,
        offset: usize,
        removed_len: usize,
        inserted: &[u8],
    ) -> Result<Vec<u8>, EditError> {
        let len = self.bytes.len();
        if offset > len {
            return Err(EditError::OutOfBounds { offset, len });
        }

        let end = offset.saturating_add(removed_len).min(len);
        for at in [offset, end] {
            if !motion::is_boundary(&self.bytes, at) {
                return Err(EditError::NotOnBoundary { offset: at });
            }
        }

        let new_len = len - (end - offset) + inserted.len();
        if new_len > self.capacity {
            return Err(EditError::CapacityExceeded {
                len,
                requested: inserted.len(),
                capacity: self.capacity,
            });
        }

        Ok(self
            .bytes
            .splice(offset..end, inserted.iter().copied())
            .collect())
    }
}
