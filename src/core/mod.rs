//! Editing Core Module
//!
//! Platform-independent document state. This module contains:
//! - Bounded document storage with checked splicing
//! - Reversible edit records and bounded undo/redo stacks
//! - UTF-8 aware offset arithmetic (code points, lines, words)
//! - Caret and selection state
//!
//! The core is deterministic: given the same sequence of edits and motions
//! it always produces the same bytes and offsets.

mod buffer;
mod cursor;
mod document;
mod history;
pub mod motion;
mod selection;

pub use buffer::{HistoryError, TextBuffer};
pub use cursor::{Cursor, Motion};
pub use document::{Document, EditError, DEFAULT_CAPACITY};
pub use history::{BoundedStack, EditRecord, History, DEFAULT_HISTORY_CAPACITY};
pub use motion::Direction;
pub use selection::{Selection, SelectionKind};
