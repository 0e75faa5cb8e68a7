//! Editor state and command dispatch
//!
//! [`Editor`] owns everything a session mutates: the text buffer with its
//! history, the cursor, the clipboard, the viewport, the keyword table and
//! the status line. Each input event is applied completely before the next
//! frame is composed.

mod prompt;
mod snapshot;

use std::ops::Range;
use std::path::{Path, PathBuf};

use crate::app::{Config, HighlightConfig, SelectionConfig};
use crate::core::{motion, Cursor, EditError, HistoryError, Motion, SelectionKind, TextBuffer};
use crate::highlight::{KeywordTable, Language};
use crate::parser::{Command, InputEvent, Key, KeyEvent, MouseEvent, MouseKind};
use crate::renderer::{compose, Frame, Scene, Size, Viewport, GUTTER_WIDTH};
use crate::storage::{Storage, StorageError};

pub use prompt::{FindPrompt, PromptAction, MAX_TERM_LEN};
pub use snapshot::Snapshot;

/// Status shown before every event
pub const HINT: &str = "  ESC exit | F2 save | F7 search | F10 save & exit";

/// Status shown by F1
pub const HELP: &str = "^C copy ^X cut ^V paste ^Z undo ^Y redo ^A all ^U/^K kill F3 select mode";

/// Result of handling one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Quit,
}

/// The single-session editor
#[derive(Debug)]
pub struct Editor {
    buffer: TextBuffer,
    cursor: Cursor,
    clipboard: Vec<u8>,
    viewport: Viewport,
    size: Size,
    keywords: KeywordTable,
    language: Language,
    path: Option<PathBuf>,
    status: String,
    prompt: Option<FindPrompt>,
    last_search: String,
    /// Plain movement extends the selection
    persistent: bool,
    tab_width: usize,
    selection_policy: SelectionConfig,
}

impl Editor {
    /// Create an editor with an empty, unnamed document
    pub fn new(config: &Config) -> Self {
        Self {
            buffer: TextBuffer::new(config.editor.capacity, config.editor.history_capacity),
            cursor: Cursor::new(),
            clipboard: Vec::new(),
            viewport: Viewport::default(),
            size: Size::default(),
            keywords: KeywordTable::new(),
            language: Language::Text,
            path: None,
            status: "new file (no name)".to_string(),
            prompt: None,
            last_search: String::new(),
            persistent: config.selection.persistent_by_default,
            tab_width: config.editor.tab_width,
            selection_policy: config.selection.clone(),
        }
    }

    /// Open `path`, which need not exist yet
    pub fn open(
        config: &Config,
        path: impl Into<PathBuf>,
        storage: &mut dyn Storage,
    ) -> Result<Self, StorageError> {
        let path = path.into();
        let mut editor = Self::new(config);
        editor.language = Language::from_path(&path);

        match storage.load(&path)? {
            Some(bytes) => {
                let (buffer, truncated) = TextBuffer::from_bytes(
                    bytes,
                    config.editor.capacity,
                    config.editor.history_capacity,
                );
                editor.buffer = buffer;
                editor.status = format!(
                    "File {} loaded ({} byte)({})",
                    path.display(),
                    editor.buffer.len(),
                    editor.language.name()
                );
                if truncated {
                    tracing::warn!(path = %path.display(), capacity = config.editor.capacity, "file truncated");
                    editor.status.push_str(" truncated");
                }
            }
            None => editor.status = format!("New file: {}", path.display()),
        }

        editor.path = Some(path);
        Ok(editor)
    }

    /// Load the keyword table for the document's language
    pub fn load_keywords(&mut self, config: &HighlightConfig) {
        if !config.enabled {
            return;
        }
        if let Some(dir) = config.languages_dir() {
            self.keywords = self.language.keywords(&dir);
        }
    }

    pub fn set_keywords(&mut self, keywords: KeywordTable) {
        self.keywords = keywords;
    }

    pub fn resize(&mut self, size: Size) {
        self.size = size;
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn text(&self) -> &[u8] {
        self.buffer.as_bytes()
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn caret(&self) -> usize {
        self.cursor.caret()
    }

    pub fn selection(&self) -> Option<Range<usize>> {
        self.cursor.selected_range()
    }

    pub fn clipboard(&self) -> &[u8] {
        &self.clipboard
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    pub fn is_prompting(&self) -> bool {
        self.prompt.is_some()
    }

    /// The full status row text
    pub fn status_line(&self) -> String {
        let name = self
            .path
            .as_ref()
            .map_or_else(|| "[no name]".to_string(), |p| p.display().to_string());
        format!("file:{}  {}", name, self.status)
    }

    /// Compose the next frame, updating the viewport
    pub fn frame(&mut self) -> Frame {
        let status = self.status_line();
        let scene = Scene {
            text: self.buffer.as_bytes(),
            caret: self.cursor.caret(),
            selection: self.cursor.selected_range(),
            keywords: &self.keywords,
            status: &status,
        };
        let frame = compose(&scene, self.viewport, self.size);
        self.viewport = frame.viewport;
        frame
    }

    /// Apply one input event
    pub fn handle(&mut self, event: InputEvent, storage: &mut dyn Storage) -> Outcome {
        tracing::debug!(?event, "dispatch");
        self.status = HINT.to_string();

        if self.prompt.is_some() {
            self.handle_prompt(event);
            return Outcome::Continue;
        }

        match event {
            InputEvent::InsertChar(c) => {
                let mut utf8 = [0u8; 4];
                self.insert_text(c.encode_utf8(&mut utf8).as_bytes());
            }
            InputEvent::Command(command) => return self.command(command, storage),
            InputEvent::Key(key) => return self.key(key, storage),
            InputEvent::Mouse(mouse) => self.mouse(mouse),
            InputEvent::Escape => return Outcome::Quit,
            InputEvent::Unknown => {}
        }
        Outcome::Continue
    }

    fn command(&mut self, command: Command, storage: &mut dyn Storage) -> Outcome {
        match command {
            Command::Copy => {
                if let Some(range) = self.cursor.selected_range() {
                    self.clipboard = self.buffer.as_bytes()[range].to_vec();
                }
                self.cursor.collapse();
            }
            Command::Cut => {
                if let Some(range) = self.cursor.selected_range() {
                    let cut = self.buffer.as_bytes()[range.clone()].to_vec();
                    if self.replace(range, &[]) {
                        self.clipboard = cut;
                    }
                }
            }
            Command::Paste => {
                if !self.clipboard.is_empty() {
                    let clipboard = self.clipboard.clone();
                    self.insert_text(&clipboard);
                }
            }
            Command::Undo => match self.buffer.undo() {
                Ok(caret) => {
                    self.cursor.set(self.buffer.as_bytes(), caret);
                    self.status = "undo".to_string();
                }
                Err(e) => self.history_failed(e),
            },
            Command::Redo => match self.buffer.redo() {
                Ok(caret) => {
                    self.cursor.set(self.buffer.as_bytes(), caret);
                    self.status = "redo".to_string();
                }
                Err(e) => self.history_failed(e),
            },
            Command::SelectAll => {
                let len = self.buffer.len();
                self.cursor
                    .select(self.buffer.as_bytes(), 0..len, SelectionKind::Document);
            }
            Command::KillToLineStart => {
                let caret = self.cursor.caret();
                let start = motion::line_start(self.buffer.as_bytes(), caret);
                self.cursor.collapse();
                self.replace(start..caret, &[]);
            }
            Command::KillToLineEnd => {
                let caret = self.cursor.caret();
                let end = motion::line_end(self.buffer.as_bytes(), caret);
                self.cursor.collapse();
                self.replace(caret..end, &[]);
            }
            Command::Tab => {
                let spaces = vec![b' '; self.tab_width];
                self.insert_text(&spaces);
            }
            Command::NewLine => self.insert_text(b"\n"),
            Command::Backspace => self.delete(Motion::Left),
            Command::Save => {
                self.save(storage);
            }
            Command::Find => self.open_prompt(),
        }
        Outcome::Continue
    }

    fn key(&mut self, event: KeyEvent, storage: &mut dyn Storage) -> Outcome {
        let modifiers = event.modifiers;
        let extend = modifiers.shift || modifiers.alt || self.persistent;

        let (motion, extend) = match event.key {
            Key::Up => (Motion::Up, extend),
            Key::Down => (Motion::Down, extend),
            Key::Left => (Motion::Left, extend),
            Key::Right => (Motion::Right, extend),
            Key::Home if modifiers.ctrl => (Motion::DocumentStart, extend),
            Key::End if modifiers.ctrl => (Motion::DocumentEnd, extend),
            Key::Home => (Motion::LineStart, extend),
            Key::End => (Motion::LineEnd, extend),
            Key::PageUp => (Motion::PageUp(self.size.text_rows()), extend),
            Key::PageDown => (Motion::PageDown(self.size.text_rows()), extend),
            Key::Char(c) if modifiers.alt => match c {
                'h' => (Motion::DocumentStart, self.persistent),
                'e' => (Motion::DocumentEnd, self.persistent),
                'b' => (Motion::LineStart, self.persistent),
                'l' => (Motion::LineEnd, self.persistent),
                _ => return Outcome::Continue,
            },
            Key::Delete => {
                self.delete(Motion::Right);
                return Outcome::Continue;
            }
            Key::F(1) => {
                self.status = HELP.to_string();
                return Outcome::Continue;
            }
            Key::F(2) => {
                self.save(storage);
                return Outcome::Continue;
            }
            Key::F(3) => {
                self.persistent = !self.persistent;
                self.status = if self.persistent {
                    "selection mode: persistent".to_string()
                } else {
                    "selection mode: normal".to_string()
                };
                return Outcome::Continue;
            }
            Key::F(7) => {
                self.open_prompt();
                return Outcome::Continue;
            }
            Key::F(10) => {
                return if self.save(storage) {
                    Outcome::Quit
                } else {
                    Outcome::Continue
                };
            }
            _ => return Outcome::Continue,
        };

        self.cursor.apply(self.buffer.as_bytes(), motion, extend);
        Outcome::Continue
    }

    fn mouse(&mut self, event: MouseEvent) {
        let buf = self.buffer.as_bytes();
        let offset = self.offset_at_cell(event.col, event.row);

        match event.kind {
            MouseKind::Down => {
                let extend = self.persistent
                    && self.selection_policy.mouse_extends_persistent
                    && self.cursor.selection().is_some();
                if extend {
                    self.cursor.apply(buf, Motion::To(offset), true);
                } else {
                    self.cursor.set(buf, offset);
                    self.cursor.anchor();
                }
            }
            MouseKind::Drag => self.cursor.apply(buf, Motion::To(offset), true),
            MouseKind::Up => {
                if !self.cursor.has_selection() {
                    self.cursor.collapse();
                }
            }
            MouseKind::DoubleClick => {
                let word = motion::word_extent(buf, offset);
                if word.is_empty() {
                    self.cursor.set(buf, offset);
                } else {
                    self.cursor.select(buf, word, SelectionKind::Word);
                }
            }
            MouseKind::TripleClick => {
                let line = motion::line_extent(buf, offset);
                self.cursor.select(buf, line, SelectionKind::Line);
            }
            MouseKind::WheelUp => self.cursor.apply(buf, Motion::Up, self.persistent),
            MouseKind::WheelDown => self.cursor.apply(buf, Motion::Down, self.persistent),
        }
    }

    /// Document offset under a 1-based terminal cell
    pub fn offset_at_cell(&self, col: u16, row: u16) -> usize {
        let buf = self.buffer.as_bytes();
        let last_line = motion::line_count(buf) - 1;
        let line = (row as usize).saturating_sub(1) + self.viewport.top_line;
        let column = (col as usize).saturating_sub(1 + GUTTER_WIDTH) + self.viewport.left_column;

        let start = motion::line_offset(buf, line.min(last_line));
        motion::offset_at_column(buf, start, column)
    }

    /// Replace the selection, or insert at the caret
    fn insert_text(&mut self, text: &[u8]) {
        let caret = self.cursor.caret();
        let range = self.cursor.selected_range().unwrap_or(caret..caret);
        self.replace(range, text);
    }

    /// Delete the selection, or one code point in the direction of `step`
    fn delete(&mut self, step: Motion) {
        let range = match self.cursor.selected_range() {
            Some(range) => range,
            None => {
                let buf = self.buffer.as_bytes();
                let caret = self.cursor.caret();
                match step {
                    Motion::Left => motion::prev_boundary(buf, caret)..caret,
                    _ => caret..motion::next_boundary(buf, caret),
                }
            }
        };
        self.replace(range, &[]);
    }

    /// Apply one edit and land the caret after it
    fn replace(&mut self, range: Range<usize>, text: &[u8]) -> bool {
        if range.is_empty() && text.is_empty() {
            self.cursor.collapse();
            return false;
        }
        match self.buffer.replace(range.start, range.len(), text) {
            Ok(caret) => {
                self.cursor.set(self.buffer.as_bytes(), caret);
                true
            }
            Err(EditError::CapacityExceeded { capacity, .. }) => {
                self.status = format!("Buffer full ({} byte)", capacity);
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, "edit rejected");
                self.status = format!("Edit error: {}", e);
                false
            }
        }
    }

    fn history_failed(&mut self, error: HistoryError) {
        match error {
            HistoryError::NothingToUndo => self.status = "nothing to undo".to_string(),
            HistoryError::NothingToRedo => self.status = "nothing to redo".to_string(),
            HistoryError::Edit(e) => {
                tracing::warn!(error = %e, "history replay failed");
                self.status = format!("History error: {}", e);
            }
        }
    }

    /// Save the document; reports the result on the status line
    pub fn save(&mut self, storage: &mut dyn Storage) -> bool {
        let Some(path) = self.path.as_deref() else {
            self.status = "No file name".to_string();
            return false;
        };
        match storage.save(path, self.buffer.as_bytes()) {
            Ok(()) => {
                self.status = format!("Saved in {}", path.display());
                true
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "save failed");
                self.status = format!("Save error: {}", e);
                false
            }
        }
    }

    fn open_prompt(&mut self) {
        let prompt = FindPrompt::new();
        self.status = prompt.status();
        self.prompt = Some(prompt);
    }

    fn handle_prompt(&mut self, event: InputEvent) {
        let Some(prompt) = self.prompt.as_mut() else {
            return;
        };
        match prompt.handle(event) {
            PromptAction::Pending => self.status = prompt.status(),
            PromptAction::Cancel => self.prompt = None,
            PromptAction::Submit(term) => {
                self.prompt = None;
                if !term.is_empty() {
                    self.last_search = term;
                }
                if !self.last_search.is_empty() {
                    self.find_next();
                }
            }
        }
    }

    /// Search forward from one code point past the caret, without wrapping
    fn find_next(&mut self) {
        let buf = self.buffer.as_bytes();
        let needle = self.last_search.as_bytes();
        let start = motion::next_boundary(buf, self.cursor.caret());

        let found = buf[start..]
            .windows(needle.len())
            .position(|window| window == needle)
            .map(|i| start + i);

        match found {
            Some(offset) => {
                self.cursor.set(buf, offset);
                self.status = "found".to_string();
            }
            None => self.status = "not found".to_string(),
        }
    }
}
