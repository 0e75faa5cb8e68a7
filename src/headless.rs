//! Headless editing sessions
//!
//! Drives an [`Editor`] from a byte script instead of a terminal. The
//! session follows the interactive loop exactly (compose a frame, decode
//! one event, apply it) so the resulting snapshot matches what a user
//! typing the same bytes would see.
//!
//! Bytes are always available immediately, so an ESC that is followed by
//! more script bytes decodes as the start of a sequence or an Alt chord; a
//! trailing ESC resolves to Escape.

use std::io;
use std::path::PathBuf;

use crate::app::Config;
use crate::editor::{Editor, Outcome, Snapshot};
use crate::parser::{Decoder, ScriptSource};
use crate::renderer::Size;
use crate::storage::{MemoryStorage, Storage, StorageError};

/// A scripted session over any storage
pub struct Session<S: Storage = MemoryStorage> {
    editor: Editor,
    decoder: Decoder,
    storage: S,
    finished: bool,
}

impl Session<MemoryStorage> {
    /// Session on an empty, unnamed document
    pub fn new(config: &Config, size: Size) -> Self {
        let mut editor = Editor::new(config);
        editor.resize(size);
        Self::with_editor(config, editor, MemoryStorage::new())
    }
}

impl<S: Storage> Session<S> {
    /// Session on `path` loaded from `storage`
    pub fn open(
        config: &Config,
        path: impl Into<PathBuf>,
        mut storage: S,
        size: Size,
    ) -> Result<Self, StorageError> {
        let mut editor = Editor::open(config, path, &mut storage)?;
        editor.resize(size);
        editor.load_keywords(&config.highlight);
        Ok(Self::with_editor(config, editor, storage))
    }

    fn with_editor(config: &Config, editor: Editor, storage: S) -> Self {
        Self {
            editor,
            decoder: Decoder::with_timeouts(
                config.input.escape_timeout(),
                config.input.sequence_timeout(),
            ),
            storage,
            finished: false,
        }
    }

    /// Feed script bytes until they run out or the editor quits
    pub fn feed(&mut self, bytes: &[u8]) -> io::Result<Outcome> {
        if self.finished {
            return Ok(Outcome::Quit);
        }

        let mut source = ScriptSource::new(bytes);
        loop {
            self.editor.frame();
            let Some(event) = self.decoder.read_event(&mut source)? else {
                return Ok(Outcome::Continue);
            };
            if self.editor.handle(event, &mut self.storage) == Outcome::Quit {
                tracing::debug!("session quit");
                self.finished = true;
                return Ok(Outcome::Quit);
            }
        }
    }

    /// Whether the editor asked to quit
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Capture the state after the last composed frame
    pub fn snapshot(&mut self) -> Snapshot {
        Snapshot::capture(&mut self.editor)
    }
}
