//! Input events produced by the decoder
//!
//! These events represent the logical meaning of the raw bytes a terminal
//! sends for key presses and mouse reports.

use serde::{Deserialize, Serialize};

/// Keyboard modifiers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        alt: false,
    };

    pub const ALT: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: true,
    };

    pub const CTRL: Modifiers = Modifiers {
        shift: false,
        ctrl: true,
        alt: false,
    };

    /// Decode the modifier parameter of a CSI sequence (1 + bitmask)
    /// Shift=1, Alt=2, Ctrl=4
    pub fn from_csi_param(param: u16) -> Self {
        let bits = param.saturating_sub(1);
        Self {
            shift: bits & 1 != 0,
            alt: bits & 2 != 0,
            ctrl: bits & 4 != 0,
        }
    }

    /// Check if any modifier is pressed
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt
    }
}

/// Keys that arrive as escape sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    // Cursor keys
    Up,
    Down,
    Left,
    Right,

    // Navigation
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    Delete,

    /// Function key F1..=F12
    F(u8),

    /// A printable key combined with a modifier (ESC-prefixed Alt chords)
    Char(char),
}

/// A decoded key with its modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }
}

/// Control-key commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Copy,
    Paste,
    Cut,
    Undo,
    Redo,
    SelectAll,
    KillToLineStart,
    KillToLineEnd,
    Tab,
    NewLine,
    Backspace,
    Save,
    Find,
}

/// Classified mouse report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseKind {
    /// First press of a click sequence
    Down,
    /// Second press inside the click window
    DoubleClick,
    /// Third press inside the click window
    TripleClick,
    /// Motion with a button held
    Drag,
    /// Button released
    Up,
    WheelUp,
    WheelDown,
}

/// A mouse event at a 1-based terminal cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MouseEvent {
    pub kind: MouseKind,
    pub col: u16,
    pub row: u16,
}

/// One logical input event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    /// A printable character to insert
    InsertChar(char),
    /// A control-key command
    Command(Command),
    /// A special key
    Key(KeyEvent),
    /// A mouse report
    Mouse(MouseEvent),
    /// A lone ESC
    Escape,
    /// Unrecognized input, no effect
    Unknown,
}
