//! Terminal input decoder
//!
//! A stateful decoder that converts the raw bytes a terminal sends in raw
//! mode into input events: printable characters, control-key commands,
//! cursor and function keys, and SGR mouse reports.
//! The state layout follows the VT500-series parser model from
//! <https://vt100.net/emu/dec_ansi_parser>, reduced to the sequences a
//! terminal emits as input.

mod event;
mod mouse;
mod source;
mod state;

pub use event::{Command, InputEvent, Key, KeyEvent, Modifiers, MouseEvent, MouseKind};
pub use mouse::{ClickTracker, CLICK_WINDOW};
pub use source::{ByteSource, ReadByte, ScriptSource};
pub use state::{Decoder, DEFAULT_ESCAPE_TIMEOUT, DEFAULT_SEQUENCE_TIMEOUT};
