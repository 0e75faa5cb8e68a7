//! Decoder State Machine
//!
//! Turns the raw byte stream of a terminal in raw mode into input events.
//! The decoder handles arbitrary chunk boundaries and never blocks on its
//! own: a pending ESC or partial sequence is resolved either by the next
//! byte or by [`Decoder::timeout`] once the bounded look-ahead expires.
//!
//! States:
//! - Ground: Printable text, control keys, UTF-8 lead bytes
//! - Utf8: Collecting continuation bytes of a multi-byte character
//! - Escape: After ESC, waiting for the next byte
//! - CsiEntry: After CSI (ESC [)
//! - CsiParam: Collecting CSI parameters
//! - CsiIgnore: Skipping an unsupported CSI sequence up to its final byte
//! - Ss3: After SS3 (ESC O)
//! - Mouse: Collecting SGR mouse parameters (ESC [ <)

use std::io;
use std::time::{Duration, Instant};

use super::event::{Command, InputEvent, Key, KeyEvent, Modifiers};
use super::mouse::ClickTracker;
use super::source::{ByteSource, ReadByte};

/// Default look-ahead after a lone ESC
pub const DEFAULT_ESCAPE_TIMEOUT: Duration = Duration::from_millis(25);

/// Default look-ahead between bytes of a started sequence
pub const DEFAULT_SEQUENCE_TIMEOUT: Duration = Duration::from_millis(100);

/// Parameters beyond this count are dropped
const MAX_PARAMS: usize = 16;

const ESC: u8 = 0x1B;

/// Decoder state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Ground,
    Utf8,
    Escape,
    CsiEntry,
    CsiParam,
    CsiIgnore,
    Ss3,
    Mouse,
}

/// The input decoder
#[derive(Debug)]
pub struct Decoder {
    state: State,
    /// Parameters for CSI and mouse sequences
    params: Vec<u16>,
    /// Current parameter being built
    current_param: u16,
    /// Whether we've seen a digit for the current parameter
    param_has_digit: bool,
    /// UTF-8 decoder state
    utf8_buffer: Vec<u8>,
    utf8_remaining: u8,
    /// A byte that ended a broken sequence and must be decoded again
    replay: Option<u8>,
    clicks: ClickTracker,
    escape_timeout: Duration,
    sequence_timeout: Duration,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder {
    /// Create a decoder in the ground state with default timeouts
    pub fn new() -> Self {
        Self::with_timeouts(DEFAULT_ESCAPE_TIMEOUT, DEFAULT_SEQUENCE_TIMEOUT)
    }

    pub fn with_timeouts(escape_timeout: Duration, sequence_timeout: Duration) -> Self {
        Self {
            state: State::Ground,
            params: Vec::with_capacity(MAX_PARAMS),
            current_param: 0,
            param_has_digit: false,
            utf8_buffer: Vec::with_capacity(4),
            utf8_remaining: 0,
            replay: None,
            clicks: ClickTracker::new(),
            escape_timeout,
            sequence_timeout,
        }
    }

    /// Reset the decoder to initial state
    pub fn reset(&mut self) {
        self.state = State::Ground;
        self.clear_params();
        self.utf8_buffer.clear();
        self.utf8_remaining = 0;
        self.replay = None;
    }

    /// Clear parameter state
    fn clear_params(&mut self) {
        self.params.clear();
        self.current_param = 0;
        self.param_has_digit = false;
    }

    /// Whether a partial sequence is waiting for more input
    pub fn is_pending(&self) -> bool {
        self.state != State::Ground || self.replay.is_some()
    }

    /// How long to wait for the next byte; `None` means block
    pub fn lookahead(&self) -> Option<Duration> {
        match self.state {
            State::Ground => None,
            State::Escape => Some(self.escape_timeout),
            _ => Some(self.sequence_timeout),
        }
    }

    /// Process a chunk of bytes, returning the completed events.
    ///
    /// A trailing partial sequence stays pending; call [`Decoder::timeout`]
    /// to resolve it.
    pub fn feed(&mut self, data: &[u8], now: Instant) -> Vec<InputEvent> {
        let mut events = Vec::new();
        for &byte in data {
            if let Some(event) = self.advance(byte, now) {
                events.push(event);
            }
            while let Some(byte) = self.replay.take() {
                if let Some(event) = self.advance(byte, now) {
                    events.push(event);
                }
            }
        }
        events
    }

    /// Pull bytes from `source` until one event is complete.
    ///
    /// Returns `Ok(None)` once the source is exhausted.
    pub fn read_event<S: ByteSource + ?Sized>(
        &mut self,
        source: &mut S,
    ) -> io::Result<Option<InputEvent>> {
        loop {
            let byte = match self.replay.take() {
                Some(byte) => byte,
                None => match source.read_byte(self.lookahead())? {
                    ReadByte::Byte(byte) => byte,
                    ReadByte::Timeout => match self.timeout() {
                        Some(event) => return Ok(Some(event)),
                        None => continue,
                    },
                    ReadByte::Eof => return Ok(self.timeout()),
                },
            };
            if let Some(event) = self.advance(byte, Instant::now()) {
                return Ok(Some(event));
            }
        }
    }

    /// Resolve a pending sequence after the look-ahead expired
    pub fn timeout(&mut self) -> Option<InputEvent> {
        let event = match self.state {
            State::Ground => return None,
            State::Escape => InputEvent::Escape,
            // ESC [ and ESC O alone are Alt chords
            State::CsiEntry => alt_char('['),
            State::Ss3 => alt_char('O'),
            _ => {
                tracing::trace!(state = ?self.state, "incomplete input sequence");
                InputEvent::Unknown
            }
        };
        self.reset();
        Some(event)
    }

    /// Process a single byte
    pub fn advance(&mut self, byte: u8, now: Instant) -> Option<InputEvent> {
        // ESC always starts a new sequence
        if byte == ESC && self.state != State::Ground {
            let abandoned = if self.state == State::Escape {
                InputEvent::Escape
            } else {
                InputEvent::Unknown
            };
            self.reset();
            self.state = State::Escape;
            return Some(abandoned);
        }

        match self.state {
            State::Ground => self.process_ground(byte),
            State::Utf8 => self.process_utf8_continuation(byte),
            State::Escape => self.process_escape(byte),
            State::CsiEntry => self.process_csi_entry(byte),
            State::CsiParam => self.process_csi_param(byte),
            State::CsiIgnore => self.process_csi_ignore(byte),
            State::Ss3 => self.process_ss3(byte),
            State::Mouse => self.process_mouse(byte, now),
        }
    }

    /// Abandon the current sequence on an unexpected byte. Control bytes
    /// are decoded again from the ground state.
    fn abort(&mut self, byte: u8) -> Option<InputEvent> {
        self.reset();
        if byte < 0x20 || byte == 0x7F {
            self.replay = Some(byte);
        }
        Some(InputEvent::Unknown)
    }

    /// Process bytes in ground state
    fn process_ground(&mut self, byte: u8) -> Option<InputEvent> {
        match byte {
            ESC => {
                self.state = State::Escape;
                self.clear_params();
                None
            }
            0x20..=0x7E => Some(InputEvent::InsertChar(byte as char)),
            0x7F => Some(InputEvent::Command(Command::Backspace)),
            0x00..=0x1F => Some(control(byte)),
            0xC0..=0xF7 => self.start_utf8(byte),
            _ => Some(InputEvent::Unknown),
        }
    }

    /// Start UTF-8 sequence
    fn start_utf8(&mut self, byte: u8) -> Option<InputEvent> {
        self.utf8_buffer.clear();
        self.utf8_buffer.push(byte);
        self.utf8_remaining = if byte < 0xE0 {
            1
        } else if byte < 0xF0 {
            2
        } else {
            3
        };
        self.state = State::Utf8;
        None
    }

    /// Process UTF-8 continuation byte
    fn process_utf8_continuation(&mut self, byte: u8) -> Option<InputEvent> {
        if !(0x80..=0xBF).contains(&byte) {
            // Broken sequence; the byte itself may start something valid
            self.reset();
            self.replay = Some(byte);
            return Some(InputEvent::Unknown);
        }

        self.utf8_buffer.push(byte);
        self.utf8_remaining -= 1;
        if self.utf8_remaining > 0 {
            return None;
        }

        let event = match std::str::from_utf8(&self.utf8_buffer)
            .ok()
            .and_then(|s| s.chars().next())
        {
            Some(c) if !c.is_control() => InputEvent::InsertChar(c),
            _ => InputEvent::Unknown,
        };
        self.reset();
        Some(event)
    }

    /// Process bytes in escape state
    fn process_escape(&mut self, byte: u8) -> Option<InputEvent> {
        match byte {
            // CSI (ESC [)
            b'[' => {
                self.state = State::CsiEntry;
                self.clear_params();
                None
            }
            // SS3 (ESC O)
            b'O' => {
                self.state = State::Ss3;
                None
            }
            // Alt + printable
            0x20..=0x7E => {
                self.state = State::Ground;
                Some(alt_char(byte as char))
            }
            // Anything else after ESC is decoded again on its own
            _ => {
                self.reset();
                self.replay = Some(byte);
                Some(InputEvent::Unknown)
            }
        }
    }

    /// Process bytes in CSI entry state
    fn process_csi_entry(&mut self, byte: u8) -> Option<InputEvent> {
        match byte {
            // SGR mouse report
            b'<' => {
                self.state = State::Mouse;
                self.clear_params();
                None
            }
            // Parameter bytes
            b'0'..=b'9' => {
                self.current_param = (byte - b'0') as u16;
                self.param_has_digit = true;
                self.state = State::CsiParam;
                None
            }
            // Semicolon - empty first parameter
            b';' => {
                self.params.push(0);
                self.state = State::CsiParam;
                None
            }
            // Other private markers and intermediates are not key sequences
            0x20..=0x3F => {
                self.state = State::CsiIgnore;
                None
            }
            // Final bytes - dispatch
            0x40..=0x7E => {
                self.state = State::Ground;
                self.dispatch_csi(byte)
            }
            _ => self.abort(byte),
        }
    }

    /// Process bytes in CSI param state
    fn process_csi_param(&mut self, byte: u8) -> Option<InputEvent> {
        match byte {
            b'0'..=b'9' => {
                self.push_digit(byte);
                None
            }
            b';' => {
                self.finish_param();
                None
            }
            0x20..=0x3F => {
                self.state = State::CsiIgnore;
                None
            }
            0x40..=0x7E => {
                if self.param_has_digit || !self.params.is_empty() {
                    self.finish_param();
                }
                self.state = State::Ground;
                self.dispatch_csi(byte)
            }
            _ => self.abort(byte),
        }
    }

    /// Process bytes in CSI ignore state
    fn process_csi_ignore(&mut self, byte: u8) -> Option<InputEvent> {
        match byte {
            0x20..=0x3F => None,
            0x40..=0x7E => {
                tracing::trace!(final_byte = byte, "ignored CSI sequence");
                self.reset();
                Some(InputEvent::Unknown)
            }
            _ => self.abort(byte),
        }
    }

    /// Process the byte after SS3
    fn process_ss3(&mut self, byte: u8) -> Option<InputEvent> {
        let key = match byte {
            b'P' => Key::F(1),
            b'Q' => Key::F(2),
            b'R' => Key::F(3),
            b'S' => Key::F(4),
            b'A' => Key::Up,
            b'B' => Key::Down,
            b'C' => Key::Right,
            b'D' => Key::Left,
            b'H' => Key::Home,
            b'F' => Key::End,
            0x20..=0x7E => {
                self.reset();
                return Some(InputEvent::Unknown);
            }
            _ => return self.abort(byte),
        };
        self.reset();
        Some(InputEvent::Key(KeyEvent::plain(key)))
    }

    /// Process bytes of an SGR mouse report
    fn process_mouse(&mut self, byte: u8, now: Instant) -> Option<InputEvent> {
        match byte {
            b'0'..=b'9' => {
                self.push_digit(byte);
                None
            }
            b';' => {
                self.finish_param();
                None
            }
            b'M' | b'm' => {
                self.finish_param();
                let event = match self.params[..] {
                    [button, col, row] => self
                        .clicks
                        .classify(button, col, row, byte == b'M', now)
                        .map_or(InputEvent::Unknown, InputEvent::Mouse),
                    _ => InputEvent::Unknown,
                };
                self.reset();
                Some(event)
            }
            _ => self.abort(byte),
        }
    }

    fn push_digit(&mut self, byte: u8) {
        self.current_param = self
            .current_param
            .saturating_mul(10)
            .saturating_add((byte - b'0') as u16);
        self.param_has_digit = true;
    }

    fn finish_param(&mut self) {
        if self.params.len() < MAX_PARAMS {
            self.params.push(self.current_param);
        }
        self.current_param = 0;
        self.param_has_digit = false;
    }

    /// Dispatch CSI sequence
    fn dispatch_csi(&mut self, final_byte: u8) -> Option<InputEvent> {
        let param = |i: usize| self.params.get(i).copied();
        let modifiers = Modifiers::from_csi_param(param(1).unwrap_or(1));

        let key = match final_byte {
            b'A' => Some(Key::Up),
            b'B' => Some(Key::Down),
            b'C' => Some(Key::Right),
            b'D' => Some(Key::Left),
            b'H' => Some(Key::Home),
            b'F' => Some(Key::End),
            b'P' => Some(Key::F(1)),
            b'Q' => Some(Key::F(2)),
            b'R' => Some(Key::F(3)),
            b'S' => Some(Key::F(4)),
            b'~' => match param(0) {
                Some(1 | 7) => Some(Key::Home),
                Some(2) => Some(Key::Insert),
                Some(3) => Some(Key::Delete),
                Some(4 | 8) => Some(Key::End),
                Some(5) => Some(Key::PageUp),
                Some(6) => Some(Key::PageDown),
                Some(n @ 11..=15) => Some(Key::F((n - 10) as u8)),
                Some(n @ 17..=21) => Some(Key::F((n - 11) as u8)),
                Some(n @ 23..=24) => Some(Key::F((n - 12) as u8)),
                _ => None,
            },
            _ => None,
        };

        self.clear_params();
        match key {
            Some(key) => Some(InputEvent::Key(KeyEvent::new(key, modifiers))),
            None => {
                tracing::trace!(final_byte, "unrecognized CSI sequence");
                Some(InputEvent::Unknown)
            }
        }
    }
}

fn alt_char(c: char) -> InputEvent {
    InputEvent::Key(KeyEvent::new(Key::Char(c), Modifiers::ALT))
}

/// Map a C0 control byte to its command
fn control(byte: u8) -> InputEvent {
    let command = match byte {
        0x00 | 0x13 => Command::Save,    // Ctrl+Space / Ctrl+2, Ctrl+S
        0x01 => Command::SelectAll,      // Ctrl+A
        0x03 => Command::Copy,           // Ctrl+C
        0x08 => Command::Backspace,      // Ctrl+H
        0x09 => Command::Tab,            // Tab
        0x0A | 0x0D => Command::NewLine, // LF, CR
        0x0B => Command::KillToLineEnd,  // Ctrl+K
        0x15 => Command::KillToLineStart, // Ctrl+U
        0x16 => Command::Paste,          // Ctrl+V
        0x18 => Command::Cut,            // Ctrl+X
        0x19 => Command::Redo,           // Ctrl+Y
        0x1A => Command::Undo,           // Ctrl+Z
        0x1F => Command::Find,           // Ctrl+7 / Ctrl+_
        _ => return InputEvent::Unknown,
    };
    InputEvent::Command(command)
}
