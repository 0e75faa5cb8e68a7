//! Byte sources for the decoder
//!
//! The decoder pulls bytes one at a time. A read either blocks until input
//! arrives or waits at most a bounded look-ahead, which is how a lone ESC is
//! told apart from the start of an escape sequence.

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

/// Result of a single byte read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadByte {
    Byte(u8),
    /// The bounded wait expired with no input
    Timeout,
    /// No more input will arrive
    Eof,
}

/// A source of raw input bytes
pub trait ByteSource {
    /// Read the next byte. `None` blocks until input arrives; `Some(d)`
    /// waits at most `d`.
    fn read_byte(&mut self, wait: Option<Duration>) -> io::Result<ReadByte>;
}

/// In-memory byte source used by scripted sessions and tests
///
/// Bytes are always immediately available; once exhausted a bounded read
/// times out and a blocking read reports end of input.
#[derive(Debug, Clone, Default)]
pub struct ScriptSource {
    bytes: VecDeque<u8>,
}

impl ScriptSource {
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.iter().copied().collect(),
        }
    }

    /// Append more input
    pub fn push(&mut self, bytes: &[u8]) {
        self.bytes.extend(bytes);
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl ByteSource for ScriptSource {
    fn read_byte(&mut self, wait: Option<Duration>) -> io::Result<ReadByte> {
        Ok(match (self.bytes.pop_front(), wait) {
            (Some(byte), _) => ReadByte::Byte(byte),
            (None, Some(_)) => ReadByte::Timeout,
            (None, None) => ReadByte::Eof,
        })
    }
}
