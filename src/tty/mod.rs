//! Terminal adapter
//!
//! Raw mode, window size and a polled stdin byte source. Everything here
//! talks to the controlling terminal through POSIX calls; the rest of the
//! crate only sees [`ByteSource`] and [`Size`].

use std::collections::VecDeque;
use std::io::{self, Write};
use std::os::fd::BorrowedFd;
use std::time::Duration;

use nix::libc::{self, STDIN_FILENO, STDOUT_FILENO};
use nix::poll::{poll, PollFd, PollFlags};
use nix::sys::termios::{self, SetArg, SpecialCharacterIndices, Termios};

use crate::parser::{ByteSource, ReadByte};
use crate::renderer::Size;

/// Mouse reporting (press/release, button motion, SGR encoding), bar
/// cursor, cleared screen
pub const SETUP_SEQUENCE: &str = "\x1b[?1000h\x1b[?1002h\x1b[?1006h\x1b[5 q\x1b[2J\x1b[H";

/// Undo [`SETUP_SEQUENCE`] and leave a clean screen
pub const RESTORE_SEQUENCE: &str =
    "\x1b[?1006l\x1b[?1002l\x1b[?1000l\x1b[0 q\x1b[0m\x1b[2J\x1b[H\x1b[?25h";

/// Bytes read from stdin per syscall
const READ_CHUNK: usize = 1024;

/// Terminal errors
#[derive(Debug, thiserror::Error)]
pub enum TtyError {
    #[error("Failed to configure terminal: {0}")]
    Termios(#[source] nix::Error),

    #[error("Failed to query window size: {0}")]
    WindowSize(#[source] nix::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// RAII guard for raw terminal mode
///
/// Restores the original terminal attributes and modes on drop.
pub struct RawMode {
    original: Termios,
}

impl RawMode {
    /// Put stdin in raw mode and enable mouse reporting
    pub fn enter() -> Result<Self, TtyError> {
        let original = termios::tcgetattr(io::stdin()).map_err(TtyError::Termios)?;

        let mut raw = original.clone();
        termios::cfmakeraw(&mut raw);
        raw.control_chars[SpecialCharacterIndices::VMIN as usize] = 1;
        raw.control_chars[SpecialCharacterIndices::VTIME as usize] = 0;
        termios::tcsetattr(io::stdin(), SetArg::TCSANOW, &raw).map_err(TtyError::Termios)?;

        // From here on the guard restores the terminal even if setup fails
        let guard = Self { original };
        let mut stdout = io::stdout().lock();
        stdout.write_all(SETUP_SEQUENCE.as_bytes())?;
        stdout.flush()?;

        tracing::debug!("entered raw mode");
        Ok(guard)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let mut stdout = io::stdout().lock();
        let _ = stdout.write_all(RESTORE_SEQUENCE.as_bytes());
        let _ = stdout.flush();
        let _ = termios::tcsetattr(io::stdin(), SetArg::TCSANOW, &self.original);
        tracing::debug!("restored terminal");
    }
}

/// Current terminal size
pub fn terminal_size() -> Result<Size, TtyError> {
    let mut winsize = libc::winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };

    // SAFETY: TIOCGWINSZ is a valid ioctl for getting window size
    let result = unsafe { libc::ioctl(STDOUT_FILENO, libc::TIOCGWINSZ, &mut winsize) };

    if result < 0 {
        Err(TtyError::WindowSize(nix::errno::Errno::last()))
    } else {
        Ok(Size::new(winsize.ws_col as usize, winsize.ws_row as usize))
    }
}

/// Stdin as a [`ByteSource`], using poll for bounded waits
#[derive(Debug, Default)]
pub struct StdinSource {
    pending: VecDeque<u8>,
}

impl StdinSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for stdin to become readable. Returns false on timeout.
    fn poll_read(&self, wait: Option<Duration>) -> io::Result<bool> {
        // SAFETY: stdin stays open for the life of the process
        let stdin = unsafe { BorrowedFd::borrow_raw(STDIN_FILENO) };
        let mut poll_fds = [PollFd::new(&stdin, PollFlags::POLLIN)];
        let timeout_ms = wait.map_or(-1, |d| d.as_millis().min(i32::MAX as u128) as i32);

        match poll(&mut poll_fds, timeout_ms) {
            Ok(n) if n > 0 => {
                let revents = poll_fds[0].revents().unwrap_or(PollFlags::empty());
                Ok(revents.intersects(PollFlags::POLLIN | PollFlags::POLLHUP))
            }
            Ok(_) => Ok(false),                         // Timeout
            Err(nix::errno::Errno::EINTR) => Ok(false), // Interrupted
            Err(e) => Err(io::Error::other(e)),
        }
    }

    fn fill(&mut self) -> io::Result<usize> {
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            match nix::unistd::read(STDIN_FILENO, &mut chunk) {
                Ok(n) => {
                    self.pending.extend(&chunk[..n]);
                    return Ok(n);
                }
                Err(nix::errno::Errno::EINTR) => continue,
                Err(e) => return Err(io::Error::other(e)),
            }
        }
    }
}

impl ByteSource for StdinSource {
    fn read_byte(&mut self, wait: Option<Duration>) -> io::Result<ReadByte> {
        loop {
            if let Some(byte) = self.pending.pop_front() {
                return Ok(ReadByte::Byte(byte));
            }
            if !self.poll_read(wait)? {
                if wait.is_some() {
                    return Ok(ReadByte::Timeout);
                }
                // A signal interrupted the blocking wait
                continue;
            }
            if self.fill()? == 0 {
                return Ok(ReadByte::Eof);
            }
        }
    }
}
