//! Offset arithmetic over UTF-8 bytes
//!
//! Free functions that move byte offsets by code points, lines and words.
//! Every function returns an offset on a code-point boundary. Bytes that are
//! not part of a valid UTF-8 sequence count as a single unit, so a document
//! loaded from a binary file can still be navigated.

use std::ops::Range;

use unicode_width::UnicodeWidthChar;

/// Direction of a vertical move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

/// Expected sequence length for a UTF-8 lead byte
pub fn sequence_len(lead: u8) -> usize {
    match lead {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 1,
    }
}

/// Nearest non-continuation byte among the three bytes before `pos`
fn lead_before(buf: &[u8], pos: usize) -> Option<usize> {
    (pos.saturating_sub(3)..pos)
        .rev()
        .find(|&i| !is_continuation(buf[i]))
}

/// Whether `pos` lies on a code-point boundary
pub fn is_boundary(buf: &[u8], pos: usize) -> bool {
    if pos == 0 || pos >= buf.len() {
        return pos <= buf.len();
    }
    if !is_continuation(buf[pos]) {
        return true;
    }
    // A continuation byte is a boundary only when no lead byte claims it
    lead_before(buf, pos).map_or(true, |lead| next_boundary(buf, lead) <= pos)
}

/// Offset just past the code point that starts at `pos`
pub fn next_boundary(buf: &[u8], pos: usize) -> usize {
    if pos >= buf.len() {
        return buf.len();
    }
    let need = sequence_len(buf[pos]);
    let mut end = pos + 1;
    while end < buf.len() && end - pos < need && is_continuation(buf[end]) {
        end += 1;
    }
    end
}

/// Offset of the code point that ends at `pos`
///
/// If `pos` falls inside a sequence, this is the start of that sequence.
pub fn prev_boundary(buf: &[u8], pos: usize) -> usize {
    let pos = pos.min(buf.len());
    if pos == 0 {
        return 0;
    }
    let last = pos - 1;
    if !is_continuation(buf[last]) {
        return last;
    }
    match lead_before(buf, last) {
        Some(lead) if next_boundary(buf, lead) >= pos => lead,
        // Stray continuation byte
        _ => last,
    }
}

/// Largest boundary that is `<= pos`
pub fn floor_boundary(buf: &[u8], pos: usize) -> usize {
    if pos >= buf.len() {
        return buf.len();
    }
    let mut at = pos;
    while at > 0 && !is_boundary(buf, at) {
        at -= 1;
    }
    at
}

/// Decode the code point starting at `pos`
///
/// Invalid sequences decode as U+FFFD with their unit length.
pub fn char_at(buf: &[u8], pos: usize) -> Option<(char, usize)> {
    if pos >= buf.len() {
        return None;
    }
    let end = next_boundary(buf, pos);
    let c = std::str::from_utf8(&buf[pos..end])
        .ok()
        .and_then(|s| s.chars().next())
        .unwrap_or('\u{FFFD}');
    Some((c, end - pos))
}

/// Display width of a character in terminal cells
pub fn char_width(c: char) -> usize {
    if c.is_control() {
        1
    } else {
        c.width().unwrap_or(1)
    }
}

/// Start of the line containing `pos`
pub fn line_start(buf: &[u8], pos: usize) -> usize {
    let pos = pos.min(buf.len());
    buf[..pos]
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |i| i + 1)
}

/// End of the line containing `pos` (offset of its `\n`, or buffer end)
pub fn line_end(buf: &[u8], pos: usize) -> usize {
    let pos = pos.min(buf.len());
    buf[pos..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(buf.len(), |i| pos + i)
}

/// Visual column of `pos` within its line
pub fn column_of(buf: &[u8], pos: usize) -> usize {
    let mut at = line_start(buf, pos);
    let mut col = 0;
    while at < pos {
        let Some((c, len)) = char_at(buf, at) else {
            break;
        };
        col += char_width(c);
        at += len;
    }
    col
}

/// Offset on the line starting at `start` closest to visual column `col`
/// without passing it
pub fn offset_at_column(buf: &[u8], start: usize, col: usize) -> usize {
    let end = line_end(buf, start);
    let mut at = start;
    let mut current = 0;
    while at < end {
        let Some((c, len)) = char_at(buf, at) else {
            break;
        };
        let width = char_width(c);
        if current + width > col {
            break;
        }
        current += width;
        at += len;
    }
    at
}

/// Line index and visual column of `pos`, scanning from the buffer start
pub fn locate(buf: &[u8], pos: usize) -> (usize, usize) {
    let pos = pos.min(buf.len());
    let line = buf[..pos].iter().filter(|&&b| b == b'\n').count();
    (line, column_of(buf, pos))
}

/// Start offset of line number `line`, clamped to the last line
pub fn line_offset(buf: &[u8], line: usize) -> usize {
    if line == 0 {
        return 0;
    }
    let mut seen = 0;
    for (i, &b) in buf.iter().enumerate() {
        if b == b'\n' {
            seen += 1;
            if seen == line {
                return i + 1;
            }
        }
    }
    line_start(buf, buf.len())
}

/// Number of lines in the buffer (an empty buffer has one line)
pub fn line_count(buf: &[u8]) -> usize {
    buf.iter().filter(|&&b| b == b'\n').count() + 1
}

/// Move one line up or down, landing as close to visual column `col` as the
/// destination line allows. Returns `None` when there is no such line.
pub fn vertical(buf: &[u8], pos: usize, dir: Direction, col: usize) -> Option<usize> {
    let start = line_start(buf, pos);
    let target = match dir {
        Direction::Up => {
            if start == 0 {
                return None;
            }
            line_start(buf, start - 1)
        }
        Direction::Down => {
            let end = line_end(buf, pos);
            if end >= buf.len() {
                return None;
            }
            end + 1
        }
    };
    Some(offset_at_column(buf, target, col))
}

fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

/// Maximal ASCII identifier run around `pos`
///
/// Non-ASCII code points never belong to a word.
pub fn word_extent(buf: &[u8], pos: usize) -> Range<usize> {
    let pos = floor_boundary(buf, pos);
    let mut start = pos;
    while start > 0 && is_word_byte(buf[start - 1]) {
        start -= 1;
    }
    let mut end = pos;
    while end < buf.len() && is_word_byte(buf[end]) {
        end += 1;
    }
    start..end
}

/// The line around `pos`, without its newline
pub fn line_extent(buf: &[u8], pos: usize) -> Range<usize> {
    line_start(buf, pos)..line_end(buf, pos)
}
