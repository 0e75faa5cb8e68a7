//! ANSI backend
//!
//! Encodes a composed frame into one byte buffer: hide the cursor, draw
//! every directive, place and show the cursor.

use std::io::{self, Write};

use super::compositor::{gutter_text, DrawCommand, Frame, Style};

/// Gutter colors: grey 250 on grey 236
pub const GUTTER_SGR: &str = "\x1b[48;5;236;38;5;250m";

const RESET: &str = "\x1b[0m";
const INVERSE: &str = "\x1b[7m";

/// Encode `frame` into terminal output
pub fn encode(frame: &Frame) -> Vec<u8> {
    let mut out = String::with_capacity(frame.size.cols * frame.size.rows * 2);
    out.push_str("\x1b[?25l");

    for command in &frame.commands {
        match command {
            DrawCommand::Gutter { row, line } => {
                out.push_str(&format!("\x1b[{};1H\x1b[2K", row + 1));
                out.push_str(GUTTER_SGR);
                out.push_str(&gutter_text(*line));
                out.push_str(RESET);
            }
            DrawCommand::Text {
                row,
                col,
                text,
                style,
            } => {
                out.push_str(&format!("\x1b[{};{}H", row + 1, col + 1));
                match style {
                    Style::Plain => out.push_str(text),
                    Style::Keyword(color) => {
                        out.push_str(color);
                        out.push_str(text);
                        out.push_str(RESET);
                    }
                    Style::Selected => {
                        out.push_str(INVERSE);
                        out.push_str(text);
                        out.push_str(RESET);
                    }
                }
            }
            DrawCommand::StatusLine { row, text } => {
                out.push_str(&format!("\x1b[{};1H\x1b[2K", row + 1));
                out.push_str(INVERSE);
                out.push_str(text);
                out.push_str(RESET);
            }
            DrawCommand::Cursor { row, col } => {
                out.push_str(&format!("\x1b[{};{}H", row + 1, col + 1));
            }
        }
    }

    out.push_str("\x1b[?25h");
    out.into_bytes()
}

/// Write `frame` with a single write and flush
pub fn write_frame<W: Write + ?Sized>(frame: &Frame, writer: &mut W) -> io::Result<()> {
    writer.write_all(&encode(frame))?;
    writer.flush()
}
