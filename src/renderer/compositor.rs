//! Viewport compositor
//!
//! All coordinates in draw commands are 0-based screen cells. The text area
//! occupies every row but the last and every column right of the gutter.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::core::motion;
use crate::highlight::KeywordTable;

/// Width of the line-number gutter (`%4d │`)
pub const GUTTER_WIDTH: usize = 6;

/// First visible line and column of the document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub top_line: usize,
    pub left_column: usize,
}

/// Terminal geometry in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub cols: usize,
    pub rows: usize,
}

impl Size {
    /// Geometry clamped to one text row, one text column and the status row
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols: cols.max(GUTTER_WIDTH + 1),
            rows: rows.max(2),
        }
    }

    /// Rows available for text
    pub fn text_rows(&self) -> usize {
        self.rows - 1
    }

    /// Columns available for text
    pub fn text_cols(&self) -> usize {
        self.cols - GUTTER_WIDTH
    }

    /// Row of the status line
    pub fn status_row(&self) -> usize {
        self.rows - 1
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

/// How a text run is drawn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Style {
    Plain,
    /// Keyword color as a complete SGR sequence
    Keyword(String),
    /// Inverse video
    Selected,
}

/// One draw directive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawCommand {
    /// Line-number cell; `None` past the end of the document
    Gutter { row: usize, line: Option<usize> },
    /// A run of equally styled characters
    Text {
        row: usize,
        col: usize,
        text: String,
        style: Style,
    },
    /// The status line, padded to the terminal width
    StatusLine { row: usize, text: String },
    /// Final cursor placement
    Cursor { row: usize, col: usize },
}

/// Everything the compositor reads
#[derive(Debug, Clone)]
pub struct Scene<'a> {
    pub text: &'a [u8],
    pub caret: usize,
    pub selection: Option<Range<usize>>,
    pub keywords: &'a KeywordTable,
    pub status: &'a str,
}

/// A composed frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub viewport: Viewport,
    pub size: Size,
    pub commands: Vec<DrawCommand>,
}

impl Frame {
    /// Cursor cell of the frame
    pub fn cursor(&self) -> Option<(usize, usize)> {
        self.commands.iter().find_map(|command| match command {
            DrawCommand::Cursor { row, col } => Some((*row, *col)),
            _ => None,
        })
    }

    /// Render the frame as plain text rows, trailing blanks trimmed
    pub fn to_lines(&self) -> Vec<String> {
        let mut grid = vec![vec![' '; self.size.cols]; self.size.rows];

        for command in &self.commands {
            match command {
                DrawCommand::Gutter { row, line } => put(&mut grid[*row], 0, &gutter_text(*line)),
                DrawCommand::Text { row, col, text, .. } => put(&mut grid[*row], *col, text),
                DrawCommand::StatusLine { row, text } => put(&mut grid[*row], 0, text),
                DrawCommand::Cursor { .. } => {}
            }
        }

        grid.into_iter()
            .map(|cells| {
                let line: String = cells.into_iter().filter(|&c| c != '\0').collect();
                line.trim_end().to_string()
            })
            .collect()
    }
}

/// Gutter cell contents
pub fn gutter_text(line: Option<usize>) -> String {
    match line {
        Some(number) => format!("{:>4} │", number),
        None => "     │".to_string(),
    }
}

/// Write `text` into a row of cells; wide characters leave a `\0` behind
fn put(cells: &mut [char], col: usize, text: &str) {
    let mut at = col;
    for c in text.chars() {
        let width = motion::char_width(c);
        if at + width > cells.len() {
            break;
        }
        cells[at] = c;
        for cell in &mut cells[at + 1..at + width] {
            *cell = '\0';
        }
        at += width;
    }
}

/// Minimal scroll keeping the caret cell inside the text area
pub fn scroll_to_caret(viewport: Viewport, line: usize, column: usize, size: Size) -> Viewport {
    let rows = size.text_rows();
    let cols = size.text_cols();
    let mut next = viewport;

    if line < next.top_line {
        next.top_line = line;
    } else if line >= next.top_line + rows {
        next.top_line = line + 1 - rows;
    }

    if column < next.left_column {
        next.left_column = column;
    } else if column >= next.left_column + cols {
        next.left_column = column + 1 - cols;
    }

    next
}

/// Compose a frame, scrolling `viewport` as needed
pub fn compose(scene: &Scene<'_>, viewport: Viewport, size: Size) -> Frame {
    let buf = scene.text;
    let (line, column) = motion::locate(buf, scene.caret);
    let viewport = scroll_to_caret(viewport, line, column, size);

    let mut commands = Vec::with_capacity(size.rows * 2 + 2);
    let lines = motion::line_count(buf);
    let mut start = motion::line_offset(buf, viewport.top_line);

    for row in 0..size.text_rows() {
        let index = viewport.top_line + row;
        if index >= lines {
            commands.push(DrawCommand::Gutter { row, line: None });
            continue;
        }
        commands.push(DrawCommand::Gutter {
            row,
            line: Some(index + 1),
        });
        let end = motion::line_end(buf, start);
        draw_line(scene, start..end, row, viewport.left_column, size, &mut commands);
        start = end + 1;
    }

    commands.push(DrawCommand::StatusLine {
        row: size.status_row(),
        text: fit(scene.status, size.cols),
    });
    commands.push(DrawCommand::Cursor {
        row: line - viewport.top_line,
        col: GUTTER_WIDTH + column - viewport.left_column,
    });

    Frame {
        viewport,
        size,
        commands,
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Paint<'a> {
    Plain,
    Keyword(&'a str),
    Selected,
}

impl Paint<'_> {
    fn style(self) -> Style {
        match self {
            Paint::Plain => Style::Plain,
            Paint::Keyword(color) => Style::Keyword(color.to_string()),
            Paint::Selected => Style::Selected,
        }
    }
}

struct Run<'a> {
    col: usize,
    next_col: usize,
    text: String,
    paint: Paint<'a>,
}

impl Run<'_> {
    fn flush(&mut self, row: usize, commands: &mut Vec<DrawCommand>) {
        if !self.text.is_empty() {
            commands.push(DrawCommand::Text {
                row,
                col: self.col,
                text: std::mem::take(&mut self.text),
                style: self.paint.style(),
            });
        }
    }
}

fn draw_line<'a>(
    scene: &Scene<'a>,
    line: Range<usize>,
    row: usize,
    left: usize,
    size: Size,
    commands: &mut Vec<DrawCommand>,
) {
    let buf = scene.text;
    let right = left + size.text_cols();
    let mut run = Run {
        col: 0,
        next_col: 0,
        text: String::new(),
        paint: Paint::Plain,
    };
    let mut keyword: Option<(usize, &'a str)> = None;
    let mut column = 0;
    let mut at = line.start;

    while at < line.end && column < right {
        let Some((c, len)) = motion::char_at(buf, at) else {
            break;
        };

        // Keywords are matched from the line start so scrolled words keep color
        if keyword.map_or(true, |(end, _)| at >= end) {
            keyword = scene
                .keywords
                .match_at(buf, at)
                .map(|m| (at + m.len, m.color));
        }

        let width = motion::char_width(c);
        if column >= left && column + width <= right {
            let paint = if scene.selection.as_ref().is_some_and(|s| s.contains(&at)) {
                Paint::Selected
            } else if let Some((_, color)) = keyword {
                Paint::Keyword(color)
            } else {
                Paint::Plain
            };

            let col = GUTTER_WIDTH + column - left;
            if paint != run.paint || col != run.next_col {
                run.flush(row, commands);
                run.col = col;
                run.paint = paint;
            }
            run.text.push(if c.is_control() { '?' } else { c });
            run.next_col = col + width;
        }

        column += width;
        at += len;
    }

    run.flush(row, commands);
}

/// Truncate or pad to exactly `cols` cells
fn fit(text: &str, cols: usize) -> String {
    let mut out = String::with_capacity(cols);
    let mut used = 0;
    for c in text.chars() {
        let width = motion::char_width(c);
        if used + width > cols {
            break;
        }
        out.push(if c.is_control() { ' ' } else { c });
        used += width;
    }
    out.extend(std::iter::repeat(' ').take(cols - used));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(text: &str, caret: usize, viewport: Viewport, size: Size) -> Frame {
        let keywords = KeywordTable::parse("int 32\n");
        let scene = Scene {
            text: text.as_bytes(),
            caret,
            selection: None,
            keywords: &keywords,
            status: "file:a.c  ok",
        };
        compose(&scene, viewport, size)
    }

    #[test]
    fn test_compose_basic() {
        let frame = frame("abc\ndef", 5, Viewport::default(), Size::new(20, 5));
        let lines = frame.to_lines();

        assert_eq!(lines[0], "   1 │abc");
        assert_eq!(lines[1], "   2 │def");
        assert_eq!(lines[2], "     │");
        assert_eq!(lines[4], "file:a.c  ok");
        assert_eq!(frame.cursor(), Some((1, 7)));
    }

    #[test]
    fn test_minimal_vertical_scroll() {
        let text = "0\n1\n2\n3\n4\n5";
        let size = Size::new(20, 5);

        // Caret on line 4, one below the last visible text row
        let frame = frame(text, 8, Viewport::default(), size);
        assert_eq!(frame.viewport.top_line, 1);
        assert_eq!(frame.cursor(), Some((3, 6)));

        // Moving back to line 0 scrolls up just enough
        let frame = self::frame(text, 0, frame.viewport, size);
        assert_eq!(frame.viewport.top_line, 0);
    }

    #[test]
    fn test_horizontal_scroll() {
        let text = "abcdefghijklmnop";
        let size = Size::new(16, 3);

        let frame = frame(text, 12, Viewport::default(), size);
        assert_eq!(frame.viewport.left_column, 3);
        assert_eq!(frame.to_lines()[0], "   1 │defghijklm");
        assert_eq!(frame.cursor(), Some((0, 15)));
    }

    #[test]
    fn test_scroll_to_caret_is_minimal() {
        let size = Size::new(30, 11);
        let viewport = Viewport {
            top_line: 5,
            left_column: 0,
        };
        assert_eq!(scroll_to_caret(viewport, 14, 0, size).top_line, 5);
        assert_eq!(scroll_to_caret(viewport, 15, 0, size).top_line, 6);
        assert_eq!(scroll_to_caret(viewport, 4, 0, size).top_line, 4);
    }

    #[test]
    fn test_keyword_and_selection_styles() {
        let keywords = KeywordTable::parse("int 32\n");
        let scene = Scene {
            text: b"int x",
            caret: 0,
            selection: Some(1..2),
            keywords: &keywords,
            status: "",
        };
        let frame = compose(&scene, Viewport::default(), Size::new(20, 3));
        let runs: Vec<(&str, &Style)> = frame
            .commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text { text, style, .. } => Some((text.as_str(), style)),
                _ => None,
            })
            .collect();

        let green = Style::Keyword("\x1b[32m".to_string());
        assert_eq!(
            runs,
            vec![
                ("i", &green),
                ("n", &Style::Selected),
                ("t", &green),
                (" x", &Style::Plain),
            ]
        );
    }

    #[test]
    fn test_wide_characters() {
        let frame = frame("世界x", 6, Viewport::default(), Size::new(20, 3));
        assert_eq!(frame.to_lines()[0], "   1 │世界x");
        assert_eq!(frame.cursor(), Some((0, 10)));
    }

    #[test]
    fn test_status_is_fitted() {
        let frame = frame("", 0, Viewport::default(), Size::new(8, 2));
        let status = frame
            .commands
            .iter()
            .find_map(|command| match command {
                DrawCommand::StatusLine { text, .. } => Some(text.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(status, "file:a.c");
    }

    #[test]
    fn test_size_is_clamped() {
        let size = Size::new(1, 1);
        assert_eq!(size.text_rows(), 1);
        assert_eq!(size.text_cols(), 1);
    }
}
