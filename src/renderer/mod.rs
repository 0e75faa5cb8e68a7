//! Render Module
//!
//! Maps the document onto the terminal. The compositor is a pure function
//! from editor state and terminal geometry to a scroll position and an
//! ordered list of draw commands; the ANSI backend encodes those commands
//! into a single write per frame.

mod ansi;
mod compositor;

pub use ansi::{encode, write_frame, GUTTER_SGR};
pub use compositor::{
    compose, gutter_text, scroll_to_caret, DrawCommand, Frame, Scene, Size, Style, Viewport,
    GUTTER_WIDTH,
};
