//! End-to-end editing sessions
//!
//! Each test feeds raw terminal bytes through the decoder and editor, the
//! same path keystrokes take in the interactive binary, and checks the
//! resulting document, caret and screen.

use std::path::Path;
use std::time::{Duration, Instant};

use zt_editor::app::Config;
use zt_editor::editor::Outcome;
use zt_editor::headless::Session;
use zt_editor::parser::{Decoder, InputEvent, Key, KeyEvent, Modifiers, MouseKind};
use zt_editor::renderer::Size;
use zt_editor::storage::MemoryStorage;

const UP: &[u8] = b"\x1b[A";
const DOWN: &[u8] = b"\x1b[B";
const RIGHT: &[u8] = b"\x1b[C";
const SHIFT_RIGHT: &[u8] = b"\x1b[1;2C";
const END: &[u8] = b"\x1b[F";
const CTRL_C: &[u8] = b"\x03";
const CTRL_V: &[u8] = b"\x16";
const CTRL_X: &[u8] = b"\x18";
const CTRL_Y: &[u8] = b"\x19";
const CTRL_Z: &[u8] = b"\x1a";

fn open(text: &str) -> Session {
    let mut storage = MemoryStorage::new();
    storage.insert("doc.txt", text);
    Session::open(&Config::default(), "doc.txt", storage, Size::new(40, 8)).unwrap()
}

fn script(parts: &[&[u8]]) -> Vec<u8> {
    parts.concat()
}

#[test]
fn test_vertical_move_lands_on_same_column() {
    let mut session = open("abc\ndef");
    session.feed(&script(&[RIGHT, DOWN])).unwrap();
    assert_eq!(session.editor().caret(), 5);
}

#[test]
fn test_sticky_column_round_trip() {
    let mut session = open("abcdef\nxy\nabcdef");
    session
        .feed(&script(&[RIGHT, RIGHT, RIGHT, RIGHT, DOWN]))
        .unwrap();
    assert_eq!(session.editor().caret(), 9);

    session.feed(DOWN).unwrap();
    assert_eq!(session.editor().caret(), 14);

    session.feed(&script(&[UP, UP])).unwrap();
    assert_eq!(session.editor().caret(), 4);
}

#[test]
fn test_multibyte_insert_and_step() {
    let mut session = Session::new(&Config::default(), Size::new(40, 8));
    session.feed("é".as_bytes()).unwrap();
    assert_eq!(session.editor().text().len(), 2);

    session.feed(b"\x1b[H").unwrap();
    assert_eq!(session.editor().caret(), 0);
    session.feed(RIGHT).unwrap();
    assert_eq!(session.editor().caret(), 2);
}

#[test]
fn test_copy_then_paste_at_end() {
    let mut session = open("hello");
    session
        .feed(&script(&[SHIFT_RIGHT, SHIFT_RIGHT, SHIFT_RIGHT, CTRL_C, END, CTRL_V]))
        .unwrap();

    let snapshot = session.snapshot();
    assert_eq!(snapshot.clipboard, "hel");
    assert_eq!(snapshot.text, "hellohel");
}

#[test]
fn test_cut_undo_redo() {
    let mut session = open("one two");
    session
        .feed(&script(&[b"\x1b[1;2F", CTRL_X]))
        .unwrap();
    assert_eq!(session.editor().text(), b"");

    session.feed(CTRL_Z).unwrap();
    assert_eq!(session.editor().text(), b"one two");
    assert_eq!(session.editor().caret(), 7);

    session.feed(CTRL_Y).unwrap();
    assert_eq!(session.editor().text(), b"");
    assert_eq!(session.editor().caret(), 0);
}

#[test]
fn test_control_key_right_after_escape_still_applies() {
    let mut session = Session::new(&Config::default(), Size::new(40, 8));
    session.feed(&script(&[b"abc", b"\x1b", CTRL_Z])).unwrap();

    assert!(!session.is_finished());
    assert_eq!(session.editor().text(), b"ab");
}

#[test]
fn test_history_capacity_evicts_oldest() {
    let mut session = Session::new(&Config::default(), Size::new(40, 8));
    session.feed(&vec![b'x'; 1025]).unwrap();
    session.feed(&CTRL_Z.repeat(1030)).unwrap();

    assert_eq!(session.editor().text(), b"x");
    assert_eq!(session.editor().status(), "nothing to undo");
}

#[test]
fn test_undo_restores_large_paste() {
    let mut session = open(&"0123456789".repeat(500));
    session.feed(b"\x01\x03\x1b[1;5F\x16").unwrap();
    assert_eq!(session.editor().text().len(), 10_000);

    session.feed(CTRL_Z).unwrap();
    assert_eq!(session.editor().text().len(), 5_000);
    session.feed(CTRL_Y).unwrap();
    assert_eq!(session.editor().text().len(), 10_000);
}

#[test]
fn test_mouse_drag_selects_and_types_over() {
    let mut session = open("hello world");
    // Press on 'w', drag to the end, release, type
    session
        .feed(b"\x1b[<0;13;1M\x1b[<32;18;1M\x1b[<0;18;1m")
        .unwrap();
    assert_eq!(session.editor().selection(), Some(6..11));

    session.feed(b"there").unwrap();
    assert_eq!(session.editor().text(), b"hello there");
}

#[test]
fn test_double_click_selects_word() {
    let mut session = open("foo bar_baz qux");
    // Two presses inside the click window
    session
        .feed(b"\x1b[<0;14;1M\x1b[<0;14;1m\x1b[<0;14;1M\x1b[<0;14;1m")
        .unwrap();
    assert_eq!(session.editor().selection(), Some(4..11));
}

#[test]
fn test_click_counting_through_decoder() {
    let mut decoder = Decoder::new();
    let t0 = Instant::now();
    let press = b"\x1b[<0;10;2M";

    let kinds: Vec<MouseKind> = [0u64, 150, 300, 800]
        .iter()
        .flat_map(|&ms| decoder.feed(press, t0 + Duration::from_millis(ms)))
        .filter_map(|event| match event {
            InputEvent::Mouse(mouse) => Some(mouse.kind),
            _ => None,
        })
        .collect();

    assert_eq!(
        kinds,
        vec![
            MouseKind::Down,
            MouseKind::DoubleClick,
            MouseKind::TripleClick,
            MouseKind::Down
        ]
    );
}

#[test]
fn test_lone_escape_and_shift_up() {
    let mut decoder = Decoder::new();
    let now = Instant::now();

    assert!(decoder.feed(b"\x1b", now).is_empty());
    assert_eq!(decoder.timeout(), Some(InputEvent::Escape));

    assert_eq!(
        decoder.feed(b"\x1b[1;2A", now),
        vec![InputEvent::Key(KeyEvent::new(Key::Up, Modifiers::SHIFT))]
    );
}

#[test]
fn test_scroll_is_minimal() {
    // 8 rows leave 7 text rows
    let text: String = (0..20).map(|i| format!("line {}\n", i)).collect();
    let mut session = open(&text);

    session.feed(&DOWN.repeat(6)).unwrap();
    assert_eq!(session.snapshot().viewport.top_line, 0);

    session.feed(DOWN).unwrap();
    let snapshot = session.snapshot();
    assert_eq!(snapshot.viewport.top_line, 1);
    assert_eq!(snapshot.screen[0], "   2 │line 1");
    assert_eq!(snapshot.cursor, Some((6, 6)));
}

#[test]
fn test_page_down_moves_one_screen() {
    let text: String = (0..20).map(|i| format!("{}\n", i)).collect();
    let mut session = open(&text);
    session.feed(b"\x1b[6~").unwrap();
    assert_eq!(session.snapshot().caret_position, (7, 0));
}

#[test]
fn test_find_moves_to_next_match() {
    let mut session = open("alpha beta alpha");
    session.feed(b"\x1falpha\r").unwrap();
    assert_eq!(session.editor().caret(), 11);
    assert_eq!(session.editor().status(), "found");

    // F7 with an empty term repeats the search, which does not wrap
    session.feed(b"\x1b[18~\r").unwrap();
    assert_eq!(session.editor().status(), "not found");
}

#[test]
fn test_save_writes_storage() {
    let mut session = open("draft");
    session.feed(&script(&[END, b"!", b"\x1bOQ"])).unwrap();

    assert_eq!(session.editor().status(), "Saved in doc.txt");
    assert_eq!(
        session.storage().get(Path::new("doc.txt")),
        Some(&b"draft!"[..])
    );
}

#[test]
fn test_escape_quits_without_saving() {
    let mut session = open("keep");
    assert_eq!(session.feed(b"xx\x1b").unwrap(), Outcome::Quit);
    assert_eq!(
        session.storage().get(Path::new("doc.txt")),
        Some(&b"keep"[..])
    );
}

#[test]
fn test_unknown_sequences_are_ignored() {
    let mut session = open("abc");
    session.feed(b"\x1b[99~\x1b[?1;2y\x1bOz").unwrap();
    assert_eq!(session.editor().text(), b"abc");
    assert!(!session.is_finished());
}

#[test]
fn test_snapshot_text_output() {
    let mut session = open("int main");
    let text = session.snapshot().to_text();
    assert!(text.starts_with("   1 │int main\n     │\n"));
    assert!(text.contains("file:doc.txt  File doc.txt loaded"));
}
