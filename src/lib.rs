//! zt Text Editor Library
//!
//! A small terminal text editor engine. This crate provides:
//!
//! - `core`: Document bytes, bounded undo/redo, UTF-8 motion, caret and selection
//! - `parser`: Raw terminal input decoder (keys, escape sequences, SGR mouse)
//! - `highlight`: Keyword table matching
//! - `renderer`: Viewport compositor and ANSI frame encoding
//! - `editor`: Editor state aggregate and command dispatch
//! - `storage`, `tty`, `app`: Filesystem, terminal and configuration adapters
//! - `headless`: Scripted sessions producing deterministic snapshots

pub mod app;
pub mod core;
pub mod editor;
pub mod headless;
pub mod highlight;
pub mod parser;
pub mod renderer;
pub mod storage;
pub mod tty;
