//! zt Headless Runner
//!
//! Runs the editor without a terminal for testing and automation. Reads a
//! byte script from stdin or a file, feeds it to the editor as if it were
//! typed, and outputs the resulting editor snapshot.
//!
//! # Usage
//!
//! ```bash
//! # Type into a new buffer and print a JSON snapshot
//! printf 'Hello\rWorld' | zt-headless
//!
//! # Edit an existing file (never written back) and print the screen
//! zt-headless --file notes.txt --input keys.bin --text
//! ```

use std::error::Error;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use zt_editor::app::{init_logging, Config, LogTarget};
use zt_editor::headless::Session;
use zt_editor::renderer::Size;
use zt_editor::storage::{FileStorage, MemoryStorage, Storage};

#[derive(Parser, Debug)]
#[command(name = "zt-headless")]
#[command(version)]
#[command(about = "Run the zt editor on a byte script and print a snapshot", long_about = None)]
struct CliArgs {
    /// Input script (stdin if not specified)
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Document to open; saves go to memory only
    #[arg(short, long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Output file (stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output the rendered screen instead of JSON
    #[arg(short, long)]
    text: bool,

    /// Terminal columns
    #[arg(short, long, default_value_t = 80)]
    cols: usize,

    /// Terminal rows
    #[arg(short, long, default_value_t = 24)]
    rows: usize,

    /// Path to config file (defaults are used otherwise)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    if let Err(e) = init_logging(&LogTarget::Stderr, "warn") {
        eprintln!("zt-headless: {}", e);
        return ExitCode::FAILURE;
    }

    match run(CliArgs::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: CliArgs) -> Result<(), Box<dyn Error>> {
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    // Read input
    let script = if let Some(path) = &args.input {
        std::fs::read(path)?
    } else {
        let mut data = Vec::new();
        io::stdin().read_to_end(&mut data)?;
        data
    };

    let size = Size::new(args.cols, args.rows);
    let mut session = match &args.file {
        Some(path) => {
            let mut storage = MemoryStorage::new();
            if let Some(bytes) = FileStorage.load(path)? {
                storage.insert(path.clone(), bytes);
            }
            Session::open(&config, path.clone(), storage, size)?
        }
        None => Session::new(&config, size),
    };

    session.feed(&script)?;
    let snapshot = session.snapshot();

    // Output result
    let output = if args.text {
        snapshot.to_text()
    } else {
        snapshot.to_json()?
    };

    if let Some(path) = &args.output {
        std::fs::write(path, output)?;
    } else {
        io::stdout().write_all(output.as_bytes())?;
    }

    Ok(())
}
