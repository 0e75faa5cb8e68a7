//! zt - terminal text editor
//!
//! Usage: `zt [FILE]`. Logs go to the file given by `--log` because the
//! terminal itself is the editing surface.

use std::error::Error;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use zt_editor::app::{init_logging, Config, LogTarget};
use zt_editor::editor::{Editor, Outcome};
use zt_editor::parser::Decoder;
use zt_editor::renderer::write_frame;
use zt_editor::storage::FileStorage;
use zt_editor::tty::{terminal_size, RawMode, StdinSource};

#[derive(Parser, Debug)]
#[command(name = "zt")]
#[command(version)]
#[command(about = "A small terminal text editor", long_about = None)]
struct CliArgs {
    /// File to edit; created on first save
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Path to custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Append log output to this file
    #[arg(long, value_name = "FILE")]
    log: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let target = args.log.clone().map_or(LogTarget::Off, LogTarget::File);
    if let Err(e) = init_logging(&target, "info") {
        eprintln!("zt: cannot open log file: {}", e);
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Error: {}", e);
            eprintln!("zt: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &CliArgs) -> Result<(), Box<dyn Error>> {
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(),
    };

    // Nothing is loaded until the terminal is ours
    let _raw = RawMode::enter()?;

    let mut storage = FileStorage;
    let mut editor = match &args.file {
        Some(path) => Editor::open(&config, path.clone(), &mut storage)?,
        None => Editor::new(&config),
    };
    editor.load_keywords(&config.highlight);
    tracing::info!(file = ?editor.path(), "session started");

    let mut decoder =
        Decoder::with_timeouts(config.input.escape_timeout(), config.input.sequence_timeout());
    let mut source = StdinSource::new();
    let stdout = io::stdout();

    loop {
        match terminal_size() {
            Ok(size) => editor.resize(size),
            Err(e) => tracing::warn!("Window size unavailable: {}", e),
        }
        let frame = editor.frame();
        write_frame(&frame, &mut stdout.lock())?;

        let Some(event) = decoder.read_event(&mut source)? else {
            break;
        };
        if editor.handle(event, &mut storage) == Outcome::Quit {
            break;
        }
    }

    tracing::info!("session ended");
    Ok(())
}
