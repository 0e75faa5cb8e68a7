//! Tracing subscriber setup

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Where log output goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// No subscriber is installed
    Off,
    Stderr,
    /// Append to a file; used while the terminal is the editing surface
    File(PathBuf),
}

/// Install the global subscriber. `RUST_LOG` overrides `default_level`.
pub fn init_logging(target: &LogTarget, default_level: &str) -> io::Result<()> {
    let (stderr, file) = match target {
        LogTarget::Off => return Ok(()),
        LogTarget::Stderr => (Some(fmt::layer().with_writer(io::stderr)), None),
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            (
                None,
                Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file))),
            )
        }
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(stderr)
        .with(file)
        .init();
    Ok(())
}
