//! Application glue module
//!
//! Configuration and logging setup shared by the binaries.

mod config;
mod logging;

pub use config::{
    default_path, Config, ConfigError, EditorConfig, HighlightConfig, InputConfig,
    SelectionConfig,
};
pub use logging::{init_logging, LogTarget};
