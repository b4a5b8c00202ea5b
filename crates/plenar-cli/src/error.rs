//! Error types for the command line driver

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors surfaced to the command line
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration, input or logging error from the core crate
    #[error(transparent)]
    Core(#[from] plenar_core::Error),

    /// Parser construction error
    #[error(transparent)]
    Parser(#[from] plenar_parser::ParserError),

    /// Writing output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Rendering JSON output failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// None of the given paths held a protocol file
    #[error("No protocol files found in {}", format_paths(.paths))]
    NoInput {
        /// Paths that were searched
        paths: Vec<PathBuf>,
    },
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl CliError {
    /// Process exit code for this error
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Core(plenar_core::Error::Configuration { .. } | plenar_core::Error::Validation { .. })
            | Self::Parser(_) => 78,
            Self::NoInput { .. } | Self::Core(plenar_core::Error::Input { .. }) => 66,
            _ => 1,
        }
    }
}
