//! Core types and utilities for plenary protocol analysis

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod config;
pub mod error;
pub mod tally;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::{Config, DramaConfig, InputConfig, LoggingConfig, ParserConfig};
pub use error::{Error, Result};
pub use tally::Tally;
pub use types::{
    CanonicalParty, DramaStats, ProtocolDocument, SpeakerKey, SpeakerName, Speech,
    SpeechMetadata, SpeechType, TextSpan,
};

/// Initialize the logging system
///
/// `RUST_LOG` takes precedence over the configured level. With `file` set,
/// events go to that file instead of stderr.
///
/// # Errors
///
/// Returns an error if the filter is invalid or a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::{
        EnvFilter, Layer, fmt::writer::BoxMakeWriter, layer::SubscriberExt,
        util::SubscriberInitExt,
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| Error::configuration(format!("Invalid log level: {e}")))?;

    let (writer, ansi) = match &config.file {
        Some(path) => {
            let directory = path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            let file_name = path
                .file_name()
                .ok_or_else(|| Error::configuration("logging.file has no file name"))?;
            (
                BoxMakeWriter::new(tracing_appender::rolling::never(directory, file_name)),
                false,
            )
        }
        None => (BoxMakeWriter::new(std::io::stderr), true),
    };

    let layer = match config.format.as_str() {
        "json" => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(writer)
            .boxed(),
        "compact" => tracing_subscriber::fmt::layer()
            .compact()
            .with_ansi(ansi)
            .with_writer(writer)
            .boxed(),
        _ => tracing_subscriber::fmt::layer()
            .pretty()
            .with_ansi(ansi)
            .with_writer(writer)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|e| Error::configuration(format!("Failed to initialize logging: {e}")))
}
