//! Command line driver for plenary protocol speech parsing
//!
//! The `plenar` binary parses protocol files and directories into attributed
//! speeches and ranks speakers and reactions across a corpus. The command
//! functions are exposed here so they can run against any output sink.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod report;

pub use cli::{Cli, Commands, DramaArgs, OutputFormat, ParseArgs, SpeakersArgs};
pub use commands::{config_command, drama, load_config, parse_protocols, run, speakers};
pub use error::{CliError, Result};
