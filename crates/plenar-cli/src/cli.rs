//! Command line arguments

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Command line interface for the plenary protocol parser
#[derive(Debug, Parser)]
#[command(
    name = "plenar",
    version = env!("CARGO_PKG_VERSION"),
    about = "Speech segmentation and attribution for plenary protocols",
    long_about = "Splits plenary protocols into attributed speeches, tallies interruptions, applause and heckles, and ranks speakers across a corpus."
)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Enable structured JSON logging
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Segment protocols into speeches
    Parse(ParseArgs),

    /// Tally interruptions, applause and heckles
    Drama(DramaArgs),

    /// Rank speakers across protocols
    Speakers(SpeakersArgs),

    /// Validate or show the resolved configuration
    Config {
        /// Show resolved configuration
        #[arg(short, long)]
        show: bool,

        /// Validate configuration and compile all pattern tables
        #[arg(short, long)]
        validate: bool,
    },
}

/// Output format of the report commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Machine-readable JSON
    Json,
    /// Human-readable summary
    #[default]
    Summary,
}

/// Arguments of `plenar parse`
#[derive(Debug, Clone, Args)]
pub struct ParseArgs {
    /// Protocol files or directories
    #[arg(value_name = "PATHS", required = true)]
    pub paths: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Include speech bodies in JSON output
    #[arg(long)]
    pub with_text: bool,

    /// Include the question-time channel
    #[arg(long)]
    pub question_time: bool,

    /// Write output to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Arguments of `plenar drama`
#[derive(Debug, Clone, Args)]
pub struct DramaArgs {
    /// Protocol files or directories
    #[arg(value_name = "PATHS", required = true)]
    pub paths: Vec<PathBuf>,

    /// Entries per ranking
    #[arg(short = 'n', long, default_value_t = 10)]
    pub top: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

/// Arguments of `plenar speakers`
#[derive(Debug, Clone, Args)]
pub struct SpeakersArgs {
    /// Protocol files or directories
    #[arg(value_name = "PATHS", required = true)]
    pub paths: Vec<PathBuf>,

    /// Entries per ranking
    #[arg(short = 'n', long, default_value_t = 10)]
    pub top: usize,

    /// Speeches a speaker needs to appear in the verbose ranking
    #[arg(long, default_value_t = 5)]
    pub min_speeches: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    pub format: OutputFormat,
}
