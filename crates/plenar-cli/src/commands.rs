//! Subcommand implementations
//!
//! Every command writes to the sink it is handed, so the same code serves
//! stdout, output files and tests.

use crate::{
    cli::{Cli, Commands, DramaArgs, OutputFormat, ParseArgs, SpeakersArgs},
    error::{CliError, Result},
    report::{
        DocumentReport, DramaReport, SpeakersReport, document_summary, write_drama_summary,
        write_speakers_summary,
    },
};
use plenar_core::{Config, utils};
use plenar_parser::{Corpus, ProtocolParser};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};
use tracing::{debug, info, warn};

/// Resolve configuration from the config file, the environment and CLI overrides
///
/// # Errors
///
/// Returns an error if the file cannot be loaded or the result is invalid.
pub fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?;

    if let Some(level) = &cli.log_level {
        config.logging.level.clone_from(level);
    }
    if cli.json {
        config.logging.format = "json".to_string();
    }

    config.validate()?;
    Ok(config)
}

/// Run one parsed command line
///
/// # Errors
///
/// Returns an error if configuration, logging setup, input discovery or
/// output fails.
pub fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    plenar_core::init_logging(&config.logging)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        log_level = %config.logging.level,
        "plenar starting"
    );

    if let Commands::Config { show, validate } = cli.command {
        return config_command(&config, show, validate, &mut std::io::stdout().lock());
    }

    let parser = ProtocolParser::new(&config)?;
    let stdout = std::io::stdout();

    match cli.command {
        Commands::Parse(args) => match &args.output {
            Some(path) => {
                let mut file = BufWriter::new(File::create(path)?);
                parse_protocols(&parser, &config, &args, &mut file)?;
                file.flush()?;
                info!(output = %path.display(), "Parse output written");
                Ok(())
            }
            None => parse_protocols(&parser, &config, &args, &mut stdout.lock()),
        },
        Commands::Drama(args) => drama(&parser, &config, &args, &mut stdout.lock()),
        Commands::Speakers(args) => speakers(&parser, &config, &args, &mut stdout.lock()),
        Commands::Config { .. } => Ok(()),
    }
}

/// Expand paths into protocol files, failing when nothing is left
fn protocol_files(paths: &[PathBuf], config: &Config) -> Result<Vec<PathBuf>> {
    let files = utils::resolve_inputs(paths, &config.input)?;
    if files.is_empty() {
        return Err(CliError::NoInput {
            paths: paths.to_vec(),
        });
    }
    debug!(files = files.len(), "Resolved protocol files");
    Ok(files)
}

/// Segment each protocol and write its speeches
///
/// Unreadable files are logged and skipped.
///
/// # Errors
///
/// Returns an error if no protocol file is found or output fails.
pub fn parse_protocols(
    parser: &ProtocolParser,
    config: &Config,
    args: &ParseArgs,
    out: &mut dyn Write,
) -> Result<()> {
    let files = protocol_files(&args.paths, config)?;

    let mut parsed = Vec::with_capacity(files.len());
    for path in &files {
        match utils::read_protocol(path) {
            Ok(document) => {
                let protocol = parser.parse_document(&document);
                parsed.push((document.id, protocol));
            }
            Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable protocol"),
        }
    }

    let reports: Vec<DocumentReport<'_>> = parsed
        .iter()
        .map(|(id, protocol)| DocumentReport::new(id, protocol, args.with_text, args.question_time))
        .collect();

    match args.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &reports)?;
            writeln!(out)?;
        }
        OutputFormat::Summary => {
            for (report, (_, protocol)) in reports.iter().zip(&parsed) {
                write!(out, "{}", document_summary(report, protocol))?;
            }
        }
    }

    info!(
        documents = parsed.len(),
        skipped = files.len() - parsed.len(),
        "Parsed protocols"
    );
    Ok(())
}

/// Tally reactions across protocols and write the rankings
///
/// # Errors
///
/// Returns an error if no protocol file is found or output fails.
pub fn drama(
    parser: &ProtocolParser,
    config: &Config,
    args: &DramaArgs,
    out: &mut dyn Write,
) -> Result<()> {
    let files = protocol_files(&args.paths, config)?;
    let corpus = Corpus::from_paths(parser, &files);
    let report = DramaReport::new(&corpus, args.top);

    match args.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
        }
        OutputFormat::Summary => write_drama_summary(out, &report)?,
    }
    Ok(())
}

/// Rank speakers across protocols and write the rankings
///
/// # Errors
///
/// Returns an error if no protocol file is found or output fails.
pub fn speakers(
    parser: &ProtocolParser,
    config: &Config,
    args: &SpeakersArgs,
    out: &mut dyn Write,
) -> Result<()> {
    let files = protocol_files(&args.paths, config)?;
    let corpus = Corpus::from_paths(parser, &files);
    let report = SpeakersReport::new(&corpus, args.top, args.min_speeches);

    match args.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
        }
        OutputFormat::Summary => write_speakers_summary(out, &report)?,
    }
    Ok(())
}

/// Validate and/or print the resolved configuration
///
/// Validation also compiles every pattern table. Without flags the
/// configuration is shown.
///
/// # Errors
///
/// Returns an error if validation fails or the configuration cannot be rendered.
pub fn config_command(
    config: &Config,
    show: bool,
    validate: bool,
    out: &mut dyn Write,
) -> Result<()> {
    if validate {
        config.validate()?;
        ProtocolParser::new(config)?;
        writeln!(out, "Configuration is valid")?;
    }

    if show || !validate {
        write!(out, "{}", config.to_toml()?)?;
    }

    Ok(())
}
