//! Common test utilities for the command line driver

#![allow(dead_code)]

use plenar_core::Config;
use plenar_parser::ProtocolParser;
use std::{path::Path, sync::Once};
use tempfile::TempDir;

static INIT: Once = Once::new();

/// Initialize test logging
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    });
}

/// A debate with two regular speeches, reactions and an interposed question
pub const DEBATE: &str = "Deutscher Bundestag
Stenografischer Bericht
1. Sitzung
Präsidentin Julia Klöckner:
Ich eröffne die Aussprache. Das Wort hat die Kollegin Anna Müller.
Anna Müller (SPD):
Sehr geehrte Frau Präsidentin! Meine Damen und Herren! Wir beraten heute den Haushalt.
(Beifall bei der SPD sowie bei der CDU/CSU)
Wir stehen zu diesem Etat.
(Stephan Brandner [AfD]: Das glauben Sie doch selbst nicht!)
Präsidentin Julia Klöckner:
Nächster Redner ist Dr. Hans Schmidt.
Dr. Hans Schmidt (CDU/CSU):
Sehr geehrte Frau Präsidentin! Meine Damen und Herren! Wir beraten heute den Haushalt.
(Zuruf von der AfD: Unsinn!)
Vizepräsident Bodo Ramelow:
Herr Kollege, gestatten Sie eine Zwischenfrage der Kollegin Müller?
Anna Müller (SPD):
Herr Kollege, haben Sie den Einzelplan überhaupt gelesen, bevor Sie hier reden?
";

/// Default configuration and the parser built from it
pub fn default_setup() -> (Config, ProtocolParser) {
    let config = Config::default();
    let parser = ProtocolParser::new(&config).expect("default configuration compiles");
    (config, parser)
}

/// Temporary directory holding `debate.txt`
pub fn protocol_dir() -> TempDir {
    let dir = tempfile::tempdir().expect("create temp dir");
    write_protocol(dir.path(), "debate.txt", DEBATE);
    dir
}

/// Write one protocol file
pub fn write_protocol(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).expect("write protocol");
}

/// Run a command into a buffer and return what it wrote
pub fn capture<F>(command: F) -> String
where
    F: FnOnce(&mut Vec<u8>) -> plenar_cli::Result<()>,
{
    let mut out = Vec::new();
    command(&mut out).expect("command succeeds");
    String::from_utf8(out).expect("utf-8 output")
}
