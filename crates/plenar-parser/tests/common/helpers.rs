//! Test helper functions and utilities

use plenar_core::{CanonicalParty, Speech, SpeechType};
use plenar_parser::ProtocolParser;
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Initialize test logging (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    });
}

/// Parser with the built-in tables
pub fn default_parser() -> ProtocolParser {
    ProtocolParser::with_defaults().expect("built-in tables compile")
}

/// Text of exactly `chars` characters made of words, without leading or
/// trailing whitespace
pub fn body_of_chars(chars: usize) -> String {
    let mut body: String = "Haushalt ".repeat(chars).chars().take(chars).collect();
    if body.ends_with(' ') {
        body.pop();
        body.push('s');
    }
    body
}

/// Speaker, party and type of each speech, for compact assertions
pub fn summarize(speeches: &[Speech]) -> Vec<(String, CanonicalParty, SpeechType)> {
    speeches
        .iter()
        .map(|speech| (speech.speaker.clone(), speech.party, speech.speech_type))
        .collect()
}
