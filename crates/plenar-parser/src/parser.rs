//! Protocol parser facade
//!
//! Pattern tables are compiled once into a [`ProtocolParser`], which is then
//! shared by reference across any number of documents and threads.

use crate::{
    boundary::{Boundary, BoundaryScanner},
    drama::DramaExtractor,
    error::ParserResult,
    normalize::{NormalizedText, normalize},
    segment::{Candidate, Segmenter, SpeechSpan},
};
use plenar_core::{Config, DramaStats, ProtocolDocument, Speech};
use serde::Serialize;
use tracing::{debug, instrument};

/// Everything recovered from one protocol
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedProtocol {
    /// Normalized protocol text; speech spans point into it
    pub text: NormalizedText,
    /// Formal speeches and long unclassified ones, in transcript order
    pub speeches: Vec<Speech>,
    /// Question-time contributions, in transcript order
    pub question_time: Vec<Speech>,
}

impl ParsedProtocol {
    /// Raw body of a speech, annotations included
    #[must_use]
    pub fn raw_body(&self, speech: &Speech) -> &str {
        self.text.get(speech.span.range()).unwrap_or_default()
    }

    /// Total words over the primary speeches
    #[must_use]
    pub fn total_words(&self) -> usize {
        self.speeches.iter().map(|speech| speech.word_count).sum()
    }
}

/// Segments protocols into attributed speeches
#[derive(Debug, Clone)]
pub struct ProtocolParser {
    scanner: BoundaryScanner,
    segmenter: Segmenter,
    drama: DramaExtractor,
}

impl ProtocolParser {
    /// Build a parser from validated configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or a pattern does not compile.
    pub fn new(config: &Config) -> ParserResult<Self> {
        config.validate()?;

        let scanner = BoundaryScanner::new(&config.parser.presiding_titles)?;
        let segmenter = Segmenter::new(&config.parser)?;
        let drama = DramaExtractor::new(&config.drama, segmenter.resolver().clone())?;

        debug!(
            party_patterns = segmenter.resolver().len(),
            speech_rules = segmenter.classifier().len(),
            "Protocol parser ready"
        );

        Ok(Self {
            scanner,
            segmenter,
            drama,
        })
    }

    /// Build a parser with the built-in tables
    ///
    /// # Errors
    ///
    /// Returns an error if a built-in pattern does not compile.
    pub fn with_defaults() -> ParserResult<Self> {
        Self::new(&Config::default())
    }

    /// The boundary scanner
    #[must_use]
    pub const fn scanner(&self) -> &BoundaryScanner {
        &self.scanner
    }

    /// The segmenter
    #[must_use]
    pub const fn segmenter(&self) -> &Segmenter {
        &self.segmenter
    }

    /// The reaction extractor
    #[must_use]
    pub const fn drama_extractor(&self) -> &DramaExtractor {
        &self.drama
    }

    /// Boundaries of both families in normalized text
    #[must_use]
    pub fn boundaries(&self, text: &NormalizedText) -> Vec<Boundary> {
        self.scanner.scan(text)
    }

    /// Raw member-line spans before any filtering
    #[must_use]
    pub fn spans(&self, text: &NormalizedText) -> Vec<SpeechSpan> {
        let boundaries = self.scanner.scan(text);
        self.segmenter.spans(&boundaries, text)
    }

    /// Attributed and classified spans before the retention filter
    #[must_use]
    pub fn candidates(&self, text: &NormalizedText) -> Vec<Candidate> {
        let boundaries = self.scanner.scan(text);
        self.segmenter.candidates(&boundaries, text)
    }

    /// Parse one raw protocol text
    #[must_use]
    pub fn parse(&self, raw: &str) -> ParsedProtocol {
        let text = normalize(raw);
        let boundaries = self.scanner.scan(&text);
        let segmentation = self.segmenter.segment_with_question_time(&boundaries, &text);

        debug!(
            boundaries = boundaries.len(),
            speeches = segmentation.speeches.len(),
            question_time = segmentation.question_time.len(),
            "Parsed protocol"
        );

        ParsedProtocol {
            text,
            speeches: segmentation.speeches,
            question_time: segmentation.question_time,
        }
    }

    /// Parse one protocol document
    #[must_use]
    #[instrument(skip(self, document), fields(id = %document.id))]
    pub fn parse_document(&self, document: &ProtocolDocument) -> ParsedProtocol {
        self.parse(&document.text)
    }

    /// Reaction tallies over the primary speeches of a parsed protocol
    #[must_use]
    pub fn drama(&self, parsed: &ParsedProtocol) -> DramaStats {
        self.drama.extract(&parsed.text, &parsed.speeches)
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use crate::error::ParserError;
    use plenar_core::{CanonicalParty, SpeechType};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    const PROTOCOL: &str = "Plenarprotokoll 21/1\n\
        Präsidentin Julia Klöckner:\n\
        Ich eröffne die Aussprache. Das Wort hat die Kollegin Anna Müller.\n\
        Anna Müller (SPD):\n\
        Sehr geehrte Frau Präsidentin! Liebe Kolleginnen und Kollegen! Wir beraten heute\u{a0}den Haushalt.\n\
        (Beifall bei der SPD sowie bei der CDU/CSU)\n\
        Präsidentin Julia Klöckner:\n\
        Vielen Dank. Nächster Redner ist Jan Berg.\n\
        Jan Berg (AfD):\n\
        Frau Präsidentin! Meine Damen und Herren! Dieser Haushalt ist\u{2013}wie jedes Jahr\u{2013}verfehlt.\n\
        (Anna Müller [SPD]: Das stimmt doch nicht!)\n\
        Präsidentin Julia Klöckner:\n\
        Gestatten Sie eine Zwischenfrage der Kollegin Müller?\n\
        Anna Müller (SPD):\n\
        Herr Kollege, haben Sie den Einzelplan überhaupt gelesen, bevor Sie hier reden?\n";

    fn parser() -> ProtocolParser {
        ProtocolParser::with_defaults().unwrap()
    }

    #[test]
    fn test_parser_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ProtocolParser>();
    }

    #[test]
    fn test_parse_protocol() {
        let parsed = parser().parse(PROTOCOL);

        let summary: Vec<(&str, CanonicalParty, SpeechType)> = parsed
            .speeches
            .iter()
            .map(|speech| (speech.speaker.as_str(), speech.party, speech.speech_type))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Anna Müller", CanonicalParty::Spd, SpeechType::Formal),
                ("Jan Berg", CanonicalParty::Afd, SpeechType::Formal),
            ]
        );
        assert!(parsed.question_time.is_empty());
        assert!(parsed.speeches[0].text.ends_with("Wir beraten heute den Haushalt."));
        assert!(parsed.speeches[1].text.contains("ist-wie jedes Jahr-verfehlt."));
        assert!(!parsed.speeches[1].text.contains("stimmt doch nicht"));
    }

    #[test]
    fn test_candidates_include_filtered_zwischenfrage() {
        let parser = parser();
        let text = normalize(PROTOCOL);

        let candidates = parser.candidates(&text);
        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[2].speech_type, SpeechType::Zwischenfrage);
        assert_eq!(parser.spans(&text).len(), 3);
        assert_eq!(parser.boundaries(&text).len(), 6);
    }

    #[test]
    fn test_drama_over_parsed_protocol() {
        let parser = parser();
        let parsed = parser.parse(PROTOCOL);

        let stats = parser.drama(&parsed);
        assert_eq!(stats.applause_by_party.get(&CanonicalParty::Spd), 1);
        assert_eq!(stats.applause_by_party.get(&CanonicalParty::CduCsu), 1);
        assert_eq!(stats.interrupters.total(), 1);
        assert_eq!(stats.interrupted.most_common(1)[0].0.name, "Jan Berg");
    }

    #[test]
    fn test_raw_body_keeps_annotations() {
        let parsed = parser().parse(PROTOCOL);
        assert!(parsed.raw_body(&parsed.speeches[0]).contains("(Beifall bei der SPD"));
        assert!(parsed.total_words() > 20);
    }

    #[test]
    fn test_invalid_configuration_is_rejected() {
        let mut config = Config::default();
        config.parser.party_patterns.clear();
        assert!(matches!(
            ProtocolParser::new(&config),
            Err(ParserError::Core(plenar_core::Error::Validation { .. }))
        ));

        let mut config = Config::default();
        config.parser.party_patterns[0].pattern = "(".to_string();
        assert!(matches!(
            ProtocolParser::new(&config),
            Err(ParserError::InvalidPattern { table: "party_patterns", index: 0, .. })
        ));
    }

    #[test]
    fn test_empty_input() {
        let parsed = parser().parse("");
        assert!(parsed.speeches.is_empty());
        assert!(parsed.question_time.is_empty());
        assert_eq!(parsed.text.as_str(), "");
    }

    #[test]
    fn test_parse_document() {
        let document = ProtocolDocument::new("21/1", PROTOCOL);
        assert_eq!(parser().parse_document(&document).speeches.len(), 2);
    }

    proptest! {
        #[test]
        fn prop_parse_is_total_and_retains_only_allowed_types(raw in "\\PC{0,600}") {
            let parsed = parser().parse(&raw);
            for speech in &parsed.speeches {
                prop_assert!(
                    speech.speech_type == SpeechType::Formal
                        || (speech.speech_type == SpeechType::Other && speech.word_count >= 500)
                );
            }
            for speech in &parsed.question_time {
                prop_assert!(speech.speech_type.is_question_time());
            }
        }
    }
}
