//! Speech segmentation
//!
//! Every member line opens a span that runs to the next boundary of either
//! family (or the end of the text). Spans are cleaned, attributed, classified
//! and then filtered into the primary speech list and the question-time
//! channel.

use crate::{
    boundary::Boundary,
    classify::SpeechClassifier,
    error::{ParserResult, compile},
    names::NameDecomposer,
    normalize::NormalizedText,
    party::PartyResolver,
};
use plenar_core::{
    CanonicalParty, ParserConfig, Speech, SpeechType, TextSpan,
    utils::{char_count, char_window_start, word_count},
};
use regex::Regex;
use serde::Serialize;
use tracing::trace;

const PARENTHETICAL_PATTERN: &str = r"\([^)]+\)";

/// Raw body of one member line, before any filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpeechSpan {
    /// Index of the opening boundary in the scanned boundary list
    pub boundary_index: usize,
    /// Body location in the normalized text
    pub span: TextSpan,
}

/// An attributed and classified span, before the retention filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    /// Index of the opening boundary in the scanned boundary list
    pub boundary_index: usize,
    /// Speaker label as printed
    pub speaker: String,
    /// Resolved party
    pub party: CanonicalParty,
    /// Body with parenthesized annotations removed and whitespace collapsed
    pub text: String,
    /// Classification of the preceding context
    pub speech_type: SpeechType,
    /// Whitespace-delimited tokens in `text`
    pub word_count: usize,
    /// Raw body location in the normalized text
    pub span: TextSpan,
}

/// Segmenter output: primary speeches and the question-time channel
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Segmentation {
    /// Formal speeches and long unclassified ones, in transcript order
    pub speeches: Vec<Speech>,
    /// Question-time contributions, in transcript order
    pub question_time: Vec<Speech>,
}

/// Turns a boundary list into speech records
#[derive(Debug, Clone)]
pub struct Segmenter {
    resolver: PartyResolver,
    classifier: SpeechClassifier,
    names: NameDecomposer,
    parenthetical: Regex,
    min_speech_chars: usize,
    context_chars: usize,
    min_other_words: usize,
    excluded_label_markers: Vec<String>,
}

impl Segmenter {
    /// Build a segmenter from parser configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a configured pattern does not compile.
    pub fn new(config: &ParserConfig) -> ParserResult<Self> {
        Ok(Self {
            resolver: PartyResolver::new(&config.party_patterns)?,
            classifier: SpeechClassifier::new(&config.speech_rules)?,
            names: NameDecomposer::new(&config.academic_titles),
            parenthetical: compile("parenthetical", 0, PARENTHETICAL_PATTERN, false)?,
            min_speech_chars: config.min_speech_chars,
            context_chars: config.context_chars,
            min_other_words: config.min_other_words,
            excluded_label_markers: config
                .excluded_label_markers
                .iter()
                .filter(|marker| !marker.is_empty())
                .cloned()
                .collect(),
        })
    }

    /// The party resolver used for attribution
    #[must_use]
    pub const fn resolver(&self) -> &PartyResolver {
        &self.resolver
    }

    /// The classifier used for preceding contexts
    #[must_use]
    pub const fn classifier(&self) -> &SpeechClassifier {
        &self.classifier
    }

    /// The name decomposer used for speaker labels
    #[must_use]
    pub const fn names(&self) -> &NameDecomposer {
        &self.names
    }

    /// Remove parenthesized annotations and collapse whitespace
    #[must_use]
    pub fn strip_parenthetical(&self, body: &str) -> String {
        let stripped = self.parenthetical.replace_all(body, "");
        stripped.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Body spans of all member lines.
    ///
    /// A span runs from the end of its boundary to the start of the next one,
    /// or to the end of the text. Presiding-officer lines never open a span.
    /// When the next boundary starts inside the current one the span is empty.
    #[must_use]
    pub fn spans(&self, boundaries: &[Boundary], text: &NormalizedText) -> Vec<SpeechSpan> {
        boundaries
            .iter()
            .enumerate()
            .filter(|(_, boundary)| boundary.is_speaker())
            .map(|(index, boundary)| {
                let next_start = boundaries
                    .get(index + 1)
                    .map_or(text.len(), |next| next.start);
                SpeechSpan {
                    boundary_index: index,
                    span: TextSpan::new(boundary.end, next_start.max(boundary.end)),
                }
            })
            .collect()
    }

    /// Attributed and classified spans, before the retention filter.
    ///
    /// Drops labels carrying an excluded marker, bodies shorter than the
    /// character minimum after cleaning, and unresolvable party labels.
    #[must_use]
    pub fn candidates(&self, boundaries: &[Boundary], text: &NormalizedText) -> Vec<Candidate> {
        self.spans(boundaries, text)
            .into_iter()
            .filter_map(|speech_span| {
                let boundary = boundaries.get(speech_span.boundary_index)?;
                self.candidate(boundary, speech_span, text)
            })
            .collect()
    }

    fn candidate(
        &self,
        boundary: &Boundary,
        speech_span: SpeechSpan,
        text: &NormalizedText,
    ) -> Option<Candidate> {
        let speaker = boundary.raw_speaker_label.as_str();

        // Chair lines printed with a party label match the member-line form
        // whenever the name is too long for the presiding-officer pattern.
        // Their remarks must not count as a speech for that party.
        if let Some(marker) = self
            .excluded_label_markers
            .iter()
            .find(|marker| speaker.contains(marker.as_str()))
        {
            trace!(speaker, marker = %marker, "Skipping excluded speaker label");
            return None;
        }

        let body = text.get(speech_span.span.range()).unwrap_or_default();
        let cleaned = self.strip_parenthetical(body);
        let chars = char_count(&cleaned);
        if chars < self.min_speech_chars {
            trace!(speaker, chars, "Dropping short span");
            return None;
        }

        let raw_party = boundary.raw_party_label.as_deref().unwrap_or_default();
        let Some(party) = self.resolver.resolve(raw_party) else {
            trace!(speaker, raw_party, "Dropping span with unresolvable party");
            return None;
        };

        let context_start = char_window_start(text, boundary.start, self.context_chars);
        let context = text.get(context_start..boundary.start).unwrap_or_default();
        let speech_type = self.classifier.classify(context);

        Some(Candidate {
            boundary_index: speech_span.boundary_index,
            speaker: speaker.to_string(),
            party,
            word_count: word_count(&cleaned),
            text: cleaned,
            speech_type,
            span: speech_span.span,
        })
    }

    /// Whether a candidate belongs in the primary speech list
    #[must_use]
    pub fn is_retained(&self, candidate: &Candidate) -> bool {
        match candidate.speech_type {
            SpeechType::Formal => true,
            SpeechType::Other => candidate.word_count >= self.min_other_words,
            _ => false,
        }
    }

    /// Build a speech record from a candidate
    #[must_use]
    pub fn to_speech(&self, candidate: Candidate) -> Speech {
        let name = self.names.decompose(&candidate.speaker);
        Speech {
            speaker: candidate.speaker,
            party: candidate.party,
            text: candidate.text,
            speech_type: candidate.speech_type,
            word_count: candidate.word_count,
            first_name: name.first_name,
            last_name: name.last_name,
            academic_title: name.academic_title,
            span: candidate.span,
        }
    }

    /// Primary speech list in transcript order
    #[must_use]
    pub fn segment(&self, boundaries: &[Boundary], text: &NormalizedText) -> Vec<Speech> {
        self.segment_with_question_time(boundaries, text).speeches
    }

    /// Primary speeches plus the question-time channel
    #[must_use]
    pub fn segment_with_question_time(
        &self,
        boundaries: &[Boundary],
        text: &NormalizedText,
    ) -> Segmentation {
        let mut segmentation = Segmentation::default();

        for candidate in self.candidates(boundaries, text) {
            if self.is_retained(&candidate) {
                segmentation.speeches.push(self.to_speech(candidate));
            } else if candidate.speech_type.is_question_time() {
                segmentation.question_time.push(self.to_speech(candidate));
            } else {
                trace!(
                    speaker = %candidate.speaker,
                    speech_type = %candidate.speech_type,
                    words = candidate.word_count,
                    "Filtering non-speech candidate"
                );
            }
        }

        segmentation
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use crate::{
        boundary::{BoundaryKind, BoundaryScanner},
        normalize::normalize,
    };
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    const FLOOR: &str = "Das Wort hat nun die Kollegin.";
    const BODY: &str = "Sehr geehrte Frau Präsidentin! Meine Damen und Herren! Wir beraten heute.";

    fn segmenter() -> Segmenter {
        Segmenter::new(&ParserConfig::default()).unwrap()
    }

    fn run(raw: &str) -> (NormalizedText, Vec<Boundary>) {
        let text = normalize(raw);
        let boundaries = BoundaryScanner::with_defaults().unwrap().scan(&text);
        (text, boundaries)
    }

    #[test]
    fn test_strip_parenthetical() {
        let cleaned = segmenter().strip_parenthetical(
            "Wir handeln.\n(Beifall bei der SPD)\nUnd zwar (Zuruf von der AfD: Nein!) jetzt.",
        );
        assert_eq!(cleaned, "Wir handeln. Und zwar jetzt.");
    }

    #[test]
    fn test_strip_parenthetical_unbalanced() {
        let segmenter = segmenter();
        assert_eq!(segmenter.strip_parenthetical("a (b (c) d) e"), "a d) e");
        assert_eq!(segmenter.strip_parenthetical("a () b"), "a () b");
    }

    #[test]
    fn test_spans_cover_gaps_between_boundaries() {
        let raw = format!(
            "{FLOOR}\nAnna Müller (SPD):\n{BODY}\nJan Berg (AfD):\n{BODY}\nEva Roth (FDP):\n{BODY}"
        );
        let (text, boundaries) = run(&raw);
        assert_eq!(boundaries.len(), 3);

        let spans = segmenter().spans(&boundaries, &text);
        let expected = vec![
            TextSpan::new(boundaries[0].end, boundaries[1].start),
            TextSpan::new(boundaries[1].end, boundaries[2].start),
            TextSpan::new(boundaries[2].end, text.len()),
        ];
        assert_eq!(
            spans.iter().map(|s| s.span).collect::<Vec<_>>(),
            expected
        );
    }

    #[test]
    fn test_presiding_lines_only_terminate() {
        let raw = format!(
            "{FLOOR}\nAnna Müller (SPD):\n{BODY}\nPräsidentin Julia Klöckner:\nDanke. {BODY}\n"
        );
        let (text, boundaries) = run(&raw);
        assert_eq!(boundaries[1].kind, BoundaryKind::PresidingOfficer);

        let spans = segmenter().spans(&boundaries, &text);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].span.end, boundaries[1].start);

        let speeches = segmenter().segment(&boundaries, &text);
        assert_eq!(speeches.len(), 1);
        assert!(!speeches[0].text.contains("Danke"));
    }

    #[test]
    fn test_formal_speech_record() {
        let raw = format!("{FLOOR}\nDr. Hans Schmidt (CDU/CSU):\n{BODY}\n(Beifall bei der CDU/CSU)\n");
        let (text, boundaries) = run(&raw);

        let speeches = segmenter().segment(&boundaries, &text);
        assert_eq!(speeches.len(), 1);

        let speech = &speeches[0];
        assert_eq!(speech.speaker, "Dr. Hans Schmidt");
        assert_eq!(speech.party, CanonicalParty::CduCsu);
        assert_eq!(speech.speech_type, SpeechType::Formal);
        assert_eq!(speech.text, BODY);
        assert_eq!(speech.word_count, 11);
        assert_eq!(speech.first_name, "Hans");
        assert_eq!(speech.last_name, "Schmidt");
        assert_eq!(speech.academic_title.as_deref(), Some("Dr"));
        assert!(text[speech.span.range()].contains("(Beifall bei der CDU/CSU)"));
    }

    #[test]
    fn test_unresolvable_party_is_dropped() {
        let raw = format!("{FLOOR}\nAnna Müller (Bundesregierung):\n{BODY}\n");
        let (text, boundaries) = run(&raw);

        assert_eq!(boundaries.len(), 1);
        assert!(segmenter().candidates(&boundaries, &text).is_empty());
    }

    #[test]
    fn test_excluded_label_is_skipped_but_terminates() {
        let raw = format!(
            "{FLOOR}\nAnna Müller (SPD):\n{BODY}\nVizepräsident Wolfgang Kubicki (FDP):\n{BODY}\n"
        );
        let (text, boundaries) = run(&raw);

        let speeches = segmenter().segment(&boundaries, &text);
        assert_eq!(speeches.len(), 1);
        assert_eq!(speeches[0].speaker, "Anna Müller");
        assert_eq!(speeches[0].text, BODY);
    }

    #[test]
    fn test_chair_line_with_party_label_is_not_a_speech() {
        let raw = format!(
            "{FLOOR}\nAnna Müller (SPD):\n{BODY}\n\
             Vizepräsidentin Katrin Dagmar Göring-Eckardt (BÜNDNIS 90/DIE GRÜNEN):\n\
             Vielen Dank. Das Wort hat nun die Kollegin Eva Roth. {BODY}\n\
             Eva Roth (FDP):\n{BODY}\n"
        );
        let (text, boundaries) = run(&raw);
        assert_eq!(boundaries.len(), 3);
        assert!(boundaries.iter().all(Boundary::is_speaker));

        let speeches = segmenter().segment(&boundaries, &text);
        let speakers: Vec<(&str, CanonicalParty)> = speeches
            .iter()
            .map(|speech| (speech.speaker.as_str(), speech.party))
            .collect();
        assert_eq!(
            speakers,
            vec![("Anna Müller", CanonicalParty::Spd), ("Eva Roth", CanonicalParty::Fdp)]
        );
        assert_eq!(speeches[0].text, BODY);
    }

    #[test]
    fn test_context_is_limited_to_preceding_window() {
        let filler = "x".repeat(450);
        let raw = format!("{FLOOR}{filler}\nAnna Müller (SPD):\n{BODY}\n");
        let (text, boundaries) = run(&raw);

        let candidates = segmenter().candidates(&boundaries, &text);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].speech_type, SpeechType::Other);
        assert!(segmenter().segment(&boundaries, &text).is_empty());
    }

    #[test]
    fn test_context_window_counts_characters() {
        let filler = "ü".repeat(360);
        let raw = format!("{FLOOR}{filler}\nAnna Müller (SPD):\n{BODY}\n");
        let (text, boundaries) = run(&raw);

        let candidates = segmenter().candidates(&boundaries, &text);
        assert_eq!(candidates[0].speech_type, SpeechType::Formal);
    }

    #[test]
    fn test_long_unclassified_speech_is_kept() {
        let long_body = "Wort ".repeat(500);
        let raw = format!("Beginn der Sitzung\nAnna Müller (SPD):\n{long_body}\n");
        let (text, boundaries) = run(&raw);

        let speeches = segmenter().segment(&boundaries, &text);
        assert_eq!(speeches.len(), 1);
        assert_eq!(speeches[0].speech_type, SpeechType::Other);
        assert_eq!(speeches[0].word_count, 500);

        let short_body = "Wort ".repeat(499);
        let raw = format!("Beginn der Sitzung\nAnna Müller (SPD):\n{short_body}\n");
        let (text, boundaries) = run(&raw);
        assert!(segmenter().segment(&boundaries, &text).is_empty());
    }

    #[test]
    fn test_question_time_channel() {
        let raw = format!(
            "Wir kommen zur Fragestunde.\nAnna Müller (SPD):\n{BODY}\n\
             Gibt es eine Nachfrage?\nJan Berg (AfD):\n{BODY}\n\
             Kurzintervention.\nEva Roth (FDP):\n{BODY}\n"
        );
        let (text, boundaries) = run(&raw);

        let segmentation = segmenter().segment_with_question_time(&boundaries, &text);
        assert!(segmentation.speeches.is_empty());

        let types: Vec<SpeechType> = segmentation
            .question_time
            .iter()
            .map(|speech| speech.speech_type)
            .collect();
        assert_eq!(types, vec![SpeechType::Fragestunde, SpeechType::Question]);
    }

    #[test]
    fn test_overlapping_boundaries_yield_empty_span() {
        let raw = format!("{FLOOR}\nPräsident Max Mustermann (CDU/CSU):\n{BODY}\n");
        let (text, boundaries) = run(&raw);
        assert_eq!(boundaries.len(), 2);

        let spans = segmenter().spans(&boundaries, &text);
        assert_eq!(spans.len(), 1);
        assert!(spans[0].span.is_empty());
        assert!(segmenter().segment(&boundaries, &text).is_empty());
    }

    proptest! {
        #[test]
        fn prop_spans_never_overlap(raw in "(\\n[A-Z][a-z]{2,8} [A-Z][a-z]{2,8} \\((SPD|AfD|FDP)\\):\\n[a-z ]{0,40}){0,6}") {
            let (text, boundaries) = run(&raw);
            let spans = segmenter().spans(&boundaries, &text);
            for pair in spans.windows(2) {
                prop_assert!(pair[0].span.end <= pair[1].span.start);
            }
            for span in &spans {
                prop_assert!(span.span.start <= span.span.end);
                prop_assert!(span.span.end <= text.len());
            }
        }

        #[test]
        fn prop_segment_is_total(raw in "\\PC{0,400}") {
            let (text, boundaries) = run(&raw);
            let segmentation = segmenter().segment_with_question_time(&boundaries, &text);
            for speech in &segmentation.speeches {
                prop_assert!(char_count(&speech.text) >= 50);
            }
        }
    }
}
