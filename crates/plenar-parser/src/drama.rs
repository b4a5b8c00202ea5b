//! Interruption, applause and heckle extraction
//!
//! Works on the raw speech bodies, where the editorial annotations that the
//! segmenter strips are still present:
//!
//! * `(Stephan Brandner [AfD]: Quatsch!)` is an interruption,
//! * `(Beifall bei der SPD sowie bei der CDU/CSU)` is applause from two parties,
//! * `(Zuruf von der AfD: Unsinn!)` is a heckle.

use crate::{
    error::{ParserResult, compile},
    normalize::NormalizedText,
    party::PartyResolver,
};
use plenar_core::{CanonicalParty, DramaConfig, DramaStats, SpeakerKey, Speech};
use regex::Regex;
use serde::Serialize;

const INTERRUPTER_PATTERN: &str = r"\(([A-ZÄÖÜ][^\[\]()]{2,40})\s*\[([^\]]+)\]:[^)]+\)";
const APPLAUSE_PATTERN: &str = r"\(Beifall bei (?:der |dem )?([^)]+)\)";
const HECKLE_PATTERN: &str = r"\(Zurufe? (?:von der |vom |der )?([^)]+)\)";
const COLON_TAIL_PATTERN: &str = r":\s*[^,)]+";
const CONNECTOR_PATTERN: &str = r"\s+(?:sowie|und|-|–|,)\s+";
const BRACKET_PATTERN: &str = r"\[([^\]]+)\]";
const ARTICLE_PATTERN: &str = r"(?:der|dem|des|bei)\s+(\S+)";

/// One reaction found in a speech body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DramaEvent {
    /// A named member interjected during someone else's speech
    Interruption {
        /// Who interjected
        interrupter: SpeakerKey,
        /// Whose speech it was
        interrupted: SpeakerKey,
    },
    /// Applause from a party
    Applause {
        /// Applauding party
        party: CanonicalParty,
    },
    /// Heckling from a party
    Heckle {
        /// Heckling party
        party: CanonicalParty,
    },
}

impl DramaEvent {
    /// Count this event
    pub fn record(self, stats: &mut DramaStats) {
        match self {
            Self::Interruption {
                interrupter,
                interrupted,
            } => {
                stats.interrupters.increment(interrupter);
                stats.interrupted.increment(interrupted);
            }
            Self::Applause { party } => {
                stats.applause_by_party.increment(party);
            }
            Self::Heckle { party } => {
                stats.heckles_by_party.increment(party);
            }
        }
    }
}

/// Pulls reaction events out of speech bodies
#[derive(Debug, Clone)]
pub struct DramaExtractor {
    resolver: PartyResolver,
    interrupter: Regex,
    applause: Regex,
    heckle: Regex,
    colon_tail: Regex,
    connector: Regex,
    bracket: Regex,
    article: Regex,
    noise_words: Vec<String>,
    ignored_name_prefixes: Vec<String>,
}

impl DramaExtractor {
    /// Build an extractor that attributes parties with `resolver`
    ///
    /// # Errors
    ///
    /// Returns an error if an annotation pattern does not compile.
    pub fn new(config: &DramaConfig, resolver: PartyResolver) -> ParserResult<Self> {
        Ok(Self {
            resolver,
            interrupter: compile("interrupter_pattern", 0, INTERRUPTER_PATTERN, false)?,
            applause: compile("applause_pattern", 0, APPLAUSE_PATTERN, false)?,
            heckle: compile("heckle_pattern", 0, HECKLE_PATTERN, false)?,
            colon_tail: compile("party_list", 0, COLON_TAIL_PATTERN, false)?,
            connector: compile("party_list", 1, CONNECTOR_PATTERN, false)?,
            bracket: compile("party_list", 2, BRACKET_PATTERN, false)?,
            article: compile("party_list", 3, ARTICLE_PATTERN, false)?,
            noise_words: config.noise_words.clone(),
            ignored_name_prefixes: config
                .ignored_name_prefixes
                .iter()
                .filter(|prefix| !prefix.is_empty())
                .cloned()
                .collect(),
        })
    }

    /// Build an extractor with built-in settings and party table
    ///
    /// # Errors
    ///
    /// Returns an error if a built-in pattern does not compile.
    pub fn with_defaults() -> ParserResult<Self> {
        Self::new(&DramaConfig::default(), PartyResolver::with_defaults()?)
    }

    /// Parties named in an applause or heckle annotation.
    ///
    /// Quoted heckle content after a colon is dropped, the rest is split on
    /// connectors and each segment is resolved on its own: directly, then via
    /// a bracketed label, then via the word after an article.
    #[must_use]
    pub fn parties_in(&self, annotation: &str) -> Vec<CanonicalParty> {
        let without_quotes = self.colon_tail.replace_all(annotation, "");

        self.connector
            .split(&without_quotes)
            .filter_map(|segment| self.resolve_segment(segment.trim()))
            .collect()
    }

    fn resolve_segment(&self, segment: &str) -> Option<CanonicalParty> {
        if let Some(party) = self.resolver.resolve(segment) {
            return Some(party);
        }

        if let Some(label) = self.bracket.captures(segment).and_then(|caps| caps.get(1))
            && let Some(party) = self.resolver.resolve(label.as_str())
        {
            return Some(party);
        }

        self.article
            .captures(segment)
            .and_then(|caps| caps.get(1))
            .and_then(|word| self.resolver.resolve(word.as_str()))
    }

    /// Lower-cased final name token after removing ignored prefixes
    fn last_name_key(&self, name: &str) -> String {
        let mut cleaned = name.to_string();
        for prefix in &self.ignored_name_prefixes {
            cleaned = cleaned.replace(prefix.as_str(), "");
        }
        cleaned
            .split_whitespace()
            .next_back()
            .map(str::to_lowercase)
            .unwrap_or_default()
    }

    fn is_noise(&self, name: &str) -> bool {
        self.noise_words.iter().any(|word| name.contains(word.as_str()))
    }

    /// All events in one raw speech body.
    ///
    /// Interruptions come first, then applause, then heckles, each in text
    /// order. Interjections by someone sharing the speaker's last name are the
    /// speaker's own replies and are skipped.
    #[must_use]
    pub fn events(&self, body: &str, speaker: &str, party: CanonicalParty) -> Vec<DramaEvent> {
        let mut events = Vec::new();
        let speaker_key = self.last_name_key(speaker);

        for caps in self.interrupter.captures_iter(body) {
            let (Some(name), Some(raw_party)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            let name = name.as_str().trim();
            if self.is_noise(name) || self.last_name_key(name) == speaker_key {
                continue;
            }

            let raw_party = raw_party.as_str().trim();
            let interrupter_party = self
                .resolver
                .resolve(raw_party)
                .map_or_else(|| raw_party.to_string(), |resolved| resolved.label().to_string());

            events.push(DramaEvent::Interruption {
                interrupter: SpeakerKey::new(name, interrupter_party),
                interrupted: SpeakerKey::new(speaker, party.label()),
            });
        }

        for caps in self.applause.captures_iter(body) {
            if let Some(list) = caps.get(1) {
                events.extend(
                    self.parties_in(list.as_str().trim())
                        .into_iter()
                        .map(|party| DramaEvent::Applause { party }),
                );
            }
        }

        for caps in self.heckle.captures_iter(body) {
            if let Some(list) = caps.get(1) {
                events.extend(
                    self.parties_in(list.as_str().trim())
                        .into_iter()
                        .map(|party| DramaEvent::Heckle { party }),
                );
            }
        }

        events
    }

    /// Tallies for one raw speech body
    #[must_use]
    pub fn tally_body(&self, body: &str, speaker: &str, party: CanonicalParty) -> DramaStats {
        let mut stats = DramaStats::default();
        for event in self.events(body, speaker, party) {
            event.record(&mut stats);
        }
        stats
    }

    /// Tallies over the raw bodies of segmented speeches
    #[must_use]
    pub fn extract(&self, text: &NormalizedText, speeches: &[Speech]) -> DramaStats {
        let mut stats = DramaStats::default();
        for speech in speeches {
            let body = text.get(speech.span.range()).unwrap_or_default();
            for event in self.events(body, &speech.speaker, speech.party) {
                event.record(&mut stats);
            }
        }
        stats
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn extractor() -> DramaExtractor {
        DramaExtractor::with_defaults().unwrap()
    }

    #[rstest]
    #[case("SPD sowie bei der CDU/CSU", vec![CanonicalParty::Spd, CanonicalParty::CduCsu])]
    #[case("der AfD und der CDU/CSU", vec![CanonicalParty::Afd, CanonicalParty::CduCsu])]
    #[case("AfD: Das ist doch Unsinn!", vec![CanonicalParty::Afd])]
    #[case("des Abg. Dr. Ralf Stegner [SPD]", vec![CanonicalParty::Spd])]
    #[case("Abgeordneten der SPD - Zuruf von der AfD", vec![CanonicalParty::Spd, CanonicalParty::Afd])]
    #[case("Abgeordneten des BSW", vec![CanonicalParty::Bsw])]
    #[case("BÜNDNIS 90/DIE GRÜNEN sowie des Abg. Stefan Seidler [fraktionslos]", vec![CanonicalParty::Gruene, CanonicalParty::Fraktionslos])]
    #[case("im ganzen Hause", vec![])]
    fn test_parties_in(#[case] annotation: &str, #[case] expected: Vec<CanonicalParty>) {
        assert_eq!(extractor().parties_in(annotation), expected);
    }

    #[test]
    fn test_multi_party_applause_counts_each_party_once() {
        let stats = extractor().tally_body(
            "Wir handeln. (Beifall bei der SPD sowie bei der CDU/CSU) Danke.",
            "Anna Müller",
            CanonicalParty::Spd,
        );

        assert_eq!(stats.applause_by_party.get(&CanonicalParty::Spd), 1);
        assert_eq!(stats.applause_by_party.get(&CanonicalParty::CduCsu), 1);
        assert_eq!(stats.applause_by_party.total(), 2);
    }

    #[test]
    fn test_heckles() {
        let stats = extractor().tally_body(
            "Erstens. (Zuruf von der AfD: Unsinn!) Zweitens. (Zurufe vom BÜNDNIS 90/DIE GRÜNEN)",
            "Anna Müller",
            CanonicalParty::Spd,
        );

        assert_eq!(stats.heckles_by_party.get(&CanonicalParty::Afd), 1);
        assert_eq!(stats.heckles_by_party.get(&CanonicalParty::Gruene), 1);
    }

    #[test]
    fn test_interruption() {
        let stats = extractor().tally_body(
            "Das ist richtig. (Stephan Brandner [AfD]: Quatsch!) Doch.",
            "Dr. Hans Schmidt",
            CanonicalParty::CduCsu,
        );

        assert_eq!(
            stats.top_interrupters(1),
            vec![(&SpeakerKey::new("Stephan Brandner", "AfD"), 1)]
        );
        assert_eq!(
            stats.most_interrupted(1),
            vec![(&SpeakerKey::new("Dr. Hans Schmidt", "CDU/CSU"), 1)]
        );
    }

    #[test]
    fn test_interrupter_party_is_canonicalized() {
        let events = extractor().events(
            "Text (Heidi Reichinnek [Die Linke]: Hört, hört!) Text",
            "Jan Berg",
            CanonicalParty::Afd,
        );

        assert_eq!(
            events,
            vec![DramaEvent::Interruption {
                interrupter: SpeakerKey::new("Heidi Reichinnek", "DIE LINKE"),
                interrupted: SpeakerKey::new("Jan Berg", "AfD"),
            }]
        );
    }

    #[test]
    fn test_unresolved_interrupter_party_is_kept_as_printed() {
        let events = extractor().events(
            "Text (Karl Muster [Gast]: Richtig!) Text",
            "Jan Berg",
            CanonicalParty::Afd,
        );

        assert!(matches!(
            &events[..],
            [DramaEvent::Interruption { interrupter, .. }] if interrupter.party == "Gast"
        ));
    }

    #[test]
    fn test_interrupter_with_numbered_party_label() {
        let stats = extractor().tally_body(
            "Text. (Britta Haßelmann [BÜNDNIS 90/DIE GRÜNEN]: Das ist falsch!) Weiter.",
            "Jan Berg",
            CanonicalParty::Afd,
        );

        assert_eq!(stats.interrupters.get(&SpeakerKey::new("Britta Haßelmann", "GRÜNE")), 1);
        assert_eq!(stats.interrupted.get(&SpeakerKey::new("Jan Berg", "AfD")), 1);
    }

    #[test]
    fn test_interruption_right_after_applause() {
        let stats = extractor().tally_body(
            "Wir handeln.\n(Beifall bei der AfD)\n(Stephan Brandner [AfD]: Genau!)\nWeiter.",
            "Jan Berg",
            CanonicalParty::Afd,
        );

        assert_eq!(stats.interrupters.get(&SpeakerKey::new("Stephan Brandner", "AfD")), 1);
        assert_eq!(stats.applause_by_party.get(&CanonicalParty::Afd), 1);
    }

    #[test]
    fn test_self_interruption_is_skipped() {
        let stats = extractor().tally_body(
            "Ich sage es noch einmal. (Dr. Hans Schmidt [CDU/CSU]: Genau!) Weiter.",
            "Prof. Dr. Hans Schmidt",
            CanonicalParty::CduCsu,
        );

        assert!(stats.interrupters.is_empty());
        assert!(stats.interrupted.is_empty());
    }

    #[test]
    fn test_self_interruption_ignores_case() {
        let stats = extractor().tally_body(
            "Text (Hans SCHMIDT [CDU/CSU]: Genau!) Text",
            "Hans Schmidt",
            CanonicalParty::CduCsu,
        );

        assert!(stats.interrupters.is_empty());
    }

    #[test]
    fn test_noise_names_are_skipped() {
        let stats = extractor().tally_body(
            "Text (Heiterkeit bei Abgeordneten [SPD]: Oh!) Text",
            "Jan Berg",
            CanonicalParty::Afd,
        );

        assert!(stats.interrupters.is_empty());
    }

    #[test]
    fn test_event_order() {
        let events = extractor().events(
            "(Zuruf von der SPD: Nein!) Text. (Beifall bei der AfD) Und weiter sage ich Ihnen ganz deutlich: (Eva Roth [FDP]: Ja!)",
            "Jan Berg",
            CanonicalParty::Afd,
        );

        assert!(matches!(
            &events[..],
            [
                DramaEvent::Interruption { .. },
                DramaEvent::Applause { party: CanonicalParty::Afd },
                DramaEvent::Heckle { party: CanonicalParty::Spd },
            ]
        ));
    }

    #[test]
    fn test_extract_uses_speech_spans() {
        let text = crate::normalize::normalize("(Beifall bei der SPD)\nRede (Beifall bei der AfD)\n");
        let speech = Speech {
            speaker: "Jan Berg".to_string(),
            party: CanonicalParty::Afd,
            text: "Rede".to_string(),
            speech_type: plenar_core::SpeechType::Formal,
            word_count: 1,
            first_name: "Jan".to_string(),
            last_name: "Berg".to_string(),
            academic_title: None,
            span: plenar_core::TextSpan::new(22, text.len()),
        };

        let stats = extractor().extract(&text, &[speech]);
        assert_eq!(stats.applause_by_party.get(&CanonicalParty::Afd), 1);
        assert_eq!(stats.applause_by_party.get(&CanonicalParty::Spd), 0);
    }
}
