//! Corpus-level aggregation over many protocols
//!
//! Documents are parsed in parallel, one per rayon task. Results are folded
//! back in input order so that first-seen party order and tally tie-breaks do
//! not depend on thread scheduling.

use crate::parser::{ParsedProtocol, ProtocolParser};
use indexmap::IndexMap;
use plenar_core::{
    CanonicalParty, DramaStats, ProtocolDocument, SpeakerKey, Speech, Tally,
    utils::{ratio, read_protocol},
};
use rayon::prelude::*;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

/// Average speech length of one speaker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeakerAverage {
    /// Speaker and party
    pub speaker: SpeakerKey,
    /// Speeches held
    pub speeches: usize,
    /// Words over all speeches
    pub total_words: usize,
    /// Mean words per speech
    pub average_words: f64,
}

/// Share of a party's speeches held by speakers with a doctorate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AcademicShare {
    /// Party
    pub party: CanonicalParty,
    /// Speeches by speakers titled `Dr`
    pub doctorates: usize,
    /// All speeches of the party
    pub speeches: usize,
    /// `doctorates / speeches`
    pub ratio: f64,
}

/// Aggregated speeches and reactions across many protocols
#[derive(Debug, Clone, Default, Serialize)]
pub struct Corpus {
    /// Primary speeches grouped by party, parties in first-seen order
    pub speeches_by_party: IndexMap<CanonicalParty, Vec<Speech>>,
    /// Primary speeches per speaker
    pub formal_speakers: Tally<SpeakerKey>,
    /// Question-time contributions per speaker
    pub question_speakers: Tally<SpeakerKey>,
    /// Primary speeches per party
    pub speech_counts: Tally<CanonicalParty>,
    /// Reaction tallies over all primary speeches
    pub drama: DramaStats,
    /// Documents that contributed at least one speech
    pub documents: usize,
    /// Documents that could not be read or yielded no speeches
    pub skipped: usize,
}

impl Corpus {
    /// Parse and aggregate in-memory documents
    #[must_use]
    pub fn from_documents(parser: &ProtocolParser, documents: &[ProtocolDocument]) -> Self {
        let analyses: Vec<(String, ParsedProtocol, DramaStats)> = documents
            .par_iter()
            .map(|document| {
                let parsed = parser.parse_document(document);
                let drama = parser.drama(&parsed);
                (document.id.clone(), parsed, drama)
            })
            .collect();

        let mut corpus = Self::default();
        for (id, parsed, drama) in analyses {
            corpus.absorb(&id, parsed, drama);
        }
        corpus.log_totals();
        corpus
    }

    /// Read, parse and aggregate protocol files.
    ///
    /// Unreadable files are logged and counted as skipped.
    #[must_use]
    pub fn from_paths(parser: &ProtocolParser, paths: &[PathBuf]) -> Self {
        let results: Vec<_> = paths
            .par_iter()
            .map(|path| {
                read_protocol(path).map(|document| {
                    let parsed = parser.parse_document(&document);
                    let drama = parser.drama(&parsed);
                    (document.id, parsed, drama)
                })
            })
            .collect();

        let mut corpus = Self::default();
        for (path, result) in paths.iter().zip(results) {
            match result {
                Ok((id, parsed, drama)) => corpus.absorb(&id, parsed, drama),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable protocol");
                    corpus.skipped += 1;
                }
            }
        }
        corpus.log_totals();
        corpus
    }

    fn absorb(&mut self, id: &str, parsed: ParsedProtocol, drama: DramaStats) {
        if parsed.speeches.is_empty() && parsed.question_time.is_empty() {
            warn!(document = id, "No speeches found");
            self.skipped += 1;
            return;
        }

        for speech in &parsed.question_time {
            self.question_speakers
                .increment(SpeakerKey::new(speech.speaker.as_str(), speech.party.label()));
        }

        for speech in parsed.speeches {
            self.formal_speakers
                .increment(SpeakerKey::new(speech.speaker.as_str(), speech.party.label()));
            self.speech_counts.increment(speech.party);
            self.speeches_by_party
                .entry(speech.party)
                .or_default()
                .push(speech);
        }

        self.drama.merge(drama);
        self.documents += 1;
    }

    fn log_totals(&self) {
        info!(
            documents = self.documents,
            skipped = self.skipped,
            speeches = self.speech_count(),
            parties = self.speeches_by_party.len(),
            speakers = self.unique_speakers(),
            "Corpus aggregated"
        );
    }

    /// All primary speeches, grouped by party in first-seen order
    pub fn speeches(&self) -> impl Iterator<Item = &Speech> {
        self.speeches_by_party.values().flatten()
    }

    /// Number of primary speeches
    #[must_use]
    pub fn speech_count(&self) -> usize {
        self.speeches_by_party.values().map(Vec::len).sum()
    }

    /// Words over all primary speeches
    #[must_use]
    pub fn total_words(&self) -> usize {
        self.speeches().map(|speech| speech.word_count).sum()
    }

    /// Speakers with the most primary speeches
    #[must_use]
    pub fn top_speakers(&self, n: usize) -> Vec<(&SpeakerKey, u64)> {
        self.formal_speakers.most_common(n)
    }

    /// Speakers with the most question-time contributions
    #[must_use]
    pub fn top_question_speakers(&self, n: usize) -> Vec<(&SpeakerKey, u64)> {
        self.question_speakers.most_common(n)
    }

    /// Most active speakers of one party
    #[must_use]
    pub fn party_top_speakers(&self, party: CanonicalParty, n: usize) -> Vec<(&SpeakerKey, u64)> {
        let mut speakers: Vec<(&SpeakerKey, u64)> = self
            .formal_speakers
            .iter()
            .filter(|(key, _)| key.party == party.label())
            .collect();
        speakers.sort_by(|a, b| b.1.cmp(&a.1));
        speakers.truncate(n);
        speakers
    }

    /// The most active speaker of a party
    #[must_use]
    pub fn party_champion(&self, party: CanonicalParty) -> Option<(&SpeakerKey, u64)> {
        self.party_top_speakers(party, 1).into_iter().next()
    }

    /// Distinct speakers with at least one primary speech
    #[must_use]
    pub fn unique_speakers(&self) -> usize {
        self.formal_speakers.len()
    }

    /// Longest individual speeches by word count
    #[must_use]
    pub fn marathon_speeches(&self, n: usize) -> Vec<&Speech> {
        let mut speeches: Vec<&Speech> = self.speeches().collect();
        speeches.sort_by(|a, b| b.word_count.cmp(&a.word_count));
        speeches.truncate(n);
        speeches
    }

    fn speaker_averages(&self) -> Vec<SpeakerAverage> {
        let mut totals: IndexMap<SpeakerKey, (usize, usize)> = IndexMap::new();
        for speech in self.speeches() {
            let entry = totals
                .entry(SpeakerKey::new(speech.speaker.as_str(), speech.party.label()))
                .or_default();
            entry.0 += 1;
            entry.1 += speech.word_count;
        }

        totals
            .into_iter()
            .map(|(speaker, (speeches, total_words))| SpeakerAverage {
                speaker,
                speeches,
                total_words,
                average_words: ratio(total_words, speeches),
            })
            .collect()
    }

    /// Speakers with the highest average words per speech, among those with
    /// at least `min_speeches` speeches
    #[must_use]
    pub fn verbose_speakers(&self, n: usize, min_speeches: usize) -> Vec<SpeakerAverage> {
        let mut averages: Vec<SpeakerAverage> = self
            .speaker_averages()
            .into_iter()
            .filter(|average| average.speeches >= min_speeches)
            .collect();
        averages.sort_by(|a, b| b.average_words.total_cmp(&a.average_words));
        averages.truncate(n);
        averages
    }

    /// Speakers with the most words over all their speeches
    #[must_use]
    pub fn wordiest_speakers(&self, n: usize) -> Vec<SpeakerAverage> {
        let mut averages = self.speaker_averages();
        averages.sort_by(|a, b| b.total_words.cmp(&a.total_words));
        averages.truncate(n);
        averages
    }

    /// Parties ranked by the share of speeches held by doctors
    #[must_use]
    pub fn academic_ranking(&self) -> Vec<AcademicShare> {
        let mut ranking: Vec<AcademicShare> = self
            .speeches_by_party
            .iter()
            .map(|(party, speeches)| {
                let doctorates = speeches.iter().filter(|speech| speech.has_doctorate()).count();
                AcademicShare {
                    party: *party,
                    doctorates,
                    speeches: speeches.len(),
                    ratio: ratio(doctorates, speeches.len()),
                }
            })
            .collect();
        ranking.sort_by(|a, b| b.ratio.total_cmp(&a.ratio));
        ranking
    }
}
