//! Report shapes and their text rendering

use plenar_core::{CanonicalParty, SpeakerKey, Speech, SpeechMetadata};
use plenar_parser::{AcademicShare, Corpus, ParsedProtocol, SpeakerAverage};
use serde::Serialize;
use std::{fmt::Write as _, io::Write};

/// One speech in `parse` output, with or without its body
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SpeechView<'a> {
    /// Full record including text
    Full(&'a Speech),
    /// Text-free record
    Metadata(SpeechMetadata),
}

impl<'a> SpeechView<'a> {
    fn new(speech: &'a Speech, with_text: bool) -> Self {
        if with_text {
            Self::Full(speech)
        } else {
            Self::Metadata(speech.metadata())
        }
    }
}

/// `parse` output for one protocol
#[derive(Debug, Serialize)]
pub struct DocumentReport<'a> {
    /// Document id
    pub id: &'a str,
    /// Primary speeches
    pub speeches: Vec<SpeechView<'a>>,
    /// Question-time contributions, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_time: Option<Vec<SpeechView<'a>>>,
}

impl<'a> DocumentReport<'a> {
    /// Build the report for one parsed protocol
    #[must_use]
    pub fn new(
        id: &'a str,
        parsed: &'a ParsedProtocol,
        with_text: bool,
        question_time: bool,
    ) -> Self {
        let view = |speeches: &'a [Speech]| {
            speeches
                .iter()
                .map(|speech| SpeechView::new(speech, with_text))
                .collect::<Vec<_>>()
        };
        Self {
            id,
            speeches: view(&parsed.speeches),
            question_time: question_time.then(|| view(&parsed.question_time)),
        }
    }
}

/// A speaker with a count
#[derive(Debug, Serialize)]
pub struct SpeakerCount<'a> {
    /// Speaker and party
    #[serde(flatten)]
    pub speaker: &'a SpeakerKey,
    /// Occurrences
    pub count: u64,
}

/// A party with a count
#[derive(Debug, Serialize)]
pub struct PartyCount {
    /// Party
    pub party: CanonicalParty,
    /// Occurrences
    pub count: u64,
}

fn speaker_counts(entries: Vec<(&SpeakerKey, u64)>) -> Vec<SpeakerCount<'_>> {
    entries
        .into_iter()
        .map(|(speaker, count)| SpeakerCount { speaker, count })
        .collect()
}

fn party_counts(entries: Vec<(&CanonicalParty, u64)>) -> Vec<PartyCount> {
    entries
        .into_iter()
        .map(|(party, count)| PartyCount {
            party: *party,
            count,
        })
        .collect()
}

/// `drama` output
#[derive(Debug, Serialize)]
pub struct DramaReport<'a> {
    /// Protocols that contributed speeches
    pub documents: usize,
    /// Protocols that were unreadable or empty
    pub skipped: usize,
    /// Members who interrupt the most
    pub top_interrupters: Vec<SpeakerCount<'a>>,
    /// Speakers interrupted the most
    pub most_interrupted: Vec<SpeakerCount<'a>>,
    /// Parties by applause
    pub applause: Vec<PartyCount>,
    /// Parties by heckles
    pub heckles: Vec<PartyCount>,
}

impl<'a> DramaReport<'a> {
    /// Rankings of the top `n` entries each
    #[must_use]
    pub fn new(corpus: &'a Corpus, n: usize) -> Self {
        Self {
            documents: corpus.documents,
            skipped: corpus.skipped,
            top_interrupters: speaker_counts(corpus.drama.top_interrupters(n)),
            most_interrupted: speaker_counts(corpus.drama.most_interrupted(n)),
            applause: party_counts(corpus.drama.applause_ranking(n)),
            heckles: party_counts(corpus.drama.heckle_ranking(n)),
        }
    }
}

/// The most active speaker of one party
#[derive(Debug, Serialize)]
pub struct Champion<'a> {
    /// Party
    pub party: CanonicalParty,
    /// Speaker and speech count
    #[serde(flatten)]
    pub speaker: SpeakerCount<'a>,
}

/// A long speech
#[derive(Debug, Serialize)]
pub struct Marathon<'a> {
    /// Speaker as printed
    pub speaker: &'a str,
    /// Party
    pub party: CanonicalParty,
    /// Words in the speech
    pub words: usize,
}

/// `speakers` output
#[derive(Debug, Serialize)]
pub struct SpeakersReport<'a> {
    /// Protocols that contributed speeches
    pub documents: usize,
    /// Primary speeches
    pub speeches: usize,
    /// Distinct speakers
    pub unique_speakers: usize,
    /// Speakers with the most speeches
    pub top_speakers: Vec<SpeakerCount<'a>>,
    /// Speakers with the most question-time contributions
    pub question_time: Vec<SpeakerCount<'a>>,
    /// Most active speaker per party
    pub champions: Vec<Champion<'a>>,
    /// Longest speeches
    pub marathon: Vec<Marathon<'a>>,
    /// Highest average words per speech
    pub verbose: Vec<SpeakerAverage>,
    /// Most words over all speeches
    pub wordiest: Vec<SpeakerAverage>,
    /// Share of speeches by doctors per party
    pub academic: Vec<AcademicShare>,
}

impl<'a> SpeakersReport<'a> {
    /// Rankings of the top `n` entries each
    #[must_use]
    pub fn new(corpus: &'a Corpus, n: usize, min_speeches: usize) -> Self {
        Self {
            documents: corpus.documents,
            speeches: corpus.speech_count(),
            unique_speakers: corpus.unique_speakers(),
            top_speakers: speaker_counts(corpus.top_speakers(n)),
            question_time: speaker_counts(corpus.top_question_speakers(n)),
            champions: corpus
                .speeches_by_party
                .keys()
                .filter_map(|party| {
                    corpus.party_champion(*party).map(|(speaker, count)| Champion {
                        party: *party,
                        speaker: SpeakerCount { speaker, count },
                    })
                })
                .collect(),
            marathon: corpus
                .marathon_speeches(n)
                .into_iter()
                .map(|speech| Marathon {
                    speaker: &speech.speaker,
                    party: speech.party,
                    words: speech.word_count,
                })
                .collect(),
            verbose: corpus.verbose_speakers(n, min_speeches),
            wordiest: corpus.wordiest_speakers(n),
            academic: corpus.academic_ranking(),
        }
    }
}

/// Render one protocol as summary lines
#[must_use]
pub fn document_summary(report: &DocumentReport<'_>, parsed: &ParsedProtocol) -> String {
    let mut text = format!(
        "{}: {} speeches, {} question time, {} words\n",
        report.id,
        parsed.speeches.len(),
        parsed.question_time.len(),
        parsed.total_words()
    );

    let per_party: plenar_core::Tally<CanonicalParty> =
        parsed.speeches.iter().map(|speech| speech.party).collect();
    for (party, count) in per_party.most_common(per_party.len()) {
        let _ = writeln!(text, "  {:<14}{count:>5}", party.label());
    }
    text
}

fn section(out: &mut dyn Write, title: &str) -> std::io::Result<()> {
    writeln!(out, "\n{title}")?;
    writeln!(out, "{}", "-".repeat(title.chars().count()))
}

fn speaker_lines(out: &mut dyn Write, entries: &[SpeakerCount<'_>]) -> std::io::Result<()> {
    if entries.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for (rank, entry) in entries.iter().enumerate() {
        writeln!(out, "  {:>2}. {:<40}{:>6}", rank + 1, entry.speaker.to_string(), entry.count)?;
    }
    Ok(())
}

fn party_lines(out: &mut dyn Write, entries: &[PartyCount]) -> std::io::Result<()> {
    if entries.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for (rank, entry) in entries.iter().enumerate() {
        writeln!(out, "  {:>2}. {:<14}{:>6}", rank + 1, entry.party.label(), entry.count)?;
    }
    Ok(())
}

/// Render the reaction rankings
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_drama_summary(out: &mut dyn Write, report: &DramaReport<'_>) -> std::io::Result<()> {
    writeln!(
        out,
        "{} protocols ({} skipped)",
        report.documents, report.skipped
    )?;
    section(out, "Top interrupters")?;
    speaker_lines(out, &report.top_interrupters)?;
    section(out, "Most interrupted")?;
    speaker_lines(out, &report.most_interrupted)?;
    section(out, "Applause")?;
    party_lines(out, &report.applause)?;
    section(out, "Heckles")?;
    party_lines(out, &report.heckles)
}

/// Render the speaker rankings
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_speakers_summary(
    out: &mut dyn Write,
    report: &SpeakersReport<'_>,
) -> std::io::Result<()> {
    writeln!(
        out,
        "{} protocols, {} speeches, {} speakers",
        report.documents, report.speeches, report.unique_speakers
    )?;

    section(out, "Most speeches")?;
    speaker_lines(out, &report.top_speakers)?;
    section(out, "Question time")?;
    speaker_lines(out, &report.question_time)?;

    section(out, "Party champions")?;
    for champion in &report.champions {
        writeln!(
            out,
            "  {:<14}{:<40}{:>6}",
            champion.party.label(),
            champion.speaker.speaker.name,
            champion.speaker.count
        )?;
    }

    section(out, "Longest speeches")?;
    for (rank, speech) in report.marathon.iter().enumerate() {
        writeln!(
            out,
            "  {:>2}. {:<40}{:>6} words",
            rank + 1,
            format!("{} ({})", speech.speaker, speech.party),
            speech.words
        )?;
    }

    section(out, "Most words per speech")?;
    for (rank, average) in report.verbose.iter().enumerate() {
        writeln!(
            out,
            "  {:>2}. {:<40}{:>8.1} ({} speeches)",
            rank + 1,
            average.speaker.to_string(),
            average.average_words,
            average.speeches
        )?;
    }

    section(out, "Most words overall")?;
    for (rank, average) in report.wordiest.iter().enumerate() {
        writeln!(
            out,
            "  {:>2}. {:<40}{:>8}",
            rank + 1,
            average.speaker.to_string(),
            average.total_words
        )?;
    }

    section(out, "Doctorates")?;
    for share in &report.academic {
        writeln!(
            out,
            "  {:<14}{:>5.1}% ({} of {})",
            share.party.label(),
            share.ratio * 100.0,
            share.doctorates,
            share.speeches
        )?;
    }
    Ok(())
}
