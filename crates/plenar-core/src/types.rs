//! Core data types for plenary protocol analysis

use crate::tally::Tally;
use serde::{Deserialize, Serialize};
use std::{fmt, ops::Range, str::FromStr};

/// One plenary protocol as handed to the parser
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProtocolDocument {
    /// Document number or file stem
    pub id: String,
    /// Full transcript text
    pub text: String,
}

impl ProtocolDocument {
    /// Create a document
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// Canonical party (parliamentary group) identifier.
///
/// Serialized with the label used in the protocols, e.g. `"CDU/CSU"` or `"DIE LINKE"`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CanonicalParty {
    /// Christian-democratic alliance
    #[serde(rename = "CDU/CSU")]
    CduCsu,
    /// Social democrats
    #[serde(rename = "SPD")]
    Spd,
    /// Greens
    #[serde(rename = "GRÜNE")]
    Gruene,
    /// Liberals
    #[serde(rename = "FDP")]
    Fdp,
    /// Alternative für Deutschland
    #[serde(rename = "AfD")]
    Afd,
    /// The Left
    #[serde(rename = "DIE LINKE")]
    Linke,
    /// Bündnis Sahra Wagenknecht
    #[serde(rename = "BSW")]
    Bsw,
    /// Members without a parliamentary group
    #[serde(rename = "fraktionslos")]
    Fraktionslos,
    /// Südschleswigscher Wählerverband
    #[serde(rename = "SSW")]
    Ssw,
    /// Historical: Partei des Demokratischen Sozialismus
    #[serde(rename = "PDS")]
    Pds,
    /// Historical: Gesamtdeutscher Block / BHE
    #[serde(rename = "GB/BHE")]
    GbBhe,
    /// Historical: Deutsche Partei
    #[serde(rename = "DP")]
    Dp,
    /// Historical: Kommunistische Partei Deutschlands
    #[serde(rename = "KPD")]
    Kpd,
    /// Historical: Freie Volkspartei
    #[serde(rename = "FVP")]
    Fvp,
}

impl CanonicalParty {
    /// Every canonical party, in default resolver precedence order
    pub const ALL: [Self; 14] = [
        Self::CduCsu,
        Self::Spd,
        Self::Gruene,
        Self::Fdp,
        Self::Afd,
        Self::Linke,
        Self::Bsw,
        Self::Fraktionslos,
        Self::Ssw,
        Self::Pds,
        Self::GbBhe,
        Self::Dp,
        Self::Kpd,
        Self::Fvp,
    ];

    /// Protocol label of the party
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CduCsu => "CDU/CSU",
            Self::Spd => "SPD",
            Self::Gruene => "GRÜNE",
            Self::Fdp => "FDP",
            Self::Afd => "AfD",
            Self::Linke => "DIE LINKE",
            Self::Bsw => "BSW",
            Self::Fraktionslos => "fraktionslos",
            Self::Ssw => "SSW",
            Self::Pds => "PDS",
            Self::GbBhe => "GB/BHE",
            Self::Dp => "DP",
            Self::Kpd => "KPD",
            Self::Fvp => "FVP",
        }
    }
}

impl fmt::Display for CanonicalParty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CanonicalParty {
    type Err = crate::Error;

    /// Exact label lookup. Noisy labels go through the party resolver instead.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|party| party.label() == s.trim())
            .ok_or_else(|| crate::Error::validation("party", format!("unknown party label `{s}`")))
    }
}

/// How a speech was introduced, judged from the text in front of it
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SpeechType {
    /// Regular floor speech
    Formal,
    /// Follow-up question during question time
    Question,
    /// Question time or government questioning session
    Fragestunde,
    /// Interposed question during another member's speech
    Zwischenfrage,
    /// Short intervention
    Kurzintervention,
    /// Speaker resuming after being told to finish
    Continuation,
    /// Nothing recognizable in front of the speaker line
    Other,
}

impl SpeechType {
    /// Whether this type belongs to the question-time channel
    #[must_use]
    pub const fn is_question_time(self) -> bool {
        matches!(self, Self::Question | Self::Fragestunde)
    }
}

impl Default for SpeechType {
    fn default() -> Self {
        Self::Other
    }
}

impl fmt::Display for SpeechType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Formal => write!(f, "formal"),
            Self::Question => write!(f, "question"),
            Self::Fragestunde => write!(f, "fragestunde"),
            Self::Zwischenfrage => write!(f, "zwischenfrage"),
            Self::Kurzintervention => write!(f, "kurzintervention"),
            Self::Continuation => write!(f, "continuation"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Byte range into a normalized protocol text
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TextSpan {
    /// First byte of the span
    pub start: usize,
    /// One past the last byte of the span
    pub end: usize,
}

impl TextSpan {
    /// Create a span
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length in bytes
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span covers nothing
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The span as a slice range
    #[must_use]
    pub const fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Name parts recovered from a speaker label
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SpeakerName {
    /// Given names, space-joined
    pub first_name: String,
    /// Final name token
    pub last_name: String,
    /// Academic and nobility particles, space-joined in original order
    pub academic_title: Option<String>,
}

/// One attributed speech from a plenary protocol
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Speech {
    /// Speaker label as printed in the protocol
    pub speaker: String,

    /// Resolved party
    pub party: CanonicalParty,

    /// Speech body without parenthesized annotations
    pub text: String,

    /// Classification of the speech introduction
    #[serde(rename = "type")]
    pub speech_type: SpeechType,

    /// Whitespace-delimited tokens in `text`
    pub word_count: usize,

    /// Given names
    pub first_name: String,

    /// Family name
    pub last_name: String,

    /// Academic title, if any
    pub academic_title: Option<String>,

    /// Raw body location in the normalized protocol text
    #[serde(default)]
    pub span: TextSpan,
}

impl Speech {
    /// Text-free view for metadata-only consumers
    #[must_use]
    pub fn metadata(&self) -> SpeechMetadata {
        SpeechMetadata {
            speaker: self.speaker.clone(),
            party: self.party,
            speech_type: self.speech_type,
            word_count: self.word_count,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            academic_title: self.academic_title.clone(),
        }
    }

    /// Whether the speaker carries a doctorate
    #[must_use]
    pub fn has_doctorate(&self) -> bool {
        self.academic_title
            .as_deref()
            .is_some_and(|title| title.split(' ').any(|part| part == "Dr"))
    }
}

/// A [`Speech`] without its body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpeechMetadata {
    /// Speaker label as printed in the protocol
    pub speaker: String,
    /// Resolved party
    pub party: CanonicalParty,
    /// Classification of the speech introduction
    #[serde(rename = "type")]
    pub speech_type: SpeechType,
    /// Whitespace-delimited tokens in the body
    pub word_count: usize,
    /// Given names
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Academic title, if any
    pub academic_title: Option<String>,
}

/// Person key for speaker and interruption tallies
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpeakerKey {
    /// Name as printed
    pub name: String,
    /// Party label; canonical when resolvable, otherwise as printed
    pub party: String,
}

impl SpeakerKey {
    /// Create a key
    pub fn new(name: impl Into<String>, party: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            party: party.into(),
        }
    }
}

impl fmt::Display for SpeakerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.party)
    }
}

/// Interruption, applause and heckle tallies
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DramaStats {
    /// Who interrupted, counted per interruption
    pub interrupters: Tally<SpeakerKey>,
    /// Whose speech was interrupted, counted per interruption
    pub interrupted: Tally<SpeakerKey>,
    /// Applause annotations naming each party
    pub applause_by_party: Tally<CanonicalParty>,
    /// Heckle annotations naming each party
    pub heckles_by_party: Tally<CanonicalParty>,
}

impl DramaStats {
    /// Fold another set of tallies into this one
    pub fn merge(&mut self, other: Self) {
        self.interrupters.merge(other.interrupters);
        self.interrupted.merge(other.interrupted);
        self.applause_by_party.merge(other.applause_by_party);
        self.heckles_by_party.merge(other.heckles_by_party);
    }

    /// Members who interrupt the most
    #[must_use]
    pub fn top_interrupters(&self, n: usize) -> Vec<(&SpeakerKey, u64)> {
        self.interrupters.most_common(n)
    }

    /// Speakers interrupted the most
    #[must_use]
    pub fn most_interrupted(&self, n: usize) -> Vec<(&SpeakerKey, u64)> {
        self.interrupted.most_common(n)
    }

    /// Parties by applause given
    #[must_use]
    pub fn applause_ranking(&self, n: usize) -> Vec<(&CanonicalParty, u64)> {
        self.applause_by_party.most_common(n)
    }

    /// Parties by heckles given
    #[must_use]
    pub fn heckle_ranking(&self, n: usize) -> Vec<(&CanonicalParty, u64)> {
        self.heckles_by_party.most_common(n)
    }
}
