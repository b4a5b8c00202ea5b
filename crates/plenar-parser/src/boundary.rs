//! Speech boundary detection
//!
//! Two families of speaker lines open or close speech spans: member lines of
//! the form `Name (Party):` and presiding-officer lines of the form
//! `Präsidentin Name:`. Both must sit on a line of their own.

use crate::{
    error::{ParserError, ParserResult, compile},
    normalize::NormalizedText,
};
use regex::Regex;
use serde::Serialize;

const SPEAKER_PATTERN: &str = r"\n([A-ZÄÖÜ][^(\n:]{2,60})\s*\(([^)]+)\):\s*\n";

/// Which kind of line a boundary was found on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryKind {
    /// Member with a party label; opens a speech
    Speaker,
    /// Session chair; only closes the span above it
    PresidingOfficer,
}

/// A speaker line in normalized text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Boundary {
    /// Byte offset of the line break in front of the speaker line
    pub start: usize,
    /// Byte offset just past the speaker line
    pub end: usize,
    /// Line family
    pub kind: BoundaryKind,
    /// Speaker as printed; presiding officers carry `"<title> <name>"`
    pub raw_speaker_label: String,
    /// Parenthesized party label, member lines only
    pub raw_party_label: Option<String>,
}

impl Boundary {
    /// Whether this boundary opens a speech candidate
    #[must_use]
    pub fn is_speaker(&self) -> bool {
        self.kind == BoundaryKind::Speaker
    }
}

/// Finds speaker lines of both families
#[derive(Debug, Clone)]
pub struct BoundaryScanner {
    speaker: Regex,
    presiding: Regex,
}

impl BoundaryScanner {
    /// Build a scanner for the given presiding-officer titles.
    ///
    /// Each title also matches with the feminine `in` suffix.
    ///
    /// # Errors
    ///
    /// Returns an error if no usable title is given or a pattern does not compile.
    pub fn new(presiding_titles: &[String]) -> ParserResult<Self> {
        let alternatives: Vec<String> = presiding_titles
            .iter()
            .map(|title| title.trim())
            .filter(|title| !title.is_empty())
            .map(|title| format!("{}(?:in)?", regex::escape(title)))
            .collect();
        if alternatives.is_empty() {
            return Err(ParserError::configuration(
                "at least one presiding-officer title is required",
            ));
        }

        let presiding_pattern = format!(
            r"\n({})\s+([A-ZÄÖÜ][^:\n]{{2,40}}):\s*\n",
            alternatives.join("|")
        );

        Ok(Self {
            speaker: compile("speaker_pattern", 0, SPEAKER_PATTERN, false)?,
            presiding: compile("presiding_titles", 0, &presiding_pattern, false)?,
        })
    }

    /// Build a scanner for the built-in presiding-officer titles
    ///
    /// # Errors
    ///
    /// Returns an error if a built-in pattern does not compile.
    pub fn with_defaults() -> ParserResult<Self> {
        Self::new(&plenar_core::ParserConfig::default().presiding_titles)
    }

    /// All boundaries of both families, sorted by start offset.
    ///
    /// Matches of the two families are not deduplicated against each other;
    /// on equal start offsets member lines come first.
    #[must_use]
    pub fn scan(&self, text: &NormalizedText) -> Vec<Boundary> {
        let text = text.as_str();
        let mut boundaries = Vec::new();

        for caps in self.speaker.captures_iter(text) {
            let (Some(whole), Some(name), Some(party)) = (caps.get(0), caps.get(1), caps.get(2))
            else {
                continue;
            };
            boundaries.push(Boundary {
                start: whole.start(),
                end: whole.end(),
                kind: BoundaryKind::Speaker,
                raw_speaker_label: name.as_str().trim().to_string(),
                raw_party_label: Some(party.as_str().trim().to_string()),
            });
        }

        for caps in self.presiding.captures_iter(text) {
            let (Some(whole), Some(title), Some(name)) = (caps.get(0), caps.get(1), caps.get(2))
            else {
                continue;
            };
            boundaries.push(Boundary {
                start: whole.start(),
                end: whole.end(),
                kind: BoundaryKind::PresidingOfficer,
                raw_speaker_label: format!("{} {}", title.as_str(), name.as_str().trim()),
                raw_party_label: None,
            });
        }

        boundaries.sort_by_key(|boundary| boundary.start);
        boundaries
    }
}
