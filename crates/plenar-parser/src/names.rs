//! Speaker label decomposition

use plenar_core::SpeakerName;
use std::collections::HashSet;

/// Splits speaker labels into titles, given names and family name.
///
/// The heuristic is lossy: compound family names keep only their last token
/// and every title token counts regardless of position.
#[derive(Debug, Clone)]
pub struct NameDecomposer {
    titles: HashSet<String>,
}

impl NameDecomposer {
    /// Create a decomposer for the given title tokens
    #[must_use]
    pub fn new(titles: &[String]) -> Self {
        Self {
            titles: titles.iter().cloned().collect(),
        }
    }

    /// Create a decomposer for the built-in title tokens
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(&plenar_core::ParserConfig::default().academic_titles)
    }

    /// Decompose a raw speaker label
    #[must_use]
    pub fn decompose(&self, raw_label: &str) -> SpeakerName {
        let cleaned: String = raw_label
            .chars()
            .map(|c| if is_name_char(c) { c } else { ' ' })
            .collect();

        let (titles, mut names): (Vec<&str>, Vec<&str>) = cleaned
            .split_whitespace()
            .partition(|token| self.titles.contains(*token));

        let last_name = names.pop().unwrap_or_default().to_string();

        SpeakerName {
            first_name: names.join(" "),
            last_name,
            academic_title: (!titles.is_empty()).then(|| titles.join(" ")),
        }
    }
}

/// Letters kept in names; everything else separates tokens
fn is_name_char(c: char) -> bool {
    c.is_ascii_alphabetic()
        || c.is_whitespace()
        || matches!(c, 'Ö' | 'Ä' | 'Ü' | 'ö' | 'ä' | 'ü' | 'ß' | '-')
}
