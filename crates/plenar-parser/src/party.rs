//! Party label resolution

use crate::error::{ParserResult, compile};
use plenar_core::{CanonicalParty, config::PartyPattern};
use regex::Regex;

/// Maps noisy party labels to canonical parties.
///
/// Patterns are tried in table order and the first one found anywhere in the
/// trimmed label wins. Matching ignores case.
#[derive(Debug, Clone)]
pub struct PartyResolver {
    table: Vec<(CanonicalParty, Regex)>,
}

impl PartyResolver {
    /// Compile a party table
    ///
    /// # Errors
    ///
    /// Returns an error naming the first pattern that does not compile.
    pub fn new(patterns: &[PartyPattern]) -> ParserResult<Self> {
        let table = patterns
            .iter()
            .enumerate()
            .map(|(index, row)| {
                compile("party_patterns", index, &row.pattern, true).map(|regex| (row.party, regex))
            })
            .collect::<ParserResult<Vec<_>>>()?;

        Ok(Self { table })
    }

    /// Compile the built-in party table
    ///
    /// # Errors
    ///
    /// Returns an error if a built-in pattern does not compile.
    pub fn with_defaults() -> ParserResult<Self> {
        Self::new(&plenar_core::config::default_party_patterns())
    }

    /// Resolve a raw label, `None` when no pattern matches
    #[must_use]
    pub fn resolve(&self, raw: &str) -> Option<CanonicalParty> {
        let label = raw.trim();
        self.table
            .iter()
            .find(|(_, regex)| regex.is_match(label))
            .map(|(party, _)| *party)
    }

    /// Number of table rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the table has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
