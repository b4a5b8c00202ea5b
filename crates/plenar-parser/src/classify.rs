//! Speech-type classification from the text in front of a speaker line

use crate::error::{ParserError, ParserResult};
use plenar_core::{SpeechType, config::SpeechRule};
use regex::{RegexSet, RegexSetBuilder};

/// Ordered first-match-wins rule list.
///
/// Each rule is a set of patterns searched anywhere in the context; the first
/// rule with any matching pattern decides the type. Context matching no rule is
/// [`SpeechType::Other`].
#[derive(Debug, Clone)]
pub struct SpeechClassifier {
    rules: Vec<(SpeechType, RegexSet)>,
}

impl SpeechClassifier {
    /// Compile a rule list
    ///
    /// # Errors
    ///
    /// Returns an error naming the first rule whose patterns do not compile.
    pub fn new(rules: &[SpeechRule]) -> ParserResult<Self> {
        let rules = rules
            .iter()
            .enumerate()
            .map(|(index, rule)| {
                RegexSetBuilder::new(&rule.patterns)
                    .case_insensitive(rule.case_insensitive)
                    .build()
                    .map(|set| (rule.speech_type, set))
                    .map_err(|source| ParserError::invalid_pattern("speech_rules", index, source))
            })
            .collect::<ParserResult<Vec<_>>>()?;

        Ok(Self { rules })
    }

    /// Compile the built-in rule list
    ///
    /// # Errors
    ///
    /// Returns an error if a built-in pattern does not compile.
    pub fn with_defaults() -> ParserResult<Self> {
        Self::new(&plenar_core::config::default_speech_rules())
    }

    /// Classify a preceding context
    #[must_use]
    pub fn classify(&self, context: &str) -> SpeechType {
        self.rules
            .iter()
            .find(|(_, set)| set.is_match(context))
            .map_or(SpeechType::Other, |(speech_type, _)| *speech_type)
    }

    /// Number of rules
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether there are no rules
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
