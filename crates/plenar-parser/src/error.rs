//! Error types for the protocol parser
//!
//! Parsing itself never fails. Errors only come from building a parser out of
//! configured pattern tables and from the file I/O around corpus parsing.

use thiserror::Error;

/// Result type alias for parser construction and corpus operations
pub type ParserResult<T> = Result<T, ParserError>;

/// Errors that can occur while building or driving a parser
#[derive(Error, Debug)]
pub enum ParserError {
    /// A configured pattern does not compile
    #[error("Invalid pattern #{index} in {table}: {source}")]
    InvalidPattern {
        /// Name of the pattern table
        table: &'static str,
        /// Position of the offending entry in its table
        index: usize,
        /// Underlying regex error
        #[source]
        source: regex::Error,
    },

    /// A configured table is unusable as a whole
    #[error("Invalid configuration: {message}")]
    Configuration {
        /// Error message
        message: String,
    },

    /// Error raised by the core crate
    #[error(transparent)]
    Core(#[from] plenar_core::Error),
}

impl ParserError {
    /// Create an invalid pattern error
    pub const fn invalid_pattern(table: &'static str, index: usize, source: regex::Error) -> Self {
        Self::InvalidPattern {
            table,
            index,
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Whether the error stems from user-supplied configuration
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidPattern { .. }
                | Self::Configuration { .. }
                | Self::Core(
                    plenar_core::Error::Configuration { .. } | plenar_core::Error::Validation { .. }
                )
        )
    }
}

/// Compile one configured pattern, tagging failures with their table position
pub(crate) fn compile(
    table: &'static str,
    index: usize,
    pattern: &str,
    case_insensitive: bool,
) -> ParserResult<regex::Regex> {
    regex::RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .build()
        .map_err(|source| ParserError::invalid_pattern(table, index, source))
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_reports_position() {
        let err = compile("party_patterns", 3, "(unclosed", true).unwrap_err();

        assert!(matches!(
            err,
            ParserError::InvalidPattern {
                table: "party_patterns",
                index: 3,
                ..
            }
        ));
        assert!(err.to_string().starts_with("Invalid pattern #3 in party_patterns"));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_compile_case_insensitive() {
        let regex = compile("speech_rules", 0, "redezeit", true).unwrap();
        assert!(regex.is_match("Ihre Redezeit ist abgelaufen"));

        let regex = compile("speech_rules", 0, "redezeit", false).unwrap();
        assert!(!regex.is_match("Ihre Redezeit ist abgelaufen"));
    }

    #[test]
    fn test_core_errors_convert() {
        let err: ParserError = plenar_core::Error::Other("boom".to_string()).into();
        assert_eq!(err.to_string(), "boom");
        assert!(!err.is_configuration());
    }
}
