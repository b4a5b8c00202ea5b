//! Configuration management for plenary protocol analysis
//!
//! The ordered pattern tables live here as data. Their order is part of the
//! contract: the party resolver and the speech classifier both stop at the
//! first matching entry.

use crate::types::{CanonicalParty, SpeechType};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Speech parser configuration
    #[serde(default)]
    pub parser: ParserConfig,

    /// Interruption/applause extraction configuration
    #[serde(default)]
    pub drama: DramaConfig,

    /// Protocol input discovery
    #[serde(default)]
    pub input: InputConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Speech parser configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Cleaned speech bodies shorter than this many characters are dropped
    #[serde(default = "default_min_speech_chars")]
    pub min_speech_chars: usize,

    /// Characters in front of a speaker line handed to the classifier
    #[serde(default = "default_context_chars")]
    pub context_chars: usize,

    /// Unclassified speeches are kept from this many words on
    #[serde(default = "default_min_other_words")]
    pub min_other_words: usize,

    /// Presiding-officer titles; each also matches with an `in` suffix
    #[serde(default = "default_presiding_titles")]
    pub presiding_titles: Vec<String>,

    /// Speaker labels containing any of these never open a speech
    #[serde(default = "default_excluded_label_markers")]
    pub excluded_label_markers: Vec<String>,

    /// Name tokens treated as academic or nobility particles
    #[serde(default = "default_academic_titles")]
    pub academic_titles: Vec<String>,

    /// Party resolution table, first match wins
    #[serde(default = "default_party_patterns")]
    pub party_patterns: Vec<PartyPattern>,

    /// Speech classification rules, first match wins
    #[serde(default = "default_speech_rules")]
    pub speech_rules: Vec<SpeechRule>,
}

/// One row of the party resolution table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyPattern {
    /// Party a match resolves to
    pub party: CanonicalParty,
    /// Case-insensitive regular expression searched anywhere in the trimmed label
    pub pattern: String,
}

/// One rule of the speech classifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechRule {
    /// Type assigned when any pattern matches
    pub speech_type: SpeechType,
    /// Match patterns ignoring case
    #[serde(default)]
    pub case_insensitive: bool,
    /// Regular expressions searched anywhere in the preceding context
    pub patterns: Vec<String>,
}

/// Interruption/applause extraction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DramaConfig {
    /// Bracketed "names" containing these words are reaction markers, not people
    #[serde(default = "default_noise_words")]
    pub noise_words: Vec<String>,

    /// Prefixes removed before comparing last names for self-interruptions
    #[serde(default = "default_ignored_name_prefixes")]
    pub ignored_name_prefixes: Vec<String>,
}

/// Protocol input discovery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// File extensions read as protocols
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Descend into subdirectories
    #[serde(default)]
    pub recursive: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json, pretty or compact)
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Log to file
    #[serde(default)]
    pub file: Option<PathBuf>,
}

// Default value functions
const fn default_min_speech_chars() -> usize {
    50
}

const fn default_context_chars() -> usize {
    400
}

const fn default_min_other_words() -> usize {
    500
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| (*item).to_string()).collect()
}

fn default_presiding_titles() -> Vec<String> {
    strings(&[
        "Vizepräsident",
        "Präsident",
        "Alterspräsident",
        "Bundespräsident",
        "Bundeskanzler",
    ])
}

fn default_excluded_label_markers() -> Vec<String> {
    strings(&["Präsident", "Vizepräsident", "Tagesordnung"])
}

fn default_academic_titles() -> Vec<String> {
    strings(&[
        "Dr", "Prof", "Frau", "D", "-Ing", "von", "und", "zu", "van", "de", "Baron", "Freiherr",
        "Freifrau", "Prinz", "Graf", "h", "c",
    ])
}

fn party(party: CanonicalParty, pattern: &str) -> PartyPattern {
    PartyPattern {
        party,
        pattern: pattern.to_string(),
    }
}

/// Built-in party table.
///
/// Short anchored acronyms (`^DP$`, `^KPD$`) come last so they cannot pre-empt
/// the OCR-tolerant patterns of the large groups.
#[must_use]
pub fn default_party_patterns() -> Vec<PartyPattern> {
    use CanonicalParty as P;

    vec![
        party(
            P::CduCsu,
            r"(?:Gast|-)?(?:\s*C\s*[DSMU]\s*S?[DU]\s*(?:\s*[/,':!.-]?)*\s*(?:\s*C+\s*[DSs]?\s*[UÙ]?\s*)?)(?:-?Hosp\.|-Gast|1)?",
        ),
        party(P::Spd, r"\s*'?S(?:PD|DP)(?:\.|-Gast)?"),
        party(
            P::Gruene,
            r"(?:BÜNDNIS\s*(?:90)?/?(?:\s*D[1I]E)?|Bündnis\s*90/(?:\s*D[1I]E)?)?\s*[GC]R[UÜ].?\s*[ÑN]EN?(?:/Bündnis 90)?|BÜNDNISSES?\s*90/\s*DIE\s*GRÜNEN|Grünen",
        ),
        party(P::Fdp, r"\s*F\.?\s*[PDO][.']?[DP]\.?"),
        party(P::Afd, r"^AfD$|Alternative für Deutschland"),
        party(P::Linke, r"DIE\s*LIN\s?KEN?|LIN\s?KEN|Die Linke"),
        party(P::Bsw, r"^BSW$|Bündnis Sahra Wagenknecht"),
        party(P::Fraktionslos, r"(?:fraktionslos|Parteilos|parteilos)"),
        party(P::Ssw, r"^SSW$"),
        party(P::Pds, r"(?:Gruppe\s*der\s*)?PDS(?:/(?:LL|Linke Liste))?"),
        party(P::GbBhe, r"(?:GB[/-]\s*)?BHE(?:-DG)?"),
        party(P::Dp, r"^DP$"),
        party(P::Kpd, r"^KPD$"),
        party(P::Fvp, r"^FVP$"),
    ]
}

fn rule(speech_type: SpeechType, case_insensitive: bool, patterns: &[&str]) -> SpeechRule {
    SpeechRule {
        speech_type,
        case_insensitive,
        patterns: strings(patterns),
    }
}

/// Built-in classification rules.
///
/// Everything that marks a non-speech comes before the floor-granting battery,
/// so "Das Wort hat" next to "Ihre Redezeit ist abgelaufen" is a continuation.
#[must_use]
pub fn default_speech_rules() -> Vec<SpeechRule> {
    use SpeechType as T;

    vec![
        rule(
            T::Continuation,
            true,
            &[
                "Zeit ist abgelaufen",
                "Redezeit ist abgelaufen",
                "kommen Sie.*zum Ende",
                "zum Ende.*Rede",
                "müssen zum Ende",
                "bitte zum Schluss",
            ],
        ),
        rule(T::Kurzintervention, false, &["Kurzintervention"]),
        rule(
            T::Zwischenfrage,
            false,
            &["Zwischenfrage", "Gelegenheit, zu antworten"],
        ),
        rule(
            T::Zwischenfrage,
            false,
            &[r"[Ll]assen Sie.*zu\?", "[Gg]estatten Sie", "[Ee]rlauben Sie"],
        ),
        rule(
            T::Question,
            false,
            &["Nachfrage", "Fragesteller", "weitere Frage"],
        ),
        rule(T::Fragestunde, false, &["Regierungsbefragung", "Fragestunde"]),
        rule(
            T::Formal,
            false,
            &[
                "eröffne.*Aussprache",
                r"erteile.*(?:das\s+)?Wort",
                "Das Wort hat",
                "hat (?:jetzt |nun )?(?:das )?Wort",
                "das Wort geben",
                "darf ich aufrufen",
                r"[Nn]ächste[rn]?\s+Rede",
                r"[Nn]ächste[rn]?\s+Redner",
                "rufe.*auf",
                "bitte.*ans Mikrofon",
                "erste Rede",
                "spricht.*(?:Kolleg|Abgeordnet)",
                "Für die.*Fraktion (?:hat|spricht)",
            ],
        ),
    ]
}

fn default_noise_words() -> Vec<String> {
    strings(&["Beifall", "Zuruf", "Lachen", "Heiterkeit"])
}

fn default_ignored_name_prefixes() -> Vec<String> {
    strings(&["Dr.", "Prof."])
}

fn default_extensions() -> Vec<String> {
    strings(&["txt", "json"])
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: [&str; 3] = ["json", "pretty", "compact"];

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            min_speech_chars: default_min_speech_chars(),
            context_chars: default_context_chars(),
            min_other_words: default_min_other_words(),
            presiding_titles: default_presiding_titles(),
            excluded_label_markers: default_excluded_label_markers(),
            academic_titles: default_academic_titles(),
            party_patterns: default_party_patterns(),
            speech_rules: default_speech_rules(),
        }
    }
}

impl Default for DramaConfig {
    fn default() -> Self {
        Self {
            noise_words: default_noise_words(),
            ignored_name_prefixes: default_ignored_name_prefixes(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            recursive: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from an optional TOML file and `PLENAR_*` environment variables.
    ///
    /// Without an explicit path, `plenar.toml` in the working directory is used if present.
    /// Nested keys use a double underscore, e.g. `PLENAR_PARSER__MIN_SPEECH_CHARS=60`.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded, parsed or validated.
    pub fn load(path: Option<&Path>) -> crate::Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("plenar").required(false),
        };

        let config: Self = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("PLENAR")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Check value ranges and table contents
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first offending field.
    pub fn validate(&self) -> crate::Result<()> {
        let parser = &self.parser;
        if parser.min_speech_chars == 0 {
            return Err(crate::Error::validation(
                "parser.min_speech_chars",
                "must be greater than zero",
            ));
        }
        if parser.context_chars == 0 {
            return Err(crate::Error::validation(
                "parser.context_chars",
                "must be greater than zero",
            ));
        }
        if parser.presiding_titles.iter().all(|title| title.trim().is_empty()) {
            return Err(crate::Error::validation(
                "parser.presiding_titles",
                "at least one title is required",
            ));
        }
        if parser.party_patterns.is_empty() {
            return Err(crate::Error::validation(
                "parser.party_patterns",
                "table is empty",
            ));
        }
        if let Some(index) = parser
            .speech_rules
            .iter()
            .position(|rule| rule.patterns.is_empty())
        {
            return Err(crate::Error::validation(
                "parser.speech_rules",
                format!("rule {index} has no patterns"),
            ));
        }
        if !LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(crate::Error::validation(
                "logging.level",
                format!("unknown level `{}`", self.logging.level),
            ));
        }
        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(crate::Error::validation(
                "logging.format",
                format!("unknown format `{}`", self.logging.format),
            ));
        }
        Ok(())
    }

    /// Render the resolved configuration as TOML
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized.
    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| crate::Error::configuration(format!("Failed to serialize configuration: {e}")))
    }
}
