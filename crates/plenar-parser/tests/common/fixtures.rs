//! Test fixtures and sample protocols

/// Opening line of every generated protocol
pub const HEADER: &str = "Deutscher Bundestag\nStenografischer Bericht\n1. Sitzung";

/// Floor-granting phrase in front of regular speeches
pub const FLOOR: &str = "Das Wort hat nun der Kollege.";

/// A speech body well above the minimum length
pub const BODY: &str =
    "Sehr geehrte Frau Präsidentin! Meine Damen und Herren! Wir beraten heute den Haushalt.";

/// Builds protocol text line by line
#[derive(Debug, Default)]
pub struct ProtocolBuilder {
    text: String,
}

impl ProtocolBuilder {
    /// Start a protocol with the standard header
    pub fn new() -> Self {
        Self {
            text: HEADER.to_string(),
        }
    }

    /// Append a free-standing line
    pub fn line(mut self, line: &str) -> Self {
        self.text.push('\n');
        self.text.push_str(line);
        self
    }

    /// Append a presiding-officer line followed by what the chair says
    pub fn chair(self, title_and_name: &str, says: &str) -> Self {
        self.line(&format!("{title_and_name}:")).line(says)
    }

    /// Append a member line followed by the speech body
    pub fn speech(self, speaker: &str, party: &str, body: &str) -> Self {
        self.line(&format!("{speaker} ({party}):")).line(body)
    }

    /// Append a floor grant by the president and then a speech
    pub fn granted_speech(self, speaker: &str, party: &str, body: &str) -> Self {
        self.chair("Präsidentin Julia Klöckner", FLOOR)
            .speech(speaker, party, body)
    }

    /// Finish with a trailing newline
    pub fn build(mut self) -> String {
        self.text.push('\n');
        self.text
    }
}

/// A short debate: two regular speeches and an interposed question
pub fn sample_debate() -> String {
    ProtocolBuilder::new()
        .chair(
            "Präsidentin Julia Klöckner",
            "Ich eröffne die Aussprache. Das Wort hat die Kollegin Anna Müller.",
        )
        .speech("Anna Müller", "SPD", BODY)
        .line("(Beifall bei der SPD sowie bei der CDU/CSU)")
        .line("Wir stehen zu diesem Etat.")
        .line("(Stephan Brandner [AfD]: Das glauben Sie doch selbst nicht!)")
        .chair("Präsidentin Julia Klöckner", "Nächster Redner ist Dr. Hans Schmidt.")
        .speech("Dr. Hans Schmidt", "CDU/CSU", BODY)
        .line("(Zuruf von der AfD: Unsinn!)")
        .chair(
            "Vizepräsident Bodo Ramelow",
            "Herr Kollege, gestatten Sie eine Zwischenfrage der Kollegin Müller?",
        )
        .speech(
            "Anna Müller",
            "SPD",
            "Herr Kollege, haben Sie den Einzelplan überhaupt gelesen, bevor Sie hier reden?",
        )
        .build()
}

/// Question time: an opening question and a follow-up
pub fn sample_question_time() -> String {
    ProtocolBuilder::new()
        .chair(
            "Präsidentin Julia Klöckner",
            "Wir kommen zur Fragestunde. Die erste Frage stellt der Kollege Jan Berg.",
        )
        .speech(
            "Jan Berg",
            "AfD",
            "Frau Ministerin, wie viele Stellen wurden im letzten Jahr im Ministerium geschaffen?",
        )
        .chair(
            "Präsidentin Julia Klöckner",
            "Gibt es eine Nachfrage? Bitte, Frau Kollegin.",
        )
        .speech(
            "Eva Roth",
            "FDP",
            "Frau Ministerin, wie verteilen sich diese Stellen auf die einzelnen Abteilungen Ihres Hauses?",
        )
        .build()
}
