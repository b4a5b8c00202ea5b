//! Whitespace and dash canonicalization
//!
//! Every downstream pattern assumes plain ASCII spaces and hyphens, so raw
//! protocol text passes through [`normalize`] exactly once.

use serde::Serialize;
use std::{fmt, ops::Deref};

/// Protocol text after whitespace and dash canonicalization.
///
/// Only [`normalize`] creates values of this type, so holding one proves the
/// text has been canonicalized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NormalizedText(String);

impl NormalizedText {
    /// Borrow the text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take ownership of the text
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl Deref for NormalizedText {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Characters rendered as a single ASCII space
const fn is_blank(c: char) -> bool {
    matches!(
        c,
        ' ' | '\t' | '\u{00a0}' | '\u{2007}' | '\u{202f}' | '\u{2060}'
    )
}

/// Canonicalize whitespace and dashes.
///
/// Non-breaking and figure spaces become ASCII spaces, em and en dashes become
/// hyphens, and every run of spaces or tabs collapses to one space. Line breaks
/// are kept as they are. Applying it twice changes nothing.
#[must_use]
pub fn normalize(raw: &str) -> NormalizedText {
    let mut out = String::with_capacity(raw.len());
    let mut in_blank_run = false;

    for c in raw.chars() {
        if is_blank(c) {
            if !in_blank_run {
                out.push(' ');
                in_blank_run = true;
            }
            continue;
        }
        in_blank_run = false;
        match c {
            '\u{2014}' | '\u{2013}' => out.push('-'),
            other => out.push(other),
        }
    }

    NormalizedText(out)
}
