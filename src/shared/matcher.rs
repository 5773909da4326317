use std::sync::OnceLock;

use regex::Regex;

/// A table phrase with its lazily compiled word-boundary matcher.
///
/// Compilation happens once per phrase on first use and is shared for the
/// life of the process, so repeated scans pay only the match cost.
#[derive(Debug)]
pub struct Phrase {
    text: String,
    regex: OnceLock<Regex>,
}

impl Phrase {
    pub fn new(text: impl Into<String>) -> Phrase {
        Phrase {
            text: text.into(),
            regex: OnceLock::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Case-insensitive containment with word boundaries, so "urgent" does
    /// not fire inside "urgently" and "act now" does not fire in "contact now".
    pub fn is_match(&self, message: &str) -> bool {
        self.regex
            .get_or_init(|| compile_boundary(&self.text))
            .is_match(message)
    }
}

/// Compile a fixed keyword family into matchable phrases.
pub fn phrase_set(words: &[&str]) -> Vec<Phrase> {
    words.iter().map(|w| Phrase::new(*w)).collect()
}

/// Texts of the phrases in `set` that match `message`, in set order.
pub fn matching_texts(set: &'static [Phrase], message: &str) -> Vec<&'static str> {
    set.iter()
        .filter(|p| p.is_match(message))
        .map(|p| p.text())
        .collect()
}

/// Build the boundary pattern for one phrase. Phrases ending in punctuation
/// (a trailing comma, for instance) take only the leading boundary: a `\b`
/// after a non-word character can never match.
fn compile_boundary(phrase: &str) -> Regex {
    let escaped = regex::escape(phrase);
    let pattern = if phrase.chars().last().is_some_and(char::is_alphanumeric) {
        format!(r"(?i)\b{escaped}\b")
    } else {
        format!(r"(?i)\b{escaped}")
    };
    Regex::new(&pattern).expect("escaped phrase pattern compiles")
}
