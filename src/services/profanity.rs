//! Profanity screening for prayer requests

use std::collections::HashSet;
use std::path::Path;

use crate::types::Result;

/// Trait for profanity detection
pub trait ProfanityScanner: Send + Sync {
    /// Return the first offending term found in `text`, if any
    fn scan(&self, text: &str) -> Option<String>;
}

const DEFAULT_WORDS: &[&str] = &[
    "asshole", "bastard", "bitch", "bullshit", "cunt", "fuck", "fucker", "motherfucker",
    "pussy", "shit", "slut", "whore",
];

/// Word-list scanner
///
/// Matches whole words case-insensitively. Letters repeated for emphasis
/// ("shiiit") are collapsed before comparison.
#[derive(Debug, Clone)]
pub struct WordListScanner {
    words: HashSet<String>,
    collapsed: HashSet<String>,
}

impl Default for WordListScanner {
    fn default() -> Self {
        Self::new(DEFAULT_WORDS.iter().copied())
    }
}

impl WordListScanner {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: HashSet<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        let collapsed = words.iter().map(|w| collapse(w)).collect();
        Self { words, collapsed }
    }

    /// Load a newline-separated word list; blank lines and `#` comments are skipped
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(Self::new(
            contents
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty() && !l.starts_with('#')),
        ))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl ProfanityScanner for WordListScanner {
    fn scan(&self, text: &str) -> Option<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty())
            .find(|token| self.matches(&token.to_lowercase()))
            .map(str::to_string)
    }
}

impl WordListScanner {
    fn matches(&self, token: &str) -> bool {
        if self.words.contains(token) {
            return true;
        }
        // only emphasised tokens fall back to the collapsed form, so "as"
        // never matches "ass"
        let squeezed = collapse(token);
        squeezed != token && self.collapsed.contains(&squeezed)
    }
}

/// Collapse runs of the same character: "fuuuck" -> "fuck"
fn collapse(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut last = None;
    for c in word.chars() {
        if last != Some(c) {
            out.push(c);
        }
        last = Some(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_request_passes() {
        let scanner = WordListScanner::default();
        assert_eq!(scanner.scan("Please pray for my grandmother's surgery"), None);
    }

    #[test]
    fn test_emphasised_word_is_caught() {
        let scanner = WordListScanner::default();
        assert_eq!(scanner.scan("fuckkk you").as_deref(), Some("fuckkk"));
        assert_eq!(scanner.scan("SHIIIT!").as_deref(), Some("SHIIIT"));
    }

    #[test]
    fn test_whole_words_only() {
        let scanner = WordListScanner::new(["ass"]);
        assert_eq!(scanner.scan("pray for our class assembly"), None);
        assert_eq!(scanner.scan("as we gather"), None);
        assert_eq!(scanner.scan("what an ass").as_deref(), Some("ass"));
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join(format!("words-{}.txt", uuid::Uuid::new_v4()));
        std::fs::write(&path, "# custom list\nheck\n\n darn \n").unwrap();

        let scanner = WordListScanner::from_file(&path).unwrap();
        assert_eq!(scanner.len(), 2);
        assert_eq!(scanner.scan("oh Darn it").as_deref(), Some("Darn"));

        std::fs::remove_file(&path).unwrap();
    }
}
