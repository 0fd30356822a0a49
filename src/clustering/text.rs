//! Text normalization ahead of vectorization.
//!
//! Every document goes through the same steps: ASCII punctuation is removed,
//! the text is lowercased and split into word and symbol tokens, and tokens
//! that are stopwords or not purely alphanumeric are dropped. Survivors are
//! joined with single spaces.

use crate::error::StopwordsError;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, instrument};

const ENGLISH: &str = include_str!("stopwords_en.txt");

/// Runs of word characters, or runs of anything that is neither word nor space.
static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+|[^\w\s]+").unwrap());

/// A set of lowercase words excluded from features.
#[derive(Debug, Clone)]
pub struct Stopwords {
    words: HashSet<String>,
}

impl Stopwords {
    /// The built-in English list.
    pub fn english() -> Self {
        Self::parse(ENGLISH)
    }

    /// Load a list with one word per line. Blank lines and `#` comments are ignored.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn from_file(path: &Path) -> Result<Self, StopwordsError> {
        let raw = std::fs::read_to_string(path).map_err(|source| StopwordsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let stopwords = Self::parse(&raw);
        info!(count = stopwords.len(), "Loaded stopword list");
        Ok(stopwords)
    }

    fn parse(raw: &str) -> Self {
        let words = raw
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(str::to_lowercase)
            .collect();
        Self { words }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Normalize `text` into a space-separated string of feature tokens.
    pub fn normalize(&self, text: &str) -> String {
        let stripped = text
            .chars()
            .filter(|c| !c.is_ascii_punctuation())
            .collect::<String>()
            .to_lowercase();

        TOKEN
            .find_iter(&stripped)
            .map(|m| m.as_str())
            .filter(|t| t.chars().all(char::is_alphanumeric))
            .filter(|t| !self.contains(t))
            .join(" ")
    }
}

impl Default for Stopwords {
    fn default() -> Self {
        Self::english()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_english_list_is_loaded() {
        let sw = Stopwords::english();
        assert_eq!(sw.len(), 179);
        assert!(sw.contains("the"));
        assert!(sw.contains("wouldn't"));
        assert!(!sw.contains("election"));
    }

    #[test]
    fn test_normalize_drops_stopwords_and_punctuation() {
        let sw = Stopwords::english();
        assert_eq!(
            sw.normalize("The President's visit: a turning point?"),
            "presidents visit turning point"
        );
    }

    #[test]
    fn test_normalize_lowercases_and_collapses_whitespace() {
        let sw = Stopwords::english();
        assert_eq!(sw.normalize("  Floods   HIT\tEurope  "), "floods hit europe");
    }

    #[test]
    fn test_normalize_drops_non_alphanumeric_tokens() {
        let sw = Stopwords::english();
        // Curly quotes and dashes are not ASCII punctuation, so they survive
        // stripping and are removed as standalone symbol tokens.
        assert_eq!(sw.normalize("Talks \u{2014} \u{201c}stalled\u{201d}"), "talks stalled");
    }

    #[test]
    fn test_normalize_keeps_digits() {
        let sw = Stopwords::english();
        assert_eq!(sw.normalize("G20 summit in 2024"), "g20 summit 2024");
    }

    #[test]
    fn test_normalize_empty() {
        let sw = Stopwords::english();
        assert_eq!(sw.normalize(""), "");
        assert_eq!(sw.normalize("the and of"), "");
    }

    #[test]
    fn test_from_file_skips_comments_and_blanks() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# custom list\n\nBBC\nnews\n").unwrap();

        let sw = Stopwords::from_file(file.path()).unwrap();
        assert_eq!(sw.len(), 2);
        assert!(sw.contains("bbc"));
        assert_eq!(sw.normalize("BBC News: the markets"), "the markets");
    }

    #[test]
    fn test_from_file_missing_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Stopwords::from_file(&dir.path().join("nope.txt"));
        assert!(matches!(result, Err(StopwordsError::Io { .. })));
    }
}
