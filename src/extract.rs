//! Light text and keyword extraction for the build path.
//!
//! Documents are read as lossy UTF-8 and lowercased; keywords are the
//! alphanumeric tokens left after stopword removal, deduplicated in
//! first-seen order. A heavier extraction stage (document-format parsing,
//! part-of-speech tagging) can replace this module as long as it yields the
//! same shape: lowercased raw text plus deduplicated lowercase keywords.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use eyre::{Result, WrapErr};

/// English stopwords (NLTK list).
const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "did", "do", "does", "doing", "don", "down", "during", "each", "few", "for",
    "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself",
    "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just",
    "me", "more", "most", "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once",
    "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own", "s", "same", "she",
    "should", "so", "some", "such", "t", "than", "that", "the", "their", "theirs", "them",
    "themselves", "then", "there", "these", "they", "this", "those", "through", "to", "too",
    "under", "until", "up", "very", "was", "we", "were", "what", "when", "where", "which",
    "while", "who", "whom", "why", "will", "with", "you", "your", "yours", "yourself",
    "yourselves",
];

/// Reads a document as lowercased lossy UTF-8.
pub fn extract_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).wrap_err_with(|| format!("unable to read {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).to_lowercase())
}

/// Deduplicated keywords in first-seen order.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut keywords = Vec::new();
    for token in text.split(|c: char| !c.is_alphanumeric()) {
        if token.len() < 2 || token.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        if STOP_WORDS.contains(&token) {
            continue;
        }
        if seen.insert(token.to_string()) {
            keywords.push(token.to_string());
        }
    }
    keywords
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_are_deduplicated_in_first_seen_order() {
        let text = "the rabbit saw the white rabbit tumble past the hole";
        assert_eq!(
            extract_keywords(text),
            ["rabbit", "saw", "white", "tumble", "past", "hole"]
        );
    }

    #[test]
    fn stopwords_and_noise_are_dropped() {
        let text = "a cat and 42 dogs, i think";
        assert_eq!(extract_keywords(text), ["cat", "dogs", "think"]);
    }

    #[test]
    fn empty_text_yields_no_keywords() {
        assert!(extract_keywords("").is_empty());
        assert!(extract_keywords("a the of 1 2 3").is_empty());
    }

    #[test]
    fn extracted_text_is_lowercased() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alice.txt");
        fs::write(&path, "Curiouser AND Curiouser").unwrap();
        assert_eq!(extract_text(&path).unwrap(), "curiouser and curiouser");
    }
}
