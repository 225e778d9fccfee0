//! Pronunciation dictionary.
//!
//! One entry per line: `word<whitespace>/ipa/`, optionally followed by
//! alternative pronunciations separated by commas (`/a/, /b/`). Only the
//! first pronunciation is kept.

use std::collections::HashMap;
use std::io;
use std::path::Path;

use crate::converter::ipa::ipa_to_english;

#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    entries: HashMap<String, String>,
}

impl Dictionary {
    /// Parse dictionary text. Malformed lines are skipped.
    pub fn parse(content: &str) -> Self {
        let mut entries = HashMap::new();
        for line in content.lines() {
            let mut fields = line.split_whitespace();
            let Some(word) = fields.next() else {
                continue;
            };
            let pronunciations = fields.collect::<Vec<_>>().join(" ");
            let Some(ipa) = first_pronunciation(&pronunciations) else {
                continue;
            };
            entries.insert(word.to_lowercase(), ipa.to_string());
        }
        Self { entries }
    }

    pub async fn load(path: &Path) -> io::Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        Ok(Self::parse(&content))
    }

    /// Load `path`, or fall back to an empty dictionary with a warning.
    pub async fn load_or_empty(path: &Path) -> Self {
        match Self::load(path).await {
            Ok(dictionary) => {
                tracing::info!(path = %path.display(), entries = dictionary.len(), "Dictionary loaded");
                dictionary
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Dictionary unavailable, words will pass through unchanged"
                );
                Self::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// IPA transcription of `word`, case-insensitive.
    pub fn lookup(&self, word: &str) -> Option<&str> {
        self.entries.get(&word.to_lowercase()).map(String::as_str)
    }

    /// English-sound rendering of one word; unknown words are returned unchanged.
    pub fn convert_word(&self, word: &str) -> String {
        match self.lookup(word) {
            Some(ipa) => ipa_to_english(ipa),
            None => word.to_string(),
        }
    }

    /// Convert every whitespace-separated word and join with single spaces.
    pub fn convert_text(&self, text: &str) -> String {
        text.split_whitespace()
            .map(|word| self.convert_word(word))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn first_pronunciation(field: &str) -> Option<&str> {
    let first = field.split(',').next()?.trim();
    let ipa = first.trim_matches('/').trim();
    (!ipa.is_empty()).then_some(ipa)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
hat\t/hæt/
Jump\t/dʒʌmp/
read\t/ɹiːd/, /ɹɛd/

lonely
ship /ʃɪp/
";

    #[test]
    fn parses_entries_and_skips_malformed_lines() {
        let dictionary = Dictionary::parse(SAMPLE);
        assert_eq!(dictionary.len(), 4);
        assert_eq!(dictionary.lookup("hat"), Some("hæt"));
        assert_eq!(dictionary.lookup("lonely"), None);
    }

    #[test]
    fn keys_and_lookups_are_case_insensitive() {
        let dictionary = Dictionary::parse(SAMPLE);
        assert_eq!(dictionary.lookup("jump"), Some("dʒʌmp"));
        assert_eq!(dictionary.lookup("HAT"), Some("hæt"));
    }

    #[test]
    fn first_pronunciation_wins() {
        let dictionary = Dictionary::parse(SAMPLE);
        assert_eq!(dictionary.lookup("read"), Some("ɹiːd"));
    }

    #[test]
    fn converts_text_word_by_word() {
        let dictionary = Dictionary::parse(SAMPLE);
        assert_eq!(dictionary.convert_text("hat  Jump\nship"), "h-a-t j-u-m-p sh-ih-p");
    }

    #[test]
    fn unknown_words_pass_through() {
        let dictionary = Dictionary::parse(SAMPLE);
        assert_eq!(dictionary.convert_text("hat xyzzy"), "h-a-t xyzzy");
        assert_eq!(dictionary.convert_text("   "), "");
    }

    #[tokio::test]
    async fn missing_file_yields_empty_dictionary() {
        let dictionary = Dictionary::load_or_empty(Path::new("/no/such/dictionary.txt")).await;
        assert!(dictionary.is_empty());
    }
}
