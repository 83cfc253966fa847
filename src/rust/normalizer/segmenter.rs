use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use log::info;
use unicode_normalization::UnicodeNormalization;

use super::charset::SENTENCE_PUNCTUATION;

/// Syllable count above which [`DictionarySegmenter`] refuses to segment.
/// Unlimited unless lowered with `with_max_syllables`.
pub const DEFAULT_MAX_SYLLABLES: usize = usize::MAX;

const BUILTIN_LEXICON: &str = include_str!("lexicon.txt");

/// Errors raised by a [`WordSegmenter`]. The normalizer recovers from all of
/// them by keeping the unsegmented text.
#[derive(Debug, thiserror::Error)]
pub enum SegmentationError {
    #[error("Input too long: {syllables} syllables (max: {max})")]
    InputTooLong { syllables: usize, max: usize },
    #[error("Segmenter failure: {0}")]
    Failed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum LexiconError {
    #[error("Failed to read lexicon {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Invalid lexicon entry on line {line}: {entry:?}")]
    InvalidEntry { line: usize, entry: String },
}

/// Joins multi-syllable Vietnamese words with `_` and returns the
/// space-joined result.
pub trait WordSegmenter: Send + Sync + fmt::Debug {
    fn segment(&self, text: &str) -> Result<String, SegmentationError>;
}

/// A set of multi-syllable compounds, stored as space-joined lowercase NFC syllables.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    entries: HashSet<String>,
    longest_entry: usize,
}

impl Lexicon {
    /// The compound list compiled into the crate.
    pub fn builtin() -> Self {
        let mut lexicon = Self::default();
        for line in BUILTIN_LEXICON.lines() {
            lexicon.insert(line);
        }
        lexicon
    }

    /// Parses lexicon text: one compound per line, `#` starts a comment line.
    ///
    /// Lines with fewer than two syllables or with sentence punctuation are rejected.
    pub fn parse(text: &str) -> Result<Self, LexiconError> {
        let mut lexicon = Self::default();
        for (idx, line) in text.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            if !lexicon.insert(trimmed) {
                return Err(LexiconError::InvalidEntry {
                    line: idx + 1,
                    entry: trimmed.to_string(),
                });
            }
        }
        Ok(lexicon)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LexiconError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| LexiconError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let lexicon = Self::parse(&text)?;
        info!("Loaded {} lexicon entries from {:?}", lexicon.len(), path);
        Ok(lexicon)
    }

    /// Adds a compound. Returns false (and adds nothing) for comments, blank
    /// lines, single syllables and entries containing sentence punctuation.
    pub fn insert(&mut self, compound: &str) -> bool {
        let trimmed = compound.trim();
        if trimmed.starts_with('#') || trimmed.contains(|c| SENTENCE_PUNCTUATION.contains(c)) {
            return false;
        }
        let normalized: String = trimmed.nfc().collect::<String>().to_lowercase();
        let syllables: Vec<&str> = normalized.split_whitespace().collect();
        if syllables.len() < 2 {
            return false;
        }
        self.longest_entry = self.longest_entry.max(syllables.len());
        self.entries.insert(syllables.join(" "));
        true
    }

    pub fn extend(&mut self, other: Lexicon) {
        self.longest_entry = self.longest_entry.max(other.longest_entry);
        self.entries.extend(other.entries);
    }

    pub fn contains(&self, syllables: &[&str]) -> bool {
        syllables.len() >= 2 && self.entries.contains(&syllables.join(" "))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Greedy longest-match segmenter over a [`Lexicon`].
///
/// Sentence punctuation is detached from the syllable it touches, except a
/// `.` or `,` sitting between two digits (`3.5`, `1,2`). Compounds never span
/// punctuation.
#[derive(Debug, Clone)]
pub struct DictionarySegmenter {
    lexicon: Lexicon,
    max_syllables: usize,
}

impl Default for DictionarySegmenter {
    fn default() -> Self {
        Self::new(Lexicon::builtin())
    }
}

impl DictionarySegmenter {
    pub fn new(lexicon: Lexicon) -> Self {
        Self {
            lexicon,
            max_syllables: DEFAULT_MAX_SYLLABLES,
        }
    }

    pub fn with_max_syllables(mut self, max_syllables: usize) -> Self {
        self.max_syllables = max_syllables;
        self
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    fn longest_match(&self, rest: &[&str]) -> usize {
        let limit = rest.len().min(self.lexicon.longest_entry);
        (2..=limit)
            .rev()
            .find(|&len| self.lexicon.contains(&rest[..len]))
            .unwrap_or(1)
    }
}

impl WordSegmenter for DictionarySegmenter {
    fn segment(&self, text: &str) -> Result<String, SegmentationError> {
        let syllables = split_syllables(text);
        if syllables.len() > self.max_syllables {
            return Err(SegmentationError::InputTooLong {
                syllables: syllables.len(),
                max: self.max_syllables,
            });
        }

        let mut words = Vec::with_capacity(syllables.len());
        let mut i = 0;
        while i < syllables.len() {
            let span = self.longest_match(&syllables[i..]);
            words.push(syllables[i..i + span].join("_"));
            i += span;
        }
        Ok(words.join(" "))
    }
}

fn split_syllables(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    for word in text.split_whitespace() {
        let chars: Vec<(usize, char)> = word.char_indices().collect();
        let mut start = 0;
        for (i, &(offset, c)) in chars.iter().enumerate() {
            if !SENTENCE_PUNCTUATION.contains(c) || is_numeric_separator(&chars, i) {
                continue;
            }
            if start < offset {
                out.push(&word[start..offset]);
            }
            let end = offset + c.len_utf8();
            out.push(&word[offset..end]);
            start = end;
        }
        if start < word.len() {
            out.push(&word[start..]);
        }
    }
    out
}

fn is_numeric_separator(chars: &[(usize, char)], i: usize) -> bool {
    matches!(chars[i].1, '.' | ',')
        && i > 0
        && i + 1 < chars.len()
        && chars[i - 1].1.is_ascii_digit()
        && chars[i + 1].1.is_ascii_digit()
}
