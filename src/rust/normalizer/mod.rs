//! Vietnamese text normalization.
//!
//! [`TextNormalizer::normalize`] turns raw, noisy news text into the form the
//! TF-IDF vectorizer was trained on. The stages run in a fixed order:
//!
//! 1. NFC composition and lowercasing
//! 2. emoji removal
//! 3. URL, email, phone number and HTML tag removal
//! 4. `_` to space, whitespace collapse
//! 5. character allowlist filter, whitespace collapse
//! 6. repeated character and repeated punctuation collapse
//! 7. word segmentation (compounds joined with `_`)
//! 8. optional stopword removal
//! 9. number normalization (currently the identity)
//!
//! No stage fails. A segmenter error keeps the unsegmented text and is
//! counted in [`TextNormalizer::segmentation_failures`].

mod charset;
mod patterns;
mod segmenter;
mod stopwords;

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use lazy_static::lazy_static;
use log::warn;
use unicode_normalization::UnicodeNormalization;

pub use charset::{
    filter_allowed, is_allowed, is_emoji, strip_emoji, ALLOWED_PUNCTUATION, EMOJI_MARKERS, EMOJI_RANGES,
    VIETNAMESE_LETTERS,
};
pub use segmenter::{
    DictionarySegmenter, Lexicon, LexiconError, SegmentationError, WordSegmenter, DEFAULT_MAX_SYLLABLES,
};
pub use stopwords::{is_stopword, remove_stopwords, VIETNAMESE_STOPWORDS};

/// Runs of at least this many identical characters collapse to one.
pub const REPEAT_COLLAPSE_MIN: usize = 3;

lazy_static! {
    static ref DEFAULT_NORMALIZER: TextNormalizer = TextNormalizer::default();
}

/// Normalizes `text` with the built-in lexicon.
///
/// ```
/// let text = tingia::normalize("Học sinh ĐI HỌC!!!", false);
/// assert_eq!(text, "học_sinh đi học !");
/// ```
pub fn normalize(text: &str, remove_stopwords: bool) -> String {
    DEFAULT_NORMALIZER.normalize(text, remove_stopwords)
}

/// Text cleanup up to (and including) the allowlist filter: lowercase, strip
/// emoji, URLs, emails, phone numbers and HTML tags, then restrict to the
/// allowed character set with whitespace collapsed.
///
/// The input is composed to NFC before lowercasing, so decomposed diacritics
/// (`a\u{301}`) come out as the precomposed letter (`á`) instead of being
/// dropped by the allowlist.
pub fn clean_text(text: &str) -> String {
    let text = text.nfc().collect::<String>().to_lowercase();
    let text = strip_emoji(&text);
    let text = patterns::URL.replace_all(&text, "");
    let text = patterns::EMAIL.replace_all(&text, "");
    let text = patterns::PHONE.replace_all(&text, "");
    let text = patterns::HTML_TAG.replace_all(&text, "");
    let text = text.replace('_', " ");
    let text = patterns::collapse_whitespace(&text);
    let text = filter_allowed(&text);
    patterns::collapse_whitespace(&text)
}

/// Collapses any character repeated [`REPEAT_COLLAPSE_MIN`] or more times in a
/// row to a single instance. Newline runs are left alone.
pub fn collapse_repeated_chars(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        let mut run = 1;
        while chars.peek() == Some(&c) {
            chars.next();
            run += 1;
        }
        let keep = if run >= REPEAT_COLLAPSE_MIN && c != '\n' { 1 } else { run };
        out.extend(std::iter::repeat(c).take(keep));
    }
    out
}

/// Collapses runs of two or more `.`, `!` or `?` to one.
pub fn collapse_repeated_punctuation(text: &str) -> String {
    let text = patterns::DOTS.replace_all(text, ".");
    let text = patterns::BANGS.replace_all(&text, "!");
    patterns::QUESTIONS.replace_all(&text, "?").into_owned()
}

/// Reserved for number normalization; returns the text unchanged.
pub fn normalize_numbers(text: String) -> String {
    text
}

/// The normalization pipeline with its word segmenter.
///
/// Shareable across threads; the only interior state is the failure counter.
#[derive(Debug)]
pub struct TextNormalizer {
    segmenter: Box<dyn WordSegmenter>,
    segmentation_failures: AtomicU64,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(Box::new(DictionarySegmenter::default()))
    }
}

impl TextNormalizer {
    pub fn new(segmenter: Box<dyn WordSegmenter>) -> Self {
        Self {
            segmenter,
            segmentation_failures: AtomicU64::new(0),
        }
    }

    pub fn builder() -> NormalizerBuilder {
        NormalizerBuilder::new()
    }

    /// Runs the full pipeline. Never fails; empty input gives empty output.
    pub fn normalize(&self, text: &str, remove_stopwords: bool) -> String {
        let text = clean_text(text);
        let text = collapse_repeated_chars(&text);
        let text = collapse_repeated_punctuation(&text);
        let mut text = self.segment(text);
        if remove_stopwords {
            text = stopwords::remove_stopwords(&text);
        }
        normalize_numbers(text)
    }

    /// Like [`normalize`](Self::normalize), with a missing input mapping to "".
    pub fn normalize_opt(&self, text: Option<&str>, remove_stopwords: bool) -> String {
        text.map(|t| self.normalize(t, remove_stopwords)).unwrap_or_default()
    }

    /// Number of times the segmenter failed and the pipeline fell back.
    pub fn segmentation_failures(&self) -> u64 {
        self.segmentation_failures.load(Ordering::Relaxed)
    }

    fn segment(&self, text: String) -> String {
        if text.is_empty() {
            return text;
        }
        match self.segmenter.segment(&text) {
            Ok(segmented) => segmented,
            Err(e) => {
                let failures = self.segmentation_failures.fetch_add(1, Ordering::Relaxed) + 1;
                warn!("Word segmentation failed ({} total), keeping unsegmented text: {}", failures, e);
                text
            }
        }
    }
}

/// Builder for a [`TextNormalizer`] with a custom segmenter or lexicon.
#[derive(Debug)]
pub struct NormalizerBuilder {
    lexicon: Lexicon,
    max_syllables: usize,
    segmenter: Option<Box<dyn WordSegmenter>>,
}

impl Default for NormalizerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NormalizerBuilder {
    pub fn new() -> Self {
        Self {
            lexicon: Lexicon::builtin(),
            max_syllables: DEFAULT_MAX_SYLLABLES,
            segmenter: None,
        }
    }

    /// Adds the compounds in `path` to the built-in lexicon.
    pub fn with_lexicon_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, LexiconError> {
        self.lexicon.extend(Lexicon::from_file(path)?);
        Ok(self)
    }

    pub fn with_lexicon(mut self, lexicon: Lexicon) -> Self {
        self.lexicon = lexicon;
        self
    }

    pub fn with_max_syllables(mut self, max_syllables: usize) -> Self {
        self.max_syllables = max_syllables;
        self
    }

    /// Replaces the dictionary segmenter; lexicon settings are then ignored.
    pub fn with_segmenter(mut self, segmenter: Box<dyn WordSegmenter>) -> Self {
        self.segmenter = Some(segmenter);
        self
    }

    pub fn build(self) -> TextNormalizer {
        let segmenter: Box<dyn WordSegmenter> = match self.segmenter {
            Some(segmenter) => segmenter,
            None => Box::new(DictionarySegmenter::new(self.lexicon).with_max_syllables(self.max_syllables)),
        };
        TextNormalizer::new(segmenter)
    }
}
