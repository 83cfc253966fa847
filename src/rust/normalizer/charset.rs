//! Static character tables used by the cleanup stages: the emoji ranges removed
//! outright and the allowlist every surviving character must belong to.

/// Inclusive code point ranges stripped by [`strip_emoji`].
///
/// Several ranges overlap (the enclosed-alphanumerics span reaches into the
/// supplementary plane, which the catch-all covers again). Membership is what
/// matters, so the overlap is kept as-is.
pub const EMOJI_RANGES: &[(u32, u32)] = &[
    (0x1F600, 0x1F64F), // emoticons
    (0x1F300, 0x1F5FF), // symbols & pictographs
    (0x1F680, 0x1F6FF), // transport & map symbols
    (0x1F1E0, 0x1F1FF), // flags
    (0x2702, 0x27B0),   // dingbats
    (0x24C2, 0x1F251),  // enclosed alphanumerics
    (0x1F926, 0x1F937), // extra emoticons
    (0x10000, 0x10FFFF),
    (0x2640, 0x2642),
    (0x2600, 0x2B55),
];

/// Standalone marker code points stripped alongside [`EMOJI_RANGES`].
pub const EMOJI_MARKERS: &[u32] = &[0x200D, 0x23CF, 0x23E9, 0x231A, 0xFE0F, 0x3030];

/// The 67 lowercase Vietnamese letters carrying diacritics (plus `đ`).
pub const VIETNAMESE_LETTERS: &str = "àáạảãâầấậẩẫăằắặẳẵèéẹẻẽêềếệểễìíịỉĩòóọỏõôồốộổỗơờớợởỡùúụủũưừứựửữỳýỵỷỹđ";

/// Punctuation that survives the allowlist filter.
pub const ALLOWED_PUNCTUATION: &str = ".,!?_-";

/// Sentence punctuation the segmenter detaches from words.
pub(crate) const SENTENCE_PUNCTUATION: &str = ".,!?";

pub fn is_emoji(c: char) -> bool {
    let cp = c as u32;
    EMOJI_MARKERS.contains(&cp) || EMOJI_RANGES.iter().any(|&(lo, hi)| (lo..=hi).contains(&cp))
}

/// Returns true when `c` may appear in normalized text.
pub fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || c.is_whitespace()
        || ALLOWED_PUNCTUATION.contains(c)
        || VIETNAMESE_LETTERS.contains(c)
}

/// Removes every emoji character without leaving a replacement behind.
pub fn strip_emoji(text: &str) -> String {
    text.chars().filter(|&c| !is_emoji(c)).collect()
}

/// Replaces each character outside the allowlist with a single space.
pub fn filter_allowed(text: &str) -> String {
    text.chars()
        .map(|c| if is_allowed(c) { c } else { ' ' })
        .collect()
}
