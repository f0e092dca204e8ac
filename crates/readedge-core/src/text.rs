use unicode_normalization::UnicodeNormalization;

/// Keep only the characters a word lookup understands: ASCII letters,
/// hyphens and apostrophes (straight or curly).
///
/// Input is NFKC-normalized first so full-width letters survive.
pub fn clean_word(raw: &str) -> String {
    raw.nfkc()
        .filter(|c| c.is_ascii_alphabetic() || matches!(c, '-' | '\'' | '’'))
        .collect()
}

/// Identity key for word book entries
pub fn normalize_word(raw: &str) -> String {
    clean_word(raw).to_lowercase()
}

/// Whitespace-separated tokens that contain at least one letter.
///
/// Punctuation stays attached to the token; [`clean_word`] strips it at
/// lookup time.
pub fn selectable_tokens(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .filter(|token| token.chars().any(|c| c.is_ascii_alphabetic()))
        .collect()
}
