//! Name and query normalization, applied identically at index and query time.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Punctuation that never contributes to matching. Commas are kept: they split phrases.
static PUNCTUATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[.;:!?"'`()\[\]{}<>#/\\|_\-]+"#).expect("valid regex"));

/// Lowercase, strip diacritics and punctuation, collapse whitespace.
///
/// "São Paulo" and "sao-paulo" both become "sao paulo".
pub fn normalize(value: &str) -> String {
    let folded: String = value
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase();
    PUNCTUATION_RE
        .replace_all(&folded, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalized comma-separated phrases, empty ones dropped.
pub fn phrases(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(normalize)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Normalized tokens with the phrase structure flattened.
pub fn tokens(value: &str) -> Vec<String> {
    phrases(value)
        .iter()
        .flat_map(|p| p.split(' ').map(String::from).collect::<Vec<_>>())
        .collect()
}

/// Shortest token that may match another within one edit.
pub const MIN_FUZZY_TOKEN_LEN: usize = 5;

/// Whether two normalized tokens are equal, or both long enough and one edit apart.
///
/// Shared by the store's token lookup and the match classifier so that every
/// fuzzy hit the store returns is also classified as a fuzzy match.
pub fn tokens_close(a: &str, b: &str) -> bool {
    a == b
        || (a.chars().count() >= MIN_FUZZY_TOKEN_LEN
            && b.chars().count() >= MIN_FUZZY_TOKEN_LEN
            && strsim::levenshtein(a, b) <= 1)
}

fn is_combining_mark(c: char) -> bool {
    matches!(c,
        '\u{0300}'..='\u{036F}' |
        '\u{1AB0}'..='\u{1AFF}' |
        '\u{1DC0}'..='\u{1DFF}' |
        '\u{20D0}'..='\u{20FF}' |
        '\u{FE20}'..='\u{FE2F}'
    )
}
