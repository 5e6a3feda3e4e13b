//! Text folding shared by classification, gazetteer and station matching.
//!
//! Labels arrive with and without diacritics, in any case, with stray
//! whitespace. Every comparison in the pipeline goes through one of the
//! folds below, applied symmetrically to the data and to the query.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Regex to collapse runs of whitespace into a single space.
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Removes diacritics by decomposing to NFD and dropping combining marks.
///
/// `"Élémentaire"` becomes `"Elementaire"`.
#[must_use]
pub fn strip_diacritics(input: &str) -> String {
    input.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Diacritic-free, lowercased form used for keyword matching.
#[must_use]
pub fn fold(input: &str) -> String {
    strip_diacritics(input).to_lowercase()
}

/// Diacritic-free, uppercased, whitespace-collapsed form used for name
/// lookups (communes, départements, establishments).
#[must_use]
pub fn normalize_name(input: &str) -> String {
    let upper = strip_diacritics(input).to_uppercase();
    WHITESPACE_RE.replace_all(upper.trim(), " ").into_owned()
}

/// Returns `true` if `haystack` contains any of the given `needles`.
#[must_use]
pub fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Returns `true` if `token` appears in `haystack` as a whole word
/// (delimited by non-alphanumeric characters or the string ends).
#[must_use]
pub fn has_token(haystack: &str, token: &str) -> bool {
    haystack
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| word == token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_french_diacritics() {
        assert_eq!(strip_diacritics("Lycée Élémentaire"), "Lycee Elementaire");
        assert_eq!(strip_diacritics("Privé sous contrat"), "Prive sous contrat");
    }

    #[test]
    fn folds_to_lowercase() {
        assert_eq!(fold("COLLÈGE Jean Moulin"), "college jean moulin");
    }

    #[test]
    fn normalizes_names() {
        assert_eq!(normalize_name("  saint-étienne   du  rouvray "), "SAINT-ETIENNE DU ROUVRAY");
    }

    #[test]
    fn matches_whole_tokens_only() {
        assert!(has_token("lp jean jaures", "lp"));
        assert!(has_token("lycee (lp)", "lp"));
        assert!(!has_token("alpes", "lp"));
    }
}
