//! Département name resolution.

use ips_map_geography_models::departments::DEPARTMENTS;
use ips_map_source::text::normalize_name;

/// Words users put in front of a département name.
const PREFIX_WORDS: &[&str] = &["DEPARTEMENT", "DEPT", "DPT", "DEP"];

/// Articles ignored on both sides ("Bouches-du-Rhône", "La Réunion").
const ARTICLES: &[&str] = &["DU", "DE", "DES", "LA", "LE", "LES", "L", "D"];

/// Folds a département name or query: normalized, with hyphens and
/// apostrophes treated as spaces, "département" words and articles removed.
fn fold_department(raw: &str) -> String {
    let spaced: String = raw
        .chars()
        .map(|c| if matches!(c, '-' | '\'' | '’' | '.') { ' ' } else { c })
        .collect();
    normalize_name(&spaced)
        .split(' ')
        .filter(|word| {
            !word.is_empty() && !PREFIX_WORDS.contains(word) && !ARTICLES.contains(word)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolves a département from its name.
///
/// Exact match on the folded name first, then the first département whose
/// folded name contains the query. Returns `(code, official name)`.
#[must_use]
pub fn find_department_by_name(query: &str) -> Option<(&'static str, &'static str)> {
    let needle = fold_department(query);
    if needle.is_empty() {
        return None;
    }
    let folded: Vec<(usize, String)> = DEPARTMENTS
        .iter()
        .enumerate()
        .map(|(i, (_, name))| (i, fold_department(name)))
        .collect();

    folded
        .iter()
        .find(|(_, name)| *name == needle)
        .or_else(|| folded.iter().find(|(_, name)| name.contains(&needle)))
        .map(|(i, _)| DEPARTMENTS[*i])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_names() {
        assert_eq!(find_department_by_name("Paris"), Some(("75", "Paris")));
        assert_eq!(
            find_department_by_name("seine saint denis"),
            Some(("93", "Seine-Saint-Denis"))
        );
        assert_eq!(find_department_by_name("Côte-d'Or"), Some(("21", "Côte-d'Or")));
    }

    #[test]
    fn strips_department_prefix() {
        assert_eq!(find_department_by_name("Département Gironde"), Some(("33", "Gironde")));
        assert_eq!(find_department_by_name("dpt nord"), Some(("59", "Nord")));
        assert_eq!(find_department_by_name("Département du Nord"), Some(("59", "Nord")));
    }

    #[test]
    fn exact_beats_substring() {
        // "Loire" is also a substring of Haute-Loire, Loire-Atlantique, ...
        assert_eq!(find_department_by_name("loire"), Some(("42", "Loire")));
        assert_eq!(find_department_by_name("Savoie"), Some(("73", "Savoie")));
    }

    #[test]
    fn substring_fallback() {
        assert_eq!(find_department_by_name("atlantique"), Some(("44", "Loire-Atlantique")));
        assert_eq!(find_department_by_name("reunion"), Some(("974", "La Réunion")));
    }

    #[test]
    fn unknown_names() {
        assert!(find_department_by_name("Atlantis").is_none());
        assert!(find_department_by_name("département").is_none());
    }
}
