//! Département resolution for the ranking path.
//!
//! Simpler than location resolution: a code-shaped query is used as is,
//! otherwise the query is matched against département names, and as a
//! last resort the raw input is used verbatim as a code.

use std::sync::LazyLock;

use ips_map_geography::departments::find_department_by_name;
use ips_map_geography_models::departments::{department_name, is_department_code};
use regex::Regex;
use serde::Serialize;

/// Leading "département" / "dept" / "dpt" word, with optional punctuation.
static PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:d[ée]partement|dept|dpt)\b\.?\s*:?\s*").expect("valid regex")
});

/// The département a ranking query targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentTarget {
    /// Département code (uppercased).
    pub code: String,
    /// Display label: the official name when known, else the code.
    pub label: String,
}

/// Removes a leading "département"-style word from a query.
#[must_use]
pub fn strip_department_prefix(query: &str) -> &str {
    PREFIX_RE
        .find(query)
        .map_or(query, |m| &query[m.end()..])
        .trim()
}

/// Whether a query asks for a département ranking rather than a radius
/// search: it is code-shaped, or it starts with a "département" word.
#[must_use]
pub fn is_department_query(query: &str) -> bool {
    is_department_code(query).is_some() || PREFIX_RE.is_match(query)
}

/// Resolves a ranking query to a département.
///
/// Returns `None` only for a query that is empty after prefix removal.
#[must_use]
pub fn resolve_department(query: &str) -> Option<DepartmentTarget> {
    let stripped = strip_department_prefix(query);
    if stripped.is_empty() {
        return None;
    }

    if let Some(code) = is_department_code(stripped) {
        let label = department_name(&code).map_or_else(|| code.clone(), str::to_string);
        return Some(DepartmentTarget { code, label });
    }

    if let Some((code, name)) = find_department_by_name(stripped) {
        return Some(DepartmentTarget {
            code: code.to_string(),
            label: name.to_string(),
        });
    }

    log::debug!("No département named {stripped:?}; using it as a code");
    let code = stripped.to_uppercase();
    Some(DepartmentTarget {
        label: code.clone(),
        code,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_shaped_queries() {
        assert_eq!(
            resolve_department("75"),
            Some(DepartmentTarget {
                code: "75".to_string(),
                label: "Paris".to_string()
            })
        );
        assert_eq!(resolve_department("2b").unwrap().label, "Haute-Corse");
        assert_eq!(resolve_department("974").unwrap().label, "La Réunion");
    }

    #[test]
    fn prefixed_queries() {
        assert_eq!(resolve_department("Département 33").unwrap().code, "33");
        assert_eq!(resolve_department("dept. 13").unwrap().code, "13");
        assert_eq!(resolve_department("dpt: Gironde").unwrap().code, "33");
        assert_eq!(resolve_department("Département du Nord").unwrap().code, "59");
    }

    #[test]
    fn name_queries() {
        assert_eq!(resolve_department("Bouches-du-Rhône").unwrap().code, "13");
        assert_eq!(resolve_department("finistere").unwrap().code, "29");
    }

    #[test]
    fn unknown_input_is_used_verbatim() {
        assert_eq!(
            resolve_department("zz"),
            Some(DepartmentTarget {
                code: "ZZ".to_string(),
                label: "ZZ".to_string()
            })
        );
        assert!(resolve_department("département").is_none());
    }

    #[test]
    fn detects_ranking_queries() {
        assert!(is_department_query("75"));
        assert!(is_department_query("2A"));
        assert!(is_department_query("Département du Nord"));
        assert!(is_department_query("dpt 59"));
        assert!(!is_department_query("75001"));
        assert!(!is_department_query("Lyon"));
        assert!(!is_department_query("Deptford Road"));
    }

    #[test]
    fn strips_prefixes() {
        assert_eq!(strip_department_prefix("  DEPARTEMENT  Nord "), "Nord");
        assert_eq!(strip_department_prefix("Nord"), "Nord");
    }
}
