//! Establishment category classification.
//!
//! Maps a raw record to one of the three [`Category`] values using, in
//! order: the structured nature code, the free-text type labels, and the
//! primary/secondary degree flags. Records that match nothing are
//! unclassifiable and get dropped by the caller.

use std::str::FromStr as _;

use ips_map_school_models::Category;

use crate::fields::{CategoryAliases, extract_all_text, extract_flag, extract_text};
use crate::text::{contains_any, fold, has_token};

/// Classifies a record into a [`Category`].
///
/// Precedence, first match wins:
/// 1. `nature_uai` code ranges
/// 2. a label that is already a canonical category name
/// 3. high-school keywords (including vocational/technical variants)
/// 4. the middle-school keyword
/// 5. primary-school keywords
/// 6. degree flags (secondary is middle-school only when the name says so)
#[must_use]
pub fn classify(record: &serde_json::Value, aliases: &CategoryAliases) -> Option<Category> {
    if let Some(category) = extract_text(record, &aliases.code).and_then(|c| from_nature_code(&c))
    {
        return Some(category);
    }

    let labels = extract_all_text(record, &aliases.labels);
    if let Some(category) = labels
        .iter()
        .find_map(|label| Category::from_str(label.trim()).ok())
    {
        return Some(category);
    }

    if let Some(category) = from_label_text(&fold(&labels.join(" "))) {
        return Some(category);
    }

    from_degree_flags(record, aliases)
}

/// Maps a structured nature code to its category.
///
/// `100-199` are first-degree schools, `300-339` lycées and `340-352`
/// collèges. Other codes (specialized establishments) return `None`.
#[must_use]
pub fn from_nature_code(code: &str) -> Option<Category> {
    match code.trim().parse::<u16>().ok()? {
        100..=199 => Some(Category::School),
        300..=339 => Some(Category::HighSchool),
        340..=352 => Some(Category::MiddleSchool),
        _ => None,
    }
}

/// Keyword classification over already-folded label text.
#[must_use]
pub fn from_label_text(folded: &str) -> Option<Category> {
    if folded.is_empty() {
        return None;
    }

    // ── High school (checked first: "lycee" labels may mention "college") ──
    if contains_any(
        folded,
        &[
            "lycee",
            "polyvalent",
            "enseignement professionnel",
            "enseignement technologique",
        ],
    ) || ["lp", "lpo", "lgt", "legt", "lt"]
        .iter()
        .any(|token| has_token(folded, token))
    {
        return Some(Category::HighSchool);
    }

    // ── Middle school ───────────────────────────────────────────────
    if folded.contains("college") {
        return Some(Category::MiddleSchool);
    }

    // ── Primary ─────────────────────────────────────────────────────
    if contains_any(
        folded,
        &["ecole", "maternelle", "elementaire", "primaire"],
    ) {
        return Some(Category::School);
    }

    None
}

fn from_degree_flags(record: &serde_json::Value, aliases: &CategoryAliases) -> Option<Category> {
    if extract_flag(record, &aliases.primary_degree) {
        return Some(Category::School);
    }
    if extract_flag(record, &aliases.secondary_degree) {
        let name = fold(&extract_all_text(record, &aliases.names).join(" "));
        return Some(if name.contains("college") {
            Category::MiddleSchool
        } else {
            Category::HighSchool
        });
    }
    None
}
