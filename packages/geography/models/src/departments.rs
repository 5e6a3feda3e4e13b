//! French département code utilities.
//!
//! Provides the département code/name table (metropolitan France, Corsica
//! and the five overseas départements), code validation, canonicalization
//! of the various spellings used across datasets, and derivation from
//! postal codes.

/// Département codes and official names, in code order.
pub const DEPARTMENTS: &[(&str, &str)] = &[
    ("01", "Ain"),
    ("02", "Aisne"),
    ("03", "Allier"),
    ("04", "Alpes-de-Haute-Provence"),
    ("05", "Hautes-Alpes"),
    ("06", "Alpes-Maritimes"),
    ("07", "Ardèche"),
    ("08", "Ardennes"),
    ("09", "Ariège"),
    ("10", "Aube"),
    ("11", "Aude"),
    ("12", "Aveyron"),
    ("13", "Bouches-du-Rhône"),
    ("14", "Calvados"),
    ("15", "Cantal"),
    ("16", "Charente"),
    ("17", "Charente-Maritime"),
    ("18", "Cher"),
    ("19", "Corrèze"),
    ("2A", "Corse-du-Sud"),
    ("2B", "Haute-Corse"),
    ("21", "Côte-d'Or"),
    ("22", "Côtes-d'Armor"),
    ("23", "Creuse"),
    ("24", "Dordogne"),
    ("25", "Doubs"),
    ("26", "Drôme"),
    ("27", "Eure"),
    ("28", "Eure-et-Loir"),
    ("29", "Finistère"),
    ("30", "Gard"),
    ("31", "Haute-Garonne"),
    ("32", "Gers"),
    ("33", "Gironde"),
    ("34", "Hérault"),
    ("35", "Ille-et-Vilaine"),
    ("36", "Indre"),
    ("37", "Indre-et-Loire"),
    ("38", "Isère"),
    ("39", "Jura"),
    ("40", "Landes"),
    ("41", "Loir-et-Cher"),
    ("42", "Loire"),
    ("43", "Haute-Loire"),
    ("44", "Loire-Atlantique"),
    ("45", "Loiret"),
    ("46", "Lot"),
    ("47", "Lot-et-Garonne"),
    ("48", "Lozère"),
    ("49", "Maine-et-Loire"),
    ("50", "Manche"),
    ("51", "Marne"),
    ("52", "Haute-Marne"),
    ("53", "Mayenne"),
    ("54", "Meurthe-et-Moselle"),
    ("55", "Meuse"),
    ("56", "Morbihan"),
    ("57", "Moselle"),
    ("58", "Nièvre"),
    ("59", "Nord"),
    ("60", "Oise"),
    ("61", "Orne"),
    ("62", "Pas-de-Calais"),
    ("63", "Puy-de-Dôme"),
    ("64", "Pyrénées-Atlantiques"),
    ("65", "Hautes-Pyrénées"),
    ("66", "Pyrénées-Orientales"),
    ("67", "Bas-Rhin"),
    ("68", "Haut-Rhin"),
    ("69", "Rhône"),
    ("70", "Haute-Saône"),
    ("71", "Saône-et-Loire"),
    ("72", "Sarthe"),
    ("73", "Savoie"),
    ("74", "Haute-Savoie"),
    ("75", "Paris"),
    ("76", "Seine-Maritime"),
    ("77", "Seine-et-Marne"),
    ("78", "Yvelines"),
    ("79", "Deux-Sèvres"),
    ("80", "Somme"),
    ("81", "Tarn"),
    ("82", "Tarn-et-Garonne"),
    ("83", "Var"),
    ("84", "Vaucluse"),
    ("85", "Vendée"),
    ("86", "Vienne"),
    ("87", "Haute-Vienne"),
    ("88", "Vosges"),
    ("89", "Yonne"),
    ("90", "Territoire de Belfort"),
    ("91", "Essonne"),
    ("92", "Hauts-de-Seine"),
    ("93", "Seine-Saint-Denis"),
    ("94", "Val-de-Marne"),
    ("95", "Val-d'Oise"),
    ("971", "Guadeloupe"),
    ("972", "Martinique"),
    ("973", "Guyane"),
    ("974", "La Réunion"),
    ("976", "Mayotte"),
];

/// Maps a canonical département code to its official name.
#[must_use]
pub fn department_name(code: &str) -> Option<&'static str> {
    DEPARTMENTS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Checks whether `raw` is shaped like a département code: two digits,
/// `2A`/`2B`, or `971`-`976`.
///
/// Returns the trimmed, uppercased code on success.
#[must_use]
pub fn is_department_code(raw: &str) -> Option<String> {
    let code = raw.trim().to_uppercase();
    let bytes = code.as_bytes();
    let valid = match bytes {
        [a, b] => (a.is_ascii_digit() && b.is_ascii_digit()) || code == "2A" || code == "2B",
        [b'9', b'7', c] => (b'1'..=b'6').contains(c),
        _ => false,
    };
    valid.then_some(code)
}

/// Canonicalizes a département code as spelled by any dataset.
///
/// Uppercases, strips the leading zero of three-character metropolitan
/// codes (`"075"` → `"75"`, `"02A"` → `"2A"`) and left-pads single digits
/// (`"1"` → `"01"`). Returns `None` for empty or non-alphanumeric input.
#[must_use]
pub fn canonical_department(raw: &str) -> Option<String> {
    let upper = raw.trim().to_uppercase();
    let code = match upper.len() {
        3 if upper.starts_with('0') => upper[1..].to_string(),
        1 if upper.chars().all(|c| c.is_ascii_digit()) => format!("0{upper}"),
        _ => upper,
    };
    let well_formed =
        (2..=3).contains(&code.len()) && code.chars().all(|c| c.is_ascii_alphanumeric());
    well_formed.then_some(code)
}

/// Normalizes a postal code to five ASCII digits.
///
/// Codes that lost their leading zero through numeric encoding
/// (`1000` → `"01000"`) are left-padded.
#[must_use]
pub fn normalize_postal_code(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    match trimmed.len() {
        4 => Some(format!("0{trimmed}")),
        5 => Some(trimmed.to_string()),
        _ => None,
    }
}

/// Whether `raw` is exactly five ASCII digits (after trimming).
#[must_use]
pub fn is_postal_code(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.len() == 5 && trimmed.chars().all(|c| c.is_ascii_digit())
}

/// Derives the département code from a five-digit postal code.
///
/// Corsica splits at 20200 (`2A` below, `2B` from there); overseas codes
/// (`97xxx`, `98xxx`) use their first three digits.
#[must_use]
pub fn department_from_postal_code(postal_code: &str) -> Option<String> {
    let cp = normalize_postal_code(postal_code)?;
    match &cp[..2] {
        "20" => {
            let n: u32 = cp.parse().ok()?;
            Some(if n < 20_200 { "2A" } else { "2B" }.to_string())
        }
        "97" | "98" => Some(cp[..3].to_string()),
        prefix => Some(prefix.to_string()),
    }
}

/// Whether the postal-code-prefix fallback applies to `code`: purely
/// numeric codes (metropolitan or overseas) share their prefix with the
/// postal codes of the département. Corsican codes do not.
#[must_use]
pub fn supports_postal_prefix(code: &str) -> bool {
    !code.is_empty() && code.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn department_count() {
        assert_eq!(DEPARTMENTS.len(), 101);
    }

    #[test]
    fn every_table_code_is_valid() {
        for (code, _) in DEPARTMENTS {
            assert_eq!(
                is_department_code(code).as_deref(),
                Some(*code),
                "table code {code} rejected"
            );
        }
    }

    #[test]
    fn names_resolve() {
        assert_eq!(department_name("75"), Some("Paris"));
        assert_eq!(department_name("2B"), Some("Haute-Corse"));
        assert_eq!(department_name("974"), Some("La Réunion"));
        assert_eq!(department_name("99"), None);
    }

    #[test]
    fn code_pattern() {
        assert_eq!(is_department_code(" 2a ").as_deref(), Some("2A"));
        assert_eq!(is_department_code("976").as_deref(), Some("976"));
        assert!(is_department_code("975").is_none());
        assert!(is_department_code("750").is_none());
        assert!(is_department_code("7").is_none());
        assert!(is_department_code("Paris").is_none());
    }

    #[test]
    fn canonicalizes_dataset_spellings() {
        assert_eq!(canonical_department("075").as_deref(), Some("75"));
        assert_eq!(canonical_department("02a").as_deref(), Some("2A"));
        assert_eq!(canonical_department("1").as_deref(), Some("01"));
        assert_eq!(canonical_department("971").as_deref(), Some("971"));
        assert!(canonical_department("").is_none());
        assert!(canonical_department("7-5").is_none());
    }

    #[test]
    fn normalizes_postal_codes() {
        assert_eq!(normalize_postal_code("1000").as_deref(), Some("01000"));
        assert_eq!(normalize_postal_code(" 75001 ").as_deref(), Some("75001"));
        assert!(normalize_postal_code("750").is_none());
        assert!(normalize_postal_code("75O01").is_none());
    }

    #[test]
    fn derives_department_from_postal_code() {
        assert_eq!(department_from_postal_code("75001").as_deref(), Some("75"));
        assert_eq!(department_from_postal_code("01000").as_deref(), Some("01"));
        assert_eq!(department_from_postal_code("20000").as_deref(), Some("2A"));
        assert_eq!(department_from_postal_code("20200").as_deref(), Some("2B"));
        assert_eq!(department_from_postal_code("97400").as_deref(), Some("974"));
        assert!(department_from_postal_code("abc").is_none());
    }

    #[test]
    fn postal_prefix_support() {
        assert!(supports_postal_prefix("75"));
        assert!(supports_postal_prefix("971"));
        assert!(!supports_postal_prefix("2A"));
    }
}
