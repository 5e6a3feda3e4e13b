//! Declarative field aliases and the generic field extractor.
//!
//! Each public dataset revision names the same concept differently
//! (`numero_uai`, `identifiant_de_l_etablissement`, `uai`, ...). Instead of
//! guessing keys at every call site, every known spelling of a concept is
//! listed once in `aliases/aliases.toml` and consumed through
//! [`extract_field`].

use std::sync::LazyLock;

use serde::Deserialize;

/// Aliases for every concept of every dataset, grouped by dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct AliasTable {
    /// Establishment directory records.
    pub establishment: EstablishmentAliases,
    /// IPS export rows.
    pub social_index: SocialIndexAliases,
    /// Commune gazetteer rows.
    pub gazetteer: GazetteerAliases,
    /// Transit station rows.
    pub station: StationAliases,
}

/// Aliases for establishment directory records.
#[derive(Debug, Clone, Deserialize)]
pub struct EstablishmentAliases {
    /// UAI identifier.
    pub id: Vec<String>,
    /// Display name.
    pub name: Vec<String>,
    /// Commune name.
    pub commune: Vec<String>,
    /// Postal code.
    pub postal_code: Vec<String>,
    /// Explicit département code.
    pub department: Vec<String>,
    /// Street address.
    pub address: Vec<String>,
    /// Public/private sector, as code or label.
    pub sector: Vec<String>,
    /// Private contract type; non-empty implies the private sector.
    #[serde(default)]
    pub contract_type: Vec<String>,
    /// Inputs of the category classifier.
    pub category: CategoryAliases,
    /// Coordinate encodings.
    pub geometry: GeometryAliases,
}

/// Inputs of the category classifier.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryAliases {
    /// Structured nature code (`nature_uai`).
    pub code: Vec<String>,
    /// Free-text type labels, concatenated before keyword matching.
    pub labels: Vec<String>,
    /// Name fields consulted by the degree-flag fallback.
    #[serde(default)]
    pub names: Vec<String>,
    /// Primary-degree boolean flags.
    #[serde(default)]
    pub primary_degree: Vec<String>,
    /// Secondary-degree boolean flags.
    #[serde(default)]
    pub secondary_degree: Vec<String>,
}

/// Where coordinates may be found in a record.
#[derive(Debug, Clone, Deserialize)]
pub struct GeometryAliases {
    /// Keys holding a coordinate container (object, `GeoJSON`, string or
    /// pair).
    pub containers: Vec<String>,
    /// Flat latitude keys at the record root.
    pub latitude: Vec<String>,
    /// Flat longitude keys at the record root.
    pub longitude: Vec<String>,
}

/// Aliases for IPS export rows.
#[derive(Debug, Clone, Deserialize)]
pub struct SocialIndexAliases {
    /// UAI identifier.
    pub id: Vec<String>,
    /// Published IPS value.
    pub value: Vec<String>,
    /// School year (`rentree_scolaire`); the latest year wins.
    #[serde(default)]
    pub school_year: Vec<String>,
}

/// Aliases for gazetteer rows.
#[derive(Debug, Clone, Deserialize)]
pub struct GazetteerAliases {
    /// Commune name.
    pub name: Vec<String>,
    /// Département code.
    pub department: Vec<String>,
    /// Postal code or list of postal codes.
    pub postal_codes: Vec<String>,
    /// Centroid encodings.
    pub geometry: GeometryAliases,
}

/// Aliases for transit station rows.
#[derive(Debug, Clone, Deserialize)]
pub struct StationAliases {
    /// Station name.
    pub name: Vec<String>,
    /// Transport mode label.
    pub mode: Vec<String>,
    /// Line code or label.
    pub line: Vec<String>,
    /// Explicit line color.
    #[serde(default)]
    pub color: Vec<String>,
    /// Station kind label ("Station", "Gare").
    #[serde(default)]
    pub kind: Vec<String>,
    /// Coordinate encodings.
    pub geometry: GeometryAliases,
}

const ALIASES_TOML: &str = include_str!("../aliases/aliases.toml");

static ALIASES: LazyLock<AliasTable> = LazyLock::new(|| {
    toml::de::from_str(ALIASES_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse embedded alias table: {e}"))
});

/// Returns the embedded alias table.
///
/// # Panics
///
/// Panics if the embedded TOML is malformed (a build defect, covered by
/// tests).
#[must_use]
pub fn aliases() -> &'static AliasTable {
    &ALIASES
}

/// Parses a caller-supplied alias table (for dataset revisions not yet
/// covered by the embedded one).
///
/// # Errors
///
/// Returns an error if the TOML is malformed or missing required lists.
pub fn parse_aliases(toml_str: &str) -> Result<AliasTable, toml::de::Error> {
    toml::de::from_str(toml_str)
}

/// Returns the body of an open-data record.
///
/// The records API wraps each row as `{"recordid": ..., "fields": {...}}`;
/// bare rows are returned unchanged.
#[must_use]
pub fn record_body(record: &serde_json::Value) -> &serde_json::Value {
    match record.get("fields") {
        Some(fields) if fields.is_object() => fields,
        _ => record,
    }
}

/// Returns the rows of a collection response.
///
/// Accepts a bare array or an object wrapping the array under `records`,
/// `results` or `features`. Anything else yields no rows.
#[must_use]
pub fn collection_rows(value: &serde_json::Value) -> &[serde_json::Value] {
    if let Some(rows) = value.as_array() {
        return rows;
    }
    ["records", "results", "features"]
        .iter()
        .find_map(|key| value.get(key).and_then(serde_json::Value::as_array))
        .map_or(&[], Vec::as_slice)
}

/// Whether a JSON value counts as present: not null, not a blank string,
/// not an empty array or object.
fn is_present(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::String(s) => !s.trim().is_empty(),
        serde_json::Value::Array(a) => !a.is_empty(),
        serde_json::Value::Object(o) => !o.is_empty(),
        serde_json::Value::Bool(_) | serde_json::Value::Number(_) => true,
    }
}

/// Tries each candidate key in order and returns the first present,
/// non-empty value.
///
/// Keys are matched exactly (case-sensitive). Returns `None` when no alias
/// matches; callers apply their own fallback.
#[must_use]
pub fn extract_field<'a, K: AsRef<str>>(
    record: &'a serde_json::Value,
    keys: &[K],
) -> Option<&'a serde_json::Value> {
    keys.iter()
        .filter_map(|k| record.get(k.as_ref()))
        .find(|v| is_present(v))
}

/// Renders a scalar JSON value as trimmed text.
///
/// Integral numbers render without a fractional part; arrays render their
/// first textual element.
#[must_use]
pub fn value_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        serde_json::Value::Number(n) => Some(
            n.as_i64()
                .map_or_else(|| n.to_string(), |i| i.to_string()),
        ),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        serde_json::Value::Array(items) => items.iter().find_map(value_text),
        serde_json::Value::Null | serde_json::Value::Object(_) => None,
    }
}

/// Extracts the first present alias as trimmed text.
#[must_use]
pub fn extract_text<K: AsRef<str>>(record: &serde_json::Value, keys: &[K]) -> Option<String> {
    keys.iter()
        .filter_map(|k| record.get(k.as_ref()))
        .find_map(value_text)
}

/// Extracts every alias present as text (used to concatenate labels).
#[must_use]
pub fn extract_all_text<K: AsRef<str>>(record: &serde_json::Value, keys: &[K]) -> Vec<String> {
    keys.iter()
        .filter_map(|k| record.get(k.as_ref()))
        .filter_map(value_text)
        .collect()
}

/// Extracts a list of strings from the first present alias.
///
/// A single scalar yields a one-element list.
#[must_use]
pub fn extract_text_list<K: AsRef<str>>(record: &serde_json::Value, keys: &[K]) -> Vec<String> {
    match extract_field(record, keys) {
        Some(serde_json::Value::Array(items)) => items.iter().filter_map(value_text).collect(),
        Some(other) => value_text(other).into_iter().collect(),
        None => Vec::new(),
    }
}

/// Interprets a JSON value as a number, parsing numeric strings.
#[must_use]
pub fn value_number(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

/// Extracts the first alias that holds a finite number.
#[must_use]
pub fn extract_number<K: AsRef<str>>(record: &serde_json::Value, keys: &[K]) -> Option<f64> {
    keys.iter()
        .filter_map(|k| record.get(k.as_ref()))
        .find_map(value_number)
}

/// Interprets a JSON value as a yes/no flag (`true`, `"OUI"`, `"1"`, `1`).
#[must_use]
pub fn value_flag(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        serde_json::Value::String(s) => matches!(
            s.trim().to_uppercase().as_str(),
            "OUI" | "O" | "TRUE" | "VRAI" | "1" | "YES"
        ),
        _ => false,
    }
}

/// Whether any of the flag aliases is set.
#[must_use]
pub fn extract_flag<K: AsRef<str>>(record: &serde_json::Value, keys: &[K]) -> bool {
    keys.iter()
        .filter_map(|k| record.get(k.as_ref()))
        .any(value_flag)
}
