//! Record normalization for the three mandatory snapshots.
//!
//! Raw rows from any dataset revision become [`Establishment`],
//! [`SocialIndexMap`] and [`GazetteerEntry`] values. Malformed rows are
//! dropped and counted, never raised.

use std::collections::{BTreeMap, BTreeSet};

use ips_map_geography_models::GazetteerEntry;
use ips_map_geography_models::departments::{
    canonical_department, department_from_postal_code, normalize_postal_code,
};
use ips_map_school_models::{DEFAULT_ESTABLISHMENT_NAME, Establishment, SocialIndexMap};
use strum_macros::{AsRefStr, Display};

use crate::category::classify;
use crate::fields::{
    EstablishmentAliases, GazetteerAliases, SocialIndexAliases, collection_rows, extract_all_text,
    extract_number, extract_text, extract_text_list, record_body, value_number,
};
use crate::geometry::resolve_lat_lon;
use crate::sector::sector_from_record;

/// Why a raw establishment row was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Rejection {
    /// No identifier alias is present.
    MissingId,
    /// No encoding yielded a finite, in-range coordinate pair.
    UnresolvableCoordinates,
    /// The classifier matched no category.
    Unclassifiable,
}

/// Normalizes one raw establishment row.
///
/// The `{"fields": {...}}` envelope is unwrapped first. The id is
/// uppercased. The département comes from the explicit field when it
/// canonicalizes, otherwise from the postal code.
///
/// # Errors
///
/// Returns the [`Rejection`] reason when the row cannot be used.
pub fn normalize_establishment(
    record: &serde_json::Value,
    aliases: &EstablishmentAliases,
) -> Result<Establishment, Rejection> {
    let body = record_body(record);

    let id = extract_text(body, &aliases.id)
        .map(|id| id.to_uppercase())
        .ok_or(Rejection::MissingId)?;
    let position = resolve_lat_lon(body, &aliases.geometry)
        .ok_or(Rejection::UnresolvableCoordinates)?;
    let category = classify(body, &aliases.category).ok_or(Rejection::Unclassifiable)?;

    let postal_code =
        extract_text(body, &aliases.postal_code).and_then(|cp| normalize_postal_code(&cp));
    let department = extract_text(body, &aliases.department)
        .and_then(|dep| canonical_department(&dep))
        .or_else(|| postal_code.as_deref().and_then(department_from_postal_code));

    Ok(Establishment {
        id,
        category,
        sector: sector_from_record(body, aliases),
        latitude: position.latitude,
        longitude: position.longitude,
        department,
        postal_code,
        commune: extract_text(body, &aliases.commune),
        name: extract_text(body, &aliases.name)
            .unwrap_or_else(|| DEFAULT_ESTABLISHMENT_NAME.to_string()),
        address: extract_text(body, &aliases.address),
        nature: extract_all_text(body, &aliases.category.labels)
            .into_iter()
            .next(),
    })
}

/// Normalizes a whole establishments snapshot.
///
/// Accepts a bare array or a wrapped collection. Rejected rows are counted
/// per reason; duplicate ids keep their first occurrence.
#[must_use]
pub fn normalize_establishments(
    snapshot: &serde_json::Value,
    aliases: &EstablishmentAliases,
) -> Vec<Establishment> {
    let rows = collection_rows(snapshot);
    let mut seen = BTreeSet::new();
    let mut rejected: BTreeMap<Rejection, u64> = BTreeMap::new();
    let mut duplicates: u64 = 0;
    let mut establishments = Vec::with_capacity(rows.len());

    for row in rows {
        match normalize_establishment(row, aliases) {
            Ok(establishment) => {
                if seen.insert(establishment.id.clone()) {
                    establishments.push(establishment);
                } else {
                    log::debug!("Skipping duplicate establishment {}", establishment.id);
                    duplicates += 1;
                }
            }
            Err(reason) => {
                *rejected.entry(reason).or_default() += 1;
            }
        }
    }

    for (reason, count) in &rejected {
        log::debug!("Dropped {count} establishment rows: {reason}");
    }
    log::info!(
        "Normalized {} establishments from {} rows ({} dropped, {duplicates} duplicates)",
        establishments.len(),
        rows.len(),
        rejected.values().sum::<u64>(),
    );

    establishments
}

/// Parses a social-index snapshot.
///
/// Accepts an object map (`{"0751234A": 103.4}`) or rows
/// (`[{"uai": "0751234A", "ips": 103.4, "rentree_scolaire": "2022-2023"}]`,
/// possibly wrapped). For rows, the most recent school year wins; rows
/// without a year keep their first occurrence. Ids are uppercased and rows
/// with no numeric index are skipped.
#[must_use]
pub fn parse_social_index(
    snapshot: &serde_json::Value,
    aliases: &SocialIndexAliases,
) -> SocialIndexMap {
    if let Some(map) = snapshot.as_object().filter(|_| collection_rows(snapshot).is_empty()) {
        return map
            .iter()
            .filter_map(|(id, value)| {
                let index = value_number(value).or_else(|| extract_number(value, &aliases.value))?;
                Some((id.trim().to_uppercase(), index))
            })
            .collect();
    }

    let mut latest: BTreeMap<String, (Option<String>, f64)> = BTreeMap::new();
    for row in collection_rows(snapshot) {
        let body = record_body(row);
        let Some(id) = extract_text(body, &aliases.id) else {
            continue;
        };
        let Some(index) = extract_number(body, &aliases.value) else {
            continue;
        };
        let year = extract_text(body, &aliases.school_year);

        let id = id.to_uppercase();
        let superseded = latest
            .get(&id)
            .is_none_or(|(kept_year, _)| year > *kept_year);
        if superseded {
            latest.insert(id, (year, index));
        }
    }

    let map: SocialIndexMap = latest
        .into_iter()
        .map(|(id, (_, index))| (id, index))
        .collect();
    log::info!("Parsed social index for {} establishments", map.len());
    map
}

/// Parses a gazetteer snapshot into commune entries.
///
/// Entries need a name and a resolvable centroid. Postal codes are
/// normalized to five digits; the département is derived from the first
/// postal code when absent.
#[must_use]
pub fn parse_gazetteer(
    snapshot: &serde_json::Value,
    aliases: &GazetteerAliases,
) -> Vec<GazetteerEntry> {
    let rows = collection_rows(snapshot);
    let entries: Vec<GazetteerEntry> = rows
        .iter()
        .filter_map(|row| {
            let body = record_body(row);
            let name = extract_text(body, &aliases.name)?;
            let centre = resolve_lat_lon(body, &aliases.geometry)?;
            let postal_codes: Vec<String> = extract_text_list(body, &aliases.postal_codes)
                .iter()
                .filter_map(|cp| normalize_postal_code(cp))
                .collect();
            let department = extract_text(body, &aliases.department)
                .and_then(|dep| canonical_department(&dep))
                .or_else(|| {
                    postal_codes
                        .first()
                        .and_then(|cp| department_from_postal_code(cp))
                });

            Some(GazetteerEntry {
                name,
                department,
                postal_codes,
                latitude: centre.latitude,
                longitude: centre.longitude,
            })
        })
        .collect();

    log::info!(
        "Parsed {} gazetteer entries from {} rows",
        entries.len(),
        rows.len()
    );
    entries
}

#[cfg(test)]
mod tests {
    use ips_map_school_models::{Category, Sector};

    use super::*;
    use crate::fields::aliases;

    fn establishment_aliases() -> &'static EstablishmentAliases {
        &aliases().establishment
    }

    #[test]
    fn normalizes_a_geolocation_row() {
        let row = serde_json::json!({
            "numero_uai": "0751234a",
            "appellation_officielle": "Lycée Charlemagne",
            "nature_uai": "300",
            "nature_uai_libe": "LYCEE D ENSEIGNEMENT GENERAL",
            "secteur_public_prive_libe": "Public",
            "code_postal_uai": "75004",
            "libelle_commune": "Paris 4e Arrondissement",
            "latitude": 48.8539,
            "longitude": 2.3609
        });
        let establishment = normalize_establishment(&row, establishment_aliases()).unwrap();
        assert_eq!(establishment.id, "0751234A");
        assert_eq!(establishment.category, Category::HighSchool);
        assert_eq!(establishment.sector, Sector::Public);
        assert_eq!(establishment.department.as_deref(), Some("75"));
        assert_eq!(establishment.postal_code.as_deref(), Some("75004"));
        assert_eq!(establishment.name, "Lycée Charlemagne");
        assert_eq!(
            establishment.nature.as_deref(),
            Some("LYCEE D ENSEIGNEMENT GENERAL")
        );
    }

    #[test]
    fn unwraps_records_envelope() {
        let row = serde_json::json!({
            "recordid": "abc",
            "fields": {
                "uai": "0130001A",
                "type": "college",
                "secteur": 2,
                "code_departement": "013",
                "position": [43.3, 5.4]
            }
        });
        let establishment = normalize_establishment(&row, establishment_aliases()).unwrap();
        assert_eq!(establishment.department.as_deref(), Some("13"));
        assert_eq!(establishment.sector, Sector::Private);
        assert_eq!(establishment.name, DEFAULT_ESTABLISHMENT_NAME);
    }

    #[test]
    fn rejects_malformed_rows() {
        let aliases = establishment_aliases();
        assert_eq!(
            normalize_establishment(&serde_json::json!({"type": "ecole", "lat": 1, "lon": 1}), aliases),
            Err(Rejection::MissingId)
        );
        assert_eq!(
            normalize_establishment(&serde_json::json!({"uai": "X", "type": "ecole"}), aliases),
            Err(Rejection::UnresolvableCoordinates)
        );
        assert_eq!(
            normalize_establishment(
                &serde_json::json!({"uai": "X", "lat": 48.0, "lon": 2.0, "type": "CIO"}),
                aliases
            ),
            Err(Rejection::Unclassifiable)
        );
    }

    #[test]
    fn dedups_by_first_occurrence() {
        let snapshot = serde_json::json!([
            {"uai": "X", "name": "First", "type": "ecole", "lat": 48.0, "lon": 2.0},
            {"uai": "x", "name": "Second", "type": "ecole", "lat": 48.0, "lon": 2.0},
            {"uai": "Y", "type": "ecole"}
        ]);
        let establishments = normalize_establishments(&snapshot, establishment_aliases());
        assert_eq!(establishments.len(), 1);
        assert_eq!(establishments[0].name, "First");
    }

    #[test]
    fn derives_department_from_postal_code() {
        let row = serde_json::json!({
            "uai": "0201234B", "type": "ecole", "cp": "20200", "lat": 42.7, "lon": 9.45
        });
        let establishment = normalize_establishment(&row, establishment_aliases()).unwrap();
        assert_eq!(establishment.department.as_deref(), Some("2B"));
    }

    #[test]
    fn social_index_from_object_map() {
        let snapshot = serde_json::json!({"0751234a": 120.5, "0751235B": "98.2", "X": null});
        let map = parse_social_index(&snapshot, &aliases().social_index);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("0751234A"), Some(120.5));
        assert_eq!(map.get("0751235B"), Some(98.2));
    }

    #[test]
    fn social_index_latest_school_year_wins() {
        let snapshot = serde_json::json!([
            {"uai": "A", "ips": 100.0, "rentree_scolaire": "2021-2022"},
            {"uai": "A", "ips": 105.0, "rentree_scolaire": "2022-2023"},
            {"uai": "A", "ips": 90.0, "rentree_scolaire": "2020-2021"},
            {"uai": "B", "ips": 80.0},
            {"uai": "B", "ips": 85.0},
            {"uai": "C", "ips": null}
        ]);
        let map = parse_social_index(&snapshot, &aliases().social_index);
        assert_eq!(map.get("A"), Some(105.0));
        assert_eq!(map.get("B"), Some(80.0));
        assert!(!map.contains("C"));
    }

    #[test]
    fn social_index_from_wrapped_rows() {
        let snapshot = serde_json::json!({
            "results": [{"fields": {"code_uai": "A", "indice_position_sociale": 110.1}}]
        });
        let map = parse_social_index(&snapshot, &aliases().social_index);
        assert_eq!(map.get("A"), Some(110.1));
    }

    #[test]
    fn parses_gazetteer_rows() {
        let snapshot = serde_json::json!([
            {
                "nom": "Paris",
                "codeDepartement": "75",
                "codesPostaux": ["75001", "75002"],
                "centre": {"type": "Point", "coordinates": [2.347, 48.859]}
            },
            {"n": "Ajaccio", "cp": ["20000"], "lat": 41.92, "lon": 8.74},
            {"n": "Nowhere", "cp": ["99999"]}
        ]);
        let entries = parse_gazetteer(&snapshot, &aliases().gazetteer);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].postal_codes, vec!["75001", "75002"]);
        assert!((entries[0].latitude - 48.859).abs() < 1e-9);
        assert_eq!(entries[1].department.as_deref(), Some("2A"));
    }
}
