//! Stations feed parsing and filtering.

use std::collections::{BTreeSet, HashSet};

use geojson::{Feature, GeoJson};
use ips_map_geography_models::LatLon;
use ips_map_source::fields::{
    StationAliases, aliases, collection_rows, extract_text, record_body, value_text,
};
use ips_map_source::geometry::resolve_lat_lon;
use ips_map_source::{SnapshotKind, SnapshotSource};
use ips_map_spatial::distance_meters;

use crate::{
    DEFAULT_STATION_NAME, Station, TransitError, TransitMode, color_for, mode_key, normalize_line,
};

/// Keys tried on the entries of a `lines` array.
const LISTED_LINE_KEYS: &[&str] = &["code", "name", "id"];

/// Parses a stations feed: a bare array (or `records`/`results` wrapper)
/// of rows, or a `GeoJSON` `FeatureCollection` of points.
///
/// Rows without resolvable coordinates or a recognizable mode are
/// dropped. Duplicates (same lowercased name, mode and coordinates to six
/// decimals) keep their first occurrence.
///
/// # Errors
///
/// Returns [`TransitError::GeoJson`] for a malformed feature collection
/// and [`TransitError::UnrecognizedShape`] for any other non-collection.
pub fn parse_stations(
    snapshot: &serde_json::Value,
    aliases: &StationAliases,
) -> Result<Vec<Station>, TransitError> {
    let rows: Vec<serde_json::Value> =
        if snapshot.get("type").and_then(serde_json::Value::as_str) == Some("FeatureCollection") {
            match GeoJson::from_json_value(snapshot.clone())? {
                GeoJson::FeatureCollection(collection) => {
                    collection.features.into_iter().map(feature_row).collect()
                }
                GeoJson::Feature(_) | GeoJson::Geometry(_) => {
                    return Err(TransitError::UnrecognizedShape);
                }
            }
        } else if snapshot.is_array() || !collection_rows(snapshot).is_empty() {
            collection_rows(snapshot)
                .iter()
                .map(|row| record_body(row).clone())
                .collect()
        } else {
            return Err(TransitError::UnrecognizedShape);
        };

    let mut seen = HashSet::new();
    let mut dropped = 0_usize;
    let mut duplicates = 0_usize;
    let mut stations = Vec::new();

    for row in &rows {
        let Some(station) = normalize_station(row, aliases) else {
            log::debug!("Dropping station row without coordinates or mode: {row}");
            dropped += 1;
            continue;
        };
        if seen.insert(dedup_key(&station)) {
            stations.push(station);
        } else {
            duplicates += 1;
        }
    }

    log::info!(
        "Parsed {} stations from {} rows ({dropped} dropped, {duplicates} duplicates)",
        stations.len(),
        rows.len()
    );
    Ok(stations)
}

/// Flattens a feature into a row: its properties plus `lat`/`lon` taken
/// from a point geometry.
fn feature_row(feature: Feature) -> serde_json::Value {
    let mut row = feature.properties.unwrap_or_default();
    if let Some(geometry) = feature.geometry
        && let geojson::Value::Point(position) = geometry.value
        && let (Some(lon), Some(lat)) = (position.first(), position.get(1))
    {
        row.insert("lon".to_string(), serde_json::json!(lon));
        row.insert("lat".to_string(), serde_json::json!(lat));
    }
    serde_json::Value::Object(row)
}

/// First entry of a `lines` array, as a code or a bare string.
fn first_listed_line(row: &serde_json::Value) -> Option<String> {
    let first = row.get("lines")?.as_array()?.first()?;
    if first.is_object() {
        extract_text(first, LISTED_LINE_KEYS)
    } else {
        value_text(first)
    }
}

fn normalize_station(row: &serde_json::Value, aliases: &StationAliases) -> Option<Station> {
    let position = resolve_lat_lon(row, &aliases.geometry)?;
    let raw_line = extract_text(row, &aliases.line).or_else(|| first_listed_line(row));
    let mode = extract_text(row, &aliases.mode)
        .and_then(|label| mode_key(&label))
        .or_else(|| raw_line.as_deref().and_then(mode_key))?;
    let line = raw_line.and_then(|raw| normalize_line(&raw, mode));
    let explicit_color = extract_text(row, &aliases.color);

    Some(Station {
        name: extract_text(row, &aliases.name).unwrap_or_else(|| DEFAULT_STATION_NAME.to_string()),
        kind: extract_text(row, &aliases.kind)
            .unwrap_or_else(|| mode.default_kind().to_string()),
        color: color_for(mode, line.as_deref(), explicit_color.as_deref()),
        mode,
        line,
        latitude: position.latitude,
        longitude: position.longitude,
    })
}

fn dedup_key(station: &Station) -> (String, TransitMode, String) {
    (
        station.name.to_lowercase(),
        station.mode,
        format!("{:.6},{:.6}", station.latitude, station.longitude),
    )
}

/// Loads the optional stations feed.
///
/// A missing or unreadable feed is logged and yields no stations; it never
/// fails the session.
pub async fn load_stations(source: &dyn SnapshotSource) -> Vec<Station> {
    let parsed = match source.fetch(SnapshotKind::Stations).await {
        Ok(snapshot) => parse_stations(&snapshot, &aliases().station),
        Err(e) => Err(TransitError::from(e)),
    };

    parsed.unwrap_or_else(|e| {
        log::warn!("Stations unavailable from {}: {e}", source.describe());
        Vec::new()
    })
}

/// Stations of the enabled modes, optionally limited to a radius in
/// meters around a center. A non-finite or non-positive radius disables
/// the distance filter. Feed order is preserved.
#[must_use]
pub fn stations_near<'a>(
    stations: &'a [Station],
    modes: &BTreeSet<TransitMode>,
    around: Option<(LatLon, f64)>,
) -> Vec<&'a Station> {
    let around = around.filter(|(_, radius)| radius.is_finite() && *radius > 0.0);

    stations
        .iter()
        .filter(|station| modes.contains(&station.mode))
        .filter(|station| {
            around.is_none_or(|(center, radius)| {
                distance_meters(center, LatLon::new(station.latitude, station.longitude))
                    <= radius
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use ips_map_source::{SourceError, StaticSnapshots};
    use serde_json::json;

    use super::*;

    fn parse(value: &serde_json::Value) -> Vec<Station> {
        parse_stations(value, &aliases().station).unwrap()
    }

    #[test]
    fn parses_flat_rows() {
        let stations = parse(&json!([
            { "nom": "Châtelet", "mode": "Métro", "ligne": "M1", "lat": 48.8584, "lon": 2.3470 },
            { "nom": "Gare du Nord", "reseau": "RER", "ligne": "RER B", "geo_point_2d": [48.8809, 2.3553] }
        ]));

        assert_eq!(stations.len(), 2);
        let chatelet = &stations[0];
        assert_eq!(chatelet.mode, TransitMode::Metro);
        assert_eq!(chatelet.line.as_deref(), Some("1"));
        assert_eq!(chatelet.kind, "Station");
        assert_eq!(chatelet.color, "#FFCD00");

        let nord = &stations[1];
        assert_eq!(nord.mode, TransitMode::Rer);
        assert_eq!(nord.line.as_deref(), Some("B"));
        assert_eq!(nord.kind, "Gare");
        assert_eq!(nord.color, "#0072BC");
    }

    #[test]
    fn parses_feature_collections() {
        let stations = parse(&json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [2.2945, 48.8584] },
                    "properties": { "name": "Champ de Mars", "mode": "RER", "line": "C" }
                },
                {
                    "type": "Feature",
                    "geometry": null,
                    "properties": { "name": "Nowhere", "mode": "RER", "line": "C" }
                }
            ]
        }));

        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].name, "Champ de Mars");
        assert!((stations[0].latitude - 48.8584).abs() < 1e-9);
        assert!((stations[0].longitude - 2.2945).abs() < 1e-9);
        assert_eq!(stations[0].color, "#F6A800");
    }

    #[test]
    fn falls_back_to_listed_lines_and_infers_mode_from_line() {
        let stations = parse(&json!([
            { "name": "Saint-Lazare", "lines": [{ "code": "RER E" }], "lat": 48.8766, "lon": 2.3250 }
        ]));

        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].mode, TransitMode::Rer);
        assert_eq!(stations[0].line.as_deref(), Some("E"));
    }

    #[test]
    fn explicit_color_and_defaults() {
        let stations = parse(&json!([
            { "mode": "Tramway", "ligne": "TRAM 3B", "couleur": "rgb(1, 2, 3)", "lat": 48.9, "lon": 2.4 },
            { "mode": "TGV", "lat": 45.76, "lon": 4.86 }
        ]));

        assert_eq!(stations[0].name, DEFAULT_STATION_NAME);
        assert_eq!(stations[0].line.as_deref(), Some("T3B"));
        assert_eq!(stations[0].color, "#010203");
        assert_eq!(stations[1].line, None);
        assert_eq!(stations[1].color, "#B03A9B");
    }

    #[test]
    fn drops_unplaceable_and_unknown_modes() {
        let stations = parse(&json!([
            { "name": "No coords", "mode": "Métro", "ligne": "4" },
            { "name": "Bus stop", "mode": "Bus", "lat": 48.85, "lon": 2.35 },
            { "name": "Out of range", "mode": "Métro", "lat": 148.85, "lon": 2.35 }
        ]));
        assert!(stations.is_empty());
    }

    #[test]
    fn removes_duplicates() {
        let stations = parse(&json!([
            { "name": "Nation", "mode": "RER", "ligne": "A", "lat": 48.848_123_41, "lon": 2.395_8 },
            { "name": "NATION", "mode": "RER", "ligne": "A", "lat": 48.848_123_44, "lon": 2.395_8 },
            { "name": "Nation", "mode": "Métro", "ligne": "1", "lat": 48.848_123_41, "lon": 2.395_8 }
        ]));

        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].name, "Nation");
        assert_eq!(stations[1].mode, TransitMode::Metro);
    }

    #[test]
    fn rejects_unrecognized_shapes() {
        assert!(matches!(
            parse_stations(&json!({ "hello": "world" }), &aliases().station),
            Err(TransitError::UnrecognizedShape)
        ));
        assert!(matches!(
            parse_stations(&json!({ "type": "FeatureCollection", "features": 3 }), &aliases().station),
            Err(TransitError::GeoJson(_))
        ));
    }

    #[test]
    fn filters_by_mode_and_radius() {
        let stations = parse(&json!([
            { "name": "Châtelet", "mode": "Métro", "ligne": "1", "lat": 48.8584, "lon": 2.3470 },
            { "name": "Châtelet", "mode": "RER", "ligne": "A", "lat": 48.8615, "lon": 2.3470 },
            { "name": "Lyon Part-Dieu", "mode": "TGV", "lat": 45.7606, "lon": 4.8593 }
        ]));
        let center = LatLon::new(48.8584, 2.3470);

        let metro_only = BTreeSet::from([TransitMode::Metro]);
        assert_eq!(stations_near(&stations, &metro_only, None).len(), 1);

        let rail = BTreeSet::from([TransitMode::Rer, TransitMode::Tgv]);
        assert_eq!(stations_near(&stations, &rail, None).len(), 2);
        let near = stations_near(&stations, &rail, Some((center, 1_000.0)));
        assert_eq!(near.len(), 1);
        assert_eq!(near[0].mode, TransitMode::Rer);

        assert_eq!(stations_near(&stations, &rail, Some((center, 0.0))).len(), 2);
        assert_eq!(stations_near(&stations, &rail, Some((center, f64::NAN))).len(), 2);
        assert!(stations_near(&stations, &BTreeSet::new(), None).is_empty());
    }

    #[tokio::test]
    async fn missing_feed_yields_no_stations() {
        let source = StaticSnapshots::new();
        assert!(load_stations(&source).await.is_empty());
    }

    #[tokio::test]
    async fn loads_from_a_source() {
        let source = StaticSnapshots::new().with(
            SnapshotKind::Stations,
            json!([{ "name": "Bastille", "mode": "Métro", "ligne": "M5", "lat": 48.853, "lon": 2.369 }]),
        );
        let stations = load_stations(&source).await;
        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].color, "#F28E00");
    }

    #[test]
    fn source_errors_convert() {
        let error = TransitError::from(SourceError::Unsupported {
            provider: "test".to_string(),
            kind: SnapshotKind::Stations,
        });
        assert!(matches!(error, TransitError::Source(_)));
    }
}
