//! Coordinate extraction from any of the encodings seen in the datasets.
//!
//! Depending on the dataset revision, a position is published as:
//! - an object: `{"lat": 48.85, "lon": 2.35}` (or `lng`, `latitude`, ...)
//! - a `GeoJSON` geometry: `{"type": "Point", "coordinates": [2.35, 48.85]}`
//! - a delimited string: `"48.85,2.35"`
//! - a bare pair in either order: `[48.85, 2.35]` or `[2.35, 48.85]`
//! - flat fields at the record root: `{"lat": 48.85, "lon": 2.35}`

use ips_map_geography_models::LatLon;

use crate::fields::{GeometryAliases, extract_number, value_number};

const LAT_KEYS: &[&str] = &["lat", "latitude"];
const LON_KEYS: &[&str] = &["lon", "lng", "longitude"];

/// Resolves a `(latitude, longitude)` pair from a record.
///
/// Container aliases are tried in order, then the flat root fields. The
/// first encoding that yields two finite, in-range values wins. Returns
/// `None` (never half a pair) when nothing resolves.
#[must_use]
pub fn resolve_lat_lon(record: &serde_json::Value, aliases: &GeometryAliases) -> Option<LatLon> {
    aliases
        .containers
        .iter()
        .filter_map(|key| record.get(key))
        .find_map(decode)
        .or_else(|| {
            let lat = extract_number(record, &aliases.latitude)?;
            let lon = extract_number(record, &aliases.longitude)?;
            LatLon::checked(lat, lon)
        })
}

/// Decodes a single coordinate container.
///
/// Encodings are tried in a fixed order: explicit `lat`/`lon` keys,
/// `GeoJSON` `coordinates` (`[lon, lat]`), `"a,b"` string (`lat,lon`),
/// then a bare numeric pair whose axis order is guessed by range.
#[must_use]
pub fn decode(value: &serde_json::Value) -> Option<LatLon> {
    decode_object(value)
        .or_else(|| decode_geojson(value))
        .or_else(|| decode_delimited(value))
        .or_else(|| decode_pair(value))
}

fn decode_object(value: &serde_json::Value) -> Option<LatLon> {
    if !value.is_object() {
        return None;
    }
    let lat = extract_number(value, LAT_KEYS)?;
    let lon = extract_number(value, LON_KEYS)?;
    LatLon::checked(lat, lon)
}

fn decode_geojson(value: &serde_json::Value) -> Option<LatLon> {
    let coords = value.get("coordinates")?.as_array()?;
    if coords.len() < 2 {
        return None;
    }
    let lon = value_number(&coords[0])?;
    let lat = value_number(&coords[1])?;
    LatLon::checked(lat, lon)
}

fn decode_delimited(value: &serde_json::Value) -> Option<LatLon> {
    let (a, b) = value.as_str()?.split_once(',')?;
    let lat = a.trim().parse::<f64>().ok()?;
    let lon = b.trim().parse::<f64>().ok()?;
    LatLon::checked(lat, lon)
}

fn decode_pair(value: &serde_json::Value) -> Option<LatLon> {
    let items = value.as_array()?;
    if items.len() < 2 {
        return None;
    }
    let a = value_number(&items[0])?;
    let b = value_number(&items[1])?;
    if a.abs() <= 90.0 && b.abs() <= 180.0 {
        LatLon::checked(a, b)
    } else {
        LatLon::checked(b, a)
    }
}
