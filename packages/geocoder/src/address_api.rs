//! Base Adresse Nationale (BAN) address search client.
//!
//! The `/search/` endpoint accepts free-form text and returns a `GeoJSON`
//! `FeatureCollection` ranked by score; only the first feature is used.
//!
//! See <https://adresse.data.gouv.fr/outils/api-doc/adresse>

use crate::{GeocodeError, GeocodedLocation, GeocodingProvider, check_status, located};

/// Geocodes a free-form query against the BAN search endpoint.
///
/// # Errors
///
/// Returns [`GeocodeError`] if the HTTP request or response parsing fails.
pub async fn geocode(
    client: &reqwest::Client,
    base_url: &str,
    query: &str,
    autocomplete: bool,
) -> Result<Option<GeocodedLocation>, GeocodeError> {
    let resp = client
        .get(base_url)
        .query(&[
            ("q", query),
            ("limit", "1"),
            ("autocomplete", if autocomplete { "1" } else { "0" }),
        ])
        .send()
        .await?;
    check_status(&resp)?;

    let body: serde_json::Value = resp.json().await?;
    parse_response(&body, query)
}

/// Parses a BAN `FeatureCollection`. The label falls back to the query.
fn parse_response(
    body: &serde_json::Value,
    query: &str,
) -> Result<Option<GeocodedLocation>, GeocodeError> {
    let features = body
        .get("features")
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| GeocodeError::Parse {
            message: "BAN response missing 'features' array".to_string(),
        })?;

    let Some(first) = features.first() else {
        return Ok(None);
    };

    let coords = first
        .pointer("/geometry/coordinates")
        .and_then(serde_json::Value::as_array)
        .filter(|c| c.len() >= 2)
        .ok_or_else(|| GeocodeError::Parse {
            message: "Feature missing geometry.coordinates".to_string(),
        })?;

    let (Some(lon), Some(lat)) = (coords[0].as_f64(), coords[1].as_f64()) else {
        return Err(GeocodeError::Parse {
            message: "coordinates are not numbers".to_string(),
        });
    };

    let label = first
        .pointer("/properties/label")
        .and_then(serde_json::Value::as_str)
        .unwrap_or(query)
        .to_string();

    located(lat, lon, label, GeocodingProvider::AddressApi).map(Some)
}
