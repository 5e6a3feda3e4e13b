//! National commune API client (`geo.api.gouv.fr`).
//!
//! Looks communes up by postal code when the query is one, by name
//! otherwise, and returns the commune centroid.
//!
//! See <https://geo.api.gouv.fr/decoupage-administratif/communes>

use ips_map_geography_models::departments::is_postal_code;

use crate::{GeocodeError, GeocodedLocation, GeocodingProvider, check_status, located};

/// Geocodes a postal code or commune name.
///
/// # Errors
///
/// Returns [`GeocodeError`] if the HTTP request or response parsing fails.
pub async fn geocode(
    client: &reqwest::Client,
    base_url: &str,
    query: &str,
) -> Result<Option<GeocodedLocation>, GeocodeError> {
    let trimmed = query.trim();
    let key = if is_postal_code(trimmed) {
        "codePostal"
    } else {
        "nom"
    };

    let resp = client
        .get(base_url)
        .query(&[
            (key, trimmed),
            ("fields", "nom,centre,codesPostaux"),
            ("format", "json"),
            ("geometry", "centre"),
            ("boost", "population"),
            ("limit", "1"),
        ])
        .send()
        .await?;
    check_status(&resp)?;

    let body: serde_json::Value = resp.json().await?;
    parse_response(&body)
}

/// Parses the commune array; the label is `"Name (first postal code)"`.
fn parse_response(body: &serde_json::Value) -> Result<Option<GeocodedLocation>, GeocodeError> {
    let communes = body.as_array().ok_or_else(|| GeocodeError::Parse {
        message: "commune response is not an array".to_string(),
    })?;

    let Some(first) = communes.first() else {
        return Ok(None);
    };

    let coords = first
        .pointer("/centre/coordinates")
        .and_then(serde_json::Value::as_array)
        .filter(|c| c.len() >= 2)
        .ok_or_else(|| GeocodeError::Parse {
            message: "commune missing centre.coordinates".to_string(),
        })?;
    let (Some(lon), Some(lat)) = (coords[0].as_f64(), coords[1].as_f64()) else {
        return Err(GeocodeError::Parse {
            message: "centre coordinates are not numbers".to_string(),
        });
    };

    let name = first
        .get("nom")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default();
    let postal_code = first
        .pointer("/codesPostaux/0")
        .and_then(serde_json::Value::as_str);
    let label = match postal_code {
        Some(cp) => format!("{name} ({cp})"),
        None => name.to_string(),
    };

    located(lat, lon, label, GeocodingProvider::CommuneApi).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commune() {
        let body = serde_json::json!([{
            "nom": "Lyon",
            "centre": {"type": "Point", "coordinates": [4.8351, 45.758]},
            "codesPostaux": ["69001", "69002"]
        }]);
        let result = parse_response(&body).unwrap().unwrap();
        assert!((result.latitude - 45.758).abs() < 1e-9);
        assert_eq!(result.label, "Lyon (69001)");
        assert_eq!(result.provider, GeocodingProvider::CommuneApi);
    }

    #[test]
    fn parses_empty_array() {
        assert!(parse_response(&serde_json::json!([])).unwrap().is_none());
    }

    #[test]
    fn rejects_non_array() {
        assert!(parse_response(&serde_json::json!({"code": 400})).is_err());
    }
}
