//! Nominatim / OpenStreetMap geocoder client.
//!
//! Last resort after the French national services. Nominatim has strict
//! rate limits: **1 request per second** maximum.
//!
//! See <https://nominatim.org/release-docs/develop/api/Search/>

use crate::{GeocodeError, GeocodedLocation, GeocodingProvider, check_status, located};

/// Geocodes a free-form query using Nominatim, restricted to one country.
///
/// The caller is responsible for rate limiting (see `rate_limit_ms` in the
/// service TOML configuration).
///
/// # Errors
///
/// Returns [`GeocodeError`] if the HTTP request or response parsing fails.
pub async fn geocode_freeform(
    client: &reqwest::Client,
    base_url: &str,
    country_code: &str,
    query: &str,
) -> Result<Option<GeocodedLocation>, GeocodeError> {
    let resp = client
        .get(base_url)
        .query(&[
            ("q", query),
            ("countrycodes", country_code),
            ("format", "jsonv2"),
            ("limit", "1"),
        ])
        .send()
        .await?;
    check_status(&resp)?;

    let body: serde_json::Value = resp.json().await?;
    parse_response(&body)
}

/// Parses Nominatim JSON response.
fn parse_response(body: &serde_json::Value) -> Result<Option<GeocodedLocation>, GeocodeError> {
    let results = body.as_array().ok_or_else(|| GeocodeError::Parse {
        message: "Nominatim response is not an array".to_string(),
    })?;

    let Some(first) = results.first() else {
        return Ok(None);
    };

    let lat = first["lat"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| GeocodeError::Parse {
            message: "Missing lat in Nominatim response".to_string(),
        })?;

    let lon = first["lon"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| GeocodeError::Parse {
            message: "Missing lon in Nominatim response".to_string(),
        })?;

    let display_name = first["display_name"]
        .as_str()
        .map(String::from)
        .unwrap_or_default();

    located(lat, lon, display_name, GeocodingProvider::Nominatim).map(Some)
}
