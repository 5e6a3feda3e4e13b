#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Location resolution for free-text queries.
//!
//! The [`resolver`] tries the offline gazetteer first (postal codes, then
//! commune names) and only then an ordered [`chain`] of external
//! providers configured via TOML files in `services/`:
//!
//! 1. **Base Adresse Nationale** (priority 1): the national address
//!    search, `GeoJSON` features.
//! 2. **Commune API** (priority 2): communes by postal code or name.
//! 3. **Nominatim / OpenStreetMap** (priority 3): last resort, 1 req/sec.
//!
//! [`department`] resolves the département-ranking path separately.

pub mod address_api;
pub mod chain;
pub mod commune_api;
pub mod department;
pub mod nominatim;
pub mod resolver;
pub mod service_registry;

use serde::Serialize;
use strum_macros::{AsRefStr, Display};
use thiserror::Error;

pub use chain::{GeocodeStrategy, ProviderChain};
pub use resolver::LocationResolver;

/// A resolved location.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodedLocation {
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Display label of the matched place.
    pub label: String,
    /// Which step resolved the query.
    pub provider: GeocodingProvider,
}

/// Which step resolved a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GeocodingProvider {
    /// Offline commune gazetteer.
    Gazetteer,
    /// Base Adresse Nationale address search.
    AddressApi,
    /// National commune API.
    CommuneApi,
    /// Nominatim / `OpenStreetMap`.
    Nominatim,
}

/// Errors from geocoding operations.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("Provider returned status {status}")]
    Status {
        /// Response status code.
        status: u16,
    },

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Every resolution step was exhausted.
    #[error("Could not locate {query:?}")]
    Failed {
        /// The query as entered.
        query: String,
    },
}

/// Checks a provider response status.
///
/// # Errors
///
/// Returns [`GeocodeError::RateLimited`] for HTTP 429 and
/// [`GeocodeError::Status`] for any other non-success status.
pub(crate) fn check_status(resp: &reqwest::Response) -> Result<(), GeocodeError> {
    let status = resp.status();
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(GeocodeError::RateLimited);
    }
    if !status.is_success() {
        return Err(GeocodeError::Status {
            status: status.as_u16(),
        });
    }
    Ok(())
}

/// Builds a location after validating the coordinates.
pub(crate) fn located(
    latitude: f64,
    longitude: f64,
    label: String,
    provider: GeocodingProvider,
) -> Result<GeocodedLocation, GeocodeError> {
    if ips_map_geography_models::LatLon::checked(latitude, longitude).is_none() {
        return Err(GeocodeError::Parse {
            message: format!("coordinates out of range: ({latitude}, {longitude})"),
        });
    }
    Ok(GeocodedLocation {
        latitude,
        longitude,
        label,
        provider,
    })
}
