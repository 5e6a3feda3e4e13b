//! Free-text location resolution.
//!
//! Resolution order, first success wins:
//! 1. a five-digit postal code served by a gazetteer commune
//! 2. a gazetteer commune name (exact, then substring)
//! 3. the external [`ProviderChain`]
//!
//! The gazetteer steps never touch the network.

use ips_map_geography::Gazetteer;
use ips_map_geography_models::GazetteerEntry;
use ips_map_geography_models::departments::is_postal_code;

use crate::{GeocodeError, GeocodedLocation, GeocodingProvider, ProviderChain};

/// Resolves free-text queries to coordinates.
#[derive(Default)]
pub struct LocationResolver {
    chain: ProviderChain,
}

impl LocationResolver {
    /// Creates a resolver delegating to `chain` after the gazetteer.
    #[must_use]
    pub const fn new(chain: ProviderChain) -> Self {
        Self { chain }
    }

    /// Creates a resolver over the enabled registry services.
    #[must_use]
    pub fn from_registry(client: &reqwest::Client) -> Self {
        Self::new(ProviderChain::from_registry(client))
    }

    /// Resolves `query` to a location.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Failed`] (echoing the query) when neither
    /// the gazetteer nor any provider yields a location.
    pub async fn resolve_location(
        &self,
        gazetteer: &Gazetteer,
        query: &str,
    ) -> Result<GeocodedLocation, GeocodeError> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(GeocodeError::Failed {
                query: query.to_string(),
            });
        }

        if is_postal_code(trimmed)
            && let Some(entry) = gazetteer.find_by_postal_code(trimmed)
        {
            log::debug!("Gazetteer resolved postal code {trimmed} to {}", entry.name);
            return Ok(from_entry(entry, Some(trimmed)));
        }

        if let Some(entry) = gazetteer.find_commune(trimmed) {
            log::debug!("Gazetteer resolved {trimmed:?} to {}", entry.name);
            return Ok(from_entry(entry, None));
        }

        self.chain
            .resolve(trimmed)
            .await
            .ok_or_else(|| GeocodeError::Failed {
                query: query.to_string(),
            })
    }
}

fn from_entry(entry: &GazetteerEntry, postal_code: Option<&str>) -> GeocodedLocation {
    let label = match postal_code.or_else(|| entry.postal_codes.first().map(String::as_str)) {
        Some(cp) => format!("{} ({cp})", entry.name),
        None => entry.name.clone(),
    };
    GeocodedLocation {
        latitude: entry.latitude,
        longitude: entry.longitude,
        label,
        provider: GeocodingProvider::Gazetteer,
    }
}
