//! Compile-time registry of geocoding service configurations.
//!
//! Each geocoding provider is defined in a TOML file under `services/`.
//! The registry embeds these at compile time and exposes them via
//! [`all_services`] and [`enabled_services`].

use serde::Deserialize;

/// A geocoding service configuration loaded from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingService {
    /// Unique identifier (e.g., `"address_api"`, `"nominatim"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Whether this service is active in the geocoding chain.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Execution order. Lower values run first.
    pub priority: u32,
    /// Provider-specific configuration.
    pub provider: ProviderConfig,
}

/// Provider-specific configuration, tagged by `type` in TOML.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Base Adresse Nationale address search.
    AddressApi {
        /// Search endpoint (e.g., `"https://api-adresse.data.gouv.fr/search/"`).
        base_url: String,
        /// Whether to let the service complete partial input.
        #[serde(default = "default_true")]
        autocomplete: bool,
    },
    /// National commune API.
    CommuneApi {
        /// Communes endpoint (e.g., `"https://geo.api.gouv.fr/communes"`).
        base_url: String,
    },
    /// Nominatim / `OpenStreetMap` geocoder.
    Nominatim {
        /// API base URL (e.g., `"https://nominatim.openstreetmap.org/search"`).
        base_url: String,
        /// ISO country code results are restricted to.
        country_code: String,
        /// Minimum delay between requests in milliseconds.
        rate_limit_ms: u64,
    },
}

const fn default_true() -> bool {
    true
}

impl GeocodingService {
    /// Returns the provider's base URL regardless of variant.
    #[must_use]
    pub fn base_url(&self) -> &str {
        match &self.provider {
            ProviderConfig::AddressApi { base_url, .. }
            | ProviderConfig::CommuneApi { base_url }
            | ProviderConfig::Nominatim { base_url, .. } => base_url,
        }
    }
}

// ── Compile-time embedded TOML files ────────────────────────────────

const SERVICE_TOMLS: &[(&str, &str)] = &[
    ("address_api", include_str!("../services/address_api.toml")),
    ("commune_api", include_str!("../services/commune_api.toml")),
    ("nominatim", include_str!("../services/nominatim.toml")),
];

#[cfg(test)]
const EXPECTED_SERVICE_COUNT: usize = 3;

/// Returns all geocoding service configurations (enabled and disabled).
///
/// # Panics
///
/// Panics if any TOML config is malformed (this is a compile-time guarantee
/// since the configs are embedded).
#[must_use]
pub fn all_services() -> Vec<GeocodingService> {
    SERVICE_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse geocoding service '{name}': {e}"))
        })
        .collect()
}

/// Returns only enabled services, sorted by priority (ascending).
#[must_use]
pub fn enabled_services() -> Vec<GeocodingService> {
    let mut services: Vec<GeocodingService> =
        all_services().into_iter().filter(|s| s.enabled).collect();
    services.sort_by_key(|s| s.priority);
    services
}
