//! Ordered provider chain.
//!
//! Each [`GeocodeStrategy`] returns an optional location; the chain tries
//! them in order and stops at the first hit. A failing provider is logged
//! and treated as a miss so the next one still runs.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::service_registry::{GeocodingService, ProviderConfig, enabled_services};
use crate::{GeocodeError, GeocodedLocation, address_api, commune_api, nominatim};

/// One step of the external geocoding chain.
#[async_trait]
pub trait GeocodeStrategy: Send + Sync {
    /// Identifier used in log messages.
    fn id(&self) -> &str;

    /// Looks the query up. `Ok(None)` means "no match".
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] on network or parse failures.
    async fn geocode(&self, query: &str) -> Result<Option<GeocodedLocation>, GeocodeError>;
}

/// A registry service bound to an HTTP client.
pub struct HttpStrategy {
    client: reqwest::Client,
    service: GeocodingService,
    last_request: Mutex<Option<Instant>>,
}

impl HttpStrategy {
    /// Binds `service` to `client`.
    #[must_use]
    pub fn new(client: reqwest::Client, service: GeocodingService) -> Self {
        Self {
            client,
            service,
            last_request: Mutex::new(None),
        }
    }

    /// Waits until `rate_limit_ms` has elapsed since the previous request.
    async fn throttle(&self, rate_limit_ms: u64) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let ready_at = previous + Duration::from_millis(rate_limit_ms);
            tokio::time::sleep_until(ready_at).await;
        }
        *last = Some(Instant::now());
    }
}

#[async_trait]
impl GeocodeStrategy for HttpStrategy {
    fn id(&self) -> &str {
        &self.service.id
    }

    async fn geocode(&self, query: &str) -> Result<Option<GeocodedLocation>, GeocodeError> {
        match &self.service.provider {
            ProviderConfig::AddressApi {
                base_url,
                autocomplete,
            } => address_api::geocode(&self.client, base_url, query, *autocomplete).await,
            ProviderConfig::CommuneApi { base_url } => {
                commune_api::geocode(&self.client, base_url, query).await
            }
            ProviderConfig::Nominatim {
                base_url,
                country_code,
                rate_limit_ms,
            } => {
                self.throttle(*rate_limit_ms).await;
                nominatim::geocode_freeform(&self.client, base_url, country_code, query).await
            }
        }
    }
}

/// Strategies tried in order; first hit wins.
#[derive(Default)]
pub struct ProviderChain {
    strategies: Vec<Box<dyn GeocodeStrategy>>,
}

impl ProviderChain {
    /// Creates a chain from explicit strategies.
    #[must_use]
    pub fn new(strategies: Vec<Box<dyn GeocodeStrategy>>) -> Self {
        Self { strategies }
    }

    /// Creates the chain of enabled registry services, in priority order.
    #[must_use]
    pub fn from_registry(client: &reqwest::Client) -> Self {
        Self::new(
            enabled_services()
                .into_iter()
                .map(|service| {
                    Box::new(HttpStrategy::new(client.clone(), service)) as Box<dyn GeocodeStrategy>
                })
                .collect(),
        )
    }

    /// Number of strategies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Whether the chain has no strategy.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Runs the strategies in order and returns the first location found.
    pub async fn resolve(&self, query: &str) -> Option<GeocodedLocation> {
        for strategy in &self.strategies {
            match strategy.geocode(query).await {
                Ok(Some(location)) => {
                    log::debug!("{} resolved {query:?} to {}", strategy.id(), location.label);
                    return Some(location);
                }
                Ok(None) => log::debug!("{} has no match for {query:?}", strategy.id()),
                Err(e) => log::warn!("{} failed for {query:?}: {e}", strategy.id()),
            }
        }
        None
    }
}
