//! The query controller.
//!
//! Each search is stamped with a generation number when it starts. Only
//! the search holding the latest generation when it finishes is
//! reported; an older one that finishes late is superseded, so a slow
//! geocode can never overwrite a newer result.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use ips_map_geocoder::LocationResolver;
use ips_map_geography_models::LatLon;
use ips_map_store::Store;
use ips_map_transit::{Station, stations_near};

use crate::renderer::render;
use crate::{
    ControllerError, EmptyReason, QueryMode, Renderer, SearchOutcome, SearchRequest,
    SearchResults,
};

/// Meters per kilometer.
const METERS_PER_KM: f64 = 1000.0;

/// Runs searches against a loaded store.
pub struct QueryController {
    store: Arc<Store>,
    resolver: LocationResolver,
    stations: Vec<Station>,
    default_radius_km: f64,
    generation: AtomicU64,
}

impl QueryController {
    /// Creates a controller with a one-kilometer default radius.
    #[must_use]
    pub const fn new(store: Arc<Store>, resolver: LocationResolver, stations: Vec<Station>) -> Self {
        Self {
            store,
            resolver,
            stations,
            default_radius_km: 1.0,
            generation: AtomicU64::new(0),
        }
    }

    /// Sets the radius used by requests that do not name one.
    #[must_use]
    pub const fn with_default_radius_km(mut self, radius_km: f64) -> Self {
        self.default_radius_km = radius_km;
        self
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    #[must_use]
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Generation of the most recently issued search (0 before any).
    #[must_use]
    pub fn latest_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Runs a search.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::EmptyQuery`] or
    /// [`ControllerError::InvalidRadius`] for unusable input, and
    /// [`ControllerError::Geocoding`] when a nearby query cannot be
    /// located. A superseded search reports [`SearchOutcome::Superseded`]
    /// instead of its error.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchOutcome, ControllerError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.execute(request).await;

        if self.latest_generation() != generation {
            log::debug!("Search #{generation} ({:?}) superseded", request.query);
            return Ok(SearchOutcome::Superseded);
        }

        result.map(|results| SearchOutcome::Completed {
            generation,
            results,
        })
    }

    /// Runs a search and hands its outcome to `renderer`.
    ///
    /// Superseded searches render nothing. Errors render as failure
    /// messages. Returns the generation that was rendered, if any.
    pub async fn run(&self, request: &SearchRequest, renderer: &dyn Renderer) -> Option<u64> {
        match self.search(request).await {
            Ok(SearchOutcome::Completed {
                generation,
                results,
            }) => {
                render(&results, renderer);
                Some(generation)
            }
            Ok(SearchOutcome::Superseded) => None,
            Err(e) => {
                log::warn!("Search {:?} failed: {e}", request.query);
                renderer.failure(e.user_message());
                Some(self.latest_generation())
            }
        }
    }

    async fn execute(&self, request: &SearchRequest) -> Result<SearchResults, ControllerError> {
        let categories = request.wanted_categories();

        match request.plan()? {
            QueryMode::Ranking(target) => {
                log::info!("Ranking département {} ({})", target.code, target.label);
                let ranking = self
                    .store
                    .top10_by_dept(&target.code, &categories, request.sector);
                if ranking.is_empty() {
                    return Ok(SearchResults::Empty {
                        reason: EmptyReason::NoRankedEstablishments,
                        center: None,
                    });
                }
                Ok(SearchResults::Ranking(ranking))
            }
            QueryMode::Nearby { query } => {
                let radius_km = request.radius_km.unwrap_or(self.default_radius_km);
                if !radius_km.is_finite() || radius_km < 0.0 {
                    return Err(ControllerError::InvalidRadius { radius_km });
                }
                let radius_meters = radius_km * METERS_PER_KM;

                let center = self
                    .resolver
                    .resolve_location(self.store.gazetteer(), &query)
                    .await?;
                log::info!(
                    "Searching {radius_km} km around {} ({})",
                    center.label,
                    center.provider
                );

                let hits = self.store.around(
                    center.latitude,
                    center.longitude,
                    radius_meters,
                    request.sector,
                    &categories,
                );
                if hits.is_empty() {
                    return Ok(SearchResults::Empty {
                        reason: EmptyReason::NoEstablishmentsInRange,
                        center: Some(center),
                    });
                }

                let stations = stations_near(
                    &self.stations,
                    &request.transit_modes,
                    Some((LatLon::new(center.latitude, center.longitude), radius_meters)),
                )
                .into_iter()
                .cloned()
                .collect();

                Ok(SearchResults::Nearby {
                    center,
                    radius_meters,
                    hits,
                    stations,
                })
            }
        }
    }
}
