#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Search orchestration for the school IPS map.
//!
//! [`start`] is the composition root: it reads the snapshots named by a
//! [`Config`], builds the [`Store`], loads the optional stations feed and
//! wires the location resolver. The resulting [`QueryController`] decides
//! between a département ranking and a nearby search for each request and
//! hands results to a [`Renderer`].
//!
//! No logger is installed here; the embedding application owns that.

pub mod config;
pub mod controller;
pub mod renderer;
pub mod search;

use std::sync::Arc;

use ips_map_geocoder::{GeocodeError, LocationResolver};
use ips_map_store::{Store, StoreError};
use ips_map_transit::load_stations;
use thiserror::Error;

pub use config::{Config, ConfigError};
pub use controller::QueryController;
pub use renderer::Renderer;
pub use search::{EmptyReason, QueryMode, SearchOutcome, SearchRequest, SearchResults};

/// Errors surfaced to the caller of a search or of [`start`].
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A mandatory snapshot failed to load.
    #[error(transparent)]
    DataLoad(#[from] StoreError),

    /// The query could not be located.
    #[error(transparent)]
    Geocoding(#[from] GeocodeError),

    #[error("Empty query")]
    EmptyQuery,

    #[error("Invalid radius: {radius_km} km")]
    InvalidRadius { radius_km: f64 },
}

impl ControllerError {
    /// Message suitable for display next to the search box.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::Config(_) => "invalid configuration",
            Self::DataLoad(_) => "could not load the school data",
            Self::Geocoding(_) => "could not locate that query",
            Self::EmptyQuery => "enter an address, a commune or a département",
            Self::InvalidRadius { .. } => "the radius must be a positive number of kilometers",
        }
    }
}

/// Loads every dataset named by `config` and returns a ready controller.
///
/// The mandatory snapshots and the stations feed load concurrently. A
/// missing stations feed only costs the stations.
///
/// # Errors
///
/// Returns [`ControllerError::Config`] if the HTTP client cannot be built
/// and [`ControllerError::DataLoad`] if a mandatory snapshot fails.
pub async fn start(config: &Config) -> Result<QueryController, ControllerError> {
    let client = config.http_client()?;
    let source = config.snapshot_source(&client);
    let stations_source = config.stations_source(&client);

    log::info!("Loading snapshots from {}", source.describe());
    let (store, stations) = tokio::join!(
        Store::load(source.as_ref()),
        load_stations(stations_source.as_ref())
    );
    let store = store?;
    log::info!(
        "Ready: {} establishments, {} stations",
        store.len(),
        stations.len()
    );

    Ok(QueryController::new(
        Arc::new(store),
        LocationResolver::from_registry(&client),
        stations,
    )
    .with_default_radius_km(config.search.default_radius_km))
}
