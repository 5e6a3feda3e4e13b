//! Search requests, query planning and results.

use std::collections::BTreeSet;

use ips_map_geocoder::GeocodedLocation;
use ips_map_geocoder::department::{DepartmentTarget, is_department_query, resolve_department};
use ips_map_school_models::{Category, CategorySet, DepartmentRanking, EstablishmentHit, SectorFilter};
use ips_map_transit::{Station, TransitMode};
use serde::Serialize;

use crate::ControllerError;

/// One search as entered by the user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchRequest {
    /// Address, commune, postal code or département.
    pub query: String,
    /// Radius for the nearby search; the configured default when `None`.
    pub radius_km: Option<f64>,
    pub sector: SectorFilter,
    /// Wanted categories. Empty means every category.
    pub categories: CategorySet,
    /// Transit modes whose stations accompany nearby results.
    pub transit_modes: BTreeSet<TransitMode>,
}

impl SearchRequest {
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_radius_km(mut self, radius_km: f64) -> Self {
        self.radius_km = Some(radius_km);
        self
    }

    #[must_use]
    pub const fn with_sector(mut self, sector: SectorFilter) -> Self {
        self.sector = sector;
        self
    }

    #[must_use]
    pub fn with_categories(mut self, categories: impl IntoIterator<Item = Category>) -> Self {
        self.categories = categories.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_transit_modes(mut self, modes: impl IntoIterator<Item = TransitMode>) -> Self {
        self.transit_modes = modes.into_iter().collect();
        self
    }

    /// The categories to query, with an empty selection meaning all.
    #[must_use]
    pub fn wanted_categories(&self) -> CategorySet {
        if self.categories.is_empty() {
            Category::all()
        } else {
            self.categories.clone()
        }
    }

    /// Decides how the query runs.
    ///
    /// Code-shaped queries and queries starting with a "département" word
    /// run the département ranking; everything else is located and runs
    /// the nearby search.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::EmptyQuery`] for a blank query, or one
    /// that is nothing but a "département" word.
    pub fn plan(&self) -> Result<QueryMode, ControllerError> {
        let query = self.query.trim();
        if query.is_empty() {
            return Err(ControllerError::EmptyQuery);
        }

        if is_department_query(query) {
            return resolve_department(query)
                .map(QueryMode::Ranking)
                .ok_or(ControllerError::EmptyQuery);
        }

        Ok(QueryMode::Nearby {
            query: query.to_string(),
        })
    }
}

/// The query mode chosen for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryMode {
    /// Top establishments of a département.
    Ranking(DepartmentTarget),
    /// Establishments around a located point.
    Nearby { query: String },
}

/// Why a search produced nothing to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyReason {
    NoEstablishmentsInRange,
    NoRankedEstablishments,
}

impl EmptyReason {
    /// User-facing message.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NoEstablishmentsInRange => "no establishments in range",
            Self::NoRankedEstablishments => "no ranked establishments in this département",
        }
    }
}

/// What a completed search found.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SearchResults {
    Ranking(DepartmentRanking),
    #[serde(rename_all = "camelCase")]
    Nearby {
        center: GeocodedLocation,
        radius_meters: f64,
        /// Nearest first.
        hits: Vec<EstablishmentHit>,
        stations: Vec<Station>,
    },
    /// Nothing matched. A nearby search still reports where it looked.
    Empty {
        reason: EmptyReason,
        center: Option<GeocodedLocation>,
    },
}

/// Result of [`crate::QueryController::search`].
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// The search is still the latest one issued.
    Completed {
        generation: u64,
        results: SearchResults,
    },
    /// A newer search was issued while this one was pending; its results
    /// must not be shown.
    Superseded,
}
