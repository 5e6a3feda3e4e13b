//! The presentation collaborator.

use ips_map_geocoder::GeocodedLocation;
use ips_map_school_models::{DepartmentRanking, EstablishmentHit};
use ips_map_transit::Station;

use crate::{EmptyReason, SearchResults};

/// Receives the results of the latest search.
///
/// Map markers, lists and popups are the implementor's business; the
/// controller only hands over plain data and user-facing messages.
pub trait Renderer: Send + Sync {
    /// A département ranking, per category, best social index first.
    fn ranking(&self, ranking: &DepartmentRanking);

    /// Establishments around `center`, nearest first, with the stations of
    /// the requested modes inside the same radius.
    fn nearby(
        &self,
        center: &GeocodedLocation,
        radius_meters: f64,
        hits: &[EstablishmentHit],
        stations: &[Station],
    );

    /// A search that matched nothing. `center` is set when a location was
    /// resolved.
    fn empty(&self, reason: EmptyReason, center: Option<&GeocodedLocation>);

    /// A search that failed (unlocatable query, load failure, bad input).
    fn failure(&self, message: &str);
}

/// Dispatches completed results to the matching renderer callback.
pub fn render(results: &SearchResults, renderer: &dyn Renderer) {
    match results {
        SearchResults::Ranking(ranking) => renderer.ranking(ranking),
        SearchResults::Nearby {
            center,
            radius_meters,
            hits,
            stations,
        } => renderer.nearby(center, *radius_meters, hits, stations),
        SearchResults::Empty { reason, center } => renderer.empty(*reason, center.as_ref()),
    }
}
