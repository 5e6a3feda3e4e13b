#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Great-circle distance and an in-memory radius index.
//!
//! [`distance_meters`] is the single distance function used for radius
//! filtering and sorting everywhere. [`PointIndex`] narrows candidates
//! with an R-tree envelope query before applying it.

use ips_map_geography_models::LatLon;
use rstar::primitives::GeomWithData;
use rstar::{AABB, RTree};

/// Mean Earth radius of the spherical model, in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Padding added to the envelope so rounding never excludes a boundary
/// point. The exact distance check runs afterwards.
const ENVELOPE_PADDING_DEGREES: f64 = 1e-6;

/// Haversine great-circle distance between two points, in meters.
#[must_use]
pub fn distance_meters(from: LatLon, to: LatLon) -> f64 {
    let phi1 = from.latitude.to_radians();
    let phi2 = to.latitude.to_radians();
    let d_phi = (to.latitude - from.latitude).to_radians();
    let d_lambda = (to.longitude - from.longitude).to_radians();

    let a = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_METERS * c
}

/// A point stored as `[longitude, latitude]` with its caller-side index.
type IndexedPoint = GeomWithData<[f64; 2], usize>;

/// R-tree over a fixed set of points.
///
/// Each point carries the position it had in the input slice, so callers
/// keep their own storage and use the index only for lookups.
pub struct PointIndex {
    tree: RTree<IndexedPoint>,
    points: Vec<LatLon>,
}

impl PointIndex {
    /// Bulk-loads the index.
    #[must_use]
    pub fn new(points: Vec<LatLon>) -> Self {
        let entries = points
            .iter()
            .enumerate()
            .map(|(i, p)| GeomWithData::new([p.longitude, p.latitude], i))
            .collect();
        let tree = RTree::bulk_load(entries);
        log::debug!("Built point index over {} points", points.len());
        Self { tree, points }
    }

    /// Number of indexed points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the index holds no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns `(index, distance)` for every point within `radius_meters`
    /// of `center`, sorted ascending by distance (ties by index).
    ///
    /// A negative or non-finite radius yields nothing.
    #[must_use]
    pub fn within_radius(&self, center: LatLon, radius_meters: f64) -> Vec<(usize, f64)> {
        if !radius_meters.is_finite() || radius_meters < 0.0 || !center.is_valid() {
            return Vec::new();
        }

        let candidates: Vec<usize> = match search_envelope(center, radius_meters) {
            Some(envelope) => self
                .tree
                .locate_in_envelope(&envelope)
                .map(|entry| entry.data)
                .collect(),
            None => (0..self.points.len()).collect(),
        };

        let mut hits: Vec<(usize, f64)> = candidates
            .into_iter()
            .filter_map(|i| {
                let d = distance_meters(center, self.points[i]);
                (d <= radius_meters).then_some((i, d))
            })
            .collect();
        hits.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        hits
    }
}

/// Conservative lon/lat envelope containing the spherical cap of
/// `radius_meters` around `center`.
///
/// Returns `None` when the cap reaches a pole or wraps the antimeridian;
/// callers then scan every point.
fn search_envelope(center: LatLon, radius_meters: f64) -> Option<AABB<[f64; 2]>> {
    let angular = radius_meters / EARTH_RADIUS_METERS;
    let d_lat = angular.to_degrees();

    let min_lat = center.latitude - d_lat;
    let max_lat = center.latitude + d_lat;
    if min_lat <= -90.0 || max_lat >= 90.0 {
        return None;
    }

    let ratio = angular.sin() / center.latitude.to_radians().cos();
    if !(0.0..1.0).contains(&ratio) {
        return None;
    }
    let d_lon = ratio.asin().to_degrees();

    let min_lon = center.longitude - d_lon;
    let max_lon = center.longitude + d_lon;
    if min_lon <= -180.0 || max_lon >= 180.0 {
        return None;
    }

    Some(AABB::from_corners(
        [
            min_lon - ENVELOPE_PADDING_DEGREES,
            min_lat - ENVELOPE_PADDING_DEGREES,
        ],
        [
            max_lon + ENVELOPE_PADDING_DEGREES,
            max_lat + ENVELOPE_PADDING_DEGREES,
        ],
    ))
}
