#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Coordinates, gazetteer entries and French département codes.
//!
//! These types are shared by the normalization pipeline, the store and
//! the geocoder. They carry no behavior beyond code validation and
//! derivation.

pub mod departments;

use serde::{Deserialize, Serialize};

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatLon {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl LatLon {
    /// Creates a coordinate pair without validation.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Creates a coordinate pair if both values are finite and within
    /// `[-90, 90] × [-180, 180]`.
    #[must_use]
    pub fn checked(latitude: f64, longitude: f64) -> Option<Self> {
        let point = Self::new(latitude, longitude);
        point.is_valid().then_some(point)
    }

    /// Whether both values are finite and within WGS84 range.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// A commune of the offline gazetteer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GazetteerEntry {
    /// Commune name as published (with diacritics).
    pub name: String,
    /// Canonical département code, when known.
    pub department: Option<String>,
    /// Postal codes served by the commune.
    pub postal_codes: Vec<String>,
    /// Centroid latitude.
    pub latitude: f64,
    /// Centroid longitude.
    pub longitude: f64,
}

impl GazetteerEntry {
    /// The commune centroid.
    #[must_use]
    pub const fn centroid(&self) -> LatLon {
        LatLon::new(self.latitude, self.longitude)
    }

    /// Whether the commune serves `postal_code`.
    #[must_use]
    pub fn serves(&self, postal_code: &str) -> bool {
        self.postal_codes.iter().any(|cp| cp == postal_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_rejects_out_of_range() {
        assert!(LatLon::checked(48.85, 2.35).is_some());
        assert!(LatLon::checked(91.0, 2.35).is_none());
        assert!(LatLon::checked(48.85, f64::NAN).is_none());
        assert!(LatLon::checked(f64::INFINITY, 0.0).is_none());
    }

    #[test]
    fn gazetteer_entry_serves_postal_code() {
        let entry = GazetteerEntry {
            name: "Paris".to_string(),
            department: Some("75".to_string()),
            postal_codes: vec!["75001".to_string(), "75002".to_string()],
            latitude: 48.8566,
            longitude: 2.3522,
        };
        assert!(entry.serves("75002"));
        assert!(!entry.serves("75003"));
    }
}
