#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Transit stations around a search point.
//!
//! The stations feed is optional and only decorates the map: rows are
//! normalized into [`Station`] values with a canonical [`TransitMode`], an
//! optional line code and a display color. Rows that cannot be placed or
//! whose mode is unrecognizable are dropped.

pub mod line;
pub mod mode;
pub mod palette;
pub mod stations;

use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

pub use line::normalize_line;
pub use mode::mode_key;
pub use palette::color_for;
pub use stations::{load_stations, parse_stations, stations_near};

/// Default name of a station row without one.
pub const DEFAULT_STATION_NAME: &str = "Gare";

/// Canonical transport modes.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TransitMode {
    Metro,
    Rer,
    Tram,
    Transilien,
    Ter,
    Tgv,
}

impl TransitMode {
    /// Human-readable label shown in legends and popups.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Metro => "Métro",
            Self::Rer => "RER",
            Self::Tram => "Tram",
            Self::Transilien => "Transilien",
            Self::Ter => "TER",
            Self::Tgv => "TGV",
        }
    }

    /// Kind label used when a row does not carry one: urban modes stop at
    /// stations, rail modes at gares.
    #[must_use]
    pub const fn default_kind(self) -> &'static str {
        match self {
            Self::Metro | Self::Tram => "Station",
            Self::Rer | Self::Transilien | Self::Ter | Self::Tgv => "Gare",
        }
    }
}

/// A normalized transit station.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub name: String,
    /// "Station" or "Gare".
    pub kind: String,
    pub mode: TransitMode,
    /// Canonical line code (`"8"`, `"B"`, `"T3B"`, `"J"`).
    pub line: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    /// Uppercase `#RRGGBB`.
    pub color: String,
}

/// Errors raised while reading a stations feed.
#[derive(Debug, thiserror::Error)]
pub enum TransitError {
    /// The feed could not be fetched.
    #[error(transparent)]
    Source(#[from] ips_map_source::SourceError),
    /// The feed announced `GeoJSON` but did not parse as such.
    #[error("Invalid GeoJSON: {0}")]
    GeoJson(#[from] geojson::Error),
    /// The feed is neither an array nor a feature collection.
    #[error("Unrecognized stations feed shape")]
    UnrecognizedShape,
}
