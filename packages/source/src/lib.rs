#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Snapshot sources and record normalization.
//!
//! Raw rows arrive with unpredictable key names and coordinate encodings.
//! The [`fields`] alias tables, [`geometry`] resolver, [`category`]
//! classifier and [`sector`]/[`color`] canonicalizers turn them into the
//! canonical model types; [`establishment`] applies them to whole
//! snapshots. A [`SnapshotSource`] supplies the raw JSON from a local
//! directory, a static HTTP host, the live open-data APIs, or memory.

pub mod category;
pub mod color;
pub mod establishment;
pub mod fields;
pub mod file;
pub mod geometry;
pub mod http;
pub mod live;
pub mod retry;
pub mod sector;
pub mod snapshot;
pub mod text;

pub use snapshot::{SnapshotKind, SnapshotSource, StaticSnapshots};

/// Errors that can occur while fetching snapshots.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status {
        /// Requested URL.
        url: String,
        /// Response status code.
        status: u16,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The source cannot provide this dataset.
    #[error("{provider} does not provide the {kind} snapshot")]
    Unsupported {
        /// Description of the source.
        provider: String,
        /// Requested dataset.
        kind: SnapshotKind,
    },
}
