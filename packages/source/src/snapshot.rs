//! The snapshot source abstraction.
//!
//! A [`SnapshotSource`] hands out the raw JSON for each [`SnapshotKind`];
//! normalization happens downstream so every source shares one pipeline.

use std::collections::BTreeMap;

use async_trait::async_trait;
use strum_macros::{AsRefStr, Display, EnumIter};

use crate::SourceError;

/// The datasets the application consumes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, AsRefStr, EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum SnapshotKind {
    /// Geolocated establishment directory.
    Establishments,
    /// Social-index (IPS) rows or map.
    SocialIndex,
    /// Commune names, postal codes and centroids.
    Gazetteer,
    /// Transit stations (optional).
    Stations,
}

impl SnapshotKind {
    /// The three datasets a session cannot run without.
    pub const MANDATORY: [Self; 3] = [Self::Establishments, Self::SocialIndex, Self::Gazetteer];

    /// File name of the static snapshot.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Establishments => "establishments.min.json",
            Self::SocialIndex => "ips.min.json",
            Self::Gazetteer => "gazetteer.min.json",
            Self::Stations => "stations.min.json",
        }
    }
}

/// Something that can produce raw snapshot JSON.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Short description for log messages (a directory, a base URL, ...).
    fn describe(&self) -> String;

    /// Fetches the raw JSON for one dataset.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the dataset cannot be read, the server
    /// answers with a non-success status, or the body is not JSON.
    async fn fetch(&self, kind: SnapshotKind) -> Result<serde_json::Value, SourceError>;
}

/// Snapshots already held in memory.
///
/// Used to inject fixtures and to serve data embedded by the host.
#[derive(Debug, Clone, Default)]
pub struct StaticSnapshots {
    snapshots: BTreeMap<SnapshotKind, serde_json::Value>,
}

impl StaticSnapshots {
    /// Creates an empty set of snapshots.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            snapshots: BTreeMap::new(),
        }
    }

    /// Adds (or replaces) the JSON for one dataset.
    #[must_use]
    pub fn with(mut self, kind: SnapshotKind, value: serde_json::Value) -> Self {
        self.snapshots.insert(kind, value);
        self
    }
}

#[async_trait]
impl SnapshotSource for StaticSnapshots {
    fn describe(&self) -> String {
        format!("in-memory ({} snapshots)", self.snapshots.len())
    }

    async fn fetch(&self, kind: SnapshotKind) -> Result<serde_json::Value, SourceError> {
        self.snapshots
            .get(&kind)
            .cloned()
            .ok_or_else(|| SourceError::Unsupported {
                provider: self.describe(),
                kind,
            })
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator as _;

    use super::*;

    #[test]
    fn file_names_are_distinct() {
        let names: std::collections::BTreeSet<_> =
            SnapshotKind::iter().map(SnapshotKind::file_name).collect();
        assert_eq!(names.len(), 4);
    }

    #[test]
    fn kinds_display_in_snake_case() {
        assert_eq!(SnapshotKind::SocialIndex.to_string(), "social_index");
    }

    #[tokio::test]
    async fn static_snapshots_serve_what_they_hold() {
        let source = StaticSnapshots::new().with(SnapshotKind::Gazetteer, serde_json::json!([]));
        assert_eq!(
            source.fetch(SnapshotKind::Gazetteer).await.unwrap(),
            serde_json::json!([])
        );
        assert!(matches!(
            source.fetch(SnapshotKind::Stations).await,
            Err(SourceError::Unsupported { kind: SnapshotKind::Stations, .. })
        ));
    }
}
