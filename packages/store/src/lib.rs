#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! The normalized, indexed dataset.
//!
//! A [`Store`] is built once from the three mandatory snapshots and is
//! immutable afterwards. It owns the establishments, the social-index map
//! and the gazetteer, and maintains the secondary indices used by the
//! queries in [`queries`]. Results are always fresh [`EstablishmentHit`]
//! values; stored establishments are never mutated.
//!
//! [`EstablishmentHit`]: ips_map_school_models::EstablishmentHit

pub mod queries;

use std::collections::{BTreeMap, BTreeSet};

use ips_map_geography::Gazetteer;
use ips_map_geography_models::LatLon;
use ips_map_school_models::{Establishment, SocialIndexMap};
use ips_map_source::establishment::{normalize_establishments, parse_gazetteer, parse_social_index};
use ips_map_source::fields::{AliasTable, aliases};
use ips_map_source::text::normalize_name;
use ips_map_source::{SnapshotKind, SnapshotSource, SourceError};
use ips_map_spatial::PointIndex;
use thiserror::Error;

/// Errors that can occur while building a store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A mandatory snapshot could not be fetched. The session cannot run
    /// on partial data.
    #[error("failed to load the {kind} snapshot: {source}")]
    DataLoadFailed {
        /// Which snapshot failed.
        kind: SnapshotKind,
        /// Underlying fetch error.
        source: SourceError,
    },
}

/// The in-memory dataset and its indices.
pub struct Store {
    establishments: Vec<Establishment>,
    social_index: SocialIndexMap,
    gazetteer: Gazetteer,
    by_id: BTreeMap<String, usize>,
    by_department: BTreeMap<String, Vec<usize>>,
    by_postal_code: BTreeMap<String, Vec<usize>>,
    normalized_names: Vec<String>,
    points: PointIndex,
}

impl Store {
    /// Fetches the three mandatory snapshots concurrently and builds the
    /// store with the embedded alias table.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DataLoadFailed`] if any fetch fails.
    pub async fn load(source: &dyn SnapshotSource) -> Result<Self, StoreError> {
        Self::load_with_aliases(source, aliases()).await
    }

    /// Like [`Store::load`], with a caller-supplied alias table.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DataLoadFailed`] if any fetch fails.
    pub async fn load_with_aliases(
        source: &dyn SnapshotSource,
        aliases: &AliasTable,
    ) -> Result<Self, StoreError> {
        log::info!("Loading snapshots from {}", source.describe());
        let fetch = |kind: SnapshotKind| async move {
            source
                .fetch(kind)
                .await
                .map_err(|source| StoreError::DataLoadFailed { kind, source })
        };

        let (establishments, social_index, gazetteer) = futures::try_join!(
            fetch(SnapshotKind::Establishments),
            fetch(SnapshotKind::SocialIndex),
            fetch(SnapshotKind::Gazetteer),
        )?;

        Ok(Self::from_snapshots(
            &establishments,
            &social_index,
            &gazetteer,
            aliases,
        ))
    }

    /// Builds a store from raw snapshot JSON.
    #[must_use]
    pub fn from_snapshots(
        establishments: &serde_json::Value,
        social_index: &serde_json::Value,
        gazetteer: &serde_json::Value,
        aliases: &AliasTable,
    ) -> Self {
        Self::from_parts(
            normalize_establishments(establishments, &aliases.establishment),
            parse_social_index(social_index, &aliases.social_index),
            Gazetteer::new(parse_gazetteer(gazetteer, &aliases.gazetteer)),
        )
    }

    /// Builds a store from already-normalized parts.
    ///
    /// Establishments sharing an id keep their first occurrence.
    #[must_use]
    pub fn from_parts(
        establishments: Vec<Establishment>,
        social_index: SocialIndexMap,
        gazetteer: Gazetteer,
    ) -> Self {
        let mut seen = BTreeSet::new();
        let establishments: Vec<Establishment> = establishments
            .into_iter()
            .filter(|e| seen.insert(e.id.clone()))
            .collect();

        let mut by_id = BTreeMap::new();
        let mut by_department: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        let mut by_postal_code: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (i, establishment) in establishments.iter().enumerate() {
            by_id.insert(establishment.id.clone(), i);
            if let Some(department) = &establishment.department {
                by_department.entry(department.clone()).or_default().push(i);
            }
            if let Some(postal_code) = &establishment.postal_code {
                by_postal_code
                    .entry(postal_code.clone())
                    .or_default()
                    .push(i);
            }
        }

        let normalized_names = establishments
            .iter()
            .map(|e| normalize_name(&e.name))
            .collect();
        let points = PointIndex::new(
            establishments
                .iter()
                .map(|e| LatLon::new(e.latitude, e.longitude))
                .collect(),
        );

        log::info!(
            "Store ready: {} establishments, {} social index values, {} communes, {} départements",
            establishments.len(),
            social_index.len(),
            gazetteer.len(),
            by_department.len(),
        );

        Self {
            establishments,
            social_index,
            gazetteer,
            by_id,
            by_department,
            by_postal_code,
            normalized_names,
            points,
        }
    }

    /// All establishments in load order.
    #[must_use]
    pub fn establishments(&self) -> &[Establishment] {
        &self.establishments
    }

    /// Number of establishments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.establishments.len()
    }

    /// Whether the store holds no establishments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.establishments.is_empty()
    }

    /// Looks up an establishment by id (case-insensitive).
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Establishment> {
        self.by_id
            .get(&id.trim().to_uppercase())
            .map(|&i| &self.establishments[i])
    }

    /// The social-index map.
    #[must_use]
    pub const fn social_index(&self) -> &SocialIndexMap {
        &self.social_index
    }

    /// The commune gazetteer.
    #[must_use]
    pub const fn gazetteer(&self) -> &Gazetteer {
        &self.gazetteer
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use ips_map_school_models::{Category, SectorFilter};
    use ips_map_source::StaticSnapshots;

    use super::*;

    /// Answers HTTP 503 for one snapshot kind.
    struct FailingSource {
        inner: StaticSnapshots,
        failing: SnapshotKind,
    }

    #[async_trait]
    impl SnapshotSource for FailingSource {
        fn describe(&self) -> String {
            "failing".to_string()
        }

        async fn fetch(&self, kind: SnapshotKind) -> Result<serde_json::Value, SourceError> {
            if kind == self.failing {
                return Err(SourceError::Status {
                    url: format!("https://example.org/{}", kind.file_name()),
                    status: 503,
                });
            }
            self.inner.fetch(kind).await
        }
    }

    fn snapshots() -> StaticSnapshots {
        StaticSnapshots::new()
            .with(
                SnapshotKind::Establishments,
                serde_json::json!([
                    {"uai": "0751234A", "type": "lycee", "secteur": "Public", "dep": "75",
                     "cp": "75004", "lat": 48.8539, "lon": 2.3609},
                    {"uai": "0751235B", "type": "lycee", "secteur": "Public", "dep": "75",
                     "cp": "75005", "lat": 48.8462, "lon": 2.3447},
                    {"uai": "0751235B", "type": "lycee", "secteur": "Public", "dep": "75",
                     "cp": "75005", "lat": 48.8462, "lon": 2.3447},
                    {"uai": "0130001C", "type": "college", "secteur": 2, "cp": "13001",
                     "geo_point_2d": "43.2965,5.3698"}
                ]),
            )
            .with(
                SnapshotKind::SocialIndex,
                serde_json::json!([
                    {"uai": "0751234A", "ips": null},
                    {"uai": "0751235B", "ips": 120.0}
                ]),
            )
            .with(
                SnapshotKind::Gazetteer,
                serde_json::json!([
                    {"n": "Paris", "dep": "75", "cp": ["75001", "75004", "75005"],
                     "lat": 48.8566, "lon": 2.3522}
                ]),
            )
    }

    #[tokio::test]
    async fn loads_and_indexes_snapshots() {
        let store = Store::load(&snapshots()).await.unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(store.social_index().len(), 1);
        assert_eq!(store.gazetteer().len(), 1);
        assert_eq!(store.get("0130001c").map(|e| e.department.as_deref()), Some(Some("13")));
    }

    #[tokio::test]
    async fn loading_twice_does_not_accumulate() {
        let source = snapshots();
        let first = Store::load(&source).await.unwrap();
        let second = Store::load(&source).await.unwrap();
        assert_eq!(first.len(), second.len());
        assert_eq!(first.establishments(), second.establishments());
    }

    #[tokio::test]
    async fn unpublished_index_is_excluded_from_ranking() {
        let store = Store::load(&snapshots()).await.unwrap();
        let wanted = [Category::HighSchool].into_iter().collect();
        let ranking = store.top10_by_dept("75", &wanted, SectorFilter::All);
        let ranked = ranking.get(Category::HighSchool);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].establishment.id, "0751235B");
        assert_eq!(ranked[0].social_index, Some(120.0));
    }

    #[tokio::test]
    async fn failed_fetch_is_a_data_load_failure() {
        for failing in SnapshotKind::MANDATORY {
            let source = FailingSource {
                inner: snapshots(),
                failing,
            };
            match Store::load(&source).await {
                Err(StoreError::DataLoadFailed { kind, source }) => {
                    assert_eq!(kind, failing);
                    assert!(matches!(source, SourceError::Status { status: 503, .. }));
                }
                Ok(_) => panic!("load should fail when {failing} is unavailable"),
            }
        }
    }

    #[tokio::test]
    async fn missing_snapshot_is_a_data_load_failure() {
        let source = StaticSnapshots::new().with(SnapshotKind::Establishments, serde_json::json!([]));
        assert!(matches!(
            Store::load(&source).await,
            Err(StoreError::DataLoadFailed { .. })
        ));
    }

    #[test]
    fn from_parts_keeps_first_duplicate() {
        let store = Store::from_snapshots(
            &serde_json::json!([
                {"uai": "X", "name": "First", "type": "ecole", "lat": 48.0, "lon": 2.0},
                {"uai": "Y", "name": "Other", "type": "ecole", "lat": 48.0, "lon": 2.0}
            ]),
            &serde_json::json!({}),
            &serde_json::json!([]),
            aliases(),
        );
        let mut doubled = store.establishments().to_vec();
        doubled.extend(store.establishments().iter().cloned());
        let rebuilt = Store::from_parts(doubled, SocialIndexMap::new(), Gazetteer::default());
        assert_eq!(rebuilt.len(), 2);
        assert_eq!(rebuilt.get("x").map(|e| e.name.as_str()), Some("First"));
    }
}
