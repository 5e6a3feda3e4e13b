//! Snapshots built on the fly from the public open-data APIs.
//!
//! The establishment directory and the social-index datasets come from the
//! education open-data portal's bulk export endpoint; the gazetteer comes
//! from the national commune API. Stations have no live counterpart.

use async_trait::async_trait;
use futures::future::try_join_all;

use crate::SourceError;
use crate::retry;
use crate::snapshot::{SnapshotKind, SnapshotSource};

/// Base URL of the education open-data catalog.
pub const EDUCATION_CATALOG_URL: &str =
    "https://data.education.gouv.fr/api/explore/v2.1/catalog/datasets";

/// Geolocated directory of first and second degree establishments.
pub const ESTABLISHMENTS_DATASET: &str =
    "fr-en-adresse-et-geolocalisation-etablissements-premier-et-second-degre";

/// Social-index datasets, one per category. Their rows are merged.
pub const SOCIAL_INDEX_DATASETS: [&str; 3] = [
    "fr-en-ips-ecoles-ap2022",
    "fr-en-ips-colleges-ap2023",
    "fr-en-ips-lycees-ap2023",
];

/// Commune list with centroids and postal codes.
pub const COMMUNES_URL: &str = "https://geo.api.gouv.fr/communes?fields=nom,centre,codesPostaux,codeDepartement&format=json&geometry=centre";

/// Builds snapshots from the live APIs.
#[derive(Debug, Clone)]
pub struct LiveSnapshots {
    client: reqwest::Client,
    catalog_url: String,
    communes_url: String,
}

impl LiveSnapshots {
    /// Creates a live source using the public endpoints.
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            catalog_url: EDUCATION_CATALOG_URL.to_string(),
            communes_url: COMMUNES_URL.to_string(),
        }
    }

    /// Export URL of a catalog dataset (full dataset as a JSON array).
    #[must_use]
    pub fn export_url(&self, dataset: &str) -> String {
        format!(
            "{}/{dataset}/exports/json",
            self.catalog_url.trim_end_matches('/')
        )
    }

    async fn fetch_export(&self, dataset: &str) -> Result<serde_json::Value, SourceError> {
        let url = self.export_url(dataset);
        log::info!("Exporting {dataset}");
        retry::send_json(|| self.client.get(&url)).await
    }

    async fn fetch_social_index(&self) -> Result<serde_json::Value, SourceError> {
        let exports =
            try_join_all(SOCIAL_INDEX_DATASETS.iter().map(|ds| self.fetch_export(ds))).await?;
        Ok(serde_json::Value::Array(merge_rows(exports)))
    }
}

/// Concatenates the rows of several collection responses.
fn merge_rows(exports: Vec<serde_json::Value>) -> Vec<serde_json::Value> {
    exports
        .into_iter()
        .flat_map(|export| match export {
            serde_json::Value::Array(rows) => rows,
            other => crate::fields::collection_rows(&other).to_vec(),
        })
        .collect()
}

#[async_trait]
impl SnapshotSource for LiveSnapshots {
    fn describe(&self) -> String {
        format!("live ({})", self.catalog_url)
    }

    async fn fetch(&self, kind: SnapshotKind) -> Result<serde_json::Value, SourceError> {
        match kind {
            SnapshotKind::Establishments => self.fetch_export(ESTABLISHMENTS_DATASET).await,
            SnapshotKind::SocialIndex => self.fetch_social_index().await,
            SnapshotKind::Gazetteer => {
                log::info!("Fetching communes from {}", self.communes_url);
                retry::send_json(|| self.client.get(&self.communes_url)).await
            }
            SnapshotKind::Stations => Err(SourceError::Unsupported {
                provider: self.describe(),
                kind,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_urls() {
        let live = LiveSnapshots::new(reqwest::Client::new());
        assert_eq!(
            live.export_url("fr-en-ips-colleges-ap2023"),
            "https://data.education.gouv.fr/api/explore/v2.1/catalog/datasets/fr-en-ips-colleges-ap2023/exports/json"
        );
    }

    #[test]
    fn merges_bare_and_wrapped_exports() {
        let merged = merge_rows(vec![
            serde_json::json!([{"uai": "A"}]),
            serde_json::json!({"results": [{"uai": "B"}, {"uai": "C"}]}),
        ]);
        assert_eq!(merged.len(), 3);
    }

    #[tokio::test]
    async fn stations_are_not_available_live() {
        let live = LiveSnapshots::new(reqwest::Client::new());
        assert!(matches!(
            live.fetch(SnapshotKind::Stations).await,
            Err(SourceError::Unsupported { .. })
        ));
    }
}
