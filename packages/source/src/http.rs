//! Static snapshots served over HTTP.

use async_trait::async_trait;

use crate::SourceError;
use crate::retry;
use crate::snapshot::{SnapshotKind, SnapshotSource};

/// Fetches `{base_url}/{file_name}?v={version}`.
///
/// The version parameter busts intermediate caches whenever the snapshots
/// are regenerated.
#[derive(Debug, Clone)]
pub struct HttpSnapshots {
    client: reqwest::Client,
    base_url: String,
    version: Option<String>,
}

impl HttpSnapshots {
    /// Creates a source rooted at `base_url`.
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            version: None,
        }
    }

    /// Sets the cache-busting version appended as `?v=`.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into()).filter(|v: &String| !v.is_empty());
        self
    }

    /// The URL a snapshot is fetched from.
    #[must_use]
    pub fn url(&self, kind: SnapshotKind) -> String {
        let base = self.base_url.trim_end_matches('/');
        let file = kind.file_name();
        match &self.version {
            Some(version) => format!("{base}/{file}?v={version}"),
            None => format!("{base}/{file}"),
        }
    }
}

#[async_trait]
impl SnapshotSource for HttpSnapshots {
    fn describe(&self) -> String {
        self.base_url.clone()
    }

    async fn fetch(&self, kind: SnapshotKind) -> Result<serde_json::Value, SourceError> {
        let url = self.url(kind);
        log::info!("Fetching {kind} snapshot from {url}");
        retry::send_json(|| self.client.get(&url)).await
    }
}
