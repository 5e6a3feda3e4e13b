//! Static snapshots read from a local directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::SourceError;
use crate::snapshot::{SnapshotKind, SnapshotSource};

/// Reads `{dir}/{file_name}` for each dataset.
#[derive(Debug, Clone)]
pub struct FileSnapshots {
    dir: PathBuf,
}

impl FileSnapshots {
    /// Creates a source reading from `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The snapshot directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl SnapshotSource for FileSnapshots {
    fn describe(&self) -> String {
        self.dir.display().to_string()
    }

    async fn fetch(&self, kind: SnapshotKind) -> Result<serde_json::Value, SourceError> {
        let path = self.dir.join(kind.file_name());
        log::debug!("Reading {kind} snapshot from {}", path.display());
        let text = tokio::fs::read_to_string(&path).await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_snapshot_files() {
        let dir = std::env::temp_dir().join("ips_map_source_file_snapshots");
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(dir.join("ips.min.json"), r#"{"0751234A": 101.5}"#)
            .await
            .unwrap();

        let source = FileSnapshots::new(&dir);
        let value = source.fetch(SnapshotKind::SocialIndex).await.unwrap();
        assert_eq!(value["0751234A"], 101.5);

        let missing = source.fetch(SnapshotKind::Stations).await;
        assert!(matches!(missing, Err(SourceError::Io(_))));

        tokio::fs::remove_dir_all(&dir).await.ok();
    }
}
