//! Local file snapshot source.
//!
//! Serves a saved copy of the station feed, which is useful for development
//! and testing without hitting the live API.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::FetchError;
use super::source::SnapshotSource;

/// Reads the snapshot from a file on every fetch.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Create a source for the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file being served.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotSource for FileSource {
    async fn fetch(&self) -> Result<String, FetchError> {
        debug!(path = %self.path.display(), "reading station snapshot");

        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| FetchError::Io {
                path: self.path.display().to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn reads_file_contents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stations.json");
        std::fs::write(&path, r#"{"features": []}"#).unwrap();

        let source = FileSource::new(&path);
        assert_eq!(source.fetch().await.unwrap(), r#"{"features": []}"#);
    }

    #[tokio::test]
    async fn rereads_on_each_fetch() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stations.json");
        std::fs::write(&path, "first").unwrap();

        let source = FileSource::new(&path);
        assert_eq!(source.fetch().await.unwrap(), "first");

        std::fs::write(&path, "second").unwrap();
        assert_eq!(source.fetch().await.unwrap(), "second");
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let source = FileSource::new("/nonexistent/path/stations.json");
        let err = source.fetch().await.unwrap_err();

        assert!(matches!(err, FetchError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/path/stations.json"));
    }
}
