//! Snapshot sources.

use std::future::Future;
use std::sync::Arc;

use super::client::HttpSource;
use super::error::FetchError;
use super::file::FileSource;

/// Something that can produce the raw station snapshot payload.
///
/// Implemented by the real sources below and by test stubs; the
/// [`SnapshotCache`](crate::cache::SnapshotCache) is generic over it.
pub trait SnapshotSource: Send + Sync {
    /// Fetch the raw snapshot text.
    fn fetch(&self) -> impl Future<Output = Result<String, FetchError>> + Send;
}

impl<S: SnapshotSource> SnapshotSource for Arc<S> {
    fn fetch(&self) -> impl Future<Output = Result<String, FetchError>> + Send {
        (**self).fetch()
    }
}

/// The source chosen at startup: a local file or the live API.
#[derive(Debug, Clone)]
pub enum FeedSource {
    File(FileSource),
    Http(HttpSource),
}

impl FeedSource {
    /// Short description for logging.
    pub fn describe(&self) -> String {
        match self {
            FeedSource::File(file) => format!("file {}", file.path().display()),
            FeedSource::Http(http) => format!("API {}", http.url()),
        }
    }
}

impl SnapshotSource for FeedSource {
    async fn fetch(&self) -> Result<String, FetchError> {
        match self {
            FeedSource::File(file) => file.fetch().await,
            FeedSource::Http(http) => http.fetch().await,
        }
    }
}

impl From<FileSource> for FeedSource {
    fn from(source: FileSource) -> Self {
        FeedSource::File(source)
    }
}

impl From<HttpSource> for FeedSource {
    fn from(source: HttpSource) -> Self {
        FeedSource::Http(source)
    }
}
