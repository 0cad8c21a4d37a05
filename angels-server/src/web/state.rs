//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::SnapshotCache;
use crate::feed::FeedSource;

/// The cache type the server runs with.
pub type FeedCache = SnapshotCache<FeedSource>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Time-bucketed opportunity cache
    pub cache: Arc<FeedCache>,

    /// Number of opportunities shown when the request doesn't say
    pub at_most: usize,
}

impl AppState {
    /// Create a new app state.
    pub fn new(cache: FeedCache, at_most: usize) -> Self {
        Self {
            cache: Arc::new(cache),
            at_most,
        }
    }
}
