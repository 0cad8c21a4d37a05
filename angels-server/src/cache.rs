//! Time-bucketed cache for the ranked station snapshot.
//!
//! Fetching and ranking the whole system on every request is wasteful, and
//! the upstream feed only changes every few minutes anyway. The cache splits
//! wall-clock time into fixed-width buckets (15 minutes by default) and
//! recomputes at most once per bucket, however many requests arrive.
//!
//! A failed refresh never throws away a good snapshot: if an earlier result
//! exists it keeps being served, and the next request retries.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::feed::{FeedError, FetchError, SnapshotSource, parse_stations};
use crate::ranking::{RankConfig, RankedSnapshot};

/// Default bucket width: 15 minutes.
const DEFAULT_BUCKET_WIDTH: Duration = Duration::from_secs(15 * 60);

/// Default upper bound on a single upstream fetch.
const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors surfaced by the cache.
///
/// Only returned when there is no earlier snapshot to fall back on.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("failed to fetch station snapshot: {0}")]
    Fetch(#[from] FetchError),

    #[error("failed to decode station snapshot: {0}")]
    Feed(#[from] FeedError),
}

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Width of a refresh bucket.
    pub bucket_width: Duration,

    /// Upper bound on a single upstream fetch.
    pub fetch_timeout: Duration,

    /// Ranking options applied on each recompute.
    pub rank: RankConfig,
}

impl CacheConfig {
    /// Set the fetch timeout.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            bucket_width: DEFAULT_BUCKET_WIDTH,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            rank: RankConfig::default(),
        }
    }
}

/// Start of the bucket containing `ts`.
///
/// Buckets are aligned to the Unix epoch, so with a 15-minute width they
/// start on the hour and at :15, :30 and :45. A zero width leaves `ts`
/// unchanged.
pub fn bucket_start(ts: DateTime<Utc>, width: Duration) -> DateTime<Utc> {
    let width_ms = i64::try_from(width.as_millis()).unwrap_or(i64::MAX);
    if width_ms == 0 {
        return ts;
    }

    let ms = ts.timestamp_millis();
    DateTime::from_timestamp_millis(ms - ms.rem_euclid(width_ms)).unwrap_or(ts)
}

/// A ranked snapshot together with the time it was computed.
#[derive(Debug, Clone)]
pub struct CachedSnapshot {
    pub snapshot: Arc<RankedSnapshot>,
    pub computed_at: DateTime<Utc>,
}

/// Fetch-and-rank pipeline behind a time-bucketed cache.
///
/// A single lock covers the whole check-recompute-store sequence, so
/// concurrent callers during a recompute wait for it rather than starting
/// their own.
pub struct SnapshotCache<S, C = SystemClock> {
    source: S,
    clock: C,
    config: CacheConfig,
    entry: Mutex<Option<CachedSnapshot>>,
}

impl<S: SnapshotSource> SnapshotCache<S, SystemClock> {
    /// Create a cold cache reading from `source` on the system clock.
    pub fn new(source: S, config: CacheConfig) -> Self {
        Self::with_clock(source, SystemClock, config)
    }
}

impl<S: SnapshotSource, C: Clock> SnapshotCache<S, C> {
    /// Create a cold cache with an explicit clock.
    pub fn with_clock(source: S, clock: C, config: CacheConfig) -> Self {
        Self {
            source,
            clock,
            config,
            entry: Mutex::new(None),
        }
    }

    /// The current ranked snapshot, recomputing if a new bucket has started.
    ///
    /// The returned `computed_at` always belongs to the returned snapshot. On
    /// a refresh failure the previous snapshot is returned if there is one;
    /// the error only reaches the caller when the cache is cold.
    pub async fn get_current(&self) -> Result<CachedSnapshot, CacheError> {
        let mut entry = self.entry.lock().await;
        let now = self.clock.now();

        if let Some(current) = entry.as_ref()
            && !self.is_stale(current.computed_at, now)
        {
            debug!(computed_at = %current.computed_at, "serving cached snapshot");
            return Ok(current.clone());
        }

        match self.recompute().await {
            Ok(snapshot) => {
                info!(
                    stations = snapshot.stations().len(),
                    candidates = snapshot.candidates().len(),
                    "recomputed opportunities"
                );
                let current = CachedSnapshot {
                    snapshot: Arc::new(snapshot),
                    computed_at: now,
                };
                *entry = Some(current.clone());
                Ok(current)
            }
            Err(err) => match entry.as_ref() {
                Some(previous) => {
                    warn!(
                        error = %err,
                        computed_at = %previous.computed_at,
                        "refresh failed, serving previous snapshot"
                    );
                    Ok(previous.clone())
                }
                None => Err(err),
            },
        }
    }

    /// Whether `now` falls in a strictly later bucket than `computed_at`.
    fn is_stale(&self, computed_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let width = self.config.bucket_width;
        bucket_start(now, width) > bucket_start(computed_at, width)
    }

    async fn recompute(&self) -> Result<RankedSnapshot, CacheError> {
        let timeout = self.config.fetch_timeout;
        let raw = tokio::time::timeout(timeout, self.source.fetch())
            .await
            .map_err(|_| FetchError::Timeout {
                secs: timeout.as_secs(),
            })??;

        let stations = parse_stations(&raw)?;
        Ok(RankedSnapshot::new(stations, &self.config.rank))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::{TimeDelta, TimeZone};
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const SNAPSHOT: &str = r#"{"features": [
        {"geometry": {"coordinates": [-73.990, 40.730]},
         "properties": {"name": "Surplus", "bike_angels_action": "take", "bike_angels_points": 2}},
        {"geometry": {"coordinates": [-73.990, 40.740]},
         "properties": {"name": "Deficit", "bike_angels_action": "give", "bike_angels_points": 3}}
    ]}"#;

    /// Stub source with a call counter and a swappable response.
    struct StubSource {
        calls: AtomicUsize,
        payload: StdMutex<Option<String>>,
        delay: Duration,
    }

    impl StubSource {
        fn new(payload: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                payload: StdMutex::new(Some(payload.to_string())),
                delay: Duration::ZERO,
            }
        }

        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                payload: StdMutex::new(None),
                delay: Duration::ZERO,
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        fn set_payload(&self, payload: Option<&str>) {
            *self.payload.lock().unwrap() = payload.map(str::to_string);
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl SnapshotSource for StubSource {
        async fn fetch(&self) -> Result<String, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            let payload = self.payload.lock().unwrap().clone();
            payload.ok_or(FetchError::Api {
                status: 503,
                message: "unavailable".to_string(),
            })
        }
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 10, 2, 0).unwrap()
    }

    fn cache(
        source: &Arc<StubSource>,
        clock: &Arc<ManualClock>,
    ) -> SnapshotCache<Arc<StubSource>, Arc<ManualClock>> {
        SnapshotCache::with_clock(Arc::clone(source), Arc::clone(clock), CacheConfig::default())
    }

    #[test]
    fn bucket_start_floors_to_width() {
        let width = Duration::from_secs(15 * 60);

        let t = Utc.with_ymd_and_hms(2024, 3, 15, 10, 14, 59).unwrap();
        assert_eq!(
            bucket_start(t, width),
            Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap()
        );

        let t = Utc.with_ymd_and_hms(2024, 3, 15, 10, 15, 0).unwrap();
        assert_eq!(bucket_start(t, width), t);

        let t = Utc.with_ymd_and_hms(2024, 3, 15, 23, 59, 0).unwrap();
        assert_eq!(
            bucket_start(t, width),
            Utc.with_ymd_and_hms(2024, 3, 15, 23, 45, 0).unwrap()
        );
    }

    #[test]
    fn bucket_start_before_epoch() {
        let width = Duration::from_secs(15 * 60);
        let t = Utc.with_ymd_and_hms(1969, 12, 31, 23, 50, 0).unwrap();
        assert_eq!(
            bucket_start(t, width),
            Utc.with_ymd_and_hms(1969, 12, 31, 23, 45, 0).unwrap()
        );
    }

    #[test]
    fn bucket_start_zero_width_is_identity() {
        let t = start();
        assert_eq!(bucket_start(t, Duration::ZERO), t);
    }

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.bucket_width, Duration::from_secs(900));
        assert_eq!(config.fetch_timeout, Duration::from_secs(30));
    }

    #[tokio::test]
    async fn cold_cache_computes_on_first_call() {
        let source = Arc::new(StubSource::new(SNAPSHOT));
        let clock = Arc::new(ManualClock::new(start()));
        let cache = cache(&source, &clock);

        let current = cache.get_current().await.unwrap();
        assert_eq!(source.call_count(), 1);
        assert_eq!(current.snapshot.stations().len(), 2);
        assert_eq!(current.snapshot.candidates().len(), 1);
        assert_eq!(current.computed_at, start());
    }

    #[tokio::test]
    async fn same_bucket_does_not_refetch() {
        let source = Arc::new(StubSource::new(SNAPSHOT));
        let clock = Arc::new(ManualClock::new(start()));
        let cache = cache(&source, &clock);

        let first = cache.get_current().await.unwrap();
        clock.advance(TimeDelta::minutes(12)); // 10:14, same bucket
        let second = cache.get_current().await.unwrap();

        assert_eq!(source.call_count(), 1);
        assert!(Arc::ptr_eq(&first.snapshot, &second.snapshot));
        assert_eq!(second.computed_at, start());
    }

    #[tokio::test]
    async fn new_bucket_refetches() {
        let source = Arc::new(StubSource::new(SNAPSHOT));
        let clock = Arc::new(ManualClock::new(start()));
        let cache = cache(&source, &clock);

        cache.get_current().await.unwrap();
        cache.get_current().await.unwrap();
        assert_eq!(source.call_count(), 1);

        clock.advance(TimeDelta::minutes(13)); // 10:15, next bucket
        let current = cache.get_current().await.unwrap();
        assert_eq!(source.call_count(), 2);
        assert_eq!(current.computed_at, start() + TimeDelta::minutes(13));
    }

    #[tokio::test]
    async fn clock_going_backwards_does_not_refetch() {
        let source = Arc::new(StubSource::new(SNAPSHOT));
        let clock = Arc::new(ManualClock::new(start()));
        let cache = cache(&source, &clock);

        cache.get_current().await.unwrap();
        clock.set(start() - TimeDelta::hours(1));
        cache.get_current().await.unwrap();

        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test]
    async fn failure_on_cold_cache_is_an_error() {
        let source = Arc::new(StubSource::failing());
        let clock = Arc::new(ManualClock::new(start()));
        let cache = cache(&source, &clock);

        let err = cache.get_current().await.unwrap_err();
        assert!(matches!(err, CacheError::Fetch(FetchError::Api { status: 503, .. })));

        // Still cold, so the next call retries.
        source.set_payload(Some(SNAPSHOT));
        let current = cache.get_current().await.unwrap();
        assert_eq!(source.call_count(), 2);
        assert_eq!(current.computed_at, start());
    }

    #[tokio::test]
    async fn failure_on_warm_cache_serves_previous() {
        let source = Arc::new(StubSource::new(SNAPSHOT));
        let clock = Arc::new(ManualClock::new(start()));
        let cache = cache(&source, &clock);

        let first = cache.get_current().await.unwrap();

        source.set_payload(None);
        clock.advance(TimeDelta::minutes(20));
        let second = cache.get_current().await.unwrap();

        assert_eq!(source.call_count(), 2);
        assert!(Arc::ptr_eq(&first.snapshot, &second.snapshot));
        assert_eq!(second.computed_at, start());

        // The failed refresh left the entry stale, so the next call retries.
        source.set_payload(Some(SNAPSHOT));
        let third = cache.get_current().await.unwrap();
        assert_eq!(source.call_count(), 3);
        assert!(!Arc::ptr_eq(&first.snapshot, &third.snapshot));
        assert_eq!(third.computed_at, start() + TimeDelta::minutes(20));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn timestamp_stays_with_its_snapshot_across_refresh() {
        let source = Arc::new(StubSource::new(SNAPSHOT).with_delay(Duration::from_millis(50)));
        let clock = Arc::new(ManualClock::new(start()));
        let cache = Arc::new(cache(&source, &clock));

        let first = cache.get_current().await.unwrap();

        // Another caller starts a slow refresh in the next bucket.
        clock.advance(TimeDelta::minutes(15));
        let refreshing = {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move { cache.get_current().await })
        };
        let second = refreshing.await.unwrap().unwrap();

        // The earlier result is untouched by the refresh.
        assert_eq!(first.computed_at, start());
        assert_eq!(second.computed_at, start() + TimeDelta::minutes(15));
        assert!(!Arc::ptr_eq(&first.snapshot, &second.snapshot));
        assert_eq!(source.call_count(), 2);
    }

    #[tokio::test]
    async fn malformed_payload_on_cold_cache_is_feed_error() {
        let source = Arc::new(StubSource::new(r#"{"features": [{"properties": {}}]}"#));
        let clock = Arc::new(ManualClock::new(start()));
        let cache = cache(&source, &clock);

        let err = cache.get_current().await.unwrap_err();
        assert!(matches!(err, CacheError::Feed(FeedError::Malformed(_))));
    }

    #[tokio::test]
    async fn slow_fetch_times_out() {
        let source = Arc::new(StubSource::new(SNAPSHOT).with_delay(Duration::from_secs(10)));
        let clock = Arc::new(ManualClock::new(start()));
        let config = CacheConfig::default().with_fetch_timeout(Duration::from_millis(50));
        let cache = SnapshotCache::with_clock(Arc::clone(&source), Arc::clone(&clock), config);

        let err = cache.get_current().await.unwrap_err();
        assert!(matches!(err, CacheError::Fetch(FetchError::Timeout { .. })));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_callers_share_one_recompute() {
        let source =
            Arc::new(StubSource::new(SNAPSHOT).with_delay(Duration::from_millis(50)));
        let clock = Arc::new(ManualClock::new(start()));
        let cache = Arc::new(cache(&source, &clock));

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let cache = Arc::clone(&cache);
                tokio::spawn(async move {
                    cache
                        .get_current()
                        .await
                        .map(|c| c.snapshot.stations().len())
                })
            })
            .collect();

        for result in futures::future::join_all(tasks).await {
            assert_eq!(result.unwrap().unwrap(), 2);
        }
        assert_eq!(source.call_count(), 1);
    }
}
