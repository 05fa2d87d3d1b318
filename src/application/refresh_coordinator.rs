// Refresh coordinator - Concurrent endpoint fetches merged into the store
use crate::application::monitoring_repository::MonitoringRepository;
use crate::application::telemetry_store::TelemetryStore;
use crate::domain::connection::{ConnectivityState, PerformanceMetrics};
use chrono::Utc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tokio::sync::RwLock;

/// Result of one `refresh_all` invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// All three fetches settled and the store was updated where possible.
    Completed,
    /// A prior refresh was still in flight; no fetches were issued.
    Skipped,
}

/// Clears the in-flight flag on every exit path, including cancellation.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Issues the status/history/alerts fetches concurrently and merges the
/// successes into the store. Sole writer of the store, the connectivity
/// state and the performance metrics.
pub struct RefreshCoordinator {
    repository: Arc<dyn MonitoringRepository>,
    store: TelemetryStore,
    in_flight: AtomicBool,
    connectivity: RwLock<ConnectivityState>,
    metrics: RwLock<PerformanceMetrics>,
}

impl RefreshCoordinator {
    pub fn new(repository: Arc<dyn MonitoringRepository>, store: TelemetryStore) -> Self {
        Self {
            repository,
            store,
            in_flight: AtomicBool::new(false),
            connectivity: RwLock::new(ConnectivityState::default()),
            metrics: RwLock::new(PerformanceMetrics::default()),
        }
    }

    /// Run one refresh cycle. At most one cycle is ever in flight: a call
    /// made while a prior cycle is still settling returns `Skipped` without
    /// issuing any fetch.
    ///
    /// The three fetches run concurrently and fail independently. A failed
    /// endpoint leaves its store field untouched and the cycle continues;
    /// only a cycle where every endpoint failed flips connectivity to
    /// Disconnected.
    pub async fn refresh_all(&self) -> RefreshOutcome {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            tracing::debug!("refresh already in flight, skipping");
            return RefreshOutcome::Skipped;
        }
        let _guard = InFlightGuard(&self.in_flight);
        let started = Instant::now();

        let (status, history, alerts) = futures::join!(
            self.repository.fetch_status(),
            self.repository.fetch_history(),
            self.repository.fetch_alerts(),
        );

        let mut successes = 0;
        match status {
            Ok(snapshot) => {
                self.store.replace_snapshot(snapshot).await;
                successes += 1;
            }
            Err(err) => tracing::warn!("status fetch failed: {err:#}"),
        }
        match history {
            Ok(entries) => {
                self.store.replace_history(entries).await;
                successes += 1;
            }
            Err(err) => tracing::warn!("history fetch failed: {err:#}"),
        }
        match alerts {
            Ok(list) => {
                self.store.replace_alerts(list).await;
                successes += 1;
            }
            Err(err) => tracing::warn!("alerts fetch failed: {err:#}"),
        }

        let latency_ms = started.elapsed().as_secs_f64() * 1000.0;
        self.metrics.write().await.record(latency_ms, Utc::now());

        let state = if successes > 0 {
            ConnectivityState::Connected
        } else {
            ConnectivityState::Disconnected
        };
        if state == ConnectivityState::Disconnected {
            tracing::warn!("connection lost: all endpoints failed, retrying on next cycle");
        }
        *self.connectivity.write().await = state;

        RefreshOutcome::Completed
    }

    pub async fn connectivity(&self) -> ConnectivityState {
        *self.connectivity.read().await
    }

    pub async fn metrics(&self) -> PerformanceMetrics {
        *self.metrics.read().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::telemetry::{Alert, HistoryEntry, Snapshot};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Semaphore;

    fn history_entry() -> HistoryEntry {
        HistoryEntry {
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            temperature: 5.0,
            humidity: 60.0,
            lat: None,
            lng: None,
        }
    }

    /// Counts fetches; endpoints fail according to the flags.
    struct StubApi {
        calls: AtomicUsize,
        fail_status: bool,
        fail_history: bool,
        fail_alerts: bool,
    }

    impl StubApi {
        fn new(fail_status: bool, fail_history: bool, fail_alerts: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_status,
                fail_history,
                fail_alerts,
            }
        }
    }

    #[async_trait]
    impl MonitoringRepository for StubApi {
        async fn fetch_status(&self) -> anyhow::Result<Snapshot> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_status {
                anyhow::bail!("status down");
            }
            Ok(Snapshot {
                temperature: Some(6.5),
                ..Snapshot::default()
            })
        }

        async fn fetch_history(&self) -> anyhow::Result<Vec<HistoryEntry>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_history {
                anyhow::bail!("history down");
            }
            Ok(vec![history_entry()])
        }

        async fn fetch_alerts(&self) -> anyhow::Result<Vec<Alert>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_alerts {
                anyhow::bail!("alerts down");
            }
            Ok(Vec::new())
        }
    }

    /// Counts fetches, then parks each one until a permit is released.
    struct BlockingApi {
        calls: Arc<AtomicUsize>,
        release: Arc<Semaphore>,
    }

    #[async_trait]
    impl MonitoringRepository for BlockingApi {
        async fn fetch_status(&self) -> anyhow::Result<Snapshot> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.release.acquire().await.unwrap().forget();
            Ok(Snapshot::default())
        }

        async fn fetch_history(&self) -> anyhow::Result<Vec<HistoryEntry>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.release.acquire().await.unwrap().forget();
            Ok(Vec::new())
        }

        async fn fetch_alerts(&self) -> anyhow::Result<Vec<Alert>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.release.acquire().await.unwrap().forget();
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_overlapping_refresh_is_skipped() {
        let calls = Arc::new(AtomicUsize::new(0));
        let release = Arc::new(Semaphore::new(0));
        let repository = Arc::new(BlockingApi {
            calls: calls.clone(),
            release: release.clone(),
        });
        let coordinator = Arc::new(RefreshCoordinator::new(repository, TelemetryStore::new()));

        let running = coordinator.clone();
        let first = tokio::spawn(async move { running.refresh_all().await });

        // Wait until the first cycle has issued all three fetches.
        while calls.load(Ordering::SeqCst) < 3 {
            tokio::task::yield_now().await;
        }

        assert_eq!(coordinator.refresh_all().await, RefreshOutcome::Skipped);
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        release.add_permits(3);
        assert_eq!(first.await.unwrap(), RefreshOutcome::Completed);
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        // The flag is cleared, so the next call issues fetches again.
        release.add_permits(3);
        assert_eq!(coordinator.refresh_all().await, RefreshOutcome::Completed);
        assert_eq!(calls.load(Ordering::SeqCst), 6);
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_other_fields() {
        let store = TelemetryStore::new();
        let repository = Arc::new(StubApi::new(true, false, false));
        let coordinator = RefreshCoordinator::new(repository, store.clone());

        assert_eq!(coordinator.refresh_all().await, RefreshOutcome::Completed);

        let view = store.read().await;
        assert_eq!(view.latest.temperature, None);
        assert_eq!(view.history.len(), 1);
        assert_eq!(coordinator.connectivity().await, ConnectivityState::Connected);
    }

    #[tokio::test]
    async fn test_all_endpoints_down_disconnects() {
        let store = TelemetryStore::new();
        let repository = Arc::new(StubApi::new(true, true, true));
        let coordinator = RefreshCoordinator::new(repository, store.clone());

        assert_eq!(coordinator.refresh_all().await, RefreshOutcome::Completed);
        assert_eq!(
            coordinator.connectivity().await,
            ConnectivityState::Disconnected
        );
        assert!(store.read().await.history.is_empty());

        // A later healthy cycle reconnects.
        let healthy = RefreshCoordinator::new(Arc::new(StubApi::new(false, false, false)), store);
        healthy.refresh_all().await;
        assert_eq!(healthy.connectivity().await, ConnectivityState::Connected);
    }

    #[tokio::test]
    async fn test_metrics_count_completed_cycles_only() {
        let repository = Arc::new(StubApi::new(false, false, false));
        let coordinator = RefreshCoordinator::new(repository, TelemetryStore::new());

        coordinator.refresh_all().await;
        coordinator.refresh_all().await;

        let metrics = coordinator.metrics().await;
        assert_eq!(metrics.refresh_cycles, 2);
        assert!(metrics.avg_latency_ms >= 0.0);
        assert!(metrics.last_update.is_some());
    }
}
