// Poll scheduler - Drives the refresh coordinator on a fixed cadence
use crate::application::refresh_coordinator::RefreshCoordinator;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
    Suspended,
}

struct SchedulerInner {
    state: SchedulerState,
    ticker: Option<JoinHandle<()>>,
}

/// Fires `refresh_all` immediately on start and then on every interval
/// tick. Suspension (page hidden) tears the ticker down so no stale ticks
/// burst after resumption; each refresh runs in its own task, so neither
/// `stop` nor suspension ever aborts an in-flight cycle.
pub struct PollScheduler {
    coordinator: Arc<RefreshCoordinator>,
    interval: Duration,
    inner: Mutex<SchedulerInner>,
}

impl PollScheduler {
    pub fn new(coordinator: Arc<RefreshCoordinator>, interval: Duration) -> Self {
        Self {
            coordinator,
            interval,
            inner: Mutex::new(SchedulerInner {
                state: SchedulerState::Idle,
                ticker: None,
            }),
        }
    }

    /// Idle/Suspended -> Running, with one immediate refresh. No-op while
    /// already Running.
    pub async fn start(&self) {
        let mut inner = self.inner.lock().await;
        if inner.state == SchedulerState::Running {
            return;
        }
        inner.ticker = Some(self.spawn_ticker());
        inner.state = SchedulerState::Running;
        tracing::info!(interval = ?self.interval, "polling started");
    }

    /// Cancel the ticker and return to Idle. Safe from any state,
    /// idempotent. Only future ticks are prevented; an in-flight refresh
    /// cycle keeps running to completion.
    pub async fn stop(&self) {
        let mut inner = self.inner.lock().await;
        if let Some(ticker) = inner.ticker.take() {
            ticker.abort();
        }
        if inner.state != SchedulerState::Idle {
            tracing::info!("polling stopped");
        }
        inner.state = SchedulerState::Idle;
    }

    /// Visibility signal from the embedding page. Hidden suspends a running
    /// scheduler; visible resumes a suspended one with start semantics,
    /// including the immediate refresh. Idle is unaffected.
    pub async fn set_visible(&self, visible: bool) {
        let mut inner = self.inner.lock().await;
        match (visible, inner.state) {
            (false, SchedulerState::Running) => {
                if let Some(ticker) = inner.ticker.take() {
                    ticker.abort();
                }
                inner.state = SchedulerState::Suspended;
                tracing::debug!("polling suspended while hidden");
            }
            (true, SchedulerState::Suspended) => {
                inner.ticker = Some(self.spawn_ticker());
                inner.state = SchedulerState::Running;
                tracing::debug!("polling resumed");
            }
            _ => {}
        }
    }

    pub async fn state(&self) -> SchedulerState {
        self.inner.lock().await.state
    }

    fn spawn_ticker(&self) -> JoinHandle<()> {
        let coordinator = self.coordinator.clone();
        let period = self.interval;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                // First tick completes immediately.
                ticker.tick().await;
                let coordinator = coordinator.clone();
                tokio::spawn(async move {
                    coordinator.refresh_all().await;
                });
            }
        })
    }
}
