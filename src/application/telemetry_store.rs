// Telemetry store - Shared state replaced wholesale by the refresh cycle
use crate::domain::telemetry::{Alert, HistoryEntry, Snapshot};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Owned, immutable view of the store as of one read. Fields may originate
/// from different refresh cycles when fetches complete at different times;
/// each individual field is always a complete value.
#[derive(Debug, Clone, Default)]
pub struct TelemetryView {
    pub latest: Snapshot,
    pub history: Vec<HistoryEntry>,
    pub alerts: Vec<Alert>,
}

#[derive(Default)]
struct StoreState {
    latest: Snapshot,
    history: Vec<HistoryEntry>,
    alerts: Vec<Alert>,
}

/// Holds exactly one snapshot, one history sequence and one alert list.
/// The refresh coordinator is the only writer; each writer method replaces
/// its field wholesale, never merging within an entry.
#[derive(Clone)]
pub struct TelemetryStore {
    state: Arc<RwLock<StoreState>>,
}

impl TelemetryStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(StoreState::default())),
        }
    }

    pub async fn replace_snapshot(&self, snapshot: Snapshot) {
        self.state.write().await.latest = snapshot;
    }

    pub async fn replace_history(&self, history: Vec<HistoryEntry>) {
        self.state.write().await.history = history;
    }

    pub async fn replace_alerts(&self, alerts: Vec<Alert>) {
        self.state.write().await.alerts = alerts;
    }

    pub async fn read(&self) -> TelemetryView {
        let state = self.state.read().await;
        TelemetryView {
            latest: state.latest.clone(),
            history: state.history.clone(),
            alerts: state.alerts.clone(),
        }
    }
}

impl Default for TelemetryStore {
    fn default() -> Self {
        Self::new()
    }
}
