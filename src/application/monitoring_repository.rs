// Repository trait for the remote monitoring API
use crate::domain::telemetry::{Alert, HistoryEntry, Snapshot};
use async_trait::async_trait;

/// The three read endpoints of the cold-chain backend. Non-success
/// responses and transport errors are equivalent from the caller's point
/// of view: that endpoint's fetch failed this cycle.
#[async_trait]
pub trait MonitoringRepository: Send + Sync {
    /// Latest telemetry reading.
    async fn fetch_status(&self) -> anyhow::Result<Snapshot>;

    /// Full reading history, ordered by timestamp as delivered.
    async fn fetch_history(&self) -> anyhow::Result<Vec<HistoryEntry>>;

    /// All detected excursion events.
    async fn fetch_alerts(&self) -> anyhow::Result<Vec<Alert>>;
}
