// Read-only monitoring view for presentation adapters
use crate::application::refresh_coordinator::RefreshCoordinator;
use crate::application::telemetry_store::{TelemetryStore, TelemetryView};
use crate::domain::connection::{ConnectivityState, PerformanceMetrics};
use crate::domain::telemetry::{Alert, HistoryEntry, Snapshot};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The one exported artifact: a lossless projection of the store plus an
/// export timestamp, serialized as a single JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub timestamp: DateTime<Utc>,
    pub latest: Snapshot,
    pub history: Vec<HistoryEntry>,
    pub alerts: Vec<Alert>,
}

/// What a renderer is allowed to see: current telemetry, connectivity and
/// refresh metrics. Strictly read-only; the core never calls back into the
/// presentation side.
#[derive(Clone)]
pub struct MonitorView {
    store: TelemetryStore,
    coordinator: Arc<RefreshCoordinator>,
}

impl MonitorView {
    pub fn new(store: TelemetryStore, coordinator: Arc<RefreshCoordinator>) -> Self {
        Self { store, coordinator }
    }

    pub async fn telemetry(&self) -> TelemetryView {
        self.store.read().await
    }

    pub async fn connectivity(&self) -> ConnectivityState {
        self.coordinator.connectivity().await
    }

    pub async fn metrics(&self) -> PerformanceMetrics {
        self.coordinator.metrics().await
    }

    /// Serialize the current store contents for download.
    pub async fn export(&self) -> anyhow::Result<String> {
        let view = self.store.read().await;
        let document = ExportDocument {
            timestamp: Utc::now(),
            latest: view.latest,
            history: view.history,
            alerts: view.alerts,
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::monitoring_repository::MonitoringRepository;
    use async_trait::async_trait;
    use chrono::TimeZone;

    struct UnreachableApi;

    #[async_trait]
    impl MonitoringRepository for UnreachableApi {
        async fn fetch_status(&self) -> anyhow::Result<Snapshot> {
            anyhow::bail!("down")
        }

        async fn fetch_history(&self) -> anyhow::Result<Vec<HistoryEntry>> {
            anyhow::bail!("down")
        }

        async fn fetch_alerts(&self) -> anyhow::Result<Vec<Alert>> {
            anyhow::bail!("down")
        }
    }

    #[tokio::test]
    async fn test_export_round_trips_store_contents() {
        let store = TelemetryStore::new();
        store
            .replace_snapshot(Snapshot {
                timestamp: Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()),
                temperature: Some(4.8),
                humidity: Some(61.2),
                ..Snapshot::default()
            })
            .await;
        store
            .replace_history(vec![HistoryEntry {
                timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 11, 0, 0).unwrap(),
                temperature: 5.1,
                humidity: 60.0,
                lat: Some(27.7172),
                lng: Some(85.3240),
            }])
            .await;
        store
            .replace_alerts(vec![Alert {
                kind: "High Temperature".to_string(),
                start_time: Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap(),
                end_time: None,
                peak_value: 11.3,
            }])
            .await;

        let coordinator = Arc::new(RefreshCoordinator::new(
            Arc::new(UnreachableApi),
            store.clone(),
        ));
        let view = MonitorView::new(store.clone(), coordinator);

        let json = view.export().await.unwrap();
        let document: ExportDocument = serde_json::from_str(&json).unwrap();

        let current = store.read().await;
        assert_eq!(document.latest, current.latest);
        assert_eq!(document.history, current.history);
        assert_eq!(document.alerts, current.alerts);
    }

    #[tokio::test]
    async fn test_alert_type_keeps_wire_name() {
        let store = TelemetryStore::new();
        store
            .replace_alerts(vec![Alert {
                kind: "Low Temperature".to_string(),
                start_time: Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap(),
                end_time: None,
                peak_value: 1.2,
            }])
            .await;

        let coordinator = Arc::new(RefreshCoordinator::new(
            Arc::new(UnreachableApi),
            store.clone(),
        ));
        let view = MonitorView::new(store, coordinator);

        let json = view.export().await.unwrap();
        assert!(json.contains("\"type\": \"Low Temperature\""));
    }
}
