// Main entry point - Dependency injection and polling lifecycle
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;
use std::time::Duration;

use crate::application::analytics_service::{alert_summary, alert_verdict, compliance_rate, history_stats};
use crate::application::poll_scheduler::PollScheduler;
use crate::application::refresh_coordinator::RefreshCoordinator;
use crate::application::telemetry_store::TelemetryStore;
use crate::infrastructure::coldchain_api::ColdChainApi;
use crate::infrastructure::config::load_monitor_config;
use crate::presentation::monitor_view::MonitorView;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = load_monitor_config()?;

    // Create the API client (infrastructure layer)
    let repository = Arc::new(ColdChainApi::new(config.api.base_url.clone()));

    // Create the store and services (application layer)
    let store = TelemetryStore::new();
    let coordinator = Arc::new(RefreshCoordinator::new(repository, store.clone()));
    let scheduler = PollScheduler::new(
        coordinator.clone(),
        Duration::from_secs(config.poll.interval_secs),
    );

    // Read-only view for renderers and export
    let view = MonitorView::new(store, coordinator);

    scheduler.start().await;
    println!(
        "Polling {} every {}s, ctrl-c to stop",
        config.api.base_url, config.poll.interval_secs
    );

    tokio::signal::ctrl_c().await?;
    scheduler.stop().await;

    // Final roundup before exit
    let telemetry = view.telemetry().await;
    let metrics = view.metrics().await;
    tracing::info!(
        cycles = metrics.refresh_cycles,
        avg_latency_ms = metrics.avg_latency_ms as u64,
        connectivity = ?view.connectivity().await,
        "polling finished"
    );

    match compliance_rate(&telemetry.history, config.compliance.dashboard_band) {
        Some(rate) => {
            let stats = history_stats(&telemetry.history, config.compliance.analytics_band);
            tracing::info!(
                "compliance: {rate}% dashboard band, {}% analytics band",
                stats.compliance_rate
            );
        }
        None => tracing::info!("no history collected"),
    }
    tracing::info!("{}", alert_verdict(&alert_summary(&telemetry.alerts)));

    let export_path = "coldchain-export.json";
    tokio::fs::write(export_path, view.export().await?).await?;
    tracing::info!("store exported to {export_path}");

    Ok(())
}
