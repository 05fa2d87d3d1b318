// Monitor configuration loading
use crate::domain::telemetry::ComplianceBand;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct MonitorConfig {
    pub api: ApiSettings,
    #[serde(default)]
    pub poll: PollSettings,
    #[serde(default)]
    pub compliance: ComplianceSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    /// Base URL of the cold-chain backend, e.g. "https://host/api".
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PollSettings {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
        }
    }
}

fn default_interval_secs() -> u64 {
    5
}

/// The two acceptable temperature bands: a wide one for dashboard-level
/// compliance and a narrow one for analytics-level compliance.
#[derive(Debug, Deserialize, Clone)]
pub struct ComplianceSettings {
    #[serde(default = "default_dashboard_band")]
    pub dashboard_band: ComplianceBand,
    #[serde(default = "default_analytics_band")]
    pub analytics_band: ComplianceBand,
}

impl Default for ComplianceSettings {
    fn default() -> Self {
        Self {
            dashboard_band: default_dashboard_band(),
            analytics_band: default_analytics_band(),
        }
    }
}

fn default_dashboard_band() -> ComplianceBand {
    ComplianceBand {
        min: 15.0,
        max: 25.0,
    }
}

fn default_analytics_band() -> ComplianceBand {
    ComplianceBand { min: 2.0, max: 8.0 }
}

pub fn load_monitor_config() -> anyhow::Result<MonitorConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/monitor"))
        .build()?;

    Ok(settings.try_deserialize()?)
}
