// Derived-analytics domain models
use serde::{Deserialize, Serialize};

/// Severity attached to a generated insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightSeverity {
    Success,
    Info,
    Warning,
    Critical,
}

/// A single narrative insight derived from the current telemetry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub severity: InsightSeverity,
    pub title: String,
    pub message: String,
}

impl Insight {
    pub fn new(severity: InsightSeverity, title: impl Into<String>, message: String) -> Self {
        Self {
            severity,
            title: title.into(),
            message,
        }
    }
}

/// Analytics-page recommendation line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub severity: InsightSeverity,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Rising,
    Falling,
    Stable,
}

/// Endpoint-difference trend over the most recent temperature window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    /// Last reading minus first reading of the window, in degrees C.
    pub delta: f64,
    pub direction: TrendDirection,
}

/// Statistics bundle over the full history sequence. All fields are the
/// neutral zero when the history is empty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct HistoryStats {
    pub avg_temp: f64,
    pub avg_humidity: f64,
    /// Mean of the second half of the readings minus mean of the first half.
    pub temp_trend: f64,
    /// Narrow-band compliance, rounded percent.
    pub compliance_rate: u32,
    /// Hours between the first and last history timestamps.
    pub time_span_hours: f64,
}

/// Bucketed alert counts for the alerts view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AlertSummary {
    pub critical: usize,
    pub warning: usize,
    pub resolved: usize,
    pub total: usize,
}
