// Cold-chain telemetry domain models
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Container status as reported by the monitoring API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Normal,
    Alert,
    #[default]
    Unknown,
}

impl Status {
    /// The API reports "NORMAL" or "ALERT"; anything else is treated as
    /// not-yet-known rather than rejected.
    pub fn parse(value: &str) -> Self {
        match value {
            "NORMAL" => Status::Normal,
            "ALERT" => Status::Alert,
            _ => Status::Unknown,
        }
    }
}

impl<'de> serde::Deserialize<'de> for Status {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Status::parse(&value))
    }
}

/// Latest telemetry reading. Every field is optional: an absent field means
/// "not yet observed" and consumers render a placeholder, never a zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Snapshot {
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub predicted_rsl_days: Option<f64>,
    #[serde(default)]
    pub avg_temp: Option<f64>,
    #[serde(default)]
    pub journey_time_hours: Option<f64>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub status: Status,
}

/// Closed acceptable temperature band in degrees C. Two distinct bands are
/// in use: a wide one for dashboard-level compliance and a narrow one for
/// analytics-level compliance; both are configurable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComplianceBand {
    pub min: f64,
    pub max: f64,
}

impl ComplianceBand {
    pub fn contains(&self, temperature: f64) -> bool {
        temperature >= self.min && temperature <= self.max
    }
}

/// One past reading from the history endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    pub humidity: f64,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

impl HistoryEntry {
    /// Position of this reading, if both coordinates were reported.
    pub fn position(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        }
    }
}

/// Severity bucket assigned to an alert at ingestion time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Critical,
    Warning,
    Info,
}

impl AlertSeverity {
    /// Map a source alert-type string to a severity bucket. The API's known
    /// types are matched exactly; anything else falls back to substring
    /// matching so unrecognized excursion types still land in a bucket.
    pub fn classify(kind: &str) -> Self {
        match kind {
            "High Temperature" => AlertSeverity::Critical,
            "Low Temperature" => AlertSeverity::Warning,
            _ if kind.contains("High") => AlertSeverity::Critical,
            _ if kind.contains("Low") => AlertSeverity::Warning,
            _ => AlertSeverity::Info,
        }
    }
}

/// A detected excursion event. `end_time` absent means the alert is ongoing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(rename = "type")]
    pub kind: String,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    pub peak_value: f64,
}

impl Alert {
    pub fn severity(&self) -> AlertSeverity {
        AlertSeverity::classify(&self.kind)
    }

    pub fn is_resolved(&self) -> bool {
        self.end_time.is_some()
    }

    pub fn is_active(&self) -> bool {
        self.end_time.is_none()
    }
}
