// Derivation engine - Pure analytics over a telemetry view
//
// Everything here is a deterministic function of its inputs. No I/O, no
// mutation of inputs, safe to unit-test in isolation.
use crate::domain::insight::{
    AlertSummary, HistoryStats, Insight, InsightSeverity, Recommendation, Trend, TrendDirection,
};
use crate::domain::telemetry::{Alert, AlertSeverity, ComplianceBand, HistoryEntry, Snapshot};

/// Readings considered by the short-term trend.
const TREND_WINDOW: usize = 5;
/// Endpoint deltas below this magnitude classify as stable.
const STABLE_DELTA: f64 = 0.5;
/// Assumed optimal transit duration for the efficiency score.
const OPTIMAL_JOURNEY_HOURS: f64 = 24.0;
const EARTH_RADIUS_KM: f64 = 6371.0;
const MAX_INSIGHTS: usize = 4;

/// Rounded percentage of readings inside the closed band, or `None` when
/// there is no history yet (callers render a placeholder).
pub fn compliance_rate(history: &[HistoryEntry], band: ComplianceBand) -> Option<u32> {
    if history.is_empty() {
        return None;
    }
    let in_range = history
        .iter()
        .filter(|entry| band.contains(entry.temperature))
        .count();
    Some(((in_range as f64 / history.len() as f64) * 100.0).round() as u32)
}

/// Endpoint difference over the most recent five temperature readings.
/// This is deliberately a cheap last-minus-first, not a regression slope.
pub fn recent_trend(history: &[HistoryEntry]) -> Option<Trend> {
    if history.len() < TREND_WINDOW {
        return None;
    }
    let window = &history[history.len() - TREND_WINDOW..];
    let delta = window[window.len() - 1].temperature - window[0].temperature;
    let direction = if delta.abs() < STABLE_DELTA {
        TrendDirection::Stable
    } else if delta > 0.0 {
        TrendDirection::Rising
    } else {
        TrendDirection::Falling
    };
    Some(Trend { delta, direction })
}

/// Statistics bundle over the full history. Returns the all-zero neutral
/// bundle for empty history so no caller divides by zero.
pub fn history_stats(history: &[HistoryEntry], band: ComplianceBand) -> HistoryStats {
    if history.is_empty() {
        return HistoryStats::default();
    }

    let count = history.len() as f64;
    let avg_temp = history.iter().map(|e| e.temperature).sum::<f64>() / count;
    let avg_humidity = history.iter().map(|e| e.humidity).sum::<f64>() / count;

    // Split-half trend: mean of the newer half minus mean of the older half.
    let mid = history.len() / 2;
    let temp_trend = if mid == 0 {
        0.0
    } else {
        let first = history[..mid].iter().map(|e| e.temperature).sum::<f64>() / mid as f64;
        let second = history[mid..].iter().map(|e| e.temperature).sum::<f64>()
            / (history.len() - mid) as f64;
        second - first
    };

    let time_span_hours = match (history.first(), history.last()) {
        (Some(first), Some(last)) if history.len() > 1 => {
            (last.timestamp - first.timestamp).num_milliseconds() as f64 / 3_600_000.0
        }
        _ => 0.0,
    };

    HistoryStats {
        avg_temp,
        avg_humidity,
        temp_trend,
        compliance_rate: compliance_rate(history, band).unwrap_or(0),
        time_span_hours,
    }
}

/// Great-circle distance between two (lat, lng) points in kilometers.
pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lon1) = from;
    let (lat2, lon2) = to;
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Total distance over consecutive positioned readings. Readings without a
/// position are skipped entirely, so they neither contribute distance nor
/// break the chain between their positioned neighbors.
pub fn distance_traveled_km(history: &[HistoryEntry]) -> f64 {
    let positions: Vec<(f64, f64)> = history.iter().filter_map(|e| e.position()).collect();
    positions
        .windows(2)
        .map(|pair| haversine_km(pair[0], pair[1]))
        .sum()
}

/// Journey efficiency score in [0, 1]. Deviation from the assumed-optimal
/// 24-hour transit reduces the score symmetrically in either direction.
pub fn journey_efficiency(elapsed_hours: f64) -> f64 {
    (1.0 - (elapsed_hours - OPTIMAL_JOURNEY_HOURS).abs() / OPTIMAL_JOURNEY_HOURS).clamp(0.0, 1.0)
}

/// Dashboard insight list, fixed priority order: temperature trend,
/// remaining shelf life, humidity, journey progress. At most four. Empty
/// until a temperature reading has been observed.
pub fn dashboard_insights(latest: &Snapshot, history: &[HistoryEntry]) -> Vec<Insight> {
    let mut insights = Vec::new();

    if latest.temperature.is_none() {
        return insights;
    }

    if let Some(trend) = recent_trend(history) {
        insights.push(match trend.direction {
            TrendDirection::Rising => Insight::new(
                InsightSeverity::Warning,
                "Rising Temperature Detected",
                format!(
                    "Temperature has increased by {:.1}\u{b0}C in the last {} readings. Monitor closely.",
                    trend.delta, TREND_WINDOW
                ),
            ),
            TrendDirection::Falling => Insight::new(
                InsightSeverity::Info,
                "Temperature Decreasing",
                format!(
                    "Temperature has dropped by {:.1}\u{b0}C. Conditions improving.",
                    trend.delta.abs()
                ),
            ),
            TrendDirection::Stable => Insight::new(
                InsightSeverity::Success,
                "Stable Temperature",
                "Temperature remains stable. Good cold chain management.".to_string(),
            ),
        });
    }

    if let Some(rsl_days) = latest.predicted_rsl_days {
        insights.push(if rsl_days < 10.0 {
            Insight::new(
                InsightSeverity::Critical,
                "Critical RSL Alert",
                format!(
                    "Only {rsl_days:.1} days of shelf life remaining. Expedite delivery!"
                ),
            )
        } else if rsl_days < 20.0 {
            Insight::new(
                InsightSeverity::Warning,
                "Moderate RSL",
                format!("{rsl_days:.1} days of shelf life. Plan delivery within 2 weeks."),
            )
        } else {
            Insight::new(
                InsightSeverity::Success,
                "Excellent RSL",
                format!("{rsl_days:.1} days of shelf life. Products are in optimal condition."),
            )
        });
    }

    if let Some(humidity) = latest.humidity {
        if humidity > 80.0 {
            insights.push(Insight::new(
                InsightSeverity::Warning,
                "High Humidity",
                format!("Humidity at {humidity:.1}%. Risk of condensation. Check ventilation."),
            ));
        } else if humidity < 50.0 {
            insights.push(Insight::new(
                InsightSeverity::Info,
                "Low Humidity",
                format!("Humidity at {humidity:.1}%. Dry conditions detected."),
            ));
        }
    }

    if let Some(elapsed) = latest.journey_time_hours {
        let efficiency = journey_efficiency(elapsed);
        insights.push(Insight::new(
            if efficiency > 0.8 {
                InsightSeverity::Success
            } else {
                InsightSeverity::Info
            },
            "Journey Progress",
            format!(
                "{elapsed:.1}h elapsed. Efficiency: {:.0}%",
                efficiency * 100.0
            ),
        ));
    }

    insights.truncate(MAX_INSIGHTS);
    insights
}

/// Bucketed alert counts using the ingestion-time severity classification.
pub fn alert_summary(alerts: &[Alert]) -> AlertSummary {
    AlertSummary {
        critical: alerts
            .iter()
            .filter(|a| a.severity() == AlertSeverity::Critical)
            .count(),
        warning: alerts
            .iter()
            .filter(|a| a.severity() == AlertSeverity::Warning)
            .count(),
        resolved: alerts.iter().filter(|a| a.is_resolved()).count(),
        total: alerts.len(),
    }
}

/// Single-line priority verdict for the alerts view. Strict order, first
/// match wins: all clear, critical attention, warnings, resolved ratio.
pub fn alert_verdict(summary: &AlertSummary) -> String {
    if summary.total == 0 {
        return "No alerts detected. All systems operating normally. Excellent cold chain management!".to_string();
    }
    if summary.critical > 0 {
        return format!(
            "{} critical alert(s) require immediate attention. Review temperature control systems.",
            summary.critical
        );
    }
    if summary.warning > 0 {
        return format!(
            "{} warning(s) detected. Monitor conditions closely to prevent escalation.",
            summary.warning
        );
    }
    format!(
        "{} of {} alerts resolved. Good response time!",
        summary.resolved, summary.total
    )
}

/// Analytics-page recommendation list derived from the statistics bundle.
pub fn recommendations(stats: &HistoryStats, history_len: usize) -> Vec<Recommendation> {
    let mut recs = Vec::new();

    if stats.compliance_rate < 80 {
        recs.push(Recommendation {
            severity: InsightSeverity::Warning,
            text: format!(
                "Temperature compliance is {}%. Consider improving cooling system efficiency.",
                stats.compliance_rate
            ),
        });
    } else {
        recs.push(Recommendation {
            severity: InsightSeverity::Success,
            text: format!(
                "Excellent temperature control at {}% compliance. Maintain current procedures.",
                stats.compliance_rate
            ),
        });
    }

    if stats.temp_trend > 1.0 {
        recs.push(Recommendation {
            severity: InsightSeverity::Warning,
            text: "Warming trend detected. Check refrigeration unit performance and door seals."
                .to_string(),
        });
    } else if stats.temp_trend < -1.0 {
        recs.push(Recommendation {
            severity: InsightSeverity::Info,
            text: "Cooling trend observed. Monitor for potential over-cooling or freezing risk."
                .to_string(),
        });
    }

    if stats.avg_humidity > 75.0 {
        recs.push(Recommendation {
            severity: InsightSeverity::Info,
            text: "High humidity levels detected. Ensure adequate ventilation to prevent condensation."
                .to_string(),
        });
    }

    if history_len > 100 {
        recs.push(Recommendation {
            severity: InsightSeverity::Info,
            text: format!(
                "{history_len} data points collected. Consider archiving old data for better performance."
            ),
        });
    }

    recs
}
