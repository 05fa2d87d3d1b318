// HTTP implementation of the monitoring repository
use crate::application::monitoring_repository::MonitoringRepository;
use crate::domain::telemetry::{Alert, HistoryEntry, Snapshot};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Raised when an endpoint answers with a non-success status. Transport
/// errors and statuses are equivalent failures for the refresh cycle; the
/// distinction only survives into the logs.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{endpoint} returned status {status}")]
    Status {
        endpoint: &'static str,
        status: reqwest::StatusCode,
    },
}

/// Client for the cold-chain backend's three read endpoints.
#[derive(Debug, Clone)]
pub struct ColdChainApi {
    base_url: String,
    client: reqwest::Client,
}

impl ColdChainApi {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &'static str) -> Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("failed to reach {endpoint} endpoint"))?;

        if !response.status().is_success() {
            return Err(ApiError::Status {
                endpoint,
                status: response.status(),
            }
            .into());
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("failed to decode {endpoint} response"))
    }
}

#[async_trait]
impl MonitoringRepository for ColdChainApi {
    async fn fetch_status(&self) -> Result<Snapshot> {
        self.get_json("status").await
    }

    async fn fetch_history(&self) -> Result<Vec<HistoryEntry>> {
        self.get_json("history").await
    }

    async fn fetch_alerts(&self) -> Result<Vec<Alert>> {
        self.get_json("alerts").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let api = ColdChainApi::new("https://example.test/api/".to_string());
        assert_eq!(api.base_url, "https://example.test/api");
    }
}
