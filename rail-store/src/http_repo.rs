use async_trait::async_trait;
use rail_core::repository::RouteRepository;
use rail_core::search::{RouteSearchQuery, RouteSearchResponse};
use rail_core::{CoreError, CoreResult};
use rail_shared::{City, CoachSeatsBlock};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::app_config::BackendConfig;

/// `RouteRepository` over the booking backend's REST API.
pub struct HttpRouteRepository {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRouteRepository {
    pub fn new(config: &BackendConfig) -> CoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| CoreError::NetworkError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> CoreResult<T> {
        let url = self.url(path);
        tracing::debug!(%url, "Backend request");

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(%url, error = %e, "Backend unreachable");
                CoreError::NetworkError(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%url, %status, "Backend returned an error status");
            return Err(CoreError::NetworkError(format!("{} returned {}", path, status)));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| CoreError::NetworkError(e.to_string()))
    }
}

#[async_trait]
impl RouteRepository for HttpRouteRepository {
    async fn search_cities(&self, prefix: &str) -> CoreResult<Vec<City>> {
        self.get_json("/routes/cities", &[("name", prefix.to_string())]).await
    }

    async fn search_routes(&self, query: &RouteSearchQuery) -> CoreResult<RouteSearchResponse> {
        let params = query.to_params();
        let response: RouteSearchResponse = self.get_json("/routes", &params).await?;
        tracing::info!(
            from = %query.from_city_id,
            to = %query.to_city_id,
            items = response.items.len(),
            total = response.total_count,
            "Routes fetched"
        );
        Ok(response)
    }

    async fn fetch_seats(&self, leg_id: &str) -> CoreResult<Vec<CoachSeatsBlock>> {
        self.get_json(&format!("/routes/{}/seats", leg_id), &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let repo = HttpRouteRepository::new(&BackendConfig {
            base_url: "http://localhost:3001/".into(),
            timeout_seconds: 5,
            route_fetch_limit: 5000,
        })
        .unwrap();
        assert_eq!(repo.url("/routes"), "http://localhost:3001/routes");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        let repo = HttpRouteRepository::new(&BackendConfig {
            base_url: "http://127.0.0.1:9".into(),
            timeout_seconds: 2,
            route_fetch_limit: 5000,
        })
        .unwrap();

        let err = repo.fetch_seats("leg-1").await.unwrap_err();
        assert!(matches!(err, CoreError::NetworkError(_)));
    }
}
