use async_trait::async_trait;
use rail_shared::{City, CoachSeatsBlock, RouteItem};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::search::{RouteSearchQuery, RouteSearchResponse};
use crate::{CoreError, CoreResult};

/// Backend contract for route data access
#[async_trait]
pub trait RouteRepository: Send + Sync {
    /// Cities whose name starts with `prefix`.
    async fn search_cities(&self, prefix: &str) -> CoreResult<Vec<City>>;

    /// Candidate routes for a query, before client-side filtering.
    async fn search_routes(&self, query: &RouteSearchQuery) -> CoreResult<RouteSearchResponse>;

    /// Seat map of every coach on a leg.
    async fn fetch_seats(&self, leg_id: &str) -> CoreResult<Vec<CoachSeatsBlock>>;
}

/// In-memory repository for tests and local runs without a backend.
#[derive(Debug, Default)]
pub struct MockRouteRepository {
    pub cities: Vec<City>,
    pub routes: Vec<RouteItem>,
    pub seats: HashMap<String, Vec<CoachSeatsBlock>>,
    /// When set, every call fails with this message.
    pub failure: Option<String>,
    calls: AtomicUsize,
}

impl MockRouteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cities(mut self, cities: Vec<City>) -> Self {
        self.cities = cities;
        self
    }

    pub fn with_routes(mut self, routes: Vec<RouteItem>) -> Self {
        self.routes = routes;
        self
    }

    pub fn with_seats(mut self, leg_id: impl Into<String>, blocks: Vec<CoachSeatsBlock>) -> Self {
        self.seats.insert(leg_id.into(), blocks);
        self
    }

    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Number of backend calls served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) -> CoreResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(message) => Err(CoreError::NetworkError(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RouteRepository for MockRouteRepository {
    async fn search_cities(&self, prefix: &str) -> CoreResult<Vec<City>> {
        self.record_call()?;
        let prefix = prefix.to_lowercase();
        Ok(self
            .cities
            .iter()
            .filter(|city| city.name.to_lowercase().starts_with(&prefix))
            .cloned()
            .collect())
    }

    async fn search_routes(&self, query: &RouteSearchQuery) -> CoreResult<RouteSearchResponse> {
        self.record_call()?;
        tracing::debug!(from = %query.from_city_id, to = %query.to_city_id, "Serving mock route search");
        let items: Vec<RouteItem> = self.routes.iter().take(query.limit).cloned().collect();
        Ok(RouteSearchResponse {
            total_count: self.routes.len(),
            items,
        })
    }

    async fn fetch_seats(&self, leg_id: &str) -> CoreResult<Vec<CoachSeatsBlock>> {
        self.record_call()?;
        Ok(self.seats.get(leg_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_filters_cities_by_prefix() {
        let repo = MockRouteRepository::new().with_cities(vec![
            City::new("1", "москва"),
            City::new("2", "мурманск"),
            City::new("3", "казань"),
        ]);
        let found = repo.search_cities("М").await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(repo.calls(), 1);
    }

    #[tokio::test]
    async fn test_mock_failure_is_network_error() {
        let repo = MockRouteRepository::new().failing("connection refused");
        let err = repo.fetch_seats("leg").await.unwrap_err();
        assert_eq!(err, CoreError::NetworkError("connection refused".into()));
    }
}
