use chrono::FixedOffset;
use rail_core::fetch::{FetchGuard, FetchStatus, FetchTicket};
use rail_core::repository::RouteRepository;
use rail_core::search::{RouteSearchQuery, RouteSearchResponse};
use rail_core::CoreResult;
use rail_shared::RouteItem;
use serde::Serialize;
use tracing::{info, warn};

use crate::filters::{apply_filters, RouteFilters};
use crate::search::SearchState;
use crate::sorting::{sort_routes, SortBy};

pub const DEFAULT_PAGE_SIZE: usize = 5;
pub const DEFAULT_FETCH_LIMIT: usize = 5000;

/// `[offset, offset + limit)` clamped to the slice.
pub fn paginate<T>(items: &[T], offset: usize, limit: usize) -> &[T] {
    let start = offset.min(items.len());
    let end = start.saturating_add(limit).min(items.len());
    &items[start..end]
}

/// Snapshot of everything a route search depends on, taken when it starts.
#[derive(Debug, Clone)]
pub struct RouteRequest {
    pub ticket: FetchTicket,
    /// `None` when the form is incomplete; no backend call is made.
    pub query: Option<RouteSearchQuery>,
    pub filters: RouteFilters,
    pub sort_by: SortBy,
}

/// One page of results as shown to the user.
#[derive(Debug, Clone, Serialize)]
pub struct RoutePage {
    pub items: Vec<RouteItem>,
    pub total_count: usize,
    pub offset: usize,
    pub limit: usize,
    pub sort_by: SortBy,
    pub status: FetchStatus,
    pub error: Option<String>,
}

/// Filtered, sorted routes with pagination state.
#[derive(Debug, Clone)]
pub struct RouteListing {
    matches: Vec<RouteItem>,
    pub sort_by: SortBy,
    pub limit: usize,
    pub offset: usize,
    pub status: FetchStatus,
    pub error: Option<String>,
    fetch_limit: usize,
    guard: FetchGuard,
}

impl Default for RouteListing {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, DEFAULT_FETCH_LIMIT)
    }
}

impl RouteListing {
    pub fn new(page_size: usize, fetch_limit: usize) -> Self {
        Self {
            matches: Vec::new(),
            sort_by: SortBy::default(),
            limit: page_size.max(1),
            offset: 0,
            status: FetchStatus::Idle,
            error: None,
            fetch_limit,
            guard: FetchGuard::default(),
        }
    }

    pub fn total_count(&self) -> usize {
        self.matches.len()
    }

    pub fn set_sort_by(&mut self, sort_by: SortBy) {
        self.sort_by = sort_by;
        self.offset = 0;
        sort_routes(&mut self.matches, sort_by);
    }

    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit.max(1);
        self.offset = 0;
    }

    pub fn set_offset(&mut self, offset: usize) {
        self.offset = offset;
    }

    pub fn clear_routes(&mut self) {
        self.guard.cancel();
        self.matches.clear();
        self.offset = 0;
        self.status = FetchStatus::Idle;
        self.error = None;
    }

    pub fn page(&self) -> RoutePage {
        RoutePage {
            items: paginate(&self.matches, self.offset, self.limit).to_vec(),
            total_count: self.total_count(),
            offset: self.offset,
            limit: self.limit,
            sort_by: self.sort_by,
            status: self.status,
            error: self.error.clone(),
        }
    }

    /// Route whose outbound leg has `departure_leg_id`.
    pub fn find_route(&self, departure_leg_id: &str) -> Option<&RouteItem> {
        self.matches.iter().find(|item| item.departure.id == departure_leg_id)
    }

    pub fn begin_fetch(&mut self, search: &SearchState) -> RouteRequest {
        self.status = FetchStatus::Loading;
        self.error = None;
        RouteRequest {
            ticket: self.guard.issue(),
            query: search.route_query(self.fetch_limit),
            filters: search.filters.clone(),
            sort_by: self.sort_by,
        }
    }

    /// Applies a search response; returns false for superseded requests.
    pub fn complete_fetch(
        &mut self,
        request: &RouteRequest,
        result: CoreResult<RouteSearchResponse>,
        tz: &FixedOffset,
    ) -> bool {
        if !self.guard.is_current(request.ticket) {
            warn!("Dropping stale route search response");
            return false;
        }

        match result {
            Ok(response) => {
                let mut matches = apply_filters(&response.items, &request.filters, tz);
                sort_routes(&mut matches, request.sort_by);
                info!(
                    received = response.items.len(),
                    matched = matches.len(),
                    "Route search completed"
                );
                self.matches = matches;
                self.status = FetchStatus::Succeeded;
            }
            Err(e) => {
                warn!(error = %e, "Route search failed");
                self.error = Some(e.to_string());
                self.status = FetchStatus::Failed;
            }
        }
        true
    }

    /// Runs a whole search against `repo`, holding `self` across the call.
    pub async fn fetch_routes(
        &mut self,
        search: &SearchState,
        repo: &dyn RouteRepository,
        tz: &FixedOffset,
    ) -> bool {
        let request = self.begin_fetch(search);
        let result = execute(&request, repo).await;
        self.complete_fetch(&request, result, tz)
    }
}

/// Backend half of a route search. Incomplete forms resolve to an empty result.
pub async fn execute(request: &RouteRequest, repo: &dyn RouteRepository) -> CoreResult<RouteSearchResponse> {
    match &request.query {
        Some(query) => repo.search_routes(query).await,
        None => Ok(RouteSearchResponse::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::tests::item;
    use crate::search::{DateField, Endpoint};
    use rail_core::format::display_offset;
    use rail_core::repository::MockRouteRepository;
    use rail_core::CoreError;
    use rail_shared::City;

    fn search() -> SearchState {
        let mut state = SearchState::new();
        state.select_city(Endpoint::From, City::new("msk", "москва"));
        state.select_city(Endpoint::To, City::new("spb", "санкт-петербург"));
        state.set_date(DateField::Start, Some("2024-12-25".into()));
        state
    }

    fn twelve() -> Vec<RouteItem> {
        (1..=12).map(|i| item(&format!("r{i}"), i * 100, 3600)).collect()
    }

    #[test]
    fn test_paginate() {
        let items: Vec<u32> = (1..=12).collect();
        assert_eq!(paginate(&items, 5, 5), &[6, 7, 8, 9, 10]);
        assert_eq!(paginate(&items, 10, 5), &[11, 12]);
        assert!(paginate(&items, 20, 5).is_empty());
    }

    #[tokio::test]
    async fn test_second_page_of_twelve() {
        let repo = MockRouteRepository::new().with_routes(twelve());
        let mut listing = RouteListing::default();
        assert!(listing.fetch_routes(&search(), &repo, &display_offset(180)).await);

        listing.set_offset(5);
        let page = listing.page();
        assert_eq!(page.total_count, 12);
        let ids: Vec<&str> = page.items.iter().map(|i| i.departure.id.as_str()).collect();
        assert_eq!(ids, ["r6", "r7", "r8", "r9", "r10"]);
    }

    #[tokio::test]
    async fn test_missing_city_skips_backend() {
        let repo = MockRouteRepository::new().with_routes(twelve());
        let mut state = search();
        state.set_city_name(Endpoint::To, "сан".into());

        let mut listing = RouteListing::default();
        listing.fetch_routes(&state, &repo, &display_offset(180)).await;
        assert_eq!(repo.calls(), 0);
        assert_eq!(listing.total_count(), 0);
        assert_eq!(listing.status, FetchStatus::Succeeded);
    }

    #[test]
    fn test_stale_response_is_ignored() {
        let tz = display_offset(180);
        let mut listing = RouteListing::default();
        let first = listing.begin_fetch(&search());
        let second = listing.begin_fetch(&search());

        let fresh = RouteSearchResponse { items: twelve(), total_count: 12 };
        assert!(listing.complete_fetch(&second, Ok(fresh), &tz));
        assert!(!listing.complete_fetch(&first, Ok(RouteSearchResponse::default()), &tz));
        assert_eq!(listing.total_count(), 12);
    }

    #[test]
    fn test_failure_keeps_previous_routes() {
        let tz = display_offset(180);
        let mut listing = RouteListing::default();
        let request = listing.begin_fetch(&search());
        listing.complete_fetch(&request, Ok(RouteSearchResponse { items: twelve(), total_count: 12 }), &tz);

        let request = listing.begin_fetch(&search());
        listing.complete_fetch(&request, Err(CoreError::NetworkError("502 Bad Gateway".into())), &tz);
        assert_eq!(listing.status, FetchStatus::Failed);
        assert_eq!(listing.total_count(), 12);
        assert!(listing.error.as_deref().unwrap().contains("502"));
    }

    #[test]
    fn test_controls_reset_offset() {
        let mut listing = RouteListing::default();
        listing.set_offset(10);
        listing.set_sort_by(SortBy::Duration);
        assert_eq!(listing.offset, 0);

        listing.set_offset(10);
        listing.set_limit(20);
        assert_eq!(listing.offset, 0);
        assert_eq!(listing.limit, 20);
    }
}
