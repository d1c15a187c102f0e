use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use rail_core::fetch::FetchStatus;
use rail_listing::listing::execute;
use rail_listing::{Endpoint, RouteFilters, RoutePage, SearchCommand, SearchForm, SortBy};
use rail_shared::City;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::session::Session;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CityQuery {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct SessionCreated {
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct SearchView {
    pub form: SearchForm,
    pub filters: RouteFilters,
    pub cities_status: FetchStatus,
    pub cities_error: Option<String>,
    pub suggestions_from: Vec<City>,
    pub suggestions_to: Vec<City>,
}

impl SearchView {
    fn of(session: &Session) -> Self {
        let search = &session.search;
        Self {
            form: search.form.clone(),
            filters: search.filters.clone(),
            cities_status: search.cities_status,
            cities_error: search.cities_error.clone(),
            suggestions_from: search.suggestions(Endpoint::From),
            suggestions_to: search.suggestions(Endpoint::To),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RoutesRequest {
    pub sort_by: Option<SortBy>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

// ============================================================================
// Handlers
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/sessions", post(create_session))
        .route("/v1/cities", get(search_cities))
        .route("/v1/sessions/{id}/search", put(update_search))
        .route("/v1/sessions/{id}/filters", put(replace_filters))
        .route("/v1/sessions/{id}/routes", post(search_routes))
}

/// POST /v1/sessions
async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionCreated>) {
    let session = Session::new(state.settings.page_size, state.settings.route_fetch_limit);
    let id = state.sessions.create(session).await;
    (StatusCode::CREATED, Json(SessionCreated { id }))
}

/// GET /v1/cities?name=
/// Stateless autocomplete
async fn search_cities(
    State(state): State<AppState>,
    Query(query): Query<CityQuery>,
) -> Result<Json<Vec<City>>, AppError> {
    let prefix = query.name.trim();
    if prefix.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let mut cities = state.repo.search_cities(prefix).await?;
    cities.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(Json(cities))
}

/// PUT /v1/sessions/{id}/search
/// Applies a form command; typing a city name runs the autocomplete lookup.
async fn update_search(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(command): Json<SearchCommand>,
) -> Result<Json<SearchView>, AppError> {
    let handle = state.sessions.get(id).await?;

    let lookup = handle.lock().await.search.apply(command);

    if let Some(lookup) = lookup {
        let result = state.repo.search_cities(&lookup.prefix).await;
        handle.lock().await.search.complete_city_lookup(&lookup, result);
    }

    let session = handle.lock().await;
    Ok(Json(SearchView::of(&session)))
}

/// PUT /v1/sessions/{id}/filters
async fn replace_filters(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(filters): Json<RouteFilters>,
) -> Result<Json<RouteFilters>, AppError> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;
    session.search.filters = filters;
    Ok(Json(session.search.filters.clone()))
}

/// POST /v1/sessions/{id}/routes
/// Runs the route search with the session's form and filters.
async fn search_routes(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Option<Json<RoutesRequest>>,
) -> Result<Json<RoutePage>, AppError> {
    let Json(req) = body.unwrap_or_default();
    let handle = state.sessions.get(id).await?;

    let request = {
        let mut session = handle.lock().await;
        if let Some(sort_by) = req.sort_by {
            session.listing.set_sort_by(sort_by);
        }
        if let Some(limit) = req.limit {
            session.listing.set_limit(limit);
        }
        let Session { search, listing, .. } = &mut *session;
        listing.begin_fetch(search)
    };

    let result = execute(&request, state.repo.as_ref()).await;
    let failure = result.as_ref().err().cloned();

    let mut session = handle.lock().await;
    let applied = session.listing.complete_fetch(&request, result, &state.settings.tz);
    if let (true, Some(e)) = (applied, failure) {
        return Err(e.into());
    }
    if let Some(offset) = req.offset {
        session.listing.set_offset(offset);
    }
    Ok(Json(session.listing.page()))
}
