use rail_core::fetch::{FetchGuard, FetchStatus, FetchTicket};
use rail_core::format::capitalize;
use rail_core::search::{to_api_date, RouteSearchQuery};
use rail_core::CoreResult;
use rail_shared::City;
use serde::{Deserialize, Serialize};

use crate::filters::RouteFilters;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    From,
    To,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DateField {
    Start,
    End,
}

/// A city input: free text until a suggestion is picked.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CityInput {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchForm {
    pub from_city: CityInput,
    pub to_city: CityInput,
    /// `DD.MM.YYYY` or `YYYY-MM-DD`.
    pub date_start: Option<String>,
    pub date_end: Option<String>,
}

impl SearchForm {
    fn city_mut(&mut self, endpoint: Endpoint) -> &mut CityInput {
        match endpoint {
            Endpoint::From => &mut self.from_city,
            Endpoint::To => &mut self.to_city,
        }
    }

    pub fn city(&self, endpoint: Endpoint) -> &CityInput {
        match endpoint {
            Endpoint::From => &self.from_city,
            Endpoint::To => &self.to_city,
        }
    }
}

/// Commands accepted by the search form.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SearchCommand {
    SetCityName { endpoint: Endpoint, name: String },
    SelectCity { endpoint: Endpoint, city: City },
    SwapCities,
    SetDate { field: DateField, value: Option<String> },
    Reset,
    ClearCities,
}

/// Autocomplete request issued when a city name is typed.
#[derive(Debug, Clone)]
pub struct CityLookup {
    pub ticket: FetchTicket,
    pub endpoint: Endpoint,
    pub prefix: String,
}

/// Search form, filters and city autocomplete state.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub form: SearchForm,
    pub filters: RouteFilters,
    pub cities: Vec<City>,
    pub cities_status: FetchStatus,
    pub cities_error: Option<String>,
    city_guard: FetchGuard,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, command: SearchCommand) -> Option<CityLookup> {
        match command {
            SearchCommand::SetCityName { endpoint, name } => return self.set_city_name(endpoint, name),
            SearchCommand::SelectCity { endpoint, city } => self.select_city(endpoint, city),
            SearchCommand::SwapCities => self.swap_cities(),
            SearchCommand::SetDate { field, value } => self.set_date(field, value),
            SearchCommand::Reset => self.reset(),
            SearchCommand::ClearCities => self.clear_cities(),
        }
        None
    }

    /// Typing invalidates the picked city. Non-blank input starts a lookup.
    pub fn set_city_name(&mut self, endpoint: Endpoint, name: String) -> Option<CityLookup> {
        let prefix = name.trim().to_string();
        let input = self.form.city_mut(endpoint);
        input.name = name;
        input.id = None;

        if prefix.is_empty() {
            self.clear_cities();
            return None;
        }

        self.cities_status = FetchStatus::Loading;
        self.cities_error = None;
        Some(CityLookup {
            ticket: self.city_guard.issue(),
            endpoint,
            prefix,
        })
    }

    /// Applies an autocomplete response; returns false for superseded lookups.
    pub fn complete_city_lookup(&mut self, lookup: &CityLookup, result: CoreResult<Vec<City>>) -> bool {
        if !self.city_guard.is_current(lookup.ticket) {
            tracing::warn!(prefix = %lookup.prefix, "Dropping stale city lookup response");
            return false;
        }

        match result {
            Ok(cities) => {
                self.cities = cities;
                self.cities_status = FetchStatus::Succeeded;
            }
            Err(e) => {
                self.cities_error = Some(e.to_string());
                self.cities_status = FetchStatus::Failed;
            }
        }
        true
    }

    pub fn select_city(&mut self, endpoint: Endpoint, city: City) {
        let input = self.form.city_mut(endpoint);
        input.name = capitalize(&city.name);
        input.id = Some(city.id);
        self.clear_cities();
    }

    pub fn swap_cities(&mut self) {
        std::mem::swap(&mut self.form.from_city, &mut self.form.to_city);
    }

    pub fn set_date(&mut self, field: DateField, value: Option<String>) {
        let value = value.filter(|v| !v.trim().is_empty());
        match field {
            DateField::Start => self.form.date_start = value,
            DateField::End => self.form.date_end = value,
        }
    }

    pub fn reset(&mut self) {
        self.form = SearchForm::default();
        self.filters = RouteFilters::default();
        self.clear_cities();
    }

    pub fn clear_cities(&mut self) {
        self.city_guard.cancel();
        self.cities.clear();
        self.cities_status = FetchStatus::Idle;
        self.cities_error = None;
    }

    /// Loaded cities matching what is typed in `endpoint`, sorted by name.
    pub fn suggestions(&self, endpoint: Endpoint) -> Vec<City> {
        let typed = self.form.city(endpoint).name.trim().to_lowercase();
        let mut found: Vec<City> = self
            .cities
            .iter()
            .filter(|city| city.name.to_lowercase().starts_with(&typed))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        found
    }

    /// Backend query for the current form; `None` while either city is unpicked.
    /// Dates that are missing or unreadable are left out of the query.
    pub fn route_query(&self, limit: usize) -> Option<RouteSearchQuery> {
        let from_city_id = self.form.from_city.id.clone()?;
        let to_city_id = self.form.to_city.id.clone()?;
        let date_start = self.form.date_start.as_deref().and_then(to_api_date);
        let date_end = self.form.date_end.as_deref().and_then(to_api_date);

        Some(RouteSearchQuery {
            from_city_id,
            to_city_id,
            date_start,
            date_end,
            limit,
        })
    }
}
