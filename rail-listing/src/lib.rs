pub mod filters;
pub mod listing;
pub mod search;
pub mod sorting;

pub use filters::{apply_filters, HourWindow, LegTimes, RouteFilters};
pub use listing::{paginate, RouteListing, RoutePage, RouteRequest};
pub use search::{CityInput, CityLookup, DateField, Endpoint, SearchCommand, SearchForm, SearchState};
pub use sorting::{sort_routes, SortBy};
