use chrono::FixedOffset;
use rail_core::format::display_offset;
use rail_core::repository::RouteRepository;
use rail_store::Config;
use std::sync::Arc;

use crate::session::SessionStore;

#[derive(Clone, Debug)]
pub struct Settings {
    pub tz: FixedOffset,
    pub page_size: usize,
    pub route_fetch_limit: usize,
}

impl Settings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            tz: display_offset(config.display.utc_offset_minutes),
            page_size: config.listing.page_size,
            route_fetch_limit: config.backend.route_fetch_limit,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tz: display_offset(180),
            page_size: 5,
            route_fetch_limit: 5000,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn RouteRepository>,
    pub sessions: SessionStore,
    pub settings: Settings,
}

impl AppState {
    pub fn new(repo: Arc<dyn RouteRepository>, settings: Settings) -> Self {
        Self {
            repo,
            sessions: SessionStore::default(),
            settings,
        }
    }
}
