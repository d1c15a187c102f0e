use chrono::NaiveDate;
use rail_shared::RouteItem;
use serde::{Deserialize, Serialize};

/// Query sent to the route search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteSearchQuery {
    pub from_city_id: String,
    pub to_city_id: String,
    /// `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_end: Option<String>,
    pub limit: usize,
}

impl RouteSearchQuery {
    /// Query-string pairs in backend order.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("from_city_id", self.from_city_id.clone()),
            ("to_city_id", self.to_city_id.clone()),
        ];
        if let Some(date_start) = &self.date_start {
            params.push(("date_start", date_start.clone()));
        }
        if let Some(date_end) = &self.date_end {
            params.push(("date_end", date_end.clone()));
        }
        params.push(("limit", self.limit.to_string()));
        params
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RouteSearchResponse {
    #[serde(default)]
    pub items: Vec<RouteItem>,
    #[serde(default)]
    pub total_count: usize,
}

/// Converts a form date (`DD.MM.YYYY`) to the backend format (`YYYY-MM-DD`).
/// Dates already in backend format pass through.
pub fn to_api_date(input: &str) -> Option<String> {
    let input = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(input, "%d.%m.%Y") {
        return Some(date.format("%Y-%m-%d").to_string());
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .map(|date| date.format("%Y-%m-%d").to_string())
}
