use rail_shared::RouteItem;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Outbound departure time, earliest first.
    #[default]
    Date,
    /// Outbound travel time, shortest first.
    Duration,
    /// Cheapest class on the outbound leg; routes without prices go last.
    Price,
}

fn cheapest(item: &RouteItem) -> Option<f64> {
    item.departure.price_info.price_range().map(|(min, _)| min)
}

fn compare_price(a: &RouteItem, b: &RouteItem) -> Ordering {
    match (cheapest(a), cheapest(b)) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort; equal keys keep backend order.
pub fn sort_routes(items: &mut [RouteItem], sort_by: SortBy) {
    match sort_by {
        SortBy::Date => items.sort_by_key(|item| item.departure.from.datetime),
        SortBy::Duration => items.sort_by_key(|item| item.departure.duration),
        SortBy::Price => items.sort_by(compare_price),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::tests::item;
    use rail_shared::{ClassPrice, PriceInfo};

    fn ids(items: &[RouteItem]) -> Vec<&str> {
        items.iter().map(|item| item.departure.id.as_str()).collect()
    }

    #[test]
    fn test_sort_by_date_and_duration() {
        let mut items = vec![item("late", 300, 100), item("early", 100, 500), item("mid", 200, 50)];

        sort_routes(&mut items, SortBy::Date);
        assert_eq!(ids(&items), ["early", "mid", "late"]);

        sort_routes(&mut items, SortBy::Duration);
        assert_eq!(ids(&items), ["mid", "late", "early"]);
    }

    #[test]
    fn test_sort_by_price_puts_unpriced_last() {
        let mut cheap = item("cheap", 100, 100);
        cheap.departure.price_info = PriceInfo {
            fourth: Some(ClassPrice { price: Some(900.0), ..Default::default() }),
            ..Default::default()
        };
        let mut unpriced = item("unpriced", 50, 100);
        unpriced.departure.price_info = PriceInfo::default();
        let regular = item("regular", 10, 100);

        let mut items = vec![unpriced, regular, cheap];
        sort_routes(&mut items, SortBy::Price);
        assert_eq!(ids(&items), ["cheap", "regular", "unpriced"]);
    }

    #[test]
    fn test_sort_by_deserializes_lowercase() {
        let sort: SortBy = serde_json::from_str("\"duration\"").unwrap();
        assert_eq!(sort, SortBy::Duration);
    }
}
