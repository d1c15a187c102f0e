use chrono::FixedOffset;
use rail_core::format::local_hour;
use rail_shared::{ClassType, RouteItem, RouteLeg};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PRICE_FROM: f64 = 10.0;
pub const DEFAULT_PRICE_TO: f64 = 10_000.0;
/// Upper price bound at or above which the price window counts as untouched.
pub const PRICE_FILTER_CEILING: f64 = 7_000.0;

/// Hour-of-day window, both ends inclusive. `0..=24` matches everything.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HourWindow {
    pub from: u32,
    pub to: u32,
}

impl Default for HourWindow {
    fn default() -> Self {
        Self { from: 0, to: 24 }
    }
}

impl HourWindow {
    pub fn is_active(&self) -> bool {
        self.from > 0 || self.to < 24
    }

    fn admits(&self, epoch_seconds: i64, tz: &FixedOffset) -> bool {
        if !self.is_active() {
            return true;
        }
        local_hour(epoch_seconds, tz).is_some_and(|hour| hour >= self.from && hour <= self.to)
    }
}

/// Departure and arrival time windows for one leg.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LegTimes {
    pub departure: HourWindow,
    pub arrival: HourWindow,
}

impl LegTimes {
    fn admits(&self, leg: &RouteLeg, tz: &FixedOffset) -> bool {
        self.departure.admits(leg.from.datetime, tz) && self.arrival.admits(leg.to.datetime, tz)
    }
}

/// Client-side route filters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RouteFilters {
    pub have_first_class: bool,
    pub have_second_class: bool,
    pub have_third_class: bool,
    pub have_fourth_class: bool,
    pub have_wifi: bool,
    pub is_express: bool,
    pub have_air_conditioning: bool,
    pub price_from: f64,
    pub price_to: f64,
    /// Windows on the outbound leg.
    pub outbound: LegTimes,
    /// Windows on the return leg, ignored for one-way routes.
    pub inbound: LegTimes,
}

impl Default for RouteFilters {
    fn default() -> Self {
        Self {
            have_first_class: false,
            have_second_class: false,
            have_third_class: false,
            have_fourth_class: false,
            have_wifi: false,
            is_express: false,
            have_air_conditioning: false,
            price_from: DEFAULT_PRICE_FROM,
            price_to: DEFAULT_PRICE_TO,
            outbound: LegTimes::default(),
            inbound: LegTimes::default(),
        }
    }
}

impl RouteFilters {
    pub fn price_window_active(&self) -> bool {
        !(self.price_from <= DEFAULT_PRICE_FROM && self.price_to >= PRICE_FILTER_CEILING)
    }

    fn required_classes(&self) -> impl Iterator<Item = ClassType> + '_ {
        [
            (self.have_first_class, ClassType::First),
            (self.have_second_class, ClassType::Second),
            (self.have_third_class, ClassType::Third),
            (self.have_fourth_class, ClassType::Fourth),
        ]
        .into_iter()
        .filter_map(|(required, class)| required.then_some(class))
    }

    /// Whether a candidate route passes every active filter.
    ///
    /// Class, amenity and price filters look at the outbound leg only.
    pub fn matches(&self, item: &RouteItem, tz: &FixedOffset) -> bool {
        let leg = &item.departure;

        if self.required_classes().any(|class| !leg.has_class(class)) {
            return false;
        }
        if (self.have_wifi && !leg.have_wifi)
            || (self.is_express && !leg.is_express)
            || (self.have_air_conditioning && !leg.have_air_conditioning)
        {
            return false;
        }

        if self.price_window_active() {
            match leg.price_info.price_range() {
                Some((min, max)) if min >= self.price_from && max <= self.price_to => {}
                _ => return false,
            }
        }

        if !self.outbound.admits(leg, tz) {
            return false;
        }
        match &item.arrival {
            Some(back) => self.inbound.admits(back, tz),
            None => true,
        }
    }
}

pub fn apply_filters(items: &[RouteItem], filters: &RouteFilters, tz: &FixedOffset) -> Vec<RouteItem> {
    items
        .iter()
        .filter(|item| filters.matches(item, tz))
        .cloned()
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rail_shared::{City, ClassPrice, PriceInfo, Stop, Train};

    pub(crate) fn leg(id: &str, departs: i64, duration: i64) -> RouteLeg {
        RouteLeg {
            id: id.to_string(),
            train: Train { id: format!("t-{id}"), name: Some("001А".into()) },
            from: Stop { city: City::new("msk", "москва"), datetime: departs, railway_station_name: "Курский".into() },
            to: Stop { city: City::new("spb", "санкт-петербург"), datetime: departs + duration, railway_station_name: "Московский".into() },
            duration,
            have_first_class: false,
            have_second_class: true,
            have_third_class: true,
            have_fourth_class: false,
            have_wifi: false,
            have_air_conditioning: false,
            is_express: false,
            price_info: PriceInfo {
                second: Some(ClassPrice { price: Some(3000.0), ..Default::default() }),
                third: Some(ClassPrice { price: Some(1500.0), ..Default::default() }),
                ..Default::default()
            },
        }
    }

    pub(crate) fn item(id: &str, departs: i64, duration: i64) -> RouteItem {
        RouteItem { departure: leg(id, departs, duration), arrival: None }
    }

    fn utc() -> FixedOffset {
        rail_core::format::display_offset(0)
    }

    // 2024-01-01 00:00:00 UTC
    const MIDNIGHT: i64 = 1_704_067_200;

    #[test]
    fn test_wifi_filter_keeps_wifi_route() {
        let mut with_wifi = item("a", MIDNIGHT, 3600);
        with_wifi.departure.have_wifi = true;
        let without = item("b", MIDNIGHT, 3600);

        let filters = RouteFilters { have_wifi: true, ..Default::default() };
        let found = apply_filters(&[with_wifi, without], &filters, &utc());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].departure.id, "a");
    }

    #[test]
    fn test_class_filter() {
        let filters = RouteFilters { have_first_class: true, ..Default::default() };
        assert!(!filters.matches(&item("a", MIDNIGHT, 3600), &utc()));

        let filters = RouteFilters { have_third_class: true, ..Default::default() };
        assert!(filters.matches(&item("a", MIDNIGHT, 3600), &utc()));
    }

    #[test]
    fn test_price_window() {
        let defaults = RouteFilters::default();
        assert!(!defaults.price_window_active());
        assert!(!RouteFilters { price_to: 7000.0, ..Default::default() }.price_window_active());

        let narrow = RouteFilters { price_from: 1000.0, price_to: 3500.0, ..Default::default() };
        assert!(narrow.price_window_active());
        assert!(narrow.matches(&item("a", MIDNIGHT, 3600), &utc()));

        let cheap = RouteFilters { price_to: 2000.0, ..Default::default() };
        assert!(!cheap.matches(&item("a", MIDNIGHT, 3600), &utc()));

        let mut unpriced = item("b", MIDNIGHT, 3600);
        unpriced.departure.price_info = PriceInfo::default();
        assert!(!narrow.matches(&unpriced, &utc()));
        assert!(defaults.matches(&unpriced, &utc()));
    }

    #[test]
    fn test_hour_windows_are_inclusive() {
        let morning = item("a", MIDNIGHT + 8 * 3600, 3 * 3600);
        let filters = RouteFilters {
            outbound: LegTimes { departure: HourWindow { from: 6, to: 8 }, ..Default::default() },
            ..Default::default()
        };
        assert!(filters.matches(&morning, &utc()));

        let filters = RouteFilters {
            outbound: LegTimes { arrival: HourWindow { from: 12, to: 24 }, ..Default::default() },
            ..Default::default()
        };
        assert!(!filters.matches(&morning, &utc()));
    }

    #[test]
    fn test_inbound_window_applies_to_return_leg() {
        let mut round = item("a", MIDNIGHT + 8 * 3600, 3600);
        round.arrival = Some(leg("r", MIDNIGHT + 20 * 3600, 3600));

        let filters = RouteFilters {
            inbound: LegTimes { departure: HourWindow { from: 0, to: 12 }, ..Default::default() },
            ..Default::default()
        };
        assert!(!filters.matches(&round, &utc()));
        assert!(filters.matches(&item("b", MIDNIGHT + 20 * 3600, 3600), &utc()));
    }
}
