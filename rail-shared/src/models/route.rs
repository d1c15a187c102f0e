use serde::{Deserialize, Serialize};
use crate::models::City;

/// Coach service tier.
///
/// The wire names are numeric-sounding but do not follow comfort order:
/// `first` is lux, `second` is kupe (compartment), `third` is platzkart
/// (open berth) and `fourth` is a sitting coach.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ClassType {
    First,
    Second,
    #[default]
    Third,
    Fourth,
}

impl ClassType {
    /// Display order used by the listing and the coach picker: cheapest first.
    pub const DISPLAY_ORDER: [ClassType; 4] = [
        ClassType::Fourth,
        ClassType::Third,
        ClassType::Second,
        ClassType::First,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ClassType::First => "Люкс",
            ClassType::Second => "Купе",
            ClassType::Third => "Плацкарт",
            ClassType::Fourth => "Сидячий",
        }
    }
}

/// Price block for one class on a leg.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClassPrice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side_price: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PriceInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<ClassPrice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second: Option<ClassPrice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub third: Option<ClassPrice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fourth: Option<ClassPrice>,
}

impl PriceInfo {
    pub fn get(&self, class: ClassType) -> Option<&ClassPrice> {
        match class {
            ClassType::First => self.first.as_ref(),
            ClassType::Second => self.second.as_ref(),
            ClassType::Third => self.third.as_ref(),
            ClassType::Fourth => self.fourth.as_ref(),
        }
    }

    /// Base `price` of every class that defines one.
    pub fn class_prices(&self) -> impl Iterator<Item = f64> + '_ {
        [ClassType::Second, ClassType::Third, ClassType::Fourth, ClassType::First]
            .into_iter()
            .filter_map(|class| self.get(class).and_then(|info| info.price))
    }

    /// `(min, max)` over the defined class prices.
    pub fn price_range(&self) -> Option<(f64, f64)> {
        self.class_prices().fold(None, |acc, price| match acc {
            None => Some((price, price)),
            Some((min, max)) => Some((min.min(price), max.max(price))),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Train {
    #[serde(default, alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl Train {
    /// Name shown on screens. The backend sometimes glues a literal
    /// `undefined` into the name; it is dropped together with a dangling hyphen.
    pub fn display_name(&self) -> String {
        let Some(name) = self.name.as_deref() else {
            return "Поезд".to_string();
        };

        let mut cleaned = name.replacen("undefined", "", 1).trim().to_string();
        if let Some(stripped) = cleaned.strip_suffix('-') {
            cleaned = stripped.trim().to_string();
        }
        cleaned
    }
}

/// One end of a leg.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Stop {
    pub city: City,
    /// Epoch seconds.
    pub datetime: i64,
    #[serde(default)]
    pub railway_station_name: String,
}

/// One directional train journey.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteLeg {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub train: Train,
    pub from: Stop,
    pub to: Stop,
    /// Seconds.
    #[serde(default)]
    pub duration: i64,
    #[serde(default)]
    pub have_first_class: bool,
    #[serde(default)]
    pub have_second_class: bool,
    #[serde(default)]
    pub have_third_class: bool,
    #[serde(default)]
    pub have_fourth_class: bool,
    #[serde(default)]
    pub have_wifi: bool,
    #[serde(default)]
    pub have_air_conditioning: bool,
    #[serde(default)]
    pub is_express: bool,
    #[serde(default)]
    pub price_info: PriceInfo,
}

impl RouteLeg {
    pub fn has_class(&self, class: ClassType) -> bool {
        match class {
            ClassType::First => self.have_first_class,
            ClassType::Second => self.have_second_class,
            ClassType::Third => self.have_third_class,
            ClassType::Fourth => self.have_fourth_class,
        }
    }

    /// Seconds on the way; taken from the stop times when the backend omits it.
    pub fn travel_seconds(&self) -> i64 {
        if self.duration > 0 {
            self.duration
        } else {
            (self.to.datetime - self.from.datetime).max(0)
        }
    }
}

/// A search result: an outbound leg with an optional return leg.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteItem {
    pub departure: RouteLeg,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival: Option<RouteLeg>,
}

impl RouteItem {
    pub fn is_round_trip(&self) -> bool {
        self.arrival.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_item_deserialization() {
        let json = r#"
            {
                "departure": {
                    "_id": "leg-1",
                    "train": {"_id": "t1", "name": "Ласточка"},
                    "from": {"city": {"_id": "c1", "name": "москва"}, "datetime": 1700000000, "railway_station_name": "Курский"},
                    "to": {"city": {"_id": "c2", "name": "санкт-петербург"}, "datetime": 1700018000},
                    "duration": 18000,
                    "have_wifi": true,
                    "have_third_class": true,
                    "price_info": {"third": {"top_price": 2500, "bottom_price": 3100, "price": 2800}}
                }
            }
        "#;
        let item: RouteItem = serde_json::from_str(json).expect("Failed to deserialize");
        assert_eq!(item.departure.id, "leg-1");
        assert!(!item.is_round_trip());
        assert!(item.departure.has_class(ClassType::Third));
        assert!(!item.departure.has_class(ClassType::First));
        assert_eq!(item.departure.price_info.price_range(), Some((2800.0, 2800.0)));
        assert_eq!(item.departure.to.railway_station_name, "");
        assert_eq!(item.departure.travel_seconds(), 18_000);

        let mut undated = item.departure.clone();
        undated.duration = 0;
        undated.to.datetime = 1_700_003_600;
        assert_eq!(undated.travel_seconds(), 3_600);
    }

    #[test]
    fn test_price_range_spans_classes() {
        let info = PriceInfo {
            first: Some(ClassPrice { price: Some(9000.0), ..Default::default() }),
            fourth: Some(ClassPrice { price: Some(1200.0), ..Default::default() }),
            second: Some(ClassPrice { top_price: Some(4000.0), ..Default::default() }),
            ..Default::default()
        };
        assert_eq!(info.price_range(), Some((1200.0, 9000.0)));
        assert_eq!(PriceInfo::default().price_range(), None);
    }

    #[test]
    fn test_train_display_name() {
        let train = Train { id: "t".into(), name: Some("116С undefined -".into()) };
        assert_eq!(train.display_name(), "116С");

        let plain = Train { id: "t".into(), name: Some("Сапсан".into()) };
        assert_eq!(plain.display_name(), "Сапсан");

        assert_eq!(Train::default().display_name(), "Поезд");
    }
}
