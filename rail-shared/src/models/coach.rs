use serde::{Deserialize, Serialize};
use crate::models::ClassType;

/// Coach metadata from the seat-map endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Coach {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub class_type: ClassType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wifi_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linens_price: Option<f64>,
    #[serde(default)]
    pub have_wifi: bool,
    #[serde(default)]
    pub have_linens: bool,
    #[serde(default)]
    pub is_linens_included: bool,
    #[serde(default)]
    pub have_air_conditioning: bool,
    #[serde(default)]
    pub have_food: bool,
}

impl Coach {
    /// Coach number as printed on the carriage: the digits of its name.
    pub fn number(&self) -> String {
        self.name.chars().filter(|c| c.is_ascii_digit()).collect()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeatInfo {
    pub index: u32,
    pub available: bool,
}

/// A coach together with its seat availability snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoachSeatsBlock {
    pub coach: Coach,
    #[serde(default)]
    pub seats: Vec<SeatInfo>,
}

impl CoachSeatsBlock {
    pub fn seat(&self, index: u32) -> Option<&SeatInfo> {
        self.seats.iter().find(|seat| seat.index == index)
    }

    pub fn available_count(&self) -> usize {
        self.seats.iter().filter(|seat| seat.available).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coach_block_deserialization() {
        let json = r#"
            {
                "coach": {
                    "_id": "coach-7",
                    "name": "ФПК-07",
                    "class_type": "second",
                    "top_price": 3500,
                    "bottom_price": 4100,
                    "wifi_price": 250,
                    "have_wifi": true,
                    "is_linens_included": true
                },
                "seats": [{"index": 1, "available": true}, {"index": 2, "available": false}]
            }
        "#;
        let block: CoachSeatsBlock = serde_json::from_str(json).expect("Failed to deserialize");
        assert_eq!(block.coach.id, "coach-7");
        assert_eq!(block.coach.class_type, ClassType::Second);
        assert_eq!(block.coach.price, None);
        assert_eq!(block.coach.number(), "07");
        assert_eq!(block.available_count(), 1);
        assert!(!block.seat(2).unwrap().available);
        assert!(block.seat(3).is_none());
    }
}
