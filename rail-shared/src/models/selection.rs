use serde::{Deserialize, Serialize};
use std::fmt;

/// Which leg of a (possibly round-trip) order a selection belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Departure,
    Arrival,
}

impl Direction {
    pub const BOTH: [Direction; 2] = [Direction::Departure, Direction::Arrival];
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Departure => write!(f, "departure"),
            Direction::Arrival => write!(f, "arrival"),
        }
    }
}

/// A pair of values, one per direction.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Directional<T> {
    pub departure: T,
    pub arrival: T,
}

impl<T> Directional<T> {
    pub fn get(&self, direction: Direction) -> &T {
        match direction {
            Direction::Departure => &self.departure,
            Direction::Arrival => &self.arrival,
        }
    }

    pub fn get_mut(&mut self, direction: Direction) -> &mut T {
        match direction {
            Direction::Departure => &mut self.departure,
            Direction::Arrival => &mut self.arrival,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Direction, &T)> {
        [(Direction::Departure, &self.departure), (Direction::Arrival, &self.arrival)].into_iter()
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FareType {
    #[default]
    Adult,
    Child,
}

/// A chosen seat. Identified by `(coach_id, seat_number)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectedSeat {
    pub coach_id: String,
    pub seat_number: u32,
    pub price: f64,
    #[serde(rename = "type", default)]
    pub fare: FareType,
}

impl SelectedSeat {
    pub fn new(coach_id: impl Into<String>, seat_number: u32, price: f64) -> Self {
        Self {
            coach_id: coach_id.into(),
            seat_number,
            price,
            fare: FareType::Adult,
        }
    }

    pub fn same_place(&self, other: &SelectedSeat) -> bool {
        self.coach_id == other.coach_id && self.seat_number == other.seat_number
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Online,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    #[default]
    Passport,
    BirthCertificate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seat_wire_format() {
        let seat = SelectedSeat::new("coach-1", 12, 2100.0);
        let json = serde_json::to_value(&seat).unwrap();
        assert_eq!(json["type"], "adult");
        assert_eq!(json["seat_number"], 12);

        let back: SelectedSeat = serde_json::from_str(r#"{"coach_id":"coach-1","seat_number":12,"price":99}"#).unwrap();
        assert!(back.same_place(&seat));
    }

    #[test]
    fn test_directional_access() {
        let mut pair: Directional<Vec<u32>> = Directional::default();
        pair.get_mut(Direction::Arrival).push(3);
        assert!(pair.get(Direction::Departure).is_empty());
        assert_eq!(pair.arrival, vec![3]);
        assert_eq!(pair.iter().count(), 2);
    }

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(serde_json::to_string(&DocumentType::BirthCertificate).unwrap(), "\"birth_certificate\"");
        assert_eq!(serde_json::to_string(&PaymentMethod::Online).unwrap(), "\"online\"");
        assert_eq!(serde_json::to_string(&Direction::Arrival).unwrap(), "\"arrival\"");
    }
}
