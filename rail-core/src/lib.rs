pub mod fetch;
pub mod format;
pub mod repository;
pub mod search;
pub mod validation;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Form field that failed validation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Surname,
    Name,
    Patronymic,
    Birthday,
    DocumentSeries,
    DocumentNumber,
    Phone,
    Email,
    PassengerCount,
    Passengers,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Surname => "surname",
            Field::Name => "name",
            Field::Patronymic => "patronymic",
            Field::Birthday => "birthday",
            Field::DocumentSeries => "document series",
            Field::DocumentNumber => "document number",
            Field::Phone => "phone",
            Field::Email => "email",
            Field::PassengerCount => "passenger count",
            Field::Passengers => "passengers",
        };
        f.write_str(name)
    }
}

/// Booking rule a command would break.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rule {
    #[error("at least one adult or child passenger is required to pick seats")]
    NoSeatedPassenger,
    #[error("no more than {max} passengers per order")]
    PassengerLimitExceeded { max: u32 },
    #[error("passenger count must be a non-negative number")]
    InvalidCount,
    #[error("service {service} is included or unavailable in coach {coach_id}")]
    ServiceNotToggleable { coach_id: String, service: String },
    #[error("seat {seat_number} in coach {coach_id} is not available")]
    SeatUnavailable { coach_id: String, seat_number: u32 },
    #[error("coach {0} is not part of the loaded seat map")]
    UnknownCoach(String),
    #[error("leg {0} does not belong to the selected train")]
    LegNotInOrder(String),
    #[error("no train selected")]
    NoTrainSelected,
    #[error("cannot move from {from} to {to}")]
    StepLocked { from: String, to: String },
    #[error("order can only be cleared after it succeeded")]
    OrderNotFinished,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(Field),
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Invariant violation: {0}")]
    InvariantViolation(Rule),
}

pub type CoreResult<T> = Result<T, CoreError>;

impl From<Rule> for CoreError {
    fn from(rule: Rule) -> Self {
        CoreError::InvariantViolation(rule)
    }
}
