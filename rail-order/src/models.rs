use rail_catalog::AdditionalOptions;
use rail_shared::{ClassType, CoachSeatsBlock, Directional, DocumentType, Masked, PaymentMethod, RouteLeg, SelectedSeat};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Upper bound on all passengers in one order, lap children included.
pub const MAX_PASSENGERS: u32 = 5;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PassengerCount {
    pub adults: u32,
    pub children: u32,
    pub children_no_seat: u32,
}

impl PassengerCount {
    pub fn total(&self) -> u32 {
        self.adults
            .saturating_add(self.children)
            .saturating_add(self.children_no_seat)
    }

    /// Passengers that occupy a seat.
    pub fn seated(&self) -> u32 {
        self.adults + self.children
    }

    pub fn get(&self, kind: PassengerType) -> u32 {
        match kind {
            PassengerType::Adults => self.adults,
            PassengerType::Children => self.children,
            PassengerType::ChildrenNoSeat => self.children_no_seat,
        }
    }

    pub fn with(mut self, kind: PassengerType, value: u32) -> Self {
        match kind {
            PassengerType::Adults => self.adults = value,
            PassengerType::Children => self.children = value,
            PassengerType::ChildrenNoSeat => self.children_no_seat = value,
        }
        self
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PassengerType {
    Adults,
    Children,
    ChildrenNoSeat,
}

/// Passenger record. Validity is derived on demand, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Passenger {
    pub id: Uuid,
    pub is_adult: bool,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub patron: String,
    /// `true` for male.
    #[serde(default = "default_gender")]
    pub gender: bool,
    /// `DD.MM.YYYY`.
    #[serde(default)]
    pub birthday: String,
    #[serde(default)]
    pub doc_type: DocumentType,
    #[serde(default)]
    pub doc_series: Masked<String>,
    #[serde(default)]
    pub doc_number: Masked<String>,
    #[serde(default)]
    pub is_limited_mobility: bool,
}

fn default_gender() -> bool {
    true
}

/// Editable passenger fields.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PassengerField {
    Surname,
    Name,
    Patron,
    Gender,
    Birthday,
    DocType,
    DocSeries,
    DocNumber,
    IsLimitedMobility,
    IsAdult,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Payer {
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub patron: String,
    #[serde(default)]
    pub phone: Masked<String>,
    #[serde(default)]
    pub email: Masked<String>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PayerField {
    Surname,
    Name,
    Patron,
    Phone,
    Email,
}

/// Booking funnel steps in forward order.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OrderStep {
    #[default]
    SelectingTrain,
    SelectingSeats,
    EnteringPassengers,
    EnteringPayment,
    Verifying,
    Success,
}

impl OrderStep {
    pub const ALL: [OrderStep; 6] = [
        OrderStep::SelectingTrain,
        OrderStep::SelectingSeats,
        OrderStep::EnteringPassengers,
        OrderStep::EnteringPayment,
        OrderStep::Verifying,
        OrderStep::Success,
    ];
}

impl fmt::Display for OrderStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderStep::SelectingTrain => "selecting_train",
            OrderStep::SelectingSeats => "selecting_seats",
            OrderStep::EnteringPassengers => "entering_passengers",
            OrderStep::EnteringPayment => "entering_payment",
            OrderStep::Verifying => "verifying",
            OrderStep::Success => "success",
        };
        f.write_str(name)
    }
}

/// The order being assembled in one booking session.
///
/// `Directional` fields hold the outbound (`departure`) and return
/// (`arrival`) halves of a round trip.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Order {
    pub selected_train: Directional<Option<RouteLeg>>,
    pub seats_data: Directional<Vec<CoachSeatsBlock>>,
    pub selected_seats: Directional<Vec<SelectedSeat>>,
    /// Coach class shown in the coach picker per direction.
    pub coach_class: Directional<Option<ClassType>>,
    pub selected_additional_options: AdditionalOptions,
    pub passenger_count: PassengerCount,
    pub passengers: Vec<Passenger>,
    pub payer: Payer,
    pub filter_type: ClassType,
}
