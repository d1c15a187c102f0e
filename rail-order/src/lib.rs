pub mod machine;
pub mod models;
pub mod passengers;
pub mod summary;

pub use machine::{OrderMachine, SeatFetch, SeatMapStatus};
pub use models::{Order, OrderStep, Passenger, PassengerCount, PassengerField, PassengerType, Payer, PayerField, MAX_PASSENGERS};
pub use passengers::{validate_passenger, validate_payer};
pub use summary::{LegSummary, OrderSummary, SeatLine};
