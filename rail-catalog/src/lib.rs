pub mod pricing;
pub mod services;

pub use pricing::{allocate, seat_price, AllocatedPrice, CoachCharge, FareRules, PriceBreakdown};
pub use services::{service_state, AdditionalOptions, CoachService, ServiceState};
