pub mod models;
pub mod pii;

pub use models::{
    City, ClassPrice, ClassType, Coach, CoachSeatsBlock, Direction, Directional, DocumentType,
    FareType, PaymentMethod, PriceInfo, RouteItem, RouteLeg, SeatInfo, SelectedSeat, Stop, Train,
};
pub use pii::Masked;
