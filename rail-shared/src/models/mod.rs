pub mod city;
pub mod coach;
pub mod route;
pub mod selection;

pub use city::City;
pub use coach::{Coach, CoachSeatsBlock, SeatInfo};
pub use route::{ClassPrice, ClassType, PriceInfo, RouteItem, RouteLeg, Stop, Train};
pub use selection::{Direction, Directional, DocumentType, FareType, PaymentMethod, SelectedSeat};
