use chrono::FixedOffset;
use rail_catalog::{AllocatedPrice, CoachCharge};
use rail_core::format::{capitalize, format_date, format_duration, format_duration_colons, format_price, format_time};
use rail_shared::{CoachSeatsBlock, Directional, RouteLeg, SelectedSeat};
use serde::Serialize;

use crate::machine::OrderMachine;
use crate::models::{OrderStep, Passenger, PassengerCount, Payer};

/// One leg as printed on the verification and success screens.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LegSummary {
    pub leg_id: String,
    pub train: String,
    pub from_city: String,
    pub from_station: String,
    pub departure_date: String,
    pub departure_time: String,
    pub to_city: String,
    pub to_station: String,
    pub arrival_date: String,
    pub arrival_time: String,
    pub duration: String,
    /// `H:MM`.
    pub duration_short: String,
}

impl LegSummary {
    pub fn new(leg: &RouteLeg, tz: &FixedOffset) -> Self {
        Self {
            leg_id: leg.id.clone(),
            train: leg.train.display_name(),
            from_city: capitalize(&leg.from.city.name),
            from_station: leg.from.railway_station_name.clone(),
            departure_date: format_date(leg.from.datetime, tz),
            departure_time: format_time(leg.from.datetime, tz),
            to_city: capitalize(&leg.to.city.name),
            to_station: leg.to.railway_station_name.clone(),
            arrival_date: format_date(leg.to.datetime, tz),
            arrival_time: format_time(leg.to.datetime, tz),
            duration: format_duration(leg.travel_seconds()),
            duration_short: format_duration_colons(leg.travel_seconds()),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SeatLine {
    pub coach_id: String,
    pub coach_number: String,
    pub seat_number: u32,
    pub price: f64,
}

fn seat_lines(blocks: &[CoachSeatsBlock], seats: &[SelectedSeat]) -> Vec<SeatLine> {
    seats
        .iter()
        .map(|seat| SeatLine {
            coach_id: seat.coach_id.clone(),
            coach_number: blocks
                .iter()
                .find(|block| block.coach.id == seat.coach_id)
                .map(|block| block.coach.number())
                .unwrap_or_default(),
            seat_number: seat.seat_number,
            price: seat.price,
        })
        .collect()
}

/// Read-only view of an order for the last two steps.
#[derive(Debug, Clone, Serialize)]
pub struct OrderSummary {
    pub step: OrderStep,
    pub train: Directional<Option<LegSummary>>,
    pub seats: Directional<Vec<SeatLine>>,
    pub passenger_count: PassengerCount,
    pub passengers: Vec<Passenger>,
    pub payer: Payer,
    pub sticker_total: f64,
    pub allocated: AllocatedPrice,
    /// Children with or without a seat.
    pub child_count: u32,
    pub services: Vec<CoachCharge>,
    pub services_total: f64,
    pub total: f64,
    pub total_display: String,
}

impl OrderSummary {
    pub fn build(machine: &OrderMachine, tz: &FixedOffset) -> Self {
        let order = machine.order();
        let breakdown = machine.price_breakdown();

        Self {
            step: machine.step(),
            train: Directional {
                departure: order.selected_train.departure.as_ref().map(|leg| LegSummary::new(leg, tz)),
                arrival: order.selected_train.arrival.as_ref().map(|leg| LegSummary::new(leg, tz)),
            },
            seats: Directional {
                departure: seat_lines(&order.seats_data.departure, &order.selected_seats.departure),
                arrival: seat_lines(&order.seats_data.arrival, &order.selected_seats.arrival),
            },
            passenger_count: order.passenger_count,
            passengers: order.passengers.clone(),
            payer: order.payer.clone(),
            sticker_total: breakdown.sticker_total,
            allocated: breakdown.allocated,
            child_count: order.passenger_count.children + order.passenger_count.children_no_seat,
            services: breakdown.services,
            services_total: breakdown.services_total,
            total: breakdown.total,
            total_display: format_price(breakdown.total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PassengerType;
    use rail_core::format::display_offset;
    use rail_shared::{City, Direction, Stop, Train};

    #[test]
    fn test_summary_of_one_way_order() {
        let leg = RouteLeg {
            id: "dep".into(),
            train: Train { id: "t".into(), name: Some("016А undefined".into()) },
            from: Stop { city: City::new("msk", "москва"), datetime: 1_700_000_000, railway_station_name: "Ленинградский".into() },
            to: Stop { city: City::new("spb", "санкт-петербург"), datetime: 1_700_032_700, railway_station_name: "Московский".into() },
            duration: 32_700,
            have_first_class: false,
            have_second_class: false,
            have_third_class: true,
            have_fourth_class: false,
            have_wifi: false,
            have_air_conditioning: false,
            is_express: false,
            price_info: Default::default(),
        };

        let mut machine = OrderMachine::new();
        machine.select_train(leg, None).unwrap();
        machine.set_passenger_count(PassengerType::Adults, 1).unwrap();
        machine.set_passenger_count(PassengerType::ChildrenNoSeat, 1).unwrap();
        machine
            .toggle_seat(Direction::Departure, SelectedSeat::new("c1", 7, 1234.0))
            .unwrap();

        let summary = OrderSummary::build(&machine, &display_offset(180));
        let dep = summary.train.departure.as_ref().unwrap();
        assert_eq!(dep.train, "016А");
        assert_eq!(dep.from_city, "Москва");
        assert_eq!(dep.departure_time, "01:13");
        assert_eq!(dep.duration, "9 ч 5 мин");
        assert_eq!(dep.duration_short, "9:05");
        assert!(summary.train.arrival.is_none());
        assert_eq!(summary.child_count, 1);
        assert_eq!(summary.seats.departure[0].coach_number, "");
        assert_eq!(summary.total_display, "1\u{a0}234");
    }
}
