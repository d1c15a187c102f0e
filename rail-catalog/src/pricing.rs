use rail_shared::{Coach, CoachSeatsBlock, SelectedSeat};
use serde::{Deserialize, Serialize};

use crate::services::{service_price, AdditionalOptions, CoachService};

/// Share of the seat price charged for a child ticket.
pub const CHILD_FARE_RATIO: f64 = 0.5;

/// Fare rules applied when seats are assigned to passengers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FareRules {
    pub child_ratio: f64,
}

impl Default for FareRules {
    fn default() -> Self {
        Self {
            child_ratio: CHILD_FARE_RATIO,
        }
    }
}

/// Price of one seat.
///
/// A non-zero coach `price` is a flat fare. Otherwise even seats are upper
/// berths and odd seats lower berths, each falling back to the flat price.
pub fn seat_price(coach: &Coach, seat_number: u32) -> f64 {
    let flat = coach.price.unwrap_or(0.0);
    if flat != 0.0 {
        return flat;
    }
    let berth = if seat_number % 2 == 0 {
        coach.top_price
    } else {
        coach.bottom_price
    };
    berth.unwrap_or(flat)
}

/// Sticker total: every selected seat at full price.
pub fn sticker_total<'a>(seats: impl IntoIterator<Item = &'a SelectedSeat>) -> f64 {
    seats.into_iter().map(|seat| seat.price).sum()
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct AllocatedPrice {
    pub adult: f64,
    pub child: f64,
}

impl AllocatedPrice {
    pub fn total(&self) -> f64 {
        self.adult + self.child
    }
}

impl std::ops::Add for AllocatedPrice {
    type Output = AllocatedPrice;

    fn add(self, rhs: AllocatedPrice) -> AllocatedPrice {
        AllocatedPrice {
            adult: self.adult + rhs.adult,
            child: self.child + rhs.child,
        }
    }
}

/// Assigns the most expensive seats to adults, the next ones to children at
/// the child rate. Seats beyond `adults + children` are not charged.
pub fn allocate(seats: &[SelectedSeat], adults: u32, children: u32, rules: &FareRules) -> AllocatedPrice {
    let mut prices: Vec<f64> = seats.iter().map(|seat| seat.price).collect();
    prices.sort_by(|a, b| b.total_cmp(a));

    let adults = adults as usize;
    let children = children as usize;

    let adult: f64 = prices.iter().take(adults).sum();
    let child: f64 = prices.iter().skip(adults).take(children).sum();

    AllocatedPrice {
        adult,
        child: child * rules.child_ratio,
    }
}

/// Service charges for one coach holding selected seats.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CoachCharge {
    pub coach_id: String,
    pub seats: usize,
    pub wifi: f64,
    pub linens: f64,
}

impl CoachCharge {
    pub fn total(&self) -> f64 {
        self.wifi + self.linens
    }
}

/// Per-coach charges for selected services, one entry per coach with seats.
pub fn service_charges(
    blocks: &[CoachSeatsBlock],
    seats: &[SelectedSeat],
    options: &AdditionalOptions,
) -> Vec<CoachCharge> {
    blocks
        .iter()
        .filter_map(|block| {
            let coach = &block.coach;
            let count = seats.iter().filter(|seat| seat.coach_id == coach.id).count();
            if count == 0 {
                return None;
            }

            let charge_for = |service: CoachService| {
                if options.is_selected(&coach.id, service) {
                    service_price(coach, service).unwrap_or(0.0) * count as f64
                } else {
                    0.0
                }
            };

            Some(CoachCharge {
                coach_id: coach.id.clone(),
                seats: count,
                wifi: charge_for(CoachService::Wifi),
                linens: charge_for(CoachService::Linens),
            })
        })
        .collect()
}

/// Full price picture of an order across both directions.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct PriceBreakdown {
    pub sticker_total: f64,
    pub allocated: AllocatedPrice,
    pub services: Vec<CoachCharge>,
    pub services_total: f64,
    pub total: f64,
}

impl PriceBreakdown {
    /// `directions` pairs each direction's seat map with its selected seats.
    pub fn compute(
        directions: &[(&[CoachSeatsBlock], &[SelectedSeat])],
        adults: u32,
        children: u32,
        options: &AdditionalOptions,
        rules: &FareRules,
    ) -> Self {
        let mut breakdown = PriceBreakdown::default();

        for (blocks, seats) in directions {
            breakdown.sticker_total += sticker_total(seats.iter());
            breakdown.allocated = breakdown.allocated + allocate(seats, adults, children, rules);
            breakdown.services.extend(service_charges(blocks, seats, options));
        }

        breakdown.services_total = breakdown.services.iter().map(CoachCharge::total).sum();
        breakdown.total = breakdown.allocated.total() + breakdown.services_total;
        breakdown
    }
}
