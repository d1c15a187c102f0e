use rail_catalog::pricing::{seat_price, service_charges, sticker_total, CoachCharge};
use rail_catalog::{allocate, AllocatedPrice, CoachService, FareRules, PriceBreakdown};
use rail_core::fetch::{FetchGuard, FetchStatus, FetchTicket};
use rail_core::repository::RouteRepository;
use rail_core::validation::ValidationResult;
use rail_core::{CoreError, CoreResult, Field, Rule};
use rail_shared::{ClassType, CoachSeatsBlock, Direction, Directional, PaymentMethod, RouteLeg, SelectedSeat};
use tracing::{debug, info, warn};

use crate::models::{Order, OrderStep, Passenger, PassengerCount, PassengerType, PayerField, MAX_PASSENGERS};
use crate::passengers::{validate_passenger, validate_payer};

/// Seat-map request for one leg of the selected train.
#[derive(Debug, Clone)]
pub struct SeatFetch {
    pub ticket: FetchTicket,
    pub direction: Direction,
    pub leg_id: String,
}

/// Seat-map loading state for one direction.
#[derive(Debug, Clone, Default)]
pub struct SeatMapStatus {
    pub status: FetchStatus,
    pub error: Option<String>,
    guard: FetchGuard,
}

/// Drives one order through the booking funnel.
///
/// Every command either applies completely or returns an error and leaves
/// the order untouched.
#[derive(Debug, Clone, Default)]
pub struct OrderMachine {
    order: Order,
    step: OrderStep,
    seat_maps: Directional<SeatMapStatus>,
    fare_rules: FareRules,
}

impl OrderMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fare_rules(fare_rules: FareRules) -> Self {
        Self {
            fare_rules,
            ..Self::default()
        }
    }

    pub fn order(&self) -> &Order {
        &self.order
    }

    pub fn step(&self) -> OrderStep {
        self.step
    }

    pub fn seat_map_status(&self, direction: Direction) -> &SeatMapStatus {
        self.seat_maps.get(direction)
    }

    // ---- train ----

    /// Records the chosen legs. Seat selections are kept. A finished order
    /// must be cleared first.
    pub fn select_train(&mut self, departure: RouteLeg, arrival: Option<RouteLeg>) -> CoreResult<()> {
        if self.step == OrderStep::Success {
            return Err(self.locked(OrderStep::SelectingTrain));
        }
        info!(departure = %departure.id, round_trip = arrival.is_some(), "Train selected");
        self.order.selected_train = Directional {
            departure: Some(departure),
            arrival,
        };
        Ok(())
    }

    fn direction_of_leg(&self, leg_id: &str) -> Option<Direction> {
        self.order
            .selected_train
            .iter()
            .find(|(_, leg)| leg.as_ref().is_some_and(|leg| leg.id == leg_id))
            .map(|(direction, _)| direction)
    }

    pub fn begin_seat_fetch(&mut self, leg_id: &str) -> CoreResult<SeatFetch> {
        let direction = self
            .direction_of_leg(leg_id)
            .ok_or_else(|| Rule::LegNotInOrder(leg_id.to_string()))?;

        let map = self.seat_maps.get_mut(direction);
        map.status = FetchStatus::Loading;
        map.error = None;
        Ok(SeatFetch {
            ticket: map.guard.issue(),
            direction,
            leg_id: leg_id.to_string(),
        })
    }

    /// Applies a seat-map response. A failure keeps the previous map and
    /// records the error. Returns false for superseded requests.
    pub fn complete_seat_fetch(&mut self, fetch: &SeatFetch, result: CoreResult<Vec<CoachSeatsBlock>>) -> bool {
        let map = self.seat_maps.get_mut(fetch.direction);
        if !map.guard.is_current(fetch.ticket) {
            warn!(leg = %fetch.leg_id, "Dropping stale seat map response");
            return false;
        }

        match result {
            Ok(blocks) => {
                info!(leg = %fetch.leg_id, direction = %fetch.direction, coaches = blocks.len(), "Seat map loaded");
                map.status = FetchStatus::Succeeded;
                *self.order.seats_data.get_mut(fetch.direction) = blocks;

                let classes = self.available_classes(fetch.direction);
                let active = self.order.coach_class.get_mut(fetch.direction);
                if !active.is_some_and(|class| classes.contains(&class)) {
                    *active = classes.first().copied();
                }
            }
            Err(e) => {
                warn!(leg = %fetch.leg_id, error = %e, "Seat map fetch failed");
                map.status = FetchStatus::Failed;
                map.error = Some(e.to_string());
            }
        }
        true
    }

    /// Loads the seat map of a selected leg, holding the machine across the call.
    pub async fn fetch_seats_for_leg(
        &mut self,
        leg_id: &str,
        repo: &dyn RouteRepository,
    ) -> CoreResult<Vec<CoachSeatsBlock>> {
        let fetch = self.begin_seat_fetch(leg_id)?;
        let result = repo.fetch_seats(leg_id).await;
        let outcome = result.clone();
        self.complete_seat_fetch(&fetch, result);
        outcome
    }

    // ---- seats ----

    /// Set semantics: a seat already present is removed. Returns whether the
    /// seat is selected afterwards.
    pub fn toggle_seat(&mut self, direction: Direction, seat: SelectedSeat) -> CoreResult<bool> {
        if self.order.passenger_count.seated() == 0 {
            debug!("Seat toggle rejected: no seated passengers");
            return Err(Rule::NoSeatedPassenger.into());
        }

        let seats = self.order.selected_seats.get_mut(direction);
        if let Some(pos) = seats.iter().position(|s| s.same_place(&seat)) {
            seats.remove(pos);
            Ok(false)
        } else {
            seats.push(seat);
            Ok(true)
        }
    }

    /// Toggles a seat by coach and number, pricing it from the seat map.
    pub fn pick_seat(&mut self, direction: Direction, coach_id: &str, seat_number: u32) -> CoreResult<bool> {
        let block = self
            .order
            .seats_data
            .get(direction)
            .iter()
            .find(|block| block.coach.id == coach_id)
            .ok_or_else(|| Rule::UnknownCoach(coach_id.to_string()))?;

        let available = block.seat(seat_number).is_some_and(|seat| seat.available);
        if !available {
            return Err(Rule::SeatUnavailable {
                coach_id: coach_id.to_string(),
                seat_number,
            }
            .into());
        }

        let price = seat_price(&block.coach, seat_number);
        self.toggle_seat(direction, SelectedSeat::new(coach_id, seat_number, price))
    }

    pub fn clear_section_seats(&mut self, direction: Direction) {
        self.order.selected_seats.get_mut(direction).clear();
    }

    /// Coach classes on the loaded seat map, in first-appearance order.
    pub fn available_classes(&self, direction: Direction) -> Vec<ClassType> {
        let mut classes = Vec::new();
        for block in self.order.seats_data.get(direction) {
            if !classes.contains(&block.coach.class_type) {
                classes.push(block.coach.class_type);
            }
        }
        classes
    }

    /// Classes present on the seat map, in tab order.
    pub fn class_tabs(&self, direction: Direction) -> Vec<ClassType> {
        let present = self.available_classes(direction);
        ClassType::DISPLAY_ORDER
            .into_iter()
            .filter(|class| present.contains(class))
            .collect()
    }

    /// Changing the class of a direction drops its seat selection.
    pub fn set_coach_class(&mut self, direction: Direction, class: ClassType) {
        let active = self.order.coach_class.get_mut(direction);
        if *active != Some(class) {
            *active = Some(class);
            self.clear_section_seats(direction);
        }
    }

    pub fn coach_class(&self, direction: Direction) -> Option<ClassType> {
        (*self.order.coach_class.get(direction)).or_else(|| self.available_classes(direction).first().copied())
    }

    /// Coaches of the active class.
    pub fn coaches_for(&self, direction: Direction) -> Vec<&CoachSeatsBlock> {
        let Some(class) = self.coach_class(direction) else {
            return Vec::new();
        };
        self.order
            .seats_data
            .get(direction)
            .iter()
            .filter(|block| block.coach.class_type == class)
            .collect()
    }

    pub fn set_filter_type(&mut self, class: ClassType) {
        self.order.filter_type = class;
    }

    // ---- services ----

    pub fn toggle_service(&mut self, coach_id: &str, service: CoachService) -> CoreResult<bool> {
        let coach = Direction::BOTH
            .iter()
            .flat_map(|direction| self.order.seats_data.get(*direction).iter())
            .map(|block| &block.coach)
            .find(|coach| coach.id == coach_id)
            .ok_or_else(|| Rule::UnknownCoach(coach_id.to_string()))?;

        let selected = self.order.selected_additional_options.toggle(coach, service)?;
        debug!(coach = coach_id, %service, selected, "Service toggled");
        Ok(selected)
    }

    // ---- passengers ----

    pub fn set_passenger_count(&mut self, kind: PassengerType, value: i64) -> CoreResult<()> {
        let value = u32::try_from(value).map_err(|_| Rule::InvalidCount)?;
        if value > MAX_PASSENGERS {
            debug!(value, "Passenger count rejected");
            return Err(Rule::PassengerLimitExceeded { max: MAX_PASSENGERS }.into());
        }
        let next = self.order.passenger_count.with(kind, value);
        if next.total() > MAX_PASSENGERS {
            debug!(total = next.total(), "Passenger count rejected");
            return Err(Rule::PassengerLimitExceeded { max: MAX_PASSENGERS }.into());
        }
        self.order.passenger_count = next;
        Ok(())
    }

    /// Raw form input; anything but a non-negative integer is rejected.
    pub fn set_passenger_count_input(&mut self, kind: PassengerType, raw: &str) -> CoreResult<()> {
        let value: i64 = raw.trim().parse().map_err(|_| Rule::InvalidCount)?;
        self.set_passenger_count(kind, value)
    }

    pub fn passenger_count(&self) -> PassengerCount {
        self.order.passenger_count
    }

    /// Records to edit on the passenger step: the committed list, or one blank
    /// per adult then per child. Never empty.
    pub fn draft_passengers(&self) -> Vec<Passenger> {
        if !self.order.passengers.is_empty() {
            return self.order.passengers.clone();
        }

        let count = self.order.passenger_count;
        let mut drafts: Vec<Passenger> = (0..count.adults)
            .map(|_| Passenger::blank(true))
            .chain((0..count.children).map(|_| Passenger::blank(false)))
            .collect();
        if drafts.is_empty() {
            drafts.push(Passenger::blank(true));
        }
        drafts
    }

    /// Validation report per record, in input order.
    pub fn validate_passengers(records: &[Passenger]) -> Vec<ValidationResult> {
        records.iter().map(validate_passenger).collect()
    }

    /// Replaces the passenger list when every record validates.
    pub fn commit_passengers(&mut self, records: Vec<Passenger>) -> CoreResult<()> {
        if records.is_empty() {
            return Err(CoreError::ValidationError(Field::Passengers));
        }

        let records: Vec<Passenger> = records.into_iter().map(Passenger::sanitized).collect();
        if let Some(field) = records
            .iter()
            .map(validate_passenger)
            .find_map(|result| result.errors.first().copied())
        {
            debug!(%field, "Passenger commit rejected");
            return Err(CoreError::ValidationError(field));
        }

        info!(count = records.len(), "Passengers committed");
        self.order.passengers = records;
        Ok(())
    }

    // ---- payer ----

    pub fn update_payer_field(&mut self, field: PayerField, value: &str) {
        self.order.payer.set_field(field, value);
    }

    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.order.payer.payment_method = method;
    }

    // ---- pricing ----

    /// Sticker price of every selected seat in both directions.
    pub fn compute_total_price(&self) -> f64 {
        self.order.selected_seats.iter().map(|(_, seats)| sticker_total(seats)).sum()
    }

    pub fn compute_allocated_price(&self) -> AllocatedPrice {
        let count = self.order.passenger_count;
        self.order
            .selected_seats
            .iter()
            .map(|(_, seats)| allocate(seats, count.adults, count.children, &self.fare_rules))
            .fold(AllocatedPrice::default(), |acc, price| acc + price)
    }

    pub fn compute_services_price(&self) -> f64 {
        self.service_charges().iter().map(CoachCharge::total).sum()
    }

    pub fn service_charges(&self) -> Vec<CoachCharge> {
        Direction::BOTH
            .iter()
            .flat_map(|direction| {
                service_charges(
                    self.order.seats_data.get(*direction),
                    self.order.selected_seats.get(*direction),
                    &self.order.selected_additional_options,
                )
            })
            .collect()
    }

    pub fn price_breakdown(&self) -> PriceBreakdown {
        let count = self.order.passenger_count;
        let directions: Vec<(&[CoachSeatsBlock], &[SelectedSeat])> = Direction::BOTH
            .iter()
            .map(|direction| {
                (
                    self.order.seats_data.get(*direction).as_slice(),
                    self.order.selected_seats.get(*direction).as_slice(),
                )
            })
            .collect();
        PriceBreakdown::compute(
            &directions,
            count.adults,
            count.children,
            &self.order.selected_additional_options,
            &self.fare_rules,
        )
    }

    // ---- steps ----

    pub fn can_proceed_from_seats(&self) -> bool {
        let any_seat = self.order.selected_seats.iter().any(|(_, seats)| !seats.is_empty());
        any_seat && self.order.passenger_count.seated() > 0
    }

    fn locked(&self, to: OrderStep) -> CoreError {
        Rule::StepLocked {
            from: self.step.to_string(),
            to: to.to_string(),
        }
        .into()
    }

    /// Requirement for entering `step` from the one before it.
    fn check_gate(&self, step: OrderStep) -> CoreResult<()> {
        match step {
            OrderStep::SelectingTrain => Ok(()),
            OrderStep::SelectingSeats => match self.order.selected_train.departure {
                Some(_) => Ok(()),
                None => Err(Rule::NoTrainSelected.into()),
            },
            OrderStep::EnteringPassengers => {
                if self.order.passenger_count.seated() == 0 {
                    Err(Rule::NoSeatedPassenger.into())
                } else if self.can_proceed_from_seats() {
                    Ok(())
                } else {
                    Err(self.locked(step))
                }
            }
            OrderStep::EnteringPayment => {
                if self.order.passengers.is_empty() {
                    return Err(CoreError::ValidationError(Field::Passengers));
                }
                match self
                    .order
                    .passengers
                    .iter()
                    .map(validate_passenger)
                    .find_map(|result| result.errors.first().copied())
                {
                    Some(field) => Err(CoreError::ValidationError(field)),
                    None => Ok(()),
                }
            }
            OrderStep::Verifying => match validate_payer(&self.order.payer).errors.first() {
                Some(field) => Err(CoreError::ValidationError(*field)),
                None => Ok(()),
            },
            OrderStep::Success => {
                if self.step == OrderStep::Verifying {
                    Ok(())
                } else {
                    Err(self.locked(step))
                }
            }
        }
    }

    /// Moves to `target`. Backward moves are free until the order succeeds;
    /// forward moves must pass the gate of every step on the way.
    pub fn advance_to(&mut self, target: OrderStep) -> CoreResult<()> {
        if target == self.step {
            return Ok(());
        }
        if self.step == OrderStep::Success {
            return Err(self.locked(target));
        }

        if target > self.step {
            for step in OrderStep::ALL.into_iter().filter(|s| *s > self.step && *s <= target) {
                if let Err(e) = self.check_gate(step) {
                    debug!(from = %self.step, to = %target, error = %e, "Step change rejected");
                    return Err(e);
                }
            }
        }

        info!(from = %self.step, to = %target, "Order step changed");
        self.step = target;
        Ok(())
    }

    /// Finalizes a verified order.
    pub fn confirm(&mut self) -> CoreResult<()> {
        self.advance_to(OrderStep::Success)
    }

    /// Starts over after a successful order.
    pub fn clear_order(&mut self) -> CoreResult<()> {
        if self.step != OrderStep::Success {
            return Err(Rule::OrderNotFinished.into());
        }
        info!("Order cleared");
        *self = Self::with_fare_rules(self.fare_rules.clone());
        Ok(())
    }
}
