use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use rail_catalog::{AdditionalOptions, CoachService, PriceBreakdown};
use rail_core::fetch::FetchStatus;
use rail_core::validation::ValidationResult;
use rail_core::{CoreError, Rule};
use rail_order::{
    validate_payer, OrderMachine, OrderStep, OrderSummary, Passenger, PassengerCount, PassengerType, Payer, PayerField,
};
use rail_shared::{ClassType, CoachSeatsBlock, Direction, Directional, PaymentMethod, SelectedSeat};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SelectTrainRequest {
    pub departure_leg_id: String,
}

#[derive(Debug, Deserialize)]
pub struct PassengerCountRequest {
    #[serde(rename = "type")]
    pub kind: PassengerType,
    /// Number or raw form text.
    pub value: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct CoachClassRequest {
    pub direction: Direction,
    pub class_type: ClassType,
}

#[derive(Debug, Deserialize)]
pub struct FilterTypeRequest {
    pub class_type: ClassType,
}

#[derive(Debug, Deserialize)]
pub struct PickSeatRequest {
    pub direction: Direction,
    pub coach_id: String,
    pub seat_number: u32,
}

#[derive(Debug, Deserialize)]
pub struct ToggleServiceRequest {
    pub coach_id: String,
    pub service: CoachService,
}

#[derive(Debug, Deserialize)]
pub struct PayerFieldRequest {
    pub field: PayerField,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct PaymentMethodRequest {
    pub method: PaymentMethod,
}

#[derive(Debug, Deserialize)]
pub struct StepRequest {
    pub step: OrderStep,
}

#[derive(Debug, Serialize)]
pub struct ClassTab {
    pub class_type: ClassType,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SeatMapView {
    pub status: FetchStatus,
    pub error: Option<String>,
    pub coach_class: Option<ClassType>,
    pub class_tabs: Vec<ClassTab>,
    pub coaches: Vec<CoachSeatsBlock>,
}

/// Seat step screen.
#[derive(Debug, Serialize)]
pub struct SeatsView {
    pub step: OrderStep,
    pub filter_type: ClassType,
    pub seat_maps: Directional<SeatMapView>,
    pub selected_seats: Directional<Vec<SelectedSeat>>,
    pub additional_options: AdditionalOptions,
    pub passenger_count: PassengerCount,
    pub can_proceed: bool,
    pub price: PriceBreakdown,
}

impl SeatsView {
    fn of(machine: &OrderMachine) -> Self {
        let map_view = |direction: Direction| {
            let status = machine.seat_map_status(direction);
            SeatMapView {
                status: status.status,
                error: status.error.clone(),
                coach_class: machine.coach_class(direction),
                class_tabs: machine
                    .class_tabs(direction)
                    .into_iter()
                    .map(|class_type| ClassTab { class_type, label: class_type.label() })
                    .collect(),
                coaches: machine.coaches_for(direction).into_iter().cloned().collect(),
            }
        };

        let order = machine.order();
        Self {
            step: machine.step(),
            filter_type: order.filter_type,
            seat_maps: Directional {
                departure: map_view(Direction::Departure),
                arrival: map_view(Direction::Arrival),
            },
            selected_seats: order.selected_seats.clone(),
            additional_options: order.selected_additional_options.clone(),
            passenger_count: order.passenger_count,
            can_proceed: machine.can_proceed_from_seats(),
            price: machine.price_breakdown(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PayerView {
    pub payer: Payer,
    pub validation: ValidationResult,
}

impl PayerView {
    fn of(machine: &OrderMachine) -> Self {
        let payer = machine.order().payer.clone();
        let validation = validate_payer(&payer);
        Self { payer, validation }
    }
}

#[derive(Debug, Serialize)]
pub struct StepView {
    pub step: OrderStep,
}

// ============================================================================
// Handlers
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/sessions/{id}/train", post(select_train))
        .route("/v1/sessions/{id}/passenger-count", put(set_passenger_count))
        .route("/v1/sessions/{id}/coach-class", put(set_coach_class))
        .route("/v1/sessions/{id}/filter-type", put(set_filter_type))
        .route("/v1/sessions/{id}/seats", post(pick_seat))
        .route("/v1/sessions/{id}/seats/{direction}", delete(clear_seats))
        .route("/v1/sessions/{id}/services", post(toggle_service))
        .route("/v1/sessions/{id}/passengers", get(draft_passengers).put(commit_passengers))
        .route("/v1/sessions/{id}/payer", put(update_payer))
        .route("/v1/sessions/{id}/payment-method", put(set_payment_method))
        .route("/v1/sessions/{id}/step", post(change_step))
        .route("/v1/sessions/{id}/summary", get(summary))
        .route("/v1/sessions/{id}/confirm", post(confirm))
        .route("/v1/sessions/{id}/finish", post(finish))
}

/// POST /v1/sessions/{id}/train
/// Picks a route from the listing and loads the seat map of each leg.
async fn select_train(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SelectTrainRequest>,
) -> Result<Json<SeatsView>, AppError> {
    let handle = state.sessions.get(id).await?;

    let fetches = {
        let mut session = handle.lock().await;
        let route = session
            .listing
            .find_route(&req.departure_leg_id)
            .cloned()
            .ok_or_else(|| AppError::RouteNotFound(req.departure_leg_id.clone()))?;

        let leg_ids: Vec<String> = std::iter::once(route.departure.id.clone())
            .chain(route.arrival.as_ref().map(|leg| leg.id.clone()))
            .collect();

        session.order.select_train(route.departure, route.arrival)?;
        session.order.advance_to(OrderStep::SelectingSeats)?;
        leg_ids
            .iter()
            .map(|leg_id| session.order.begin_seat_fetch(leg_id))
            .collect::<Result<Vec<_>, _>>()?
    };

    let mut results = Vec::with_capacity(fetches.len());
    for fetch in &fetches {
        results.push(state.repo.fetch_seats(&fetch.leg_id).await);
    }

    let mut session = handle.lock().await;
    let mut failure: Option<CoreError> = None;
    for (fetch, result) in fetches.iter().zip(results) {
        if let Err(e) = &result {
            failure.get_or_insert_with(|| e.clone());
        }
        session.order.complete_seat_fetch(fetch, result);
    }
    if let Some(e) = failure {
        return Err(e.into());
    }

    Ok(Json(SeatsView::of(&session.order)))
}

/// PUT /v1/sessions/{id}/passenger-count
async fn set_passenger_count(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<PassengerCountRequest>,
) -> Result<Json<PassengerCount>, AppError> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;

    match &req.value {
        serde_json::Value::Number(n) => {
            let value = n.as_i64().ok_or(CoreError::InvariantViolation(Rule::InvalidCount))?;
            session.order.set_passenger_count(req.kind, value)?;
        }
        serde_json::Value::String(raw) => session.order.set_passenger_count_input(req.kind, raw)?,
        other => return Err(AppError::BadRequest(format!("passenger count must be a number, got {other}"))),
    }

    Ok(Json(session.order.passenger_count()))
}

/// PUT /v1/sessions/{id}/coach-class
async fn set_coach_class(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CoachClassRequest>,
) -> Result<Json<SeatsView>, AppError> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;
    session.order.set_coach_class(req.direction, req.class_type);
    Ok(Json(SeatsView::of(&session.order)))
}

/// PUT /v1/sessions/{id}/filter-type
async fn set_filter_type(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<FilterTypeRequest>,
) -> Result<Json<SeatsView>, AppError> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;
    session.order.set_filter_type(req.class_type);
    Ok(Json(SeatsView::of(&session.order)))
}

/// POST /v1/sessions/{id}/seats
async fn pick_seat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<PickSeatRequest>,
) -> Result<Json<SeatsView>, AppError> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;
    session.order.pick_seat(req.direction, &req.coach_id, req.seat_number)?;
    Ok(Json(SeatsView::of(&session.order)))
}

/// DELETE /v1/sessions/{id}/seats/{direction}
async fn clear_seats(
    State(state): State<AppState>,
    Path((id, direction)): Path<(Uuid, Direction)>,
) -> Result<Json<SeatsView>, AppError> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;
    session.order.clear_section_seats(direction);
    Ok(Json(SeatsView::of(&session.order)))
}

/// POST /v1/sessions/{id}/services
async fn toggle_service(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ToggleServiceRequest>,
) -> Result<Json<SeatsView>, AppError> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;
    session.order.toggle_service(&req.coach_id, req.service)?;
    Ok(Json(SeatsView::of(&session.order)))
}

/// GET /v1/sessions/{id}/passengers
async fn draft_passengers(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Passenger>>, AppError> {
    let handle = state.sessions.get(id).await?;
    let session = handle.lock().await;
    Ok(Json(session.order.draft_passengers()))
}

/// PUT /v1/sessions/{id}/passengers
/// Sanitizes and validates every record; commits only when all pass.
async fn commit_passengers(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(records): Json<Vec<Passenger>>,
) -> Result<Json<Vec<Passenger>>, AppError> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;

    let records: Vec<Passenger> = records.into_iter().map(Passenger::sanitized).collect();
    let report = OrderMachine::validate_passengers(&records);
    if report.iter().any(|result| !result.is_valid()) {
        return Err(AppError::InvalidPassengers(report));
    }

    session.order.commit_passengers(records)?;
    Ok(Json(session.order.order().passengers.clone()))
}

/// PUT /v1/sessions/{id}/payer
async fn update_payer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<PayerFieldRequest>,
) -> Result<Json<PayerView>, AppError> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;
    session.order.update_payer_field(req.field, &req.value);
    Ok(Json(PayerView::of(&session.order)))
}

/// PUT /v1/sessions/{id}/payment-method
async fn set_payment_method(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<PaymentMethodRequest>,
) -> Result<Json<PayerView>, AppError> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;
    session.order.set_payment_method(req.method);
    Ok(Json(PayerView::of(&session.order)))
}

/// POST /v1/sessions/{id}/step
async fn change_step(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<StepRequest>,
) -> Result<Json<StepView>, AppError> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;
    session.order.advance_to(req.step)?;
    Ok(Json(StepView { step: session.order.step() }))
}

/// GET /v1/sessions/{id}/summary
async fn summary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderSummary>, AppError> {
    let handle = state.sessions.get(id).await?;
    let session = handle.lock().await;
    Ok(Json(OrderSummary::build(&session.order, &state.settings.tz)))
}

/// POST /v1/sessions/{id}/confirm
/// Verifying -> Success. Returns the final summary.
async fn confirm(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderSummary>, AppError> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;
    session.order.confirm()?;
    tracing::info!(session = %id, "Order confirmed");
    Ok(Json(OrderSummary::build(&session.order, &state.settings.tz)))
}

/// POST /v1/sessions/{id}/finish
async fn finish(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StepView>, AppError> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;
    session.order.clear_order()?;
    Ok(Json(StepView { step: session.order.step() }))
}
