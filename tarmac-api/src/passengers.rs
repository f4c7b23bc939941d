use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use tarmac_domain::{Passenger, Role};
use tarmac_registry::{ActorContext, NewPassenger};

use crate::{error::AppError, state::AppState};

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreatePassengerRequest {
    pub id: String,
    pub name: String,
    pub ticket_number: String,
    pub flight_id: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PassengerFilter {
    pub flight_id: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/passengers", get(list_passengers).post(create_passenger))
        .route("/passengers/{id}", get(get_passenger).delete(remove_passenger))
        .route("/passengers/{id}/check-in", post(check_in))
        .route("/passengers/{id}/board", post(board))
}

async fn list_passengers(
    State(state): State<AppState>,
    Query(filter): Query<PassengerFilter>,
) -> Json<Vec<Passenger>> {
    let passengers = match filter.flight_id.as_deref() {
        Some(flight_id) => state.passengers.list_by_flight(flight_id),
        None => state.passengers.list(),
    };
    Json(passengers)
}

async fn create_passenger(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Json(request): Json<CreatePassengerRequest>,
) -> Result<Json<Passenger>, AppError> {
    actor.require_role(&[Role::Admin, Role::AirlineStaff])?;
    let flight = state.flights.get(&request.flight_id)?;
    actor.require_airline(&flight.airline)?;

    let passenger = state.passengers.create_passenger(NewPassenger {
        id: request.id,
        name: request.name,
        ticket_number: request.ticket_number,
        flight_id: request.flight_id,
        email: request.email,
        phone: request.phone,
    })?;
    Ok(Json(passenger))
}

async fn get_passenger(
    State(state): State<AppState>,
    Path(passenger_id): Path<String>,
) -> Result<Json<Passenger>, AppError> {
    Ok(Json(state.passengers.get(&passenger_id)?))
}

/// Direct removal is the administrator's workflow step; other roles go
/// through the message-board escalation.
async fn remove_passenger(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(passenger_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    actor.require_role(&[Role::Admin])?;
    state.passengers.remove_passenger(&passenger_id)?;
    Ok(Json(serde_json::json!({ "removed": passenger_id })))
}

async fn check_in(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(passenger_id): Path<String>,
) -> Result<Json<Passenger>, AppError> {
    Ok(Json(state.coordinator.check_in(&actor, &passenger_id)?))
}

async fn board(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(passenger_id): Path<String>,
) -> Result<Json<Passenger>, AppError> {
    Ok(Json(state.coordinator.board_passenger(&actor, &passenger_id)?))
}
