use axum::{
    extract::{Path, State},
    routing::{get, put},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tarmac_domain::{Flight, FlightStatus, Role};
use tarmac_registry::{ActorContext, NewFlight};
use tarmac_workflow::DepartureReadiness;

use crate::{error::AppError, state::AppState};

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateFlightRequest {
    pub airline: String,
    pub flight_number: String,
    pub gate: String,
    pub destination: String,
    pub departure_time: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: FlightStatus,
}

#[derive(Debug, Deserialize)]
pub struct ChangeGateRequest {
    pub gate: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/flights", get(list_flights).post(create_flight))
        .route("/flights/{id}", get(get_flight).delete(remove_flight))
        .route("/flights/{id}/status", put(update_status))
        .route("/flights/{id}/gate", put(change_gate))
        .route("/flights/{id}/departure-readiness", get(departure_readiness))
}

async fn list_flights(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
) -> Json<Vec<Flight>> {
    // Airline-scoped staff see their own airline's schedule only
    let flights = match actor.airline.as_deref() {
        Some(airline) if actor.role.requires_airline() => state.flights.list_by_airline(airline),
        _ => state.flights.list(),
    };
    Json(flights)
}

async fn create_flight(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Json(request): Json<CreateFlightRequest>,
) -> Result<Json<Flight>, AppError> {
    actor.require_role(&[Role::Admin])?;
    let flight = state.flights.create_flight(NewFlight {
        airline: request.airline,
        flight_number: request.flight_number,
        gate: request.gate,
        destination: request.destination,
        departure_time: request.departure_time,
    })?;
    Ok(Json(flight))
}

async fn get_flight(
    State(state): State<AppState>,
    Path(flight_id): Path<String>,
) -> Result<Json<Flight>, AppError> {
    Ok(Json(state.flights.get(&flight_id)?))
}

async fn remove_flight(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(flight_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    actor.require_role(&[Role::Admin])?;
    state.flights.remove_flight(&flight_id)?;
    Ok(Json(serde_json::json!({ "removed": flight_id })))
}

async fn update_status(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(flight_id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Flight>, AppError> {
    actor.require_role(&[Role::Admin, Role::GateStaff])?;
    let flight = state.flights.get(&flight_id)?;
    actor.require_airline(&flight.airline)?;
    Ok(Json(state.flights.update_status(&flight_id, request.status)?))
}

async fn change_gate(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(flight_id): Path<String>,
    Json(request): Json<ChangeGateRequest>,
) -> Result<Json<Flight>, AppError> {
    state.coordinator.change_gate(&actor, &flight_id, &request.gate)?;
    Ok(Json(state.flights.get(&flight_id)?))
}

async fn departure_readiness(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(flight_id): Path<String>,
) -> Result<Json<DepartureReadiness>, AppError> {
    Ok(Json(state.coordinator.departure_readiness(&actor, &flight_id)?))
}
