use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Extension, Json, Router,
};
use serde::Deserialize;
use tarmac_domain::{Bag, BagLocation, Role};
use tarmac_registry::ActorContext;

use crate::{error::AppError, state::AppState};

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AddBagRequest {
    pub bag_id: String,
    pub ticket_number: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateLocationRequest {
    pub location: BagLocation,
}

#[derive(Debug, Deserialize)]
pub struct BagFilter {
    pub flight_id: Option<String>,
    pub passenger_id: Option<String>,
    pub location: Option<BagLocation>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bags", get(list_bags).post(add_bag))
        .route("/bags/{id}", get(get_bag))
        .route("/bags/{id}/location", put(update_location))
}

async fn list_bags(
    State(state): State<AppState>,
    Query(filter): Query<BagFilter>,
) -> Json<Vec<Bag>> {
    let bags = if let Some(flight_id) = filter.flight_id.as_deref() {
        state.bags.bags_by_flight(flight_id)
    } else if let Some(passenger_id) = filter.passenger_id.as_deref() {
        state.bags.bags_by_passenger(passenger_id)
    } else if let Some(location) = filter.location {
        state.bags.bags_by_location(location)
    } else {
        state.bags.list()
    };
    Json(bags)
}

async fn add_bag(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Json(request): Json<AddBagRequest>,
) -> Result<Json<Bag>, AppError> {
    actor.require_role(&[Role::Admin, Role::AirlineStaff])?;
    if let Some(passenger) = state.passengers.find_by_ticket(&request.ticket_number) {
        let flight = state.flights.get(&passenger.flight_id)?;
        actor.require_airline(&flight.airline)?;
    }

    let bag = state
        .bags
        .add_bag(&request.bag_id, &request.ticket_number, actor.staff_id)?;
    Ok(Json(bag))
}

async fn get_bag(
    State(state): State<AppState>,
    Path(bag_id): Path<String>,
) -> Result<Json<Bag>, AppError> {
    Ok(Json(state.bags.get(&bag_id)?))
}

/// Ground staff move bags through the pipeline. Flagging a violation runs
/// through the coordinator so the airline board is alerted in the same step.
async fn update_location(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(bag_id): Path<String>,
    Json(request): Json<UpdateLocationRequest>,
) -> Result<Json<Bag>, AppError> {
    actor.require_role(&[Role::Admin, Role::GroundStaff])?;

    if request.location == BagLocation::SecurityViolation {
        state.coordinator.flag_security_violation(&actor, &bag_id)?;
        return Ok(Json(state.bags.get(&bag_id)?));
    }

    let bag = state
        .bags
        .update_location(&bag_id, request.location, actor.staff_id)?;
    Ok(Json(bag))
}
