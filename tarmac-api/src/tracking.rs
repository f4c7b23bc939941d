use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tarmac_domain::{Bag, Passenger};

use crate::{error::AppError, state::AppState};

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct TrackingRequest {
    pub passenger_id: String,
    pub ticket_number: String,
}

#[derive(Debug, Serialize)]
pub struct TrackingResponse {
    pub passenger: Passenger,
    pub bags: Vec<Bag>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/tracking", post(track_bags))
}

/// Passenger self-service, no staff token: the id + ticket pair printed on
/// the travel documents unlocks that passenger's own bags and timelines.
async fn track_bags(
    State(state): State<AppState>,
    Json(request): Json<TrackingRequest>,
) -> Result<Json<TrackingResponse>, AppError> {
    let passenger = state
        .passengers
        .verify_ticket(&request.passenger_id, &request.ticket_number)?;
    let bags = state.bags.bags_by_passenger(&passenger.id);
    Ok(Json(TrackingResponse { passenger, bags }))
}
