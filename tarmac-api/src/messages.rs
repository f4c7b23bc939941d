use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use tarmac_domain::{Board, Message, MessagePayload, Priority, Role};
use tarmac_messaging::MessageDraft;
use tarmac_registry::{ActorContext, RegistryError};
use uuid::Uuid;

use crate::{error::AppError, state::AppState};

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct PostNoteRequest {
    pub content: String,
    pub priority: Option<Priority>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/messages/{board}", get(list_messages).post(post_note))
        .route("/messages/{board}/{id}", axum::routing::delete(delete_message))
        .route("/messages/airline/{id}/escalate", post(escalate_violation))
        .route("/messages/admin/{id}/process-removal", post(process_removal))
}

/// Each role reads its own board; the admin reads any. Airline staff see
/// only their airline's messages.
fn board_for(actor: &ActorContext, board: Board) -> Result<(), AppError> {
    let allowed = match board {
        Board::Airline => matches!(actor.role, Role::Admin | Role::AirlineStaff),
        Board::Gate => matches!(actor.role, Role::Admin | Role::GateStaff),
        Board::Ground => matches!(actor.role, Role::Admin | Role::GroundStaff),
        Board::Admin => actor.role == Role::Admin,
    };
    if allowed {
        Ok(())
    } else {
        Err(RegistryError::ScopeViolation.into())
    }
}

async fn list_messages(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(board): Path<Board>,
) -> Result<Json<Vec<Message>>, AppError> {
    board_for(&actor, board)?;
    let messages = match (board, actor.airline.as_deref()) {
        (Board::Airline, Some(airline)) if actor.role == Role::AirlineStaff => {
            state.bus.list_by_board_and_scope(board, airline)
        }
        _ => state.bus.list_by_board(board),
    };
    Ok(Json(messages))
}

async fn post_note(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(board): Path<Board>,
    Json(request): Json<PostNoteRequest>,
) -> Result<Json<Message>, AppError> {
    let message = state.bus.post(
        board,
        MessageDraft {
            author: actor.username.clone(),
            airline: actor.airline.clone(),
            payload: MessagePayload::Note {
                content: request.content,
            },
            priority: request.priority.unwrap_or(Priority::Normal),
        },
    )?;
    Ok(Json(message))
}

/// Acknowledge a processed message. Airline-scoped acknowledgment and
/// idempotency live in the coordinator.
async fn delete_message(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path((board, message_id)): Path<(Board, Uuid)>,
) -> Result<Json<serde_json::Value>, AppError> {
    board_for(&actor, board)?;
    state.coordinator.acknowledge_message(&actor, board, message_id)?;
    Ok(Json(serde_json::json!({ "deleted": message_id })))
}

async fn escalate_violation(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(message_id): Path<Uuid>,
) -> Result<Json<Message>, AppError> {
    let escalation = state
        .coordinator
        .escalate_security_violation(&actor, message_id)?;
    Ok(Json(escalation))
}

async fn process_removal(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(message_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.coordinator.process_removal_request(&actor, message_id)?;
    Ok(Json(serde_json::json!({ "processed": message_id })))
}
