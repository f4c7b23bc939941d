use axum::{
    extract::{Path, State},
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use tarmac_domain::{Role, StaffMember};
use tarmac_registry::{ActorContext, NewStaff};
use uuid::Uuid;

use crate::{error::AppError, state::AppState};

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateStaffRequest {
    pub name: String,
    pub role: Role,
    pub airline: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Staff record without the password hash.
#[derive(Debug, Serialize)]
pub struct StaffView {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub role: Role,
    pub airline: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub must_change_password: bool,
}

impl From<StaffMember> for StaffView {
    fn from(staff: StaffMember) -> Self {
        Self {
            id: staff.id,
            username: staff.username,
            name: staff.name,
            role: staff.role,
            airline: staff.airline,
            email: staff.email,
            phone: staff.phone,
            must_change_password: staff.must_change_password,
        }
    }
}

/// The plain password appears here once and is never retrievable again.
#[derive(Debug, Serialize)]
pub struct IssuedCredentialsResponse {
    pub staff: StaffView,
    pub password: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/staff", get(list_staff).post(create_staff))
        .route("/staff/{id}", get(get_staff).delete(remove_staff))
}

async fn list_staff(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
) -> Result<Json<Vec<StaffView>>, AppError> {
    actor.require_role(&[Role::Admin])?;
    let staff = state.staff.list().into_iter().map(StaffView::from).collect();
    Ok(Json(staff))
}

async fn create_staff(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Json(request): Json<CreateStaffRequest>,
) -> Result<Json<IssuedCredentialsResponse>, AppError> {
    actor.require_role(&[Role::Admin])?;
    let issued = state.staff.create_staff(NewStaff {
        name: request.name,
        role: request.role,
        airline: request.airline,
        email: request.email,
        phone: request.phone,
    })?;
    Ok(Json(IssuedCredentialsResponse {
        staff: issued.staff.into(),
        password: issued.password,
    }))
}

async fn get_staff(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(staff_id): Path<Uuid>,
) -> Result<Json<StaffView>, AppError> {
    actor.require_role(&[Role::Admin])?;
    Ok(Json(state.staff.get(staff_id)?.into()))
}

async fn remove_staff(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(staff_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    actor.require_role(&[Role::Admin])?;
    state.staff.remove_staff(staff_id)?;
    Ok(Json(serde_json::json!({ "removed": staff_id })))
}
