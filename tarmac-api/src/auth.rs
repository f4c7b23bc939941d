use axum::{extract::State, routing::post, Extension, Json, Router};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tarmac_registry::ActorContext;

use crate::{error::AppError, middleware::auth::StaffClaims, state::AppState};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub must_change_password: bool,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

pub fn public_routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/auth/password", post(change_password))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let staff = state
        .staff
        .verify_login(&request.username, &request.password)?;

    let claims = StaffClaims {
        sub: staff.id,
        username: staff.username,
        role: staff.role,
        airline: staff.airline,
        exp: (Utc::now() + Duration::seconds(state.auth.expiration as i64)).timestamp() as usize,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.auth.secret.as_bytes()),
    )
    .map_err(|e| AppError::AuthenticationError(format!("Token encoding failed: {}", e)))?;

    Ok(Json(LoginResponse {
        token,
        must_change_password: staff.must_change_password,
    }))
}

async fn change_password(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    state
        .staff
        .change_password(actor.staff_id, &request.current_password, &request.new_password)?;
    Ok(Json(serde_json::json!({ "changed": true })))
}
