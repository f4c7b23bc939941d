use axum::{http::Method, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod bags;
pub mod error;
pub mod flights;
pub mod messages;
pub mod middleware;
pub mod passengers;
pub mod staff;
pub mod state;
pub mod tracking;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    // CORS Middleware
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    // Everything except login and passenger tracking requires a verified
    // staff token
    let protected = Router::new()
        .merge(auth::protected_routes())
        .merge(flights::routes())
        .merge(passengers::routes())
        .merge(bags::routes())
        .merge(messages::routes())
        .merge(staff::routes())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::staff_auth_middleware,
        ));

    Router::new()
        .merge(auth::public_routes())
        .merge(tracking::routes())
        .merge(protected)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
