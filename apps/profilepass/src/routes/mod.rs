pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::passwords::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/passwords",
            post(handlers::handle_generate_passwords),
        )
        .with_state(state)
}
