use axum::{
    routing::{get, post},
    Router,
};

use crate::app::AppState;

pub mod error;
pub mod handlers;

pub use error::ApiError;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/fetch-recommendations", post(handlers::fetch_recommendations))
        .route("/fetch-exercise-plan", post(handlers::fetch_exercise_plan))
        .route("/health", get(handlers::health))
}
