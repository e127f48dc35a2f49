use axum::Router;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{advisor::Advisor, proxy, web};

#[derive(Clone)]
pub struct AppState {
    pub advisor: Advisor,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // JSON proxy endpoints
        .merge(proxy::router())
        // Server-rendered form
        .merge(web::router())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods(Any),
        )
        .with_state(state)
}
