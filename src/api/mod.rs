pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::CorsLayer,
    trace::TraceLayer,
};
use std::sync::Arc;

use crate::service::ServiceContext;
use state::AppState;

pub fn create_app(service_context: Arc<ServiceContext>) -> Router {
    let app_state = AppState::new(service_context);

    Router::new()
        .route("/health", get(handlers::root::health_check))
        .nest("/announcements", announcement_routes(app_state.clone()))
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn announcement_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/recent", get(handlers::announcements::recent))
        .route("/current", get(handlers::announcements::current))
        .route("/mark_as_read", post(handlers::announcements::mark_as_read))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth::optional_auth,
        ))
}
