//! Router assembly.

use std::any::Any;
use std::sync::Arc;

use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::handlers::{
    self, ROUTE_CREATE_DRAFT, ROUTE_CREATE_DRAFT_FROM_METHOD, ROUTE_PING,
};
use crate::state::AppState;

/// The full service router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(ROUTE_PING, get(handlers::ping))
        .route(ROUTE_CREATE_DRAFT, post(handlers::create_draft))
        .route(
            ROUTE_CREATE_DRAFT_FROM_METHOD,
            post(handlers::create_draft_from_method),
        )
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = detail, "handler panicked");
    ApiError::Internal(detail.to_string()).into_response()
}
