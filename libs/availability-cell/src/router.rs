use std::sync::Arc;

use axum::{
    Router,
    routing::get,
    middleware,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn availability_routes(state: Arc<AppConfig>) -> Router {
    // Anon role; RLS decides which rows are visible
    let public_routes = Router::new()
        .route("/{professional_id}/available-slots", get(handlers::get_available_slots_public));

    // Caller's token is forwarded to Supabase
    let protected_routes = Router::new()
        .route("/auth/{professional_id}/available-slots", get(handlers::get_available_slots))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
