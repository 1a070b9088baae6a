//! Route definitions for the Spaza Compliance Portal

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Client settings (public)
        .route("/settings", get(handlers::get_portal_settings))
        // Protected routes - shop registration and verification
        .nest("/shops", shop_routes(state.clone()))
        // Protected routes - document review
        .nest("/documents", document_routes(state.clone()))
        // Protected routes - inspections
        .nest("/inspections", inspection_routes(state.clone()))
        // Protected routes - dashboards
        .nest("/dashboard", dashboard_routes(state))
}

/// Shop routes (protected)
fn shop_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_shops).post(handlers::register_shop))
        .route("/mine", get(handlers::list_my_shops))
        .route("/nearby", get(handlers::find_nearby_shops))
        .route(
            "/:shop_id",
            get(handlers::get_shop).put(handlers::update_shop),
        )
        .route("/:shop_id/status", post(handlers::change_shop_status))
        .route("/:shop_id/questionnaire", post(handlers::submit_questionnaire))
        .route(
            "/:shop_id/compliance-score",
            put(handlers::override_compliance_score),
        )
        .route("/:shop_id/activities", get(handlers::list_shop_activities))
        .route(
            "/:shop_id/documents",
            get(handlers::list_documents).post(handlers::record_document),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Document routes (protected)
fn document_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/:document_id/review", post(handlers::review_document))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Inspection routes (protected)
fn inspection_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_inspections).post(handlers::schedule_inspection),
        )
        .route("/:inspection_id", get(handlers::get_inspection))
        .route("/:inspection_id/start", post(handlers::start_inspection))
        .route("/:inspection_id/complete", post(handlers::complete_inspection))
        .route("/:inspection_id/cancel", post(handlers::cancel_inspection))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Dashboard routes (protected)
fn dashboard_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/official", get(handlers::get_official_dashboard))
        .route("/owner", get(handlers::get_owner_dashboard))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
