//! Health check and public settings handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    // Check database connectivity
    let db_status = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => "connected".to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "database health check failed");
            "disconnected".to_string()
        }
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
    })
}

/// Settings the browser client needs before sign-in
#[derive(Serialize)]
pub struct PortalSettings {
    pub nearby_radius_km: f64,
    pub session_timeout_minutes: i64,
}

pub async fn get_portal_settings(State(state): State<AppState>) -> Json<PortalSettings> {
    Json(PortalSettings {
        nearby_radius_km: state.config.portal.nearby_radius_km,
        session_timeout_minutes: state.config.portal.session_timeout_minutes,
    })
}
