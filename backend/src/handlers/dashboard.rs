//! HTTP handlers for role dashboards

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::DashboardService;
use crate::AppState;
use shared::{OfficialDashboard, OwnerDashboard, UserRole};

pub async fn get_official_dashboard(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<OfficialDashboard>> {
    current_user.0.require_role(UserRole::Official)?;
    let service = DashboardService::new(state.db);
    Ok(Json(service.official().await?))
}

pub async fn get_owner_dashboard(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<OwnerDashboard>> {
    current_user.0.require_role(UserRole::Owner)?;
    let service = DashboardService::new(state.db);
    Ok(Json(service.owner(current_user.0.user_id).await?))
}
