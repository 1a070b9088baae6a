//! HTTP handlers for inspection endpoints (officials only)

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::inspection::{
    CompleteInspectionInput, InspectionFilter, ScheduleInspectionInput,
};
use crate::services::InspectionService;
use crate::AppState;
use shared::{Inspection, UserRole};

/// Schedule an inspection
pub async fn schedule_inspection(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<ScheduleInspectionInput>,
) -> AppResult<Json<Inspection>> {
    current_user.0.require_role(UserRole::Official)?;
    let service = InspectionService::new(state.db);
    let inspection = service.schedule(current_user.0.user_id, input).await?;
    Ok(Json(inspection))
}

/// List inspections
pub async fn list_inspections(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(filter): Query<InspectionFilter>,
) -> AppResult<Json<Vec<Inspection>>> {
    current_user.0.require_role(UserRole::Official)?;
    let service = InspectionService::new(state.db);
    let inspections = service.list(&filter).await?;
    Ok(Json(inspections))
}

/// Get an inspection by ID
pub async fn get_inspection(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(inspection_id): Path<Uuid>,
) -> AppResult<Json<Inspection>> {
    current_user.0.require_role(UserRole::Official)?;
    let service = InspectionService::new(state.db);
    let inspection = service.get(inspection_id).await?;
    Ok(Json(inspection))
}

/// Start an inspection
pub async fn start_inspection(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(inspection_id): Path<Uuid>,
) -> AppResult<Json<Inspection>> {
    current_user.0.require_role(UserRole::Official)?;
    let service = InspectionService::new(state.db);
    let inspection = service.start(inspection_id).await?;
    Ok(Json(inspection))
}

/// Record an inspection's result
pub async fn complete_inspection(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(inspection_id): Path<Uuid>,
    Json(input): Json<CompleteInspectionInput>,
) -> AppResult<Json<Inspection>> {
    current_user.0.require_role(UserRole::Official)?;
    let service = InspectionService::new(state.db);
    let inspection = service
        .complete(current_user.0.user_id, inspection_id, input)
        .await?;
    Ok(Json(inspection))
}

/// Cancel an inspection
pub async fn cancel_inspection(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(inspection_id): Path<Uuid>,
) -> AppResult<Json<Inspection>> {
    current_user.0.require_role(UserRole::Official)?;
    let service = InspectionService::new(state.db);
    let inspection = service.cancel(inspection_id).await?;
    Ok(Json(inspection))
}
