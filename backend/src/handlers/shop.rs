//! HTTP handlers for shop endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::shop::{
    ChangeStatusInput, OverrideScoreInput, QuestionnaireResult, RegisterShopInput, ShopFilter,
    UpdateShopInput,
};
use crate::services::{ActivityService, ShopService};
use crate::AppState;
use shared::{Activity, ComplianceQuestionnaireAnswers, GeoPoint, NearbyShop, Shop, UserRole};

/// Register a shop (owners)
pub async fn register_shop(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<RegisterShopInput>,
) -> AppResult<Json<Shop>> {
    current_user.0.require_role(UserRole::Owner)?;
    let service = ShopService::new(state.db);
    let shop = service.register_shop(current_user.0.user_id, input).await?;
    Ok(Json(shop))
}

/// List all shops (officials)
pub async fn list_shops(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(filter): Query<ShopFilter>,
) -> AppResult<Json<Vec<Shop>>> {
    current_user.0.require_role(UserRole::Official)?;
    let service = ShopService::new(state.db);
    let shops = service.list_shops(&filter).await?;
    Ok(Json(shops))
}

/// List the caller's own shops (owners)
pub async fn list_my_shops(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Shop>>> {
    current_user.0.require_role(UserRole::Owner)?;
    let service = ShopService::new(state.db);
    let filter = ShopFilter {
        owner_id: Some(current_user.0.user_id),
        ..ShopFilter::default()
    };
    let shops = service.list_shops(&filter).await?;
    Ok(Json(shops))
}

/// Query parameters for the nearby search
#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius_km: Option<f64>,
}

/// Find approved shops near a location (any role)
pub async fn find_nearby_shops(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<NearbyQuery>,
) -> AppResult<Json<Vec<NearbyShop>>> {
    let location = match (query.latitude, query.longitude) {
        (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
        _ => None,
    };
    let radius_km = query
        .radius_km
        .unwrap_or(state.config.portal.nearby_radius_km);

    let service = ShopService::new(state.db);
    let shops = service.find_nearby(location, radius_km).await?;
    Ok(Json(shops))
}

/// Get a shop by ID
pub async fn get_shop(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(shop_id): Path<Uuid>,
) -> AppResult<Json<Shop>> {
    let service = ShopService::new(state.db);
    let shop = service.get_visible_shop(&current_user.0, shop_id).await?;
    Ok(Json(shop))
}

/// Update a shop's profile (owners)
pub async fn update_shop(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(shop_id): Path<Uuid>,
    Json(input): Json<UpdateShopInput>,
) -> AppResult<Json<Shop>> {
    current_user.0.require_role(UserRole::Owner)?;
    let service = ShopService::new(state.db);
    let shop = service
        .update_shop(current_user.0.user_id, shop_id, input)
        .await?;
    Ok(Json(shop))
}

/// Approve, reject, suspend or reinstate a shop (officials)
pub async fn change_shop_status(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(shop_id): Path<Uuid>,
    Json(input): Json<ChangeStatusInput>,
) -> AppResult<Json<Shop>> {
    current_user.0.require_role(UserRole::Official)?;
    let service = ShopService::new(state.db);
    let shop = service
        .change_status(current_user.0.user_id, shop_id, input)
        .await?;
    Ok(Json(shop))
}

/// Submit the compliance questionnaire (owners)
pub async fn submit_questionnaire(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(shop_id): Path<Uuid>,
    Json(answers): Json<ComplianceQuestionnaireAnswers>,
) -> AppResult<Json<QuestionnaireResult>> {
    current_user.0.require_role(UserRole::Owner)?;
    let service = ShopService::new(state.db);
    let result = service
        .submit_questionnaire(current_user.0.user_id, shop_id, answers)
        .await?;
    Ok(Json(result))
}

/// Set a shop's compliance score manually (officials)
pub async fn override_compliance_score(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(shop_id): Path<Uuid>,
    Json(input): Json<OverrideScoreInput>,
) -> AppResult<Json<Shop>> {
    current_user.0.require_role(UserRole::Official)?;
    let service = ShopService::new(state.db);
    let shop = service
        .override_compliance_score(current_user.0.user_id, shop_id, input)
        .await?;
    Ok(Json(shop))
}

/// Activity log of a shop (its owner or officials)
pub async fn list_shop_activities(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(shop_id): Path<Uuid>,
) -> AppResult<Json<Vec<Activity>>> {
    current_user
        .0
        .require_any_role(&[UserRole::Owner, UserRole::Official])?;
    let shops = ShopService::new(state.db.clone());
    shops.get_visible_shop(&current_user.0, shop_id).await?;

    let service = ActivityService::new(state.db);
    let activities = service.list_for_shop(shop_id).await?;
    Ok(Json(activities))
}
