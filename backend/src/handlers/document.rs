//! HTTP handlers for document endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::document::{RecordDocumentInput, ReviewDocumentInput};
use crate::services::{DocumentService, ShopService};
use crate::AppState;
use shared::{Document, UserRole};

/// Record a document uploaded for the caller's shop (owners)
pub async fn record_document(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(shop_id): Path<Uuid>,
    Json(input): Json<RecordDocumentInput>,
) -> AppResult<Json<Document>> {
    current_user.0.require_role(UserRole::Owner)?;
    let shops = ShopService::new(state.db.clone());
    shops.get_owned_shop(current_user.0.user_id, shop_id).await?;

    let service = DocumentService::new(state.db);
    let document = service
        .record_upload(current_user.0.user_id, shop_id, input)
        .await?;
    Ok(Json(document))
}

/// List a shop's documents (its owner or officials)
pub async fn list_documents(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(shop_id): Path<Uuid>,
) -> AppResult<Json<Vec<Document>>> {
    current_user
        .0
        .require_any_role(&[UserRole::Owner, UserRole::Official])?;
    let shops = ShopService::new(state.db.clone());
    shops.get_visible_shop(&current_user.0, shop_id).await?;

    let service = DocumentService::new(state.db);
    let documents = service.list_for_shop(shop_id).await?;
    Ok(Json(documents))
}

/// Approve or reject a document (officials)
pub async fn review_document(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(document_id): Path<Uuid>,
    Json(input): Json<ReviewDocumentInput>,
) -> AppResult<Json<Document>> {
    current_user.0.require_role(UserRole::Official)?;
    let service = DocumentService::new(state.db);
    let document = service
        .review(current_user.0.user_id, document_id, input)
        .await?;
    Ok(Json(document))
}
