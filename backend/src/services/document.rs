//! Supporting document records and their review

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::services::activity::record_activity;
use shared::{ActivityType, Document, DocumentStatus, DocumentType};

#[derive(Clone)]
pub struct DocumentService {
    db: PgPool,
}

const DOCUMENT_COLUMNS: &str = r#"
    id, shop_id, document_type, file_name, storage_path, status, uploaded_at, reviewed_at
"#;

#[derive(Debug, sqlx::FromRow)]
struct DocumentRow {
    id: Uuid,
    shop_id: Uuid,
    document_type: String,
    file_name: String,
    storage_path: String,
    status: String,
    uploaded_at: DateTime<Utc>,
    reviewed_at: Option<DateTime<Utc>>,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        Document {
            id: row.id,
            shop_id: row.shop_id,
            document_type: DocumentType::parse(&row.document_type),
            file_name: row.file_name,
            storage_path: row.storage_path,
            status: DocumentStatus::parse(&row.status).unwrap_or_else(|| {
                tracing::warn!(document_id = %row.id, status = %row.status, "unknown document status, treating as pending");
                DocumentStatus::Pending
            }),
            uploaded_at: row.uploaded_at,
            reviewed_at: row.reviewed_at,
        }
    }
}

/// Input describing a file already placed in the object store
#[derive(Debug, Deserialize, Validate)]
pub struct RecordDocumentInput {
    pub document_type: DocumentType,
    #[validate(length(min = 1, max = 255, message = "File name is required"))]
    pub file_name: String,
    #[validate(length(min = 1, max = 1024, message = "Storage path is required"))]
    pub storage_path: String,
}

/// An official's decision on a document
#[derive(Debug, Deserialize)]
pub struct ReviewDocumentInput {
    pub approved: bool,
    pub comment: Option<String>,
}

impl DocumentService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record an uploaded document against a shop
    pub async fn record_upload(
        &self,
        uploader_id: Uuid,
        shop_id: Uuid,
        input: RecordDocumentInput,
    ) -> AppResult<Document> {
        input.validate()?;

        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, DocumentRow>(&format!(
            r#"
            INSERT INTO documents (shop_id, document_type, file_name, storage_path, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {DOCUMENT_COLUMNS}
            "#
        ))
        .bind(shop_id)
        .bind(input.document_type.as_str())
        .bind(input.file_name.trim())
        .bind(input.storage_path.trim())
        .bind(DocumentStatus::Pending.as_str())
        .fetch_one(&mut *tx)
        .await?;

        record_activity(
            &mut *tx,
            shop_id,
            uploader_id,
            ActivityType::DocumentUpload,
            &format!("Uploaded {}", row.file_name),
            serde_json::json!({
                "document_id": row.id,
                "document_type": row.document_type,
            }),
        )
        .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    /// Documents for a shop, newest first
    pub async fn list_for_shop(&self, shop_id: Uuid) -> AppResult<Vec<Document>> {
        let rows = sqlx::query_as::<_, DocumentRow>(&format!(
            r#"
            SELECT {DOCUMENT_COLUMNS}
            FROM documents
            WHERE shop_id = $1
            ORDER BY uploaded_at DESC
            "#
        ))
        .bind(shop_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Document::from).collect())
    }

    /// Every document, for dashboard aggregates
    pub async fn list_all(&self) -> AppResult<Vec<Document>> {
        let rows = sqlx::query_as::<_, DocumentRow>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents ORDER BY uploaded_at ASC"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Document::from).collect())
    }

    /// Approve or reject a pending document
    pub async fn review(
        &self,
        official_id: Uuid,
        document_id: Uuid,
        input: ReviewDocumentInput,
    ) -> AppResult<Document> {
        let status = if input.approved {
            DocumentStatus::Approved
        } else {
            DocumentStatus::Rejected
        };

        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, DocumentRow>(&format!(
            r#"
            UPDATE documents SET status = $2, reviewed_at = NOW()
            WHERE id = $1 AND status = $3
            RETURNING {DOCUMENT_COLUMNS}
            "#
        ))
        .bind(document_id)
        .bind(status.as_str())
        .bind(DocumentStatus::Pending.as_str())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM documents WHERE id = $1)")
                    .bind(document_id)
                    .fetch_one(&mut *tx)
                    .await?;
            return Err(if exists {
                AppError::InvalidStateTransition("Document has already been reviewed".to_string())
            } else {
                AppError::NotFound("Document".to_string())
            });
        };

        record_activity(
            &mut *tx,
            row.shop_id,
            official_id,
            ActivityType::DocumentReview,
            &format!("Document {} {}", row.file_name, status.as_str()),
            serde_json::json!({
                "document_id": row.id,
                "status": status.as_str(),
                "comment": input.comment,
            }),
        )
        .await?;

        tx.commit().await?;

        Ok(row.into())
    }
}
