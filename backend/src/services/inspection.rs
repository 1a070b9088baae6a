//! Inspection scheduling and results

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::services::activity::record_activity;
use shared::{validate_compliance_score, ActivityType, Inspection, InspectionStatus};

/// Inspection service for officials' site visits
#[derive(Clone)]
pub struct InspectionService {
    db: PgPool,
}

const INSPECTION_COLUMNS: &str = r#"
    id, shop_id, inspector_id, inspection_type, status, scheduled_date,
    completed_date, score, notes, issues, created_at
"#;

/// Database row for an inspection
#[derive(Debug, sqlx::FromRow)]
struct InspectionRow {
    id: Uuid,
    shop_id: Uuid,
    inspector_id: Option<Uuid>,
    inspection_type: String,
    status: String,
    scheduled_date: DateTime<Utc>,
    completed_date: Option<DateTime<Utc>>,
    score: Option<i32>,
    notes: Option<String>,
    issues: Vec<String>,
    created_at: DateTime<Utc>,
}

impl From<InspectionRow> for Inspection {
    fn from(row: InspectionRow) -> Self {
        Inspection {
            id: row.id,
            shop_id: row.shop_id,
            inspector_id: row.inspector_id,
            inspection_type: row.inspection_type,
            status: InspectionStatus::parse(&row.status).unwrap_or_else(|| {
                tracing::warn!(inspection_id = %row.id, status = %row.status, "unknown inspection status, treating as scheduled");
                InspectionStatus::Scheduled
            }),
            scheduled_date: row.scheduled_date,
            completed_date: row.completed_date,
            score: row.score,
            notes: row.notes,
            issues: row.issues,
            created_at: row.created_at,
        }
    }
}

/// Input for scheduling an inspection
#[derive(Debug, Deserialize, Validate)]
pub struct ScheduleInspectionInput {
    pub shop_id: Uuid,
    /// Defaults to the official scheduling the visit
    pub inspector_id: Option<Uuid>,
    #[validate(length(min = 1, max = 100, message = "Inspection type is required"))]
    pub inspection_type: String,
    pub scheduled_date: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Input for recording an inspection's result
#[derive(Debug, Deserialize)]
pub struct CompleteInspectionInput {
    pub score: i32,
    pub notes: Option<String>,
    #[serde(default)]
    pub issues: Vec<String>,
    /// Also set the shop's compliance score to this result
    #[serde(default)]
    pub apply_to_shop: bool,
}

/// Inspection list filter
#[derive(Debug, Default, Deserialize)]
pub struct InspectionFilter {
    pub shop_id: Option<Uuid>,
    pub inspector_id: Option<Uuid>,
    pub status: Option<InspectionStatus>,
}

impl InspectionService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Schedule a visit to a shop
    pub async fn schedule(
        &self,
        official_id: Uuid,
        input: ScheduleInspectionInput,
    ) -> AppResult<Inspection> {
        input.validate()?;

        if input.scheduled_date <= Utc::now() {
            return Err(AppError::validation(
                "scheduled_date",
                "Inspections must be scheduled in the future",
            ));
        }

        let shop_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM shops WHERE id = $1)")
                .bind(input.shop_id)
                .fetch_one(&self.db)
                .await?;
        if !shop_exists {
            return Err(AppError::NotFound("Shop".to_string()));
        }

        let inspector_id = input.inspector_id.unwrap_or(official_id);

        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, InspectionRow>(&format!(
            r#"
            INSERT INTO inspections (shop_id, inspector_id, inspection_type, status,
                                     scheduled_date, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {INSPECTION_COLUMNS}
            "#
        ))
        .bind(input.shop_id)
        .bind(inspector_id)
        .bind(input.inspection_type.trim())
        .bind(InspectionStatus::Scheduled.as_str())
        .bind(input.scheduled_date)
        .bind(&input.notes)
        .fetch_one(&mut *tx)
        .await?;

        record_activity(
            &mut *tx,
            input.shop_id,
            official_id,
            ActivityType::InspectionScheduled,
            &format!("{} inspection scheduled", row.inspection_type),
            serde_json::json!({
                "inspection_id": row.id,
                "scheduled_date": row.scheduled_date.to_rfc3339(),
            }),
        )
        .await?;

        tx.commit().await?;

        tracing::info!(inspection_id = %row.id, shop_id = %input.shop_id, "inspection scheduled");
        Ok(row.into())
    }

    /// Get an inspection by ID
    pub async fn get(&self, inspection_id: Uuid) -> AppResult<Inspection> {
        let row = sqlx::query_as::<_, InspectionRow>(&format!(
            "SELECT {INSPECTION_COLUMNS} FROM inspections WHERE id = $1"
        ))
        .bind(inspection_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Inspection".to_string()))?;

        Ok(row.into())
    }

    /// List inspections by scheduled date
    pub async fn list(&self, filter: &InspectionFilter) -> AppResult<Vec<Inspection>> {
        let rows = sqlx::query_as::<_, InspectionRow>(&format!(
            r#"
            SELECT {INSPECTION_COLUMNS}
            FROM inspections
            WHERE ($1::UUID IS NULL OR shop_id = $1)
              AND ($2::UUID IS NULL OR inspector_id = $2)
              AND ($3::TEXT IS NULL OR status = $3)
            ORDER BY scheduled_date ASC, created_at ASC
            "#
        ))
        .bind(filter.shop_id)
        .bind(filter.inspector_id)
        .bind(filter.status.map(|s| s.as_str()))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Inspection::from).collect())
    }

    /// Mark an inspection as under way
    pub async fn start(&self, inspection_id: Uuid) -> AppResult<Inspection> {
        let current = self.get(inspection_id).await?;
        ensure_transition(current.status, InspectionStatus::InProgress)?;

        let row = sqlx::query_as::<_, InspectionRow>(&format!(
            r#"
            UPDATE inspections SET status = $2
            WHERE id = $1 AND status = $3
            RETURNING {INSPECTION_COLUMNS}
            "#
        ))
        .bind(inspection_id)
        .bind(InspectionStatus::InProgress.as_str())
        .bind(current.status.as_str())
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::Conflict("Inspection changed concurrently".to_string()))?;

        Ok(row.into())
    }

    /// Record the result of an inspection
    pub async fn complete(
        &self,
        official_id: Uuid,
        inspection_id: Uuid,
        input: CompleteInspectionInput,
    ) -> AppResult<Inspection> {
        validate_compliance_score(input.score).map_err(|e| AppError::validation("score", e))?;

        let current = self.get(inspection_id).await?;
        ensure_transition(current.status, InspectionStatus::Completed)?;

        let issues: Vec<String> = input
            .issues
            .iter()
            .map(|i| i.trim().to_string())
            .filter(|i| !i.is_empty())
            .collect();

        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, InspectionRow>(&format!(
            r#"
            UPDATE inspections SET
                status = $2,
                completed_date = NOW(),
                score = $3,
                notes = COALESCE($4, notes),
                issues = $5,
                inspector_id = COALESCE(inspector_id, $6)
            WHERE id = $1 AND status = $7
            RETURNING {INSPECTION_COLUMNS}
            "#
        ))
        .bind(inspection_id)
        .bind(InspectionStatus::Completed.as_str())
        .bind(input.score)
        .bind(&input.notes)
        .bind(&issues)
        .bind(official_id)
        .bind(current.status.as_str())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::Conflict("Inspection changed concurrently".to_string()))?;

        if input.apply_to_shop {
            sqlx::query("UPDATE shops SET compliance_score = $2, updated_at = NOW() WHERE id = $1")
                .bind(row.shop_id)
                .bind(input.score)
                .execute(&mut *tx)
                .await?;
        }

        record_activity(
            &mut *tx,
            row.shop_id,
            official_id,
            ActivityType::InspectionCompleted,
            &format!("Inspection completed with score {}", input.score),
            serde_json::json!({
                "inspection_id": row.id,
                "score": input.score,
                "issues": issues,
                "applied_to_shop": input.apply_to_shop,
            }),
        )
        .await?;

        tx.commit().await?;

        tracing::info!(%inspection_id, score = input.score, "inspection completed");
        Ok(row.into())
    }

    /// Call off an inspection that has not finished
    pub async fn cancel(&self, inspection_id: Uuid) -> AppResult<Inspection> {
        let current = self.get(inspection_id).await?;
        ensure_transition(current.status, InspectionStatus::Cancelled)?;

        let row = sqlx::query_as::<_, InspectionRow>(&format!(
            r#"
            UPDATE inspections SET status = $2
            WHERE id = $1 AND status = $3
            RETURNING {INSPECTION_COLUMNS}
            "#
        ))
        .bind(inspection_id)
        .bind(InspectionStatus::Cancelled.as_str())
        .bind(current.status.as_str())
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::Conflict("Inspection changed concurrently".to_string()))?;

        tracing::info!(%inspection_id, "inspection cancelled");
        Ok(row.into())
    }
}

fn ensure_transition(from: InspectionStatus, to: InspectionStatus) -> AppResult<()> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(AppError::InvalidStateTransition(format!(
            "Cannot move inspection from {} to {}",
            from.as_str(),
            to.as_str()
        )))
    }
}
