//! Activity log service: append-only audit trail per shop

use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::error::AppResult;
use shared::{Activity, ActivityType};

#[derive(Clone)]
pub struct ActivityService {
    db: PgPool,
}

/// Database row for an activity entry
#[derive(Debug, sqlx::FromRow)]
struct ActivityRow {
    id: Uuid,
    shop_id: Uuid,
    actor_id: Uuid,
    activity_type: String,
    description: String,
    metadata: serde_json::Value,
    created_at: DateTime<Utc>,
}

impl From<ActivityRow> for Activity {
    fn from(row: ActivityRow) -> Self {
        Activity {
            id: row.id,
            shop_id: row.shop_id,
            actor_id: row.actor_id,
            // Only this module writes the column
            activity_type: ActivityType::parse(&row.activity_type)
                .unwrap_or(ActivityType::ProfileUpdate),
            description: row.description,
            metadata: row.metadata,
            created_at: row.created_at,
        }
    }
}

/// Append an activity entry. Takes any executor so callers can include it
/// in their own transaction.
pub async fn record_activity<'e>(
    executor: impl PgExecutor<'e>,
    shop_id: Uuid,
    actor_id: Uuid,
    activity_type: ActivityType,
    description: &str,
    metadata: serde_json::Value,
) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO activities (shop_id, actor_id, activity_type, description, metadata)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(shop_id)
    .bind(actor_id)
    .bind(activity_type.as_str())
    .bind(description)
    .bind(metadata)
    .execute(executor)
    .await?;

    Ok(())
}

impl ActivityService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Activity for a shop, newest first
    pub async fn list_for_shop(&self, shop_id: Uuid) -> AppResult<Vec<Activity>> {
        let rows = sqlx::query_as::<_, ActivityRow>(
            r#"
            SELECT id, shop_id, actor_id, activity_type, description, metadata, created_at
            FROM activities
            WHERE shop_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(shop_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Activity::from).collect())
    }
}
