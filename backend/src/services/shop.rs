//! Shop registration, verification and compliance assessment

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::services::activity::record_activity;
use shared::{
    assessment_metadata, classify_compliance, nearby_shops, validate_compliance_score,
    validate_coordinates, validate_trading_hours, ActivityType, ComplianceBand, ComplianceCategory,
    ComplianceQuestionnaireAnswers, GeoPoint, NearbyShop, Shop, ShopStatus, TradingHours, UserRole,
};

/// Shop service for registration and verification
#[derive(Clone)]
pub struct ShopService {
    db: PgPool,
}

const SHOP_COLUMNS: &str = r#"
    id, owner_id, name, address, latitude, longitude, status, compliance_score,
    business_type, categories, trading_hours, created_at, updated_at
"#;

/// Database row for a shop
#[derive(Debug, sqlx::FromRow)]
struct ShopRow {
    id: Uuid,
    owner_id: Uuid,
    name: String,
    address: String,
    latitude: Option<Decimal>,
    longitude: Option<Decimal>,
    status: String,
    compliance_score: Option<i32>,
    business_type: Option<String>,
    categories: Vec<String>,
    trading_hours: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ShopRow> for Shop {
    fn from(row: ShopRow) -> Self {
        let trading_hours = match serde_json::from_value::<TradingHours>(row.trading_hours) {
            Ok(hours) => hours,
            Err(e) => {
                tracing::warn!(shop_id = %row.id, error = %e, "unreadable trading hours, treating as unknown");
                TradingHours::default()
            }
        };
        let status = ShopStatus::parse(&row.status).unwrap_or_else(|| {
            tracing::warn!(shop_id = %row.id, status = %row.status, "unknown shop status, treating as pending");
            ShopStatus::Pending
        });

        Shop {
            id: row.id,
            owner_id: row.owner_id,
            name: row.name,
            address: row.address,
            latitude: row.latitude,
            longitude: row.longitude,
            status,
            compliance_score: row.compliance_score,
            business_type: row.business_type,
            categories: row.categories,
            trading_hours,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Input for registering a shop
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterShopInput {
    #[validate(length(min = 1, max = 200, message = "Shop name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 500, message = "Address is required"))]
    pub address: String,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub trading_hours: TradingHours,
}

/// Partial update of a shop's profile
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateShopInput {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 500))]
    pub address: Option<String>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub categories: Option<Vec<String>>,
    pub trading_hours: Option<TradingHours>,
}

/// Shop list filter
#[derive(Debug, Default, Deserialize)]
pub struct ShopFilter {
    pub status: Option<ShopStatus>,
    pub owner_id: Option<Uuid>,
}

/// Input for an official's status decision
#[derive(Debug, Deserialize)]
pub struct ChangeStatusInput {
    pub status: ShopStatus,
    pub reason: Option<String>,
}

/// Input for an official's manual score
#[derive(Debug, Deserialize)]
pub struct OverrideScoreInput {
    pub score: i32,
    pub reason: Option<String>,
}

/// Outcome of a questionnaire submission
#[derive(Debug, Serialize)]
pub struct QuestionnaireResult {
    pub shop: Shop,
    pub score: i32,
    pub band: ComplianceBand,
    pub missing_categories: Vec<ComplianceCategory>,
}

impl ShopService {
    /// Create a new ShopService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Register a new shop; it starts out pending review
    pub async fn register_shop(&self, owner_id: Uuid, input: RegisterShopInput) -> AppResult<Shop> {
        input.validate()?;
        check_coordinates(input.latitude, input.longitude)?;
        validate_trading_hours(&input.trading_hours)
            .map_err(|e| AppError::validation("trading_hours", e))?;

        let trading_hours_json = serde_json::to_value(&input.trading_hours)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, ShopRow>(&format!(
            r#"
            INSERT INTO shops (owner_id, name, address, latitude, longitude, status,
                               categories, trading_hours)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {SHOP_COLUMNS}
            "#
        ))
        .bind(owner_id)
        .bind(input.name.trim())
        .bind(input.address.trim())
        .bind(input.latitude)
        .bind(input.longitude)
        .bind(ShopStatus::Pending.as_str())
        .bind(&input.categories)
        .bind(&trading_hours_json)
        .fetch_one(&mut *tx)
        .await?;

        record_activity(
            &mut *tx,
            row.id,
            owner_id,
            ActivityType::Registration,
            "Shop registered",
            serde_json::json!({ "name": row.name }),
        )
        .await?;

        tx.commit().await?;

        tracing::info!(shop_id = %row.id, %owner_id, "shop registered");
        Ok(row.into())
    }

    /// Get a shop by ID
    pub async fn get_shop(&self, shop_id: Uuid) -> AppResult<Shop> {
        let row = sqlx::query_as::<_, ShopRow>(&format!(
            "SELECT {SHOP_COLUMNS} FROM shops WHERE id = $1"
        ))
        .bind(shop_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Shop".to_string()))?;

        Ok(row.into())
    }

    /// Get a shop the caller is allowed to see.
    ///
    /// Owners see their own shops, customers see approved shops and
    /// officials see everything. Hidden shops read as not found.
    pub async fn get_visible_shop(&self, user: &AuthUser, shop_id: Uuid) -> AppResult<Shop> {
        let shop = self.get_shop(shop_id).await?;
        let visible = match user.role {
            UserRole::Official => true,
            UserRole::Owner => shop.owner_id == user.user_id,
            UserRole::Customer => shop.is_approved(),
        };
        if visible {
            Ok(shop)
        } else {
            Err(AppError::NotFound("Shop".to_string()))
        }
    }

    /// Get a shop owned by `owner_id`
    pub async fn get_owned_shop(&self, owner_id: Uuid, shop_id: Uuid) -> AppResult<Shop> {
        let shop = self.get_shop(shop_id).await?;
        if shop.owner_id != owner_id {
            return Err(AppError::NotFound("Shop".to_string()));
        }
        Ok(shop)
    }

    /// List shops in registration order
    pub async fn list_shops(&self, filter: &ShopFilter) -> AppResult<Vec<Shop>> {
        let rows = sqlx::query_as::<_, ShopRow>(&format!(
            r#"
            SELECT {SHOP_COLUMNS}
            FROM shops
            WHERE ($1::TEXT IS NULL OR status = $1)
              AND ($2::UUID IS NULL OR owner_id = $2)
            ORDER BY created_at ASC, id ASC
            "#
        ))
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.owner_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Shop::from).collect())
    }

    /// Update an owner's shop profile. Status and score are not editable here.
    pub async fn update_shop(
        &self,
        owner_id: Uuid,
        shop_id: Uuid,
        input: UpdateShopInput,
    ) -> AppResult<Shop> {
        input.validate()?;
        check_coordinates(input.latitude, input.longitude)?;
        if let Some(hours) = &input.trading_hours {
            validate_trading_hours(hours).map_err(|e| AppError::validation("trading_hours", e))?;
        }

        self.get_owned_shop(owner_id, shop_id).await?;

        let trading_hours_json = input
            .trading_hours
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, ShopRow>(&format!(
            r#"
            UPDATE shops SET
                name = COALESCE($2, name),
                address = COALESCE($3, address),
                latitude = COALESCE($4, latitude),
                longitude = COALESCE($5, longitude),
                categories = COALESCE($6, categories),
                trading_hours = COALESCE($7, trading_hours),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {SHOP_COLUMNS}
            "#
        ))
        .bind(shop_id)
        .bind(input.name.as_deref().map(str::trim))
        .bind(input.address.as_deref().map(str::trim))
        .bind(input.latitude)
        .bind(input.longitude)
        .bind(&input.categories)
        .bind(&trading_hours_json)
        .fetch_one(&mut *tx)
        .await?;

        record_activity(
            &mut *tx,
            shop_id,
            owner_id,
            ActivityType::ProfileUpdate,
            "Shop profile updated",
            serde_json::json!({}),
        )
        .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    /// Apply an official's status decision
    pub async fn change_status(
        &self,
        official_id: Uuid,
        shop_id: Uuid,
        input: ChangeStatusInput,
    ) -> AppResult<Shop> {
        let shop = self.get_shop(shop_id).await?;

        if !shop.status.can_transition_to(input.status) {
            return Err(AppError::InvalidStateTransition(format!(
                "Cannot change shop status from {} to {}",
                shop.status.as_str(),
                input.status.as_str()
            )));
        }

        let mut tx = self.db.begin().await?;

        // Guard on the old status so concurrent decisions cannot both apply
        let row = sqlx::query_as::<_, ShopRow>(&format!(
            r#"
            UPDATE shops SET status = $2, updated_at = NOW()
            WHERE id = $1 AND status = $3
            RETURNING {SHOP_COLUMNS}
            "#
        ))
        .bind(shop_id)
        .bind(input.status.as_str())
        .bind(shop.status.as_str())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::Conflict("Shop status changed concurrently".to_string()))?;

        record_activity(
            &mut *tx,
            shop_id,
            official_id,
            ActivityType::StatusChange,
            &format!("Status changed to {}", input.status),
            serde_json::json!({
                "from": shop.status.as_str(),
                "to": input.status.as_str(),
                "reason": input.reason,
            }),
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            %shop_id,
            from = shop.status.as_str(),
            to = input.status.as_str(),
            "shop status changed"
        );
        Ok(row.into())
    }

    /// Score an owner's questionnaire and store the result on the shop
    pub async fn submit_questionnaire(
        &self,
        owner_id: Uuid,
        shop_id: Uuid,
        answers: ComplianceQuestionnaireAnswers,
    ) -> AppResult<QuestionnaireResult> {
        self.get_owned_shop(owner_id, shop_id).await?;

        if !answers.has_required_consents() {
            return Err(AppError::validation(
                "consent",
                "Consent to inspection and data processing is required",
            ));
        }

        let score = answers.score();
        let assessed_at = Utc::now();
        let business_type = answers
            .business_type
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());

        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, ShopRow>(&format!(
            r#"
            UPDATE shops SET
                compliance_score = $2,
                business_type = COALESCE($3, business_type),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {SHOP_COLUMNS}
            "#
        ))
        .bind(shop_id)
        .bind(score)
        .bind(business_type)
        .fetch_one(&mut *tx)
        .await?;

        record_activity(
            &mut *tx,
            shop_id,
            owner_id,
            ActivityType::ComplianceAssessment,
            &format!("Compliance assessment completed with score {}", score),
            assessment_metadata(score, assessed_at),
        )
        .await?;

        tx.commit().await?;

        tracing::info!(%shop_id, score, "compliance questionnaire scored");

        Ok(QuestionnaireResult {
            shop: row.into(),
            score,
            band: classify_compliance(Some(score)),
            missing_categories: answers.missing_categories(),
        })
    }

    /// Replace a shop's compliance score with an official's assessment
    pub async fn override_compliance_score(
        &self,
        official_id: Uuid,
        shop_id: Uuid,
        input: OverrideScoreInput,
    ) -> AppResult<Shop> {
        validate_compliance_score(input.score).map_err(|e| AppError::validation("score", e))?;

        let shop = self.get_shop(shop_id).await?;

        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, ShopRow>(&format!(
            r#"
            UPDATE shops SET compliance_score = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {SHOP_COLUMNS}
            "#
        ))
        .bind(shop_id)
        .bind(input.score)
        .fetch_one(&mut *tx)
        .await?;

        record_activity(
            &mut *tx,
            shop_id,
            official_id,
            ActivityType::ScoreOverride,
            &format!("Compliance score set to {}", input.score),
            serde_json::json!({
                "previous_score": shop.compliance_score,
                "score": input.score,
                "reason": input.reason,
                "assessed_at": Utc::now().to_rfc3339(),
            }),
        )
        .await?;

        tx.commit().await?;

        tracing::info!(%shop_id, score = input.score, "compliance score overridden");
        Ok(row.into())
    }

    /// Approved shops near `location`, or a short default list without one
    pub async fn find_nearby(
        &self,
        location: Option<GeoPoint>,
        radius_km: f64,
    ) -> AppResult<Vec<NearbyShop>> {
        let shops = self.list_shops(&ShopFilter::default()).await?;
        Ok(nearby_shops(&shops, location, radius_km))
    }
}

/// Coordinates arrive as a pair and within range
fn check_coordinates(latitude: Option<Decimal>, longitude: Option<Decimal>) -> AppResult<()> {
    validate_coordinates(
        latitude.and_then(|d| d.to_f64()),
        longitude.and_then(|d| d.to_f64()),
    )
    .map_err(|e| AppError::validation("coordinates", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: &str, trading_hours: serde_json::Value) -> ShopRow {
        ShopRow {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            name: "Sipho's Spaza".to_string(),
            address: "4 Khumalo Street, Thokoza".to_string(),
            latitude: None,
            longitude: None,
            status: status.to_string(),
            compliance_score: Some(72),
            business_type: None,
            categories: vec!["groceries".to_string()],
            trading_hours,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn stored_row_maps_to_shop() {
        let hours = serde_json::json!({
            "monday": { "open": "08:00:00", "close": "18:00:00" },
            "sunday": { "closed": true }
        });
        let shop = Shop::from(row("approved", hours));
        assert_eq!(shop.status, ShopStatus::Approved);
        assert_eq!(shop.trading_hours.len(), 2);
        assert_eq!(shop.compliance_score, Some(72));
    }

    #[test]
    fn corrupt_trading_hours_fall_back_to_unknown() {
        let shop = Shop::from(row("approved", serde_json::json!("mornings only")));
        assert!(shop.trading_hours.is_empty());
        assert_eq!(shop.status, ShopStatus::Approved);
    }

    #[test]
    fn unknown_status_falls_back_to_pending() {
        let shop = Shop::from(row("closed", serde_json::json!({})));
        assert_eq!(shop.status, ShopStatus::Pending);
    }
}
