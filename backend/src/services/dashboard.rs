//! Dashboard service
//!
//! Loads full snapshots and hands them to the shared reducers. Figures are
//! recomputed on every request.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::{
    document::DocumentService,
    inspection::{InspectionFilter, InspectionService},
    shop::{ShopFilter, ShopService},
};
use shared::{Document, Inspection, OfficialDashboard, OwnerDashboard, Shop};

#[derive(Clone)]
pub struct DashboardService {
    shops: ShopService,
    inspections: InspectionService,
    documents: DocumentService,
}

impl DashboardService {
    pub fn new(db: PgPool) -> Self {
        Self {
            shops: ShopService::new(db.clone()),
            inspections: InspectionService::new(db.clone()),
            documents: DocumentService::new(db),
        }
    }

    async fn snapshot(&self) -> AppResult<(Vec<Shop>, Vec<Inspection>, Vec<Document>)> {
        let shops = self.shops.list_shops(&ShopFilter::default()).await?;
        let inspections = self.inspections.list(&InspectionFilter::default()).await?;
        let documents = self.documents.list_all().await?;
        Ok((shops, inspections, documents))
    }

    pub async fn official(&self) -> AppResult<OfficialDashboard> {
        let (shops, inspections, documents) = self.snapshot().await?;
        Ok(OfficialDashboard::compute(
            &shops,
            &inspections,
            &documents,
            Utc::now(),
        ))
    }

    pub async fn owner(&self, owner_id: Uuid) -> AppResult<OwnerDashboard> {
        let (shops, inspections, documents) = self.snapshot().await?;
        Ok(OwnerDashboard::compute(
            owner_id,
            &shops,
            &inspections,
            &documents,
            Utc::now(),
        ))
    }
}
