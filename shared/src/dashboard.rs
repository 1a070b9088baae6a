//! Dashboard aggregates
//!
//! Every figure is derived from a snapshot of the full collections on each
//! call. Nothing is cached or maintained incrementally, so two calls over
//! the same snapshot always agree.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    Document, DocumentStatus, Inspection, InspectionStatus, Shop, ShopStatus,
    NON_COMPLIANCE_THRESHOLD,
};

pub fn pending_shops(shops: &[Shop]) -> Vec<&Shop> {
    shops.iter().filter(|s| s.status == ShopStatus::Pending).collect()
}

pub fn approved_shops(shops: &[Shop]) -> Vec<&Shop> {
    shops.iter().filter(|s| s.status == ShopStatus::Approved).collect()
}

/// Assessed shops scoring below the threshold. Unassessed shops never count.
pub fn non_compliant_shops(shops: &[Shop]) -> Vec<&Shop> {
    shops
        .iter()
        .filter(|s| matches!(s.compliance_score, Some(score) if score < NON_COMPLIANCE_THRESHOLD))
        .collect()
}

/// Scheduled inspections strictly after `now`
pub fn upcoming_inspections(inspections: &[Inspection], now: DateTime<Utc>) -> Vec<&Inspection> {
    inspections
        .iter()
        .filter(|i| i.status == InspectionStatus::Scheduled && i.scheduled_date > now)
        .collect()
}

pub fn completed_inspections(inspections: &[Inspection]) -> Vec<&Inspection> {
    inspections
        .iter()
        .filter(|i| i.status == InspectionStatus::Completed)
        .collect()
}

pub fn pending_documents(documents: &[Document]) -> Vec<&Document> {
    documents
        .iter()
        .filter(|d| d.status == DocumentStatus::Pending)
        .collect()
}

/// `numerator / denominator` as a whole percentage, 0 for an empty denominator
pub fn percentage(numerator: usize, denominator: usize) -> i32 {
    if denominator == 0 {
        return 0;
    }
    (numerator as f64 / denominator as f64 * 100.0).round() as i32
}

/// Headline compliance percentages shown to officials
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ComplianceCategories {
    /// Share of shops that are approved
    pub food_safety: i32,
    /// Share of documents that have been reviewed
    pub documentation: i32,
    /// Share of inspections that are completed
    pub inspections: i32,
    /// Share of shops not flagged as non-compliant
    pub compliance_rate: i32,
}

impl ComplianceCategories {
    pub fn compute(shops: &[Shop], documents: &[Document], inspections: &[Inspection]) -> Self {
        let reviewed_documents = documents.len() - pending_documents(documents).len();
        let compliant_shops = shops.len() - non_compliant_shops(shops).len();

        Self {
            food_safety: percentage(approved_shops(shops).len(), shops.len()),
            documentation: percentage(reviewed_documents, documents.len()),
            inspections: percentage(completed_inspections(inspections).len(), inspections.len()),
            compliance_rate: percentage(compliant_shops, shops.len()),
        }
    }
}

/// Overview for compliance officials
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OfficialDashboard {
    pub total_shops: usize,
    pub pending_shops: usize,
    pub approved_shops: usize,
    pub non_compliant_shops: usize,
    pub upcoming_inspections: usize,
    pub categories: ComplianceCategories,
}

impl OfficialDashboard {
    pub fn compute(
        shops: &[Shop],
        inspections: &[Inspection],
        documents: &[Document],
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            total_shops: shops.len(),
            pending_shops: pending_shops(shops).len(),
            approved_shops: approved_shops(shops).len(),
            non_compliant_shops: non_compliant_shops(shops).len(),
            upcoming_inspections: upcoming_inspections(inspections, now).len(),
            categories: ComplianceCategories::compute(shops, documents, inspections),
        }
    }
}

/// Overview for a single shop owner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerDashboard {
    pub owner_id: Uuid,
    pub shops: Vec<Shop>,
    pub pending_documents: usize,
    pub upcoming_inspections: Vec<Inspection>,
    /// Mean of the assessed shops' scores, `None` if none are assessed
    pub average_compliance_score: Option<i32>,
}

impl OwnerDashboard {
    /// Build the owner's view from full snapshots; records belonging to
    /// other owners are ignored.
    pub fn compute(
        owner_id: Uuid,
        shops: &[Shop],
        inspections: &[Inspection],
        documents: &[Document],
        now: DateTime<Utc>,
    ) -> Self {
        let own: Vec<Shop> = shops
            .iter()
            .filter(|s| s.owner_id == owner_id)
            .cloned()
            .collect();
        let owns = |shop_id: Uuid| own.iter().any(|s| s.id == shop_id);

        let own_documents: Vec<Document> = documents
            .iter()
            .filter(|d| owns(d.shop_id))
            .cloned()
            .collect();
        let own_inspections: Vec<Inspection> = inspections
            .iter()
            .filter(|i| owns(i.shop_id))
            .cloned()
            .collect();

        let upcoming = upcoming_inspections(&own_inspections, now)
            .into_iter()
            .cloned()
            .collect();

        Self {
            owner_id,
            pending_documents: pending_documents(&own_documents).len(),
            upcoming_inspections: upcoming,
            average_compliance_score: average_score(&own),
            shops: own,
        }
    }
}

/// Rounded mean of the known compliance scores
pub fn average_score(shops: &[Shop]) -> Option<i32> {
    let scores: Vec<i32> = shops.iter().filter_map(|s| s.compliance_score).collect();
    if scores.is_empty() {
        return None;
    }
    let total: i64 = scores.iter().map(|&s| i64::from(s)).sum();
    Some((total as f64 / scores.len() as f64).round() as i32)
}
