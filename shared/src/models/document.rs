//! Supporting document records
//!
//! File contents live in the object store; only the reference is kept here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub shop_id: Uuid,
    pub document_type: DocumentType,
    pub file_name: String,
    pub storage_path: String,
    pub status: DocumentStatus,
    pub uploaded_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    IdDocument,
    ProofOfAddress,
    BusinessRegistration,
    TaxClearance,
    TradingLicense,
    HealthCertificate,
    Other,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::IdDocument => "id_document",
            DocumentType::ProofOfAddress => "proof_of_address",
            DocumentType::BusinessRegistration => "business_registration",
            DocumentType::TaxClearance => "tax_clearance",
            DocumentType::TradingLicense => "trading_license",
            DocumentType::HealthCertificate => "health_certificate",
            DocumentType::Other => "other",
        }
    }

    /// Unknown stored values fall back to `Other`
    pub fn parse(s: &str) -> Self {
        match s {
            "id_document" => DocumentType::IdDocument,
            "proof_of_address" => DocumentType::ProofOfAddress,
            "business_registration" => DocumentType::BusinessRegistration,
            "tax_clearance" => DocumentType::TaxClearance,
            "trading_license" => DocumentType::TradingLicense,
            "health_certificate" => DocumentType::HealthCertificate,
            _ => DocumentType::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Pending => "pending",
            DocumentStatus::Approved => "approved",
            DocumentStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(DocumentStatus::Pending),
            "approved" => Some(DocumentStatus::Approved),
            "rejected" => Some(DocumentStatus::Rejected),
            _ => None,
        }
    }
}
