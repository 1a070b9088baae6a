//! Inspection visit models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An inspection visit to a shop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inspection {
    pub id: Uuid,
    pub shop_id: Uuid,
    pub inspector_id: Option<Uuid>,
    pub inspection_type: String,
    pub status: InspectionStatus,
    pub scheduled_date: DateTime<Utc>,
    pub completed_date: Option<DateTime<Utc>>,
    /// 0-100, set when the inspection is completed
    pub score: Option<i32>,
    pub notes: Option<String>,
    #[serde(default)]
    pub issues: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Progress of an inspection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum InspectionStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl InspectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InspectionStatus::Scheduled => "scheduled",
            InspectionStatus::InProgress => "in_progress",
            InspectionStatus::Completed => "completed",
            InspectionStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "scheduled" => Some(InspectionStatus::Scheduled),
            "in_progress" => Some(InspectionStatus::InProgress),
            "completed" => Some(InspectionStatus::Completed),
            "cancelled" => Some(InspectionStatus::Cancelled),
            _ => None,
        }
    }

    /// Completed and cancelled inspections are final
    pub fn is_terminal(&self) -> bool {
        matches!(self, InspectionStatus::Completed | InspectionStatus::Cancelled)
    }

    /// An inspection only moves forward; nothing returns to `scheduled`
    pub fn can_transition_to(&self, next: InspectionStatus) -> bool {
        matches!(
            (self, next),
            (InspectionStatus::Scheduled, InspectionStatus::InProgress)
                | (InspectionStatus::Scheduled, InspectionStatus::Completed)
                | (InspectionStatus::Scheduled, InspectionStatus::Cancelled)
                | (InspectionStatus::InProgress, InspectionStatus::Completed)
                | (InspectionStatus::InProgress, InspectionStatus::Cancelled)
        )
    }
}

impl std::fmt::Display for InspectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InspectionStatus::Scheduled => write!(f, "Scheduled"),
            InspectionStatus::InProgress => write!(f, "In Progress"),
            InspectionStatus::Completed => write!(f, "Completed"),
            InspectionStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}
