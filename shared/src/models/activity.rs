//! Audit trail of actions taken on a shop

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An append-only activity entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub id: Uuid,
    pub shop_id: Uuid,
    pub actor_id: Uuid,
    pub activity_type: ActivityType,
    pub description: String,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Registration,
    ComplianceAssessment,
    ScoreOverride,
    StatusChange,
    DocumentUpload,
    DocumentReview,
    InspectionScheduled,
    InspectionCompleted,
    ProfileUpdate,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Registration => "registration",
            ActivityType::ComplianceAssessment => "compliance_assessment",
            ActivityType::ScoreOverride => "score_override",
            ActivityType::StatusChange => "status_change",
            ActivityType::DocumentUpload => "document_upload",
            ActivityType::DocumentReview => "document_review",
            ActivityType::InspectionScheduled => "inspection_scheduled",
            ActivityType::InspectionCompleted => "inspection_completed",
            ActivityType::ProfileUpdate => "profile_update",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "registration" => Some(ActivityType::Registration),
            "compliance_assessment" => Some(ActivityType::ComplianceAssessment),
            "score_override" => Some(ActivityType::ScoreOverride),
            "status_change" => Some(ActivityType::StatusChange),
            "document_upload" => Some(ActivityType::DocumentUpload),
            "document_review" => Some(ActivityType::DocumentReview),
            "inspection_scheduled" => Some(ActivityType::InspectionScheduled),
            "inspection_completed" => Some(ActivityType::InspectionCompleted),
            "profile_update" => Some(ActivityType::ProfileUpdate),
            _ => None,
        }
    }
}

/// Metadata recorded with a compliance assessment
pub fn assessment_metadata(score: i32, assessed_at: DateTime<Utc>) -> serde_json::Value {
    serde_json::json!({
        "score": score,
        "assessed_at": assessed_at.to_rfc3339(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn assessment_metadata_carries_score_and_timestamp() {
        let assessed_at = Utc.with_ymd_and_hms(2024, 5, 14, 10, 30, 0).unwrap();
        let metadata = assessment_metadata(85, assessed_at);

        assert_eq!(metadata["score"], 85);
        let stamp = metadata["assessed_at"].as_str().unwrap();
        let parsed = DateTime::parse_from_rfc3339(stamp).unwrap();
        assert_eq!(parsed.with_timezone(&Utc), assessed_at);
    }

    #[test]
    fn activity_types_round_trip() {
        for activity_type in [
            ActivityType::ComplianceAssessment,
            ActivityType::ScoreOverride,
            ActivityType::StatusChange,
        ] {
            assert_eq!(ActivityType::parse(activity_type.as_str()), Some(activity_type));
        }
    }
}
