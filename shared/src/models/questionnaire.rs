//! Compliance self-assessment questionnaire and scoring

use serde::{Deserialize, Deserializer, Serialize};

/// Highest score a shop can reach
pub const MAX_COMPLIANCE_SCORE: i32 = 100;

/// Shops scoring below this are non-compliant; a score of exactly 70 passes
pub const NON_COMPLIANCE_THRESHOLD: i32 = 70;

/// The only answer that earns points
pub const AFFIRMATIVE_ANSWER: &str = "yes";

/// Regulatory categories covered by the questionnaire
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceCategory {
    BusinessRegistration,
    TaxClearance,
    TradingLicense,
    FireSafety,
    HealthCertificate,
    Insurance,
    SafetyTraining,
}

/// Points per category. Safety categories outweigh paperwork.
pub const COMPLIANCE_WEIGHTS: [(ComplianceCategory, i32); 7] = [
    (ComplianceCategory::BusinessRegistration, 10),
    (ComplianceCategory::TaxClearance, 10),
    (ComplianceCategory::TradingLicense, 10),
    (ComplianceCategory::FireSafety, 20),
    (ComplianceCategory::HealthCertificate, 20),
    (ComplianceCategory::Insurance, 15),
    (ComplianceCategory::SafetyTraining, 15),
];

const fn total_weight() -> i32 {
    let mut total = 0;
    let mut i = 0;
    while i < COMPLIANCE_WEIGHTS.len() {
        total += COMPLIANCE_WEIGHTS[i].1;
        i += 1;
    }
    total
}

// The weights are hand-picked to sum to the maximum. Adding a category
// without rebalancing must fail here instead of producing scores above 100.
const _: () = assert!(total_weight() == MAX_COMPLIANCE_SCORE);

impl ComplianceCategory {
    pub fn points(&self) -> i32 {
        COMPLIANCE_WEIGHTS
            .iter()
            .find(|(category, _)| category == self)
            .map(|(_, points)| *points)
            .unwrap_or(0)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ComplianceCategory::BusinessRegistration => "Business registration",
            ComplianceCategory::TaxClearance => "Tax clearance",
            ComplianceCategory::TradingLicense => "Trading license",
            ComplianceCategory::FireSafety => "Fire safety",
            ComplianceCategory::HealthCertificate => "Health certificate",
            ComplianceCategory::Insurance => "Insurance",
            ComplianceCategory::SafetyTraining => "Safety training",
        }
    }
}

/// Answers captured by the compliance self-assessment form.
///
/// Answers are kept as free text: the form sends `"yes"`/`"no"`, but
/// anything else (a missing field, `null`, a number or a boolean) is
/// accepted and scores zero.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ComplianceQuestionnaireAnswers {
    #[serde(default, alias = "hasBusinessRegistration", deserialize_with = "lenient_answer")]
    pub has_business_registration: String,
    #[serde(default, alias = "hasTaxClearance", deserialize_with = "lenient_answer")]
    pub has_tax_clearance: String,
    #[serde(default, alias = "hasTradingLicense", deserialize_with = "lenient_answer")]
    pub has_trading_license: String,
    #[serde(default, alias = "hasFireSafety", deserialize_with = "lenient_answer")]
    pub has_fire_safety: String,
    #[serde(default, alias = "hasHealthCertificate", deserialize_with = "lenient_answer")]
    pub has_health_certificate: String,
    #[serde(default, alias = "hasInsurance", deserialize_with = "lenient_answer")]
    pub has_insurance: String,
    #[serde(default, alias = "hasSafetyTraining", deserialize_with = "lenient_answer")]
    pub has_safety_training: String,

    // Business profile
    #[serde(default, alias = "businessType")]
    pub business_type: Option<String>,
    #[serde(default, alias = "yearsInOperation")]
    pub years_in_operation: Option<String>,
    #[serde(default, alias = "numberOfEmployees")]
    pub number_of_employees: Option<String>,

    // Consents
    #[serde(default, alias = "consentInspection", deserialize_with = "lenient_consent")]
    pub consent_inspection: bool,
    #[serde(default, alias = "consentDataProcessing", deserialize_with = "lenient_consent")]
    pub consent_data_processing: bool,
}

impl ComplianceQuestionnaireAnswers {
    /// The raw answer given for a category
    pub fn answer(&self, category: ComplianceCategory) -> &str {
        match category {
            ComplianceCategory::BusinessRegistration => &self.has_business_registration,
            ComplianceCategory::TaxClearance => &self.has_tax_clearance,
            ComplianceCategory::TradingLicense => &self.has_trading_license,
            ComplianceCategory::FireSafety => &self.has_fire_safety,
            ComplianceCategory::HealthCertificate => &self.has_health_certificate,
            ComplianceCategory::Insurance => &self.has_insurance,
            ComplianceCategory::SafetyTraining => &self.has_safety_training,
        }
    }

    /// Record an answer for a category
    pub fn set_answer(&mut self, category: ComplianceCategory, answer: impl Into<String>) {
        let slot = match category {
            ComplianceCategory::BusinessRegistration => &mut self.has_business_registration,
            ComplianceCategory::TaxClearance => &mut self.has_tax_clearance,
            ComplianceCategory::TradingLicense => &mut self.has_trading_license,
            ComplianceCategory::FireSafety => &mut self.has_fire_safety,
            ComplianceCategory::HealthCertificate => &mut self.has_health_certificate,
            ComplianceCategory::Insurance => &mut self.has_insurance,
            ComplianceCategory::SafetyTraining => &mut self.has_safety_training,
        };
        *slot = answer.into();
    }

    /// Weighted checklist score in `0..=100`
    pub fn score(&self) -> i32 {
        COMPLIANCE_WEIGHTS
            .iter()
            .filter(|(category, _)| self.answer(*category) == AFFIRMATIVE_ANSWER)
            .map(|(_, points)| points)
            .sum()
    }

    /// Categories that did not earn points, in table order
    pub fn missing_categories(&self) -> Vec<ComplianceCategory> {
        COMPLIANCE_WEIGHTS
            .iter()
            .map(|(category, _)| *category)
            .filter(|category| self.answer(*category) != AFFIRMATIVE_ANSWER)
            .collect()
    }

    pub fn has_required_consents(&self) -> bool {
        self.consent_inspection && self.consent_data_processing
    }
}

/// Any non-string answer reads as unanswered
fn lenient_answer<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(answer) => answer,
        _ => String::new(),
    })
}

/// Consent is only given by an explicit `true`
fn lenient_consent<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(matches!(
        serde_json::Value::deserialize(deserializer)?,
        serde_json::Value::Bool(true)
    ))
}

/// Score a questionnaire submission
pub fn calculate_compliance_score(answers: &ComplianceQuestionnaireAnswers) -> i32 {
    answers.score()
}

/// Display band for a (possibly missing) compliance score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceBand {
    Compliant,
    NonCompliant,
    NotAssessed,
}

impl std::fmt::Display for ComplianceBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComplianceBand::Compliant => write!(f, "Compliant"),
            ComplianceBand::NonCompliant => write!(f, "Non-compliant"),
            ComplianceBand::NotAssessed => write!(f, "Not assessed"),
        }
    }
}

/// Classify a shop's compliance score
pub fn classify_compliance(score: Option<i32>) -> ComplianceBand {
    match score {
        None => ComplianceBand::NotAssessed,
        Some(s) if s < NON_COMPLIANCE_THRESHOLD => ComplianceBand::NonCompliant,
        Some(_) => ComplianceBand::Compliant,
    }
}
