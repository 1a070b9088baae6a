//! WebAssembly module for the Spaza Compliance Portal
//!
//! Provides client-side computation for:
//! - Compliance questionnaire scoring
//! - Nearby-shop search
//! - Dashboard aggregates
//! - Session inactivity sign-out

use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::dashboard::*;
pub use shared::geo::*;
pub use shared::models::*;
pub use shared::types::*;

mod session_timer;

pub use session_timer::SessionTimer;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::debug_1(&JsValue::from_str("spaza portal wasm module loaded"));
}

fn parse_json<T: serde::de::DeserializeOwned>(json: &str, what: &str) -> Result<T, JsValue> {
    serde_json::from_str(json).map_err(|e| JsValue::from_str(&format!("Invalid {} JSON: {}", what, e)))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Score a questionnaire submission (0-100)
#[wasm_bindgen]
pub fn calculate_compliance_score(answers_json: &str) -> Result<i32, JsValue> {
    let answers: ComplianceQuestionnaireAnswers = parse_json(answers_json, "questionnaire")?;
    Ok(answers.score())
}

/// Classify a compliance score; pass a negative value for "not assessed"
#[wasm_bindgen]
pub fn classify_compliance_score(score: i32) -> String {
    let score = if score < 0 { None } else { Some(score) };
    format!("{}", classify_compliance(score))
}

/// Great-circle distance in kilometres
#[wasm_bindgen]
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    haversine_distance_km(&GeoPoint::new(lat1, lon1), &GeoPoint::new(lat2, lon2))
}

/// Nearby approved shops as JSON.
///
/// `latitude`/`longitude` are optional; without both, the first few
/// approved shops are returned. `radius_km` defaults to 5.
#[wasm_bindgen]
pub fn find_nearby_shops(
    shops_json: &str,
    latitude: Option<f64>,
    longitude: Option<f64>,
    radius_km: Option<f64>,
) -> Result<String, JsValue> {
    let shops: Vec<Shop> = parse_json(shops_json, "shops")?;
    let location = match (latitude, longitude) {
        (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
        _ => None,
    };
    let nearby = nearby_shops(&shops, location, radius_km.unwrap_or(DEFAULT_NEARBY_RADIUS_KM));
    to_json(&nearby)
}

/// Official dashboard figures as JSON, evaluated at the current time
#[wasm_bindgen]
pub fn official_dashboard(
    shops_json: &str,
    inspections_json: &str,
    documents_json: &str,
) -> Result<String, JsValue> {
    let shops: Vec<Shop> = parse_json(shops_json, "shops")?;
    let inspections: Vec<Inspection> = parse_json(inspections_json, "inspections")?;
    let documents: Vec<Document> = parse_json(documents_json, "documents")?;
    let dashboard = OfficialDashboard::compute(&shops, &inspections, &documents, chrono::Utc::now());
    to_json(&dashboard)
}

/// Whole-number percentage guarded against an empty denominator
#[wasm_bindgen]
pub fn percentage_of(numerator: u32, denominator: u32) -> i32 {
    percentage(numerator as usize, denominator as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_compliance_score() {
        let all_yes = r#"{
            "hasBusinessRegistration": "yes",
            "hasTaxClearance": "yes",
            "hasTradingLicense": "yes",
            "hasFireSafety": "yes",
            "hasHealthCertificate": "yes",
            "hasInsurance": "yes",
            "hasSafetyTraining": "yes"
        }"#;
        assert_eq!(calculate_compliance_score(all_yes).unwrap(), 100);
        assert_eq!(calculate_compliance_score("{}").unwrap(), 0);
    }

    #[test]
    fn test_calculate_compliance_score_with_malformed_answers() {
        let json = r#"{"hasFireSafety":"yes","hasHealthCertificate":"yes","hasInsurance":null,"hasTaxClearance":true}"#;
        assert_eq!(calculate_compliance_score(json).unwrap(), 40);
    }

    #[test]
    fn test_classify_compliance_score() {
        assert_eq!(classify_compliance_score(65), "Non-compliant");
        assert_eq!(classify_compliance_score(70), "Compliant");
        assert_eq!(classify_compliance_score(-1), "Not assessed");
    }

    #[test]
    fn test_distance_km() {
        assert_eq!(distance_km(-26.2041, 28.0473, -26.2041, 28.0473), 0.0);
    }

    #[test]
    fn test_find_nearby_shops_without_location() {
        let result = find_nearby_shops("[]", None, None, None).unwrap();
        assert_eq!(result, "[]");
    }

    #[test]
    fn test_find_nearby_shops_filters_approved() {
        let shops = serde_json::json!([
            {
                "id": uuid::Uuid::new_v4(),
                "owner_id": uuid::Uuid::new_v4(),
                "name": "Mama's Spaza",
                "address": "12 Vilakazi St, Soweto",
                "latitude": "-26.2041",
                "longitude": "28.0473",
                "status": "approved",
                "compliance_score": 80,
                "business_type": null,
                "created_at": "2024-01-01T00:00:00Z",
                "updated_at": "2024-01-01T00:00:00Z"
            },
            {
                "id": uuid::Uuid::new_v4(),
                "owner_id": uuid::Uuid::new_v4(),
                "name": "Corner Shop",
                "address": "3 Main Rd",
                "latitude": "-26.2041",
                "longitude": "28.0473",
                "status": "pending",
                "compliance_score": null,
                "business_type": null,
                "created_at": "2024-01-01T00:00:00Z",
                "updated_at": "2024-01-01T00:00:00Z"
            }
        ])
        .to_string();

        let result = find_nearby_shops(&shops, Some(-26.2041), Some(28.0473), Some(5.0)).unwrap();
        let nearby: Vec<NearbyShop> = serde_json::from_str(&result).unwrap();
        assert_eq!(nearby.len(), 1);
        assert_eq!(nearby[0].shop.name, "Mama's Spaza");
        assert_eq!(nearby[0].distance_km, Some(0.0));
    }

    #[test]
    fn test_percentage_of() {
        assert_eq!(percentage_of(0, 0), 0);
        assert_eq!(percentage_of(3, 4), 75);
    }
}
