//! Tests for the official and owner dashboard aggregates

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use shared::{
    average_score, non_compliant_shops, percentage, upcoming_inspections, ComplianceCategories,
    Document, DocumentStatus, DocumentType, Inspection, InspectionStatus, OfficialDashboard,
    OwnerDashboard, Shop, ShopStatus, TradingHours,
};
use uuid::Uuid;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

fn shop(owner_id: Uuid, status: ShopStatus, score: Option<i32>) -> Shop {
    Shop {
        id: Uuid::new_v4(),
        owner_id,
        name: "Mama Thandi's Spaza".to_string(),
        address: "12 Vilakazi Street, Soweto".to_string(),
        latitude: None,
        longitude: None,
        status,
        compliance_score: score,
        business_type: None,
        categories: Vec::new(),
        trading_hours: TradingHours::new(),
        created_at: now(),
        updated_at: now(),
    }
}

fn inspection(shop_id: Uuid, status: InspectionStatus, in_days: i64) -> Inspection {
    Inspection {
        id: Uuid::new_v4(),
        shop_id,
        inspector_id: None,
        inspection_type: "routine".to_string(),
        status,
        scheduled_date: now() + Duration::days(in_days),
        completed_date: None,
        score: None,
        notes: None,
        issues: Vec::new(),
        created_at: now(),
    }
}

fn document(shop_id: Uuid, status: DocumentStatus) -> Document {
    Document {
        id: Uuid::new_v4(),
        shop_id,
        document_type: DocumentType::TradingLicense,
        file_name: "licence.pdf".to_string(),
        storage_path: format!("shops/{}/licence.pdf", shop_id),
        status,
        uploaded_at: now(),
        reviewed_at: None,
    }
}

// =============================================================================
// Non-compliance count
// =============================================================================

mod non_compliance {
    use super::*;

    #[test]
    fn threshold_is_exclusive() {
        let owner = Uuid::new_v4();
        let shops = vec![
            shop(owner, ShopStatus::Approved, Some(65)),
            shop(owner, ShopStatus::Approved, Some(70)),
        ];
        let flagged = non_compliant_shops(&shops);
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].compliance_score, Some(65));
    }

    #[test]
    fn unassessed_shops_are_not_flagged() {
        let owner = Uuid::new_v4();
        let shops = vec![
            shop(owner, ShopStatus::Pending, None),
            shop(owner, ShopStatus::Approved, Some(0)),
        ];
        assert_eq!(non_compliant_shops(&shops).len(), 1);
    }
}

// =============================================================================
// Official dashboard
// =============================================================================

mod official {
    use super::*;

    #[test]
    fn empty_snapshot_is_all_zero() {
        let dashboard = OfficialDashboard::compute(&[], &[], &[], now());
        assert_eq!(dashboard.total_shops, 0);
        assert_eq!(dashboard.pending_shops, 0);
        assert_eq!(dashboard.non_compliant_shops, 0);
        assert_eq!(dashboard.upcoming_inspections, 0);
        assert_eq!(dashboard.categories, ComplianceCategories::default());
    }

    #[test]
    fn counts_and_percentages() {
        let owner = Uuid::new_v4();
        let shops = vec![
            shop(owner, ShopStatus::Approved, Some(90)),
            shop(owner, ShopStatus::Approved, Some(40)),
            shop(owner, ShopStatus::Pending, None),
        ];
        let inspections = vec![
            inspection(shops[0].id, InspectionStatus::Completed, -3),
            inspection(shops[1].id, InspectionStatus::Scheduled, 2),
            inspection(shops[2].id, InspectionStatus::Scheduled, -1),
            inspection(shops[2].id, InspectionStatus::Cancelled, 5),
        ];
        let documents = vec![
            document(shops[0].id, DocumentStatus::Approved),
            document(shops[1].id, DocumentStatus::Rejected),
            document(shops[2].id, DocumentStatus::Pending),
        ];

        let dashboard = OfficialDashboard::compute(&shops, &inspections, &documents, now());

        assert_eq!(dashboard.total_shops, 3);
        assert_eq!(dashboard.pending_shops, 1);
        assert_eq!(dashboard.approved_shops, 2);
        assert_eq!(dashboard.non_compliant_shops, 1);
        assert_eq!(dashboard.upcoming_inspections, 1);
        assert_eq!(dashboard.categories.food_safety, 67);
        assert_eq!(dashboard.categories.documentation, 67);
        assert_eq!(dashboard.categories.inspections, 25);
        assert_eq!(dashboard.categories.compliance_rate, 67);
    }

    #[test]
    fn overdue_scheduled_inspection_is_not_upcoming() {
        let shop_id = Uuid::new_v4();
        let inspections = vec![
            inspection(shop_id, InspectionStatus::Scheduled, -1),
            inspection(shop_id, InspectionStatus::InProgress, 1),
            inspection(shop_id, InspectionStatus::Scheduled, 1),
        ];
        assert_eq!(upcoming_inspections(&inspections, now()).len(), 1);
    }

    #[test]
    fn inspection_scheduled_exactly_now_is_not_upcoming() {
        let shop_id = Uuid::new_v4();
        let due_now = inspection(shop_id, InspectionStatus::Scheduled, 0);
        assert_eq!(due_now.scheduled_date, now());
        assert!(upcoming_inspections(&[due_now.clone()], now()).is_empty());

        let mut one_second_later = due_now;
        one_second_later.scheduled_date = now() + Duration::seconds(1);
        assert_eq!(upcoming_inspections(&[one_second_later], now()).len(), 1);
    }
}

// =============================================================================
// Owner dashboard
// =============================================================================

mod owner {
    use super::*;

    #[test]
    fn only_own_records_are_counted() {
        let me = Uuid::new_v4();
        let someone_else = Uuid::new_v4();
        let shops = vec![
            shop(me, ShopStatus::Approved, Some(80)),
            shop(me, ShopStatus::Pending, Some(61)),
            shop(someone_else, ShopStatus::Approved, Some(10)),
        ];
        let inspections = vec![
            inspection(shops[0].id, InspectionStatus::Scheduled, 3),
            inspection(shops[2].id, InspectionStatus::Scheduled, 3),
        ];
        let documents = vec![
            document(shops[1].id, DocumentStatus::Pending),
            document(shops[2].id, DocumentStatus::Pending),
            document(shops[0].id, DocumentStatus::Approved),
        ];

        let dashboard = OwnerDashboard::compute(me, &shops, &inspections, &documents, now());

        assert_eq!(dashboard.owner_id, me);
        assert_eq!(dashboard.shops.len(), 2);
        assert!(dashboard.shops.iter().all(|s| s.owner_id == me));
        assert_eq!(dashboard.pending_documents, 1);
        assert_eq!(dashboard.upcoming_inspections.len(), 1);
        assert_eq!(dashboard.upcoming_inspections[0].shop_id, shops[0].id);
        assert_eq!(dashboard.average_compliance_score, Some(71));
    }

    #[test]
    fn no_assessed_shops_has_no_average() {
        let me = Uuid::new_v4();
        let shops = vec![shop(me, ShopStatus::Pending, None)];
        assert_eq!(average_score(&shops), None);
        let dashboard = OwnerDashboard::compute(me, &shops, &[], &[], now());
        assert_eq!(dashboard.average_compliance_score, None);
    }
}

// =============================================================================
// Property tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Percentages stay within 0..=100 and an empty denominator gives 0
    #[test]
    fn percentage_is_bounded(denominator in 0usize..1000, part in 0usize..1000) {
        let numerator = if denominator == 0 { 0 } else { part % (denominator + 1) };
        let value = percentage(numerator, denominator);
        prop_assert!((0..=100).contains(&value));
        if denominator == 0 {
            prop_assert_eq!(value, 0);
        }
    }

    /// The dashboard partitions shops consistently
    #[test]
    fn dashboard_counts_are_consistent(
        entries in proptest::collection::vec((0u8..4, proptest::option::of(0i32..=100)), 0..30),
    ) {
        let owner = Uuid::new_v4();
        let shops: Vec<Shop> = entries
            .iter()
            .map(|(status, score)| {
                let status = match status {
                    0 => ShopStatus::Pending,
                    1 => ShopStatus::Approved,
                    2 => ShopStatus::Rejected,
                    _ => ShopStatus::Suspended,
                };
                shop(owner, status, *score)
            })
            .collect();

        let dashboard = OfficialDashboard::compute(&shops, &[], &[], now());
        let expected_flagged = shops
            .iter()
            .filter(|s| matches!(s.compliance_score, Some(v) if v < 70))
            .count();

        prop_assert_eq!(dashboard.total_shops, shops.len());
        prop_assert!(dashboard.pending_shops + dashboard.approved_shops <= dashboard.total_shops);
        prop_assert_eq!(dashboard.non_compliant_shops, expected_flagged);
    }
}
