//! Tests for Haversine distance and the nearby-shops filter

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{
    haversine_distance_km, nearby_shops, GeoPoint, Shop, ShopStatus, TradingHours,
    DEFAULT_NEARBY_RADIUS_KM, NEARBY_FALLBACK_LIMIT,
};
use uuid::Uuid;

const JOHANNESBURG: (f64, f64) = (-26.2041, 28.0473);

/// Kilometres per degree of latitude on the Haversine sphere
const KM_PER_DEGREE: f64 = 111.195;

fn dec(value: f64) -> Decimal {
    format!("{:.6}", value).parse().unwrap()
}

fn shop(name: &str, status: ShopStatus, location: Option<(f64, f64)>) -> Shop {
    let now = Utc::now();
    Shop {
        id: Uuid::new_v4(),
        owner_id: Uuid::new_v4(),
        name: name.to_string(),
        address: format!("{} Street", name),
        latitude: location.map(|(lat, _)| dec(lat)),
        longitude: location.map(|(_, lon)| dec(lon)),
        status,
        compliance_score: None,
        business_type: None,
        categories: Vec::new(),
        trading_hours: TradingHours::new(),
        created_at: now,
        updated_at: now,
    }
}

/// An approved shop `km` kilometres due north of Johannesburg
fn approved_north_of_joburg(name: &str, km: f64) -> Shop {
    shop(
        name,
        ShopStatus::Approved,
        Some((JOHANNESBURG.0 + km / KM_PER_DEGREE, JOHANNESBURG.1)),
    )
}

fn joburg() -> GeoPoint {
    GeoPoint::new(JOHANNESBURG.0, JOHANNESBURG.1)
}

fn names(result: &[shared::NearbyShop]) -> Vec<&str> {
    result.iter().map(|n| n.shop.name.as_str()).collect()
}

// =============================================================================
// Haversine distance
// =============================================================================

mod distance {
    use super::*;

    #[test]
    fn same_point_is_zero() {
        assert_eq!(haversine_distance_km(&joburg(), &joburg()), 0.0);
    }

    #[test]
    fn johannesburg_to_pretoria() {
        let pretoria = GeoPoint::new(-25.7479, 28.2293);
        let d = haversine_distance_km(&joburg(), &pretoria);
        assert!((d - 53.9).abs() < 0.5, "got {}", d);
    }

    #[test]
    fn one_degree_of_latitude() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(1.0, 0.0);
        let d = haversine_distance_km(&a, &b);
        assert!((d - KM_PER_DEGREE).abs() < 0.01, "got {}", d);
    }
}

// =============================================================================
// Nearby filter
// =============================================================================

mod nearby {
    use super::*;

    #[test]
    fn keeps_shops_inside_radius_only() {
        let shops = vec![
            approved_north_of_joburg("far", 8.0),
            approved_north_of_joburg("close", 3.0),
        ];

        let result = nearby_shops(&shops, Some(joburg()), DEFAULT_NEARBY_RADIUS_KM);

        assert_eq!(names(&result), vec!["close"]);
        let distance = result[0].distance_km.unwrap();
        assert!((distance - 3.0).abs() < 0.01, "got {}", distance);
    }

    #[test]
    fn shop_at_customer_location_is_included() {
        let shops = vec![shop("here", ShopStatus::Approved, Some(JOHANNESBURG))];
        let result = nearby_shops(&shops, Some(joburg()), DEFAULT_NEARBY_RADIUS_KM);
        assert_eq!(result.len(), 1);
        assert!(result[0].distance_km.unwrap() < 1e-3);
    }

    #[test]
    fn sorted_closest_first() {
        let shops = vec![
            approved_north_of_joburg("four", 4.0),
            approved_north_of_joburg("one", 1.0),
            approved_north_of_joburg("two", 2.0),
        ];
        let result = nearby_shops(&shops, Some(joburg()), DEFAULT_NEARBY_RADIUS_KM);
        assert_eq!(names(&result), vec!["one", "two", "four"]);
    }

    #[test]
    fn non_approved_shops_are_never_returned() {
        let shops = vec![
            shop("pending", ShopStatus::Pending, Some(JOHANNESBURG)),
            shop("rejected", ShopStatus::Rejected, Some(JOHANNESBURG)),
            shop("suspended", ShopStatus::Suspended, Some(JOHANNESBURG)),
            shop("approved", ShopStatus::Approved, Some(JOHANNESBURG)),
        ];
        let result = nearby_shops(&shops, Some(joburg()), DEFAULT_NEARBY_RADIUS_KM);
        assert_eq!(names(&result), vec!["approved"]);
    }

    #[test]
    fn shops_missing_a_coordinate_are_skipped() {
        let mut half = shop("half", ShopStatus::Approved, Some(JOHANNESBURG));
        half.longitude = None;
        let shops = vec![
            half,
            shop("none", ShopStatus::Approved, None),
            shop("full", ShopStatus::Approved, Some(JOHANNESBURG)),
        ];
        let result = nearby_shops(&shops, Some(joburg()), DEFAULT_NEARBY_RADIUS_KM);
        assert_eq!(names(&result), vec!["full"]);
    }

    #[test]
    fn equal_distances_keep_input_order() {
        let shops = vec![
            approved_north_of_joburg("b", 2.0),
            approved_north_of_joburg("a", 2.0),
            approved_north_of_joburg("c", 2.0),
        ];
        let result = nearby_shops(&shops, Some(joburg()), DEFAULT_NEARBY_RADIUS_KM);
        assert_eq!(names(&result), vec!["b", "a", "c"]);
    }

    #[test]
    fn empty_input_gives_empty_result() {
        assert!(nearby_shops(&[], Some(joburg()), DEFAULT_NEARBY_RADIUS_KM).is_empty());
        assert!(nearby_shops(&[], None, DEFAULT_NEARBY_RADIUS_KM).is_empty());
    }
}

// =============================================================================
// Fallback without a customer location
// =============================================================================

mod fallback {
    use super::*;

    #[test]
    fn first_five_approved_in_input_order() {
        let mut shops = Vec::new();
        for i in 0..8 {
            let status = if i % 3 == 1 {
                ShopStatus::Pending
            } else {
                ShopStatus::Approved
            };
            shops.push(shop(&format!("shop-{}", i), status, None));
        }

        let result = nearby_shops(&shops, None, DEFAULT_NEARBY_RADIUS_KM);

        assert_eq!(result.len(), NEARBY_FALLBACK_LIMIT);
        assert_eq!(
            names(&result),
            vec!["shop-0", "shop-2", "shop-3", "shop-5", "shop-6"]
        );
        assert!(result.iter().all(|n| n.distance_km.is_none()));
    }

    #[test]
    fn fewer_than_five_approved_returns_all_of_them() {
        let shops = vec![
            shop("a", ShopStatus::Approved, None),
            shop("b", ShopStatus::Suspended, None),
            shop("c", ShopStatus::Approved, Some(JOHANNESBURG)),
        ];
        let result = nearby_shops(&shops, None, DEFAULT_NEARBY_RADIUS_KM);
        assert_eq!(names(&result), vec!["a", "c"]);
    }
}

// =============================================================================
// Property tests
// =============================================================================

fn coordinate() -> impl Strategy<Value = (f64, f64)> {
    (-34.0f64..-22.0, 16.0f64..33.0)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Distance is symmetric and never negative
    #[test]
    fn distance_is_symmetric(a in coordinate(), b in coordinate()) {
        let p = GeoPoint::new(a.0, a.1);
        let q = GeoPoint::new(b.0, b.1);
        let there = haversine_distance_km(&p, &q);
        let back = haversine_distance_km(&q, &p);
        prop_assert!(there >= 0.0);
        prop_assert!((there - back).abs() < 1e-9);
    }

    /// Results are approved, inside the radius and in non-decreasing order
    #[test]
    fn results_are_approved_within_radius_and_sorted(
        offsets in proptest::collection::vec((-0.1f64..0.1, -0.1f64..0.1, any::<bool>()), 0..20),
        radius in 0.5f64..15.0,
    ) {
        let shops: Vec<Shop> = offsets
            .iter()
            .enumerate()
            .map(|(i, (dlat, dlon, approved))| {
                let status = if *approved { ShopStatus::Approved } else { ShopStatus::Pending };
                shop(
                    &format!("shop-{}", i),
                    status,
                    Some((JOHANNESBURG.0 + dlat, JOHANNESBURG.1 + dlon)),
                )
            })
            .collect();

        let result = nearby_shops(&shops, Some(joburg()), radius);

        prop_assert!(result.iter().all(|n| n.shop.status == ShopStatus::Approved));
        let distances: Vec<f64> = result.iter().map(|n| n.distance_km.unwrap()).collect();
        prop_assert!(distances.iter().all(|d| *d <= radius));
        prop_assert!(distances.windows(2).all(|w| w[0] <= w[1]));
    }
}
