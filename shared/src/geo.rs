//! Great-circle distance and the customer "nearby shops" filter

use serde::{Deserialize, Serialize};

use crate::models::Shop;
use crate::types::GeoPoint;

/// Mean earth radius used by the Haversine formula
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Search radius when the caller does not pick one
pub const DEFAULT_NEARBY_RADIUS_KM: f64 = 5.0;

/// How many approved shops to show when the customer's location is unknown
pub const NEARBY_FALLBACK_LIMIT: usize = 5;

/// Haversine distance between two points in kilometres.
///
/// Inputs are not range-checked; latitudes beyond ±90° give a number,
/// not an error.
pub fn haversine_distance_km(from: &GeoPoint, to: &GeoPoint) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// A shop returned by [`nearby_shops`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyShop {
    pub shop: Shop,
    /// Absent when no customer location was supplied
    pub distance_km: Option<f64>,
}

/// Approved shops near `location`, closest first.
///
/// Without a location this is simply the first [`NEARBY_FALLBACK_LIMIT`]
/// approved shops in input order. With one, shops lacking either coordinate
/// are skipped, and ties keep their input order.
pub fn nearby_shops(shops: &[Shop], location: Option<GeoPoint>, radius_km: f64) -> Vec<NearbyShop> {
    let Some(origin) = location else {
        return shops
            .iter()
            .filter(|shop| shop.is_approved())
            .take(NEARBY_FALLBACK_LIMIT)
            .map(|shop| NearbyShop {
                shop: shop.clone(),
                distance_km: None,
            })
            .collect();
    };

    let mut within: Vec<(f64, &Shop)> = shops
        .iter()
        .filter(|shop| shop.is_approved())
        .filter_map(|shop| {
            let point = shop.location()?;
            let distance = haversine_distance_km(&origin, &point);
            (distance <= radius_km).then_some((distance, shop))
        })
        .collect();

    // sort_by is stable
    within.sort_by(|a, b| a.0.total_cmp(&b.0));

    within
        .into_iter()
        .map(|(distance, shop)| NearbyShop {
            shop: shop.clone(),
            distance_km: Some(distance),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn johannesburg_to_pretoria() {
        let jhb = GeoPoint::new(-26.2041, 28.0473);
        let pta = GeoPoint::new(-25.7479, 28.2293);
        let d = haversine_distance_km(&jhb, &pta);
        assert!((d - 53.9).abs() < 1.0, "got {d}");
    }

    #[test]
    fn same_point_is_zero() {
        let p = GeoPoint::new(-33.9249, 18.4241);
        assert_eq!(haversine_distance_km(&p, &p), 0.0);
    }

    #[test]
    fn antipodes_are_half_circumference() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 180.0);
        let d = haversine_distance_km(&a, &b);
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }
}
