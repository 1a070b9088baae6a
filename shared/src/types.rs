//! Common types used across the portal

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A point on the earth's surface in decimal degrees
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Build a point from stored coordinates.
    ///
    /// Returns `None` unless both halves are present; a lone latitude or
    /// longitude never becomes a point.
    pub fn from_decimals(latitude: Option<Decimal>, longitude: Option<Decimal>) -> Option<Self> {
        let latitude = latitude?.to_f64()?;
        let longitude = longitude?.to_f64()?;
        Some(Self::new(latitude, longitude))
    }
}

/// Roles a portal user can hold
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Registers and runs one or more shops
    Owner,
    /// Government compliance official; approves shops and inspects them
    Official,
    /// Member of the public looking for nearby shops
    Customer,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Owner => "owner",
            UserRole::Official => "official",
            UserRole::Customer => "customer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "owner" => Some(UserRole::Owner),
            "official" => Some(UserRole::Official),
            "customer" => Some(UserRole::Customer),
            _ => None,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
