//! Shop registration models

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::GeoPoint;

/// A registered spaza shop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shop {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub address: String,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub status: ShopStatus,
    /// 0-100, `None` until the shop has been assessed
    pub compliance_score: Option<i32>,
    pub business_type: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub trading_hours: TradingHours,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Shop {
    /// The shop's position, if both coordinates were captured
    pub fn location(&self) -> Option<GeoPoint> {
        GeoPoint::from_decimals(self.latitude, self.longitude)
    }

    pub fn is_approved(&self) -> bool {
        self.status == ShopStatus::Approved
    }
}

/// Verification status of a shop
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShopStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Suspended,
}

impl ShopStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShopStatus::Pending => "pending",
            ShopStatus::Approved => "approved",
            ShopStatus::Rejected => "rejected",
            ShopStatus::Suspended => "suspended",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ShopStatus::Pending),
            "approved" => Some(ShopStatus::Approved),
            "rejected" => Some(ShopStatus::Rejected),
            "suspended" => Some(ShopStatus::Suspended),
            _ => None,
        }
    }

    /// Whether an official may move a shop from `self` to `next`.
    ///
    /// `pending` resolves once to approved or rejected; approved shops can
    /// be suspended and reinstated. Rejection is final.
    pub fn can_transition_to(&self, next: ShopStatus) -> bool {
        matches!(
            (self, next),
            (ShopStatus::Pending, ShopStatus::Approved)
                | (ShopStatus::Pending, ShopStatus::Rejected)
                | (ShopStatus::Approved, ShopStatus::Suspended)
                | (ShopStatus::Suspended, ShopStatus::Approved)
        )
    }
}

impl std::fmt::Display for ShopStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShopStatus::Pending => write!(f, "Pending"),
            ShopStatus::Approved => write!(f, "Approved"),
            ShopStatus::Rejected => write!(f, "Rejected"),
            ShopStatus::Suspended => write!(f, "Suspended"),
        }
    }
}

/// Day of the week used as a trading-hours key
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

/// Opening hours for a single day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct DayHours {
    pub open: Option<NaiveTime>,
    pub close: Option<NaiveTime>,
    #[serde(default)]
    pub closed: bool,
}

impl DayHours {
    pub fn open_between(open: NaiveTime, close: NaiveTime) -> Self {
        Self {
            open: Some(open),
            close: Some(close),
            closed: false,
        }
    }

    pub fn closed() -> Self {
        Self {
            open: None,
            close: None,
            closed: true,
        }
    }
}

/// Weekly trading hours; days without an entry are unknown, not closed
pub type TradingHours = BTreeMap<Weekday, DayHours>;
