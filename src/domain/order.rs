use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fare::{group_thousands, CURRENCY};

/// Lifecycle of an order inside the booking workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderStatus {
    Confirmed,
    Paying,
    Completed,
}

/// Price attached to an order: exact once route distance is known, else the catalog range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Fare {
    Exact { amount: u64 },
    Range { low: u64, high: u64 },
}

impl Fare {
    pub fn exact(&self) -> Option<u64> {
        match self {
            Fare::Exact { amount } => Some(*amount),
            Fare::Range { .. } => None,
        }
    }
}

impl std::fmt::Display for Fare {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Fare::Exact { amount } => write!(f, "{} {}", group_thousands(*amount), CURRENCY),
            Fare::Range { low, high } => write!(
                f,
                "{}-{} {}",
                group_thousands(*low),
                group_thousands(*high),
                CURRENCY
            ),
        }
    }
}

/// When the ride is wanted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "option", rename_all = "camelCase")]
pub enum RideTiming {
    #[default]
    Now,
    Scheduled {
        date: Option<NaiveDate>,
        time: Option<NaiveTime>,
    },
}

impl RideTiming {
    pub fn is_immediate(&self) -> bool {
        matches!(self, RideTiming::Now)
    }
}

/// Represents a confirmed ride booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub pickup_text: String,
    pub dropoff_text: String,
    pub ride_type_id: String,
    pub ride_type_name: String,
    pub price: Fare,
    /// Display-formatted date, e.g. "October 19, 2026".
    pub date: String,
    /// Display-formatted time, e.g. "02:30 PM".
    pub time: String,
    pub immediate: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub status: OrderStatus,
}

/// Presentation-only details attached to a completed ride.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripDetails {
    pub driver_name: String,
    pub rating: f32,
    pub duration_label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaymentStatus {
    Paid,
}

/// A completed order as stored in history, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderHistoryEntry {
    #[serde(flatten)]
    pub order: Order,
    pub payment_record: serde_json::Value,
    pub payment_status: PaymentStatus,
    pub completed_at: DateTime<Utc>,
    pub driver_name: String,
    pub rating: f32,
    pub duration_label: String,
}

impl OrderHistoryEntry {
    /// Merges payment data and trip details into a finished order.
    pub fn complete(
        mut order: Order,
        payment_record: serde_json::Value,
        completed_at: DateTime<Utc>,
        trip: TripDetails,
    ) -> Self {
        order.status = OrderStatus::Completed;
        Self {
            order,
            payment_record,
            payment_status: PaymentStatus::Paid,
            completed_at,
            driver_name: trip.driver_name,
            rating: trip.rating,
            duration_label: trip.duration_label,
        }
    }

    pub fn id(&self) -> &str {
        &self.order.id
    }
}
