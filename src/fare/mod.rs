//! Fare calculation. Pure and deterministic: identical inputs always give identical prices.

use std::sync::Arc;

use crate::domain::{Fare, RideCatalog, RouteInfo};

pub const CURRENCY: &str = "RWF";
pub const DEFAULT_BASE_FARE: u64 = 2000;
pub const DEFAULT_ROUNDING_UNIT: u64 = 500;
/// Largest total that can be priced exactly from an `f64` distance.
pub const MAX_EXACT_TOTAL: u64 = 1 << 53;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FareConfig {
    pub base_fare: u64,
    pub rounding_unit: u64,
}

impl Default for FareConfig {
    fn default() -> Self {
        Self {
            base_fare: DEFAULT_BASE_FARE,
            rounding_unit: DEFAULT_ROUNDING_UNIT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FareEngine {
    catalog: Arc<RideCatalog>,
    config: FareConfig,
}

impl FareEngine {
    pub fn new(catalog: Arc<RideCatalog>, config: FareConfig) -> Self {
        Self { catalog, config }
    }

    pub fn catalog(&self) -> &RideCatalog {
        &self.catalog
    }

    /// `round_half_up(base + distance * rate, unit)`, or `None` when the distance is
    /// missing, zero or negative, too large to price exactly, or the ride type is
    /// not in the catalog.
    pub fn calculate(&self, distance_km: Option<f64>, ride_type_id: &str) -> Option<u64> {
        let ride = self.catalog.get(ride_type_id)?;
        let distance = distance_km.filter(|d| d.is_finite() && *d > 0.0)?;

        let distance_cost = distance * ride.rate_per_km as f64;
        if distance_cost >= MAX_EXACT_TOTAL as f64 {
            return None;
        }
        // Below 2^53 the whole part converts to u64 without loss.
        let whole = distance_cost.floor();
        let fraction = distance_cost - whole;
        let total = self.config.base_fare.checked_add(whole as u64)?;
        if total >= MAX_EXACT_TOTAL {
            return None;
        }

        let unit = self.config.rounding_unit.max(1);
        let remainder = total % unit;
        let rounded_down = total - remainder;
        if (remainder as f64 + fraction) * 2.0 >= unit as f64 {
            rounded_down.checked_add(unit)
        } else {
            Some(rounded_down)
        }
    }

    /// Exact fare when the route is known, otherwise the catalog display range.
    /// `None` only for ride types outside the catalog.
    pub fn quote(&self, route: Option<&RouteInfo>, ride_type_id: &str) -> Option<Fare> {
        let ride = self.catalog.get(ride_type_id)?;
        let distance = route.and_then(RouteInfo::billable_distance);
        match self.calculate(distance, ride_type_id) {
            Some(amount) => Some(Fare::Exact { amount }),
            None => Some(Fare::Range {
                low: ride.display_range.0,
                high: ride.display_range.1,
            }),
        }
    }
}

/// `11000` -> `"11,000"`.
pub fn group_thousands(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// `11000` -> `"11,000 RWF"`.
pub fn format_price(amount: u64) -> String {
    format!("{} {}", group_thousands(amount), CURRENCY)
}
