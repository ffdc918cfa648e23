use serde::{Deserialize, Serialize};

/// Represents one entry of the fixed ride-class catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RideType {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Price per kilometre, in whole currency units.
    pub rate_per_km: u64,
    pub eta_minutes: u32,
    pub features: Vec<String>,
    /// Shown instead of an exact fare until route distance is known.
    pub display_range: (u64, u64),
}

impl RideType {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        rate_per_km: u64,
        eta_minutes: u32,
        features: &[&str],
        display_range: (u64, u64),
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            rate_per_km,
            eta_minutes,
            features: features.iter().map(|f| f.to_string()).collect(),
            display_range,
        }
    }

    pub fn eta_label(&self) -> String {
        format!("{} min", self.eta_minutes)
    }
}

/// Immutable catalog of ride classes, defined at process start.
#[derive(Debug, Clone, PartialEq)]
pub struct RideCatalog {
    rides: Vec<RideType>,
}

impl RideCatalog {
    pub fn new(rides: Vec<RideType>) -> Self {
        Self { rides }
    }

    pub fn get(&self, id: &str) -> Option<&RideType> {
        self.rides.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RideType> {
        self.rides.iter()
    }
}

impl Default for RideCatalog {
    fn default() -> Self {
        Self::new(vec![
            RideType::new(
                "economy",
                "Economy",
                "Affordable everyday rides",
                1500,
                5,
                &["AC", "Standard Comfort", "Safe Ride"],
                (15_000, 20_000),
            ),
            RideType::new(
                "premium",
                "Premium",
                "Luxury comfort rides",
                2500,
                7,
                &["Premium Car", "Top Rated Driver", "Luxury Interior"],
                (25_000, 35_000),
            ),
            RideType::new(
                "suv",
                "SUV",
                "Spacious for groups",
                3000,
                10,
                &["6-8 Seats", "Extra Luggage Space", "Family Friendly"],
                (30_000, 40_000),
            ),
        ])
    }
}

/// Distance and duration between the two chosen locations, from the routing collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteInfo {
    pub distance_km: f64,
    pub duration_minutes: f64,
}

impl RouteInfo {
    pub fn new(distance_km: f64, duration_minutes: f64) -> Self {
        Self {
            distance_km,
            duration_minutes,
        }
    }

    /// Distance usable for pricing: finite and strictly positive.
    pub fn billable_distance(&self) -> Option<f64> {
        (self.distance_km.is_finite() && self.distance_km > 0.0).then_some(self.distance_km)
    }
}
