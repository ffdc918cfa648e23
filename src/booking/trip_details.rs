use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::domain::{Order, TripDetails};

pub const DRIVER_ROSTER: &[&str] = &[
    "Jean Claude",
    "Marie Aimee",
    "Paul R.",
    "Alice M.",
    "John D.",
    "Chantal U.",
    "Eric K.",
    "Divine I.",
];

/// Produces the presentation-only details shown for a completed ride.
pub trait TripDetailsGenerator: Send {
    fn generate(&mut self, order: &Order) -> TripDetails;
}

/// Draws driver, rating and duration from a seedable RNG, so a fixed seed
/// replays the same completions.
pub struct SeededTripDetails {
    rng: StdRng,
}

impl SeededTripDetails {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl TripDetailsGenerator for SeededTripDetails {
    fn generate(&mut self, _order: &Order) -> TripDetails {
        let driver_name = DRIVER_ROSTER
            .choose(&mut self.rng)
            .copied()
            .unwrap_or("Jean Claude")
            .to_string();
        // 4.0 ..= 5.0 in tenths
        let rating = self.rng.gen_range(40..=50) as f32 / 10.0;
        let minutes = self.rng.gen_range(10..=30);

        TripDetails {
            driver_name,
            rating,
            duration_label: format!("{} min", minutes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_framework::sample_order;

    #[test]
    fn same_seed_replays_the_same_details() {
        let order = sample_order("order_1");
        let mut a = SeededTripDetails::new(42);
        let mut b = SeededTripDetails::new(42);

        for _ in 0..5 {
            assert_eq!(a.generate(&order), b.generate(&order));
        }
    }

    #[test]
    fn details_stay_within_bounds() {
        let order = sample_order("order_1");
        let mut generator = SeededTripDetails::new(7);

        for _ in 0..200 {
            let details = generator.generate(&order);
            assert!(DRIVER_ROSTER.contains(&details.driver_name.as_str()));
            assert!((4.0..=5.0).contains(&details.rating));

            let minutes: u32 = details
                .duration_label
                .trim_end_matches(" min")
                .parse()
                .expect("minutes");
            assert!((10..=30).contains(&minutes));
        }
    }
}
