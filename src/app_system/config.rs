use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use chrono::FixedOffset;

use crate::fare::{FareConfig, DEFAULT_BASE_FARE, DEFAULT_ROUNDING_UNIT};
use crate::suggestion::SuggestionConfig;

/// Runtime settings for the booking system.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingConfig {
    pub suggestions: SuggestionConfig,
    pub fares: FareConfig,
    pub payment_timeout: Duration,
    /// Artificial delay before a submitted order is confirmed.
    pub submit_latency: Duration,
    pub channel_size: usize,
    pub data_dir: PathBuf,
    /// Fixes trip-detail generation when set.
    pub trip_seed: Option<u64>,
    /// Rider's zone for display stamps. The host's local zone when unset.
    pub utc_offset: Option<FixedOffset>,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            suggestions: SuggestionConfig::default(),
            fares: FareConfig::default(),
            payment_timeout: Duration::from_secs(30),
            submit_latency: Duration::ZERO,
            channel_size: 32,
            data_dir: PathBuf::from("./booking-data"),
            trip_seed: None,
            utc_offset: None,
        }
    }
}

impl BookingConfig {
    /// Reads `BOOKING_*` variables. Missing or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let suggestions = SuggestionConfig {
            debounce: env_millis("BOOKING_DEBOUNCE_MS", defaults.suggestions.debounce),
            min_query_len: env_or("BOOKING_MIN_QUERY_LEN", defaults.suggestions.min_query_len),
            lookup_timeout: env_millis(
                "BOOKING_LOOKUP_TIMEOUT_MS",
                defaults.suggestions.lookup_timeout,
            ),
            ..defaults.suggestions
        };

        Self {
            suggestions,
            fares: FareConfig {
                base_fare: env_or("BOOKING_BASE_FARE", DEFAULT_BASE_FARE),
                rounding_unit: env_or("BOOKING_ROUNDING_UNIT", DEFAULT_ROUNDING_UNIT).max(1),
            },
            payment_timeout: env_millis("BOOKING_PAYMENT_TIMEOUT_MS", defaults.payment_timeout),
            submit_latency: env_millis("BOOKING_SUBMIT_LATENCY_MS", defaults.submit_latency),
            channel_size: env_or("BOOKING_CHANNEL_SIZE", defaults.channel_size).max(1),
            data_dir: std::env::var("BOOKING_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            trip_seed: std::env::var("BOOKING_TRIP_SEED")
                .ok()
                .and_then(|s| s.parse().ok()),
            utc_offset: std::env::var("BOOKING_UTC_OFFSET")
                .ok()
                .and_then(|s| s.parse().ok()),
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn env_millis(key: &str, default: Duration) -> Duration {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .map(Duration::from_millis)
        .unwrap_or(default)
}
