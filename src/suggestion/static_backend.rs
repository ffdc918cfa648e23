use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::SuggestionBackend;
use crate::domain::Suggestion;
use crate::error::NetworkError;

const KIGALI_PLACES: &[&str] = &[
    "Kigali International Airport, Kanombe",
    "Kigali City Tower, Nyarugenge",
    "Kigali Convention Centre, Kimihurura",
    "Kimironko Market, Gasabo",
    "Nyabugogo Bus Park, Nyarugenge",
    "Remera, Gasabo",
    "Kacyiru, Gasabo",
    "Kicukiro Centre, Kicukiro",
    "Nyamirambo, Nyarugenge",
    "Gikondo, Kicukiro",
    "Kimihurura, Gasabo",
    "Kibagabaga, Gasabo",
];

/// Offline suggestion backend matching a fixed list of Kigali place names.
pub struct StaticSuggestionBackend {
    places: Vec<String>,
    latency: Duration,
    limit: usize,
}

impl StaticSuggestionBackend {
    pub fn new(places: Vec<String>) -> Self {
        Self {
            places,
            latency: Duration::ZERO,
            limit: 5,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

impl Default for StaticSuggestionBackend {
    fn default() -> Self {
        Self::new(KIGALI_PLACES.iter().map(|p| p.to_string()).collect())
    }
}

#[async_trait]
impl SuggestionBackend for StaticSuggestionBackend {
    async fn suggest(
        &self,
        query: &str,
        cancel: CancellationToken,
    ) -> Result<Vec<Suggestion>, NetworkError> {
        if !self.latency.is_zero() {
            tokio::select! {
                _ = cancel.cancelled() => {
                    return Err(NetworkError::Request("request aborted".to_string()));
                }
                _ = tokio::time::sleep(self.latency) => {}
            }
        }

        let needle = query.trim().to_lowercase();
        Ok(self
            .places
            .iter()
            .enumerate()
            .filter(|(_, place)| place.to_lowercase().contains(&needle))
            .take(self.limit)
            .map(|(i, place)| Suggestion::with_key(place.clone(), format!("place-{}", i)))
            .collect())
    }
}
