use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use crate::domain::Suggestion;
use crate::error::NetworkError;

/// Address-suggestion service consumed by the location fields.
///
/// Implementations should stop work when `cancel` fires, but need not: the client
/// drops any result that arrives after cancellation.
#[async_trait]
pub trait SuggestionBackend: Send + Sync {
    async fn suggest(
        &self,
        query: &str,
        cancel: CancellationToken,
    ) -> Result<Vec<Suggestion>, NetworkError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestionConfig {
    pub debounce: Duration,
    pub min_query_len: usize,
    pub lookup_timeout: Duration,
    pub max_text_len: usize,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(350),
            min_query_len: 2,
            lookup_timeout: Duration::from_secs(10),
            max_text_len: 200,
        }
    }
}

/// Result of a lookup that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Suggestions(Vec<Suggestion>),
    /// Superseded or abandoned; callers drop it silently.
    Cancelled,
}

#[derive(Clone)]
pub struct SuggestionClient {
    backend: Arc<dyn SuggestionBackend>,
    config: SuggestionConfig,
}

impl SuggestionClient {
    pub fn new(backend: Arc<dyn SuggestionBackend>, config: SuggestionConfig) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> &SuggestionConfig {
        &self.config
    }

    /// Whether `query` is long enough to reach the backend.
    pub fn accepts(&self, query: &str) -> bool {
        query.trim().chars().count() >= self.config.min_query_len
    }

    #[instrument(skip(self, cancel))]
    pub async fn request(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<LookupOutcome, NetworkError> {
        if !self.accepts(query) {
            debug!("Query too short, skipping lookup");
            return Ok(LookupOutcome::Suggestions(Vec::new()));
        }
        if cancel.is_cancelled() {
            return Ok(LookupOutcome::Cancelled);
        }

        debug!("Dispatching lookup");
        let lookup = tokio::time::timeout(
            self.config.lookup_timeout,
            self.backend.suggest(query, cancel.clone()),
        );
        let result = tokio::select! {
            _ = cancel.cancelled() => return Ok(LookupOutcome::Cancelled),
            result = lookup => result,
        };
        // A backend that reacts to cancellation by failing must not surface as an error.
        if cancel.is_cancelled() {
            return Ok(LookupOutcome::Cancelled);
        }

        match result {
            Err(_) => Err(NetworkError::Timeout(self.config.lookup_timeout)),
            Ok(Err(e)) => Err(e),
            Ok(Ok(suggestions)) => {
                debug!(count = suggestions.len(), "Lookup succeeded");
                Ok(LookupOutcome::Suggestions(
                    suggestions.into_iter().map(|s| self.bounded(s)).collect(),
                ))
            }
        }
    }

    fn bounded(&self, mut suggestion: Suggestion) -> Suggestion {
        if suggestion.text.chars().count() > self.config.max_text_len {
            suggestion.text = suggestion.text.chars().take(self.config.max_text_len).collect();
        }
        suggestion
    }
}
