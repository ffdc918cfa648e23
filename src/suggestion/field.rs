use serde::Serialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use super::{Debouncer, LookupOutcome, SuggestionClient};
use crate::domain::{LocationField, LocationQuery, Suggestion};
use crate::error::NetworkError;

/// What a location field currently shows under the input.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum SuggestionState {
    /// No answer for the current text yet, or the input was too short or dismissed.
    #[default]
    Idle,
    /// Answer to the latest query. May be empty.
    Ready { suggestions: Vec<Suggestion> },
    /// The latest query failed; the list is cleared and the message shown as a banner.
    Failed { message: String },
}

impl SuggestionState {
    pub fn suggestions(&self) -> &[Suggestion] {
        match self {
            SuggestionState::Ready { suggestions } => suggestions,
            _ => &[],
        }
    }
}

/// A finished lookup, routed back to the owning field.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionDelivery {
    pub field: LocationField,
    pub seq: u64,
    pub result: Result<Vec<Suggestion>, NetworkError>,
}

/// Per-field suggestion state: debounce, cancellation and stale-result filtering.
///
/// Every input bumps the field's sequence number and cancels whatever was pending.
/// A delivery is applied only if it carries the latest sequence number, so a late
/// answer to a superseded query can never overwrite the list.
pub struct SuggestionField {
    field: LocationField,
    client: SuggestionClient,
    debouncer: Debouncer,
    latest_seq: u64,
    state: SuggestionState,
}

impl SuggestionField {
    pub fn new(field: LocationField, client: SuggestionClient) -> Self {
        let debouncer = Debouncer::new(client.config().debounce);
        Self {
            field,
            client,
            debouncer,
            latest_seq: 0,
            state: SuggestionState::Idle,
        }
    }

    pub fn field(&self) -> LocationField {
        self.field
    }

    pub fn state(&self) -> &SuggestionState {
        &self.state
    }

    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    /// Issues a query for `text`. Returns whether the visible state changed.
    #[instrument(skip(self, deliveries), fields(field = %self.field))]
    pub fn input(
        &mut self,
        text: &str,
        deliveries: &mpsc::UnboundedSender<SuggestionDelivery>,
    ) -> bool {
        self.latest_seq += 1;
        self.debouncer.cancel();
        let query = LocationQuery::new(text, self.latest_seq);

        if !self.client.accepts(&query.text) {
            debug!(seq = query.seq, "Query too short, clearing suggestions");
            return self.set_state(SuggestionState::Idle);
        }

        let client = self.client.clone();
        let deliveries = deliveries.clone();
        let field = self.field;
        let token = CancellationToken::new();
        let cancel = token.clone();

        self.debouncer.schedule(token, async move {
            let result = match client.request(&query.text, &cancel).await {
                Ok(LookupOutcome::Cancelled) => {
                    debug!(%field, seq = query.seq, "Lookup cancelled");
                    return;
                }
                Ok(LookupOutcome::Suggestions(list)) => Ok(list),
                Err(e) => Err(e),
            };
            let _ = deliveries.send(SuggestionDelivery {
                field,
                seq: query.seq,
                result,
            });
        });
        // The previous answer no longer matches the text in the field.
        self.set_state(SuggestionState::Idle)
    }

    /// Applies a delivery if it answers the latest query. Returns whether the state changed.
    #[instrument(skip(self, delivery), fields(field = %self.field, seq = delivery.seq))]
    pub fn apply(&mut self, delivery: SuggestionDelivery) -> bool {
        if delivery.seq != self.latest_seq {
            debug!(latest = self.latest_seq, "Discarding stale suggestions");
            return false;
        }
        match delivery.result {
            Ok(suggestions) => self.set_state(SuggestionState::Ready { suggestions }),
            Err(e) => {
                warn!(error = %e, "Suggestion lookup failed");
                self.set_state(SuggestionState::Failed {
                    message: e.user_message().to_string(),
                })
            }
        }
    }

    /// Cancels any pending lookup and clears the list.
    pub fn dismiss(&mut self) -> bool {
        self.latest_seq += 1;
        self.debouncer.cancel();
        self.set_state(SuggestionState::Idle)
    }

    fn set_state(&mut self, state: SuggestionState) -> bool {
        if self.state == state {
            return false;
        }
        self.state = state;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_framework::RecordingBackend;
    use crate::suggestion::SuggestionConfig;
    use std::sync::Arc;
    use std::time::Duration;

    fn field(backend: &Arc<RecordingBackend>) -> SuggestionField {
        let client = SuggestionClient::new(backend.clone(), SuggestionConfig::default());
        SuggestionField::new(LocationField::Pickup, client)
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_typing_dispatches_one_lookup() {
        let backend = Arc::new(RecordingBackend::new());
        let mut field = field(&backend);
        let (tx, mut rx) = mpsc::unbounded_channel();

        field.input("K", &tx);
        tokio::time::sleep(Duration::from_millis(100)).await;
        field.input("Ki", &tx);
        tokio::time::sleep(Duration::from_millis(100)).await;
        field.input("Kig", &tx);
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(backend.calls(), vec!["Kig".to_string()]);

        let delivery = rx.recv().await.expect("delivery");
        assert_eq!(delivery.seq, 3);
        assert!(field.apply(delivery));
        assert_eq!(
            field.state().suggestions(),
            RecordingBackend::suggestions_for("Kig").as_slice()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_delivery_is_discarded() {
        let backend = Arc::new(RecordingBackend::new());
        let mut field = field(&backend);
        let (tx, _rx) = mpsc::unbounded_channel();

        field.input("Kigali", &tx);
        field.input("Kigali City", &tx);

        let stale = SuggestionDelivery {
            field: LocationField::Pickup,
            seq: 1,
            result: Ok(RecordingBackend::suggestions_for("Kigali")),
        };
        assert!(!field.apply(stale));
        assert_eq!(field.state(), &SuggestionState::Idle);

        let fresh = SuggestionDelivery {
            field: LocationField::Pickup,
            seq: 2,
            result: Ok(RecordingBackend::suggestions_for("Kigali City")),
        };
        assert!(field.apply(fresh));
        assert_eq!(
            field.state().suggestions(),
            RecordingBackend::suggestions_for("Kigali City").as_slice()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn failure_clears_the_list_and_sets_a_banner() {
        let backend = Arc::new(RecordingBackend::new().failing("Remera"));
        let mut field = field(&backend);
        let (tx, mut rx) = mpsc::unbounded_channel();

        field.input("Kimironko", &tx);
        let delivery = rx.recv().await.expect("delivery");
        field.apply(delivery);
        assert!(!field.state().suggestions().is_empty());

        field.input("Remera", &tx);
        let delivery = rx.recv().await.expect("delivery");
        assert!(field.apply(delivery));
        assert_eq!(
            field.state(),
            &SuggestionState::Failed {
                message: "Failed to load suggestions. Try again.".to_string()
            }
        );
        assert!(field.state().suggestions().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn new_query_hides_the_previous_answer() {
        let backend = Arc::new(RecordingBackend::new());
        let mut field = field(&backend);
        let (tx, mut rx) = mpsc::unbounded_channel();

        field.input("Kimironko", &tx);
        let delivery = rx.recv().await.expect("delivery");
        assert!(field.apply(delivery));
        assert!(!field.state().suggestions().is_empty());

        assert!(field.input("Kicukiro", &tx));
        assert_eq!(field.state(), &SuggestionState::Idle);

        let delivery = rx.recv().await.expect("delivery");
        assert!(field.apply(delivery));
        assert_eq!(
            field.state().suggestions(),
            RecordingBackend::suggestions_for("Kicukiro").as_slice()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn shortening_the_input_cancels_the_pending_lookup() {
        let backend = Arc::new(RecordingBackend::new());
        let mut field = field(&backend);
        let (tx, _rx) = mpsc::unbounded_channel();

        field.input("Ny", &tx);
        tokio::time::sleep(Duration::from_millis(100)).await;
        field.input("N", &tx);
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(backend.calls().is_empty());
        assert_eq!(field.state(), &SuggestionState::Idle);
    }
}
