use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, instrument};

use super::macros::client_method;
use crate::booking::{BookingEvent, BookingSnapshot, PaymentOutcome, SubmitOutcome};
use crate::domain::{
    Fare, LocationField, Order, OrderHistoryEntry, RideTiming, RouteInfo, Suggestion, UserRecord,
};
use crate::error::BookingError;
use crate::messages::BookingRequest;
use crate::suggestion::SuggestionState;

/// Client for the booking service. Thin wrapper around the request channel,
/// plus a subscription point for workflow events.
#[derive(Clone)]
pub struct BookingClient {
    sender: mpsc::Sender<BookingRequest>,
    events: broadcast::Sender<BookingEvent>,
}

impl BookingClient {
    pub fn new(sender: mpsc::Sender<BookingRequest>, events: broadcast::Sender<BookingEvent>) -> Self {
        Self { sender, events }
    }

    /// Receives every event published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<BookingEvent> {
        self.events.subscribe()
    }

    /// Payment details are passed through to the gateway and never logged.
    #[instrument(skip(self, details))]
    pub async fn pay(&self, details: serde_json::Value) -> Result<PaymentOutcome, BookingError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(BookingRequest::Pay { details, respond_to })
            .await
            .map_err(|_| BookingError::ActorCommunicationError("Actor closed".to_string()))?;

        response
            .await
            .map_err(|_| BookingError::ActorCommunicationError("Actor dropped".to_string()))?
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn sign_in(&self, user: UserRecord) -> Result<(), BookingError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(BookingRequest::SignIn { user, respond_to })
            .await
            .map_err(|_| BookingError::ActorCommunicationError("Actor closed".to_string()))?;

        response
            .await
            .map_err(|_| BookingError::ActorCommunicationError("Actor dropped".to_string()))?
    }

    /// Manual method, no response needed
    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), BookingError> {
        debug!("Sending shutdown request");
        self.sender
            .send(BookingRequest::Shutdown)
            .await
            .map_err(|e| BookingError::ActorCommunicationError(e.to_string()))?;
        Ok(())
    }
}

client_method!(BookingClient => fn set_location(field: LocationField, text: String) -> () as BookingRequest::SetLocation, Error = BookingError);
client_method!(BookingClient => fn select_suggestion(field: LocationField, suggestion: Suggestion) -> () as BookingRequest::SelectSuggestion, Error = BookingError);
client_method!(BookingClient => fn clear_location(field: LocationField) -> () as BookingRequest::ClearLocation, Error = BookingError);
client_method!(BookingClient => fn select_ride(ride_type_id: String) -> Option<Fare> as BookingRequest::SelectRide, Error = BookingError);
client_method!(BookingClient => fn set_timing(timing: RideTiming) -> () as BookingRequest::SetTiming, Error = BookingError);
client_method!(BookingClient => fn update_route(route: RouteInfo) -> () as BookingRequest::UpdateRoute, Error = BookingError);
client_method!(BookingClient => fn submit() -> SubmitOutcome as BookingRequest::Submit, Error = BookingError);
client_method!(BookingClient => fn proceed_to_payment() -> Order as BookingRequest::ProceedToPayment, Error = BookingError);
client_method!(BookingClient => fn back_to_selecting() -> () as BookingRequest::BackToSelecting, Error = BookingError);
client_method!(BookingClient => fn cancel_payment() -> Order as BookingRequest::CancelPayment, Error = BookingError);
client_method!(BookingClient => fn snapshot() -> BookingSnapshot as BookingRequest::Snapshot, Error = BookingError);
client_method!(BookingClient => fn suggestions(field: LocationField) -> SuggestionState as BookingRequest::Suggestions, Error = BookingError);
client_method!(BookingClient => fn history() -> Vec<OrderHistoryEntry> as BookingRequest::History, Error = BookingError);
client_method!(BookingClient => fn sign_out() -> () as BookingRequest::SignOut, Error = BookingError);
