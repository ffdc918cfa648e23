//! # Mock Framework
//!
//! Utilities for testing clients and services in isolation.
//!
//! Use [`create_mock_client`] to get a client and a receiver, then helpers like
//! [`expect_submit`] to assert what the client sent. The fakes below stand in for
//! the external collaborators: suggestions, payments, routing, storage and time.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;

use crate::booking::{
    BookingDeps, Clock, PaymentConfirmation, PaymentGateway, RouteProvider, SeededTripDetails,
    SubmitOutcome,
};
use crate::clients::BookingClient;
use crate::domain::{
    Fare, Order, OrderHistoryEntry, OrderStatus, RideCatalog, RouteInfo, Suggestion, TripDetails,
};
use crate::error::{BookingError, NetworkError, PaymentError, PersistenceError};
use crate::history::PersistencePort;
use crate::messages::{BookingRequest, ServiceResponse};
use crate::suggestion::SuggestionBackend;

// ---- client mocks ----

/// Creates a client whose requests land on a receiver the test controls.
pub fn create_mock_client(buffer_size: usize) -> (BookingClient, mpsc::Receiver<BookingRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    let (events, _) = broadcast::channel(16);
    (BookingClient::new(sender, events), receiver)
}

/// Helper to verify that the next message is a Submit request
pub async fn expect_submit(
    receiver: &mut mpsc::Receiver<BookingRequest>,
) -> Option<ServiceResponse<SubmitOutcome, BookingError>> {
    match receiver.recv().await {
        Some(BookingRequest::Submit { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Helper to verify that the next message is a SelectRide request
pub async fn expect_select_ride(
    receiver: &mut mpsc::Receiver<BookingRequest>,
) -> Option<(String, ServiceResponse<Option<Fare>, BookingError>)> {
    match receiver.recv().await {
        Some(BookingRequest::SelectRide {
            ride_type_id,
            respond_to,
        }) => Some((ride_type_id, respond_to)),
        _ => None,
    }
}

// ---- suggestion backend ----

enum Script {
    Return(Vec<Suggestion>),
    Fail,
    Delay(Duration),
}

/// Suggestion backend that records every query and answers from a script.
/// Unscripted queries get [`RecordingBackend::suggestions_for`].
#[derive(Default)]
pub struct RecordingBackend {
    calls: Mutex<Vec<String>>,
    scripts: HashMap<String, Script>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn suggestions_for(query: &str) -> Vec<Suggestion> {
        vec![
            Suggestion::with_key(format!("{}, Gasabo", query), format!("{}-1", query)),
            Suggestion::with_key(format!("{}, Nyarugenge", query), format!("{}-2", query)),
        ]
    }

    pub fn returning(mut self, query: &str, suggestions: Vec<Suggestion>) -> Self {
        self.scripts
            .insert(query.to_string(), Script::Return(suggestions));
        self
    }

    pub fn returning_nothing(self, query: &str) -> Self {
        self.returning(query, Vec::new())
    }

    pub fn failing(mut self, query: &str) -> Self {
        self.scripts.insert(query.to_string(), Script::Fail);
        self
    }

    pub fn with_delay(mut self, query: &str, delay: Duration) -> Self {
        self.scripts.insert(query.to_string(), Script::Delay(delay));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SuggestionBackend for RecordingBackend {
    async fn suggest(
        &self,
        query: &str,
        _cancel: CancellationToken,
    ) -> Result<Vec<Suggestion>, NetworkError> {
        self.calls.lock().unwrap().push(query.to_string());
        match self.scripts.get(query) {
            Some(Script::Return(list)) => Ok(list.clone()),
            Some(Script::Fail) => Err(NetworkError::Request("connection reset".to_string())),
            Some(Script::Delay(delay)) => {
                tokio::time::sleep(*delay).await;
                Ok(Self::suggestions_for(query))
            }
            None => Ok(Self::suggestions_for(query)),
        }
    }
}

// ---- payments ----

/// Payment gateway that replays scripted answers in order, then accepts.
#[derive(Default)]
pub struct ScriptedPaymentGateway {
    answers: Mutex<VecDeque<Result<PaymentConfirmation, PaymentError>>>,
    delay: Duration,
    calls: AtomicUsize,
}

impl ScriptedPaymentGateway {
    pub fn accepting() -> Self {
        Self::default()
    }

    pub fn then(self, answer: Result<PaymentConfirmation, PaymentError>) -> Self {
        self.answers.lock().unwrap().push_back(answer);
        self
    }

    pub fn declining_once(self) -> Self {
        self.then(Ok(PaymentConfirmation {
            success: false,
            record: json!({ "reason": "insufficient funds" }),
        }))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentGateway for ScriptedPaymentGateway {
    async fn confirm(
        &self,
        order: &Order,
        details: serde_json::Value,
    ) -> Result<PaymentConfirmation, PaymentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let scripted = self.answers.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| {
            Ok(PaymentConfirmation {
                success: true,
                record: json!({ "orderId": order.id, "details": details }),
            })
        })
    }
}

// ---- routing ----

/// Routing collaborator with a fixed answer per pickup text and an optional delay.
#[derive(Default)]
pub struct ScriptedRouteProvider {
    routes: HashMap<String, (RouteInfo, Duration)>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedRouteProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route_from(mut self, pickup: &str, route: RouteInfo, delay: Duration) -> Self {
        self.routes.insert(pickup.to_string(), (route, delay));
        self
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RouteProvider for ScriptedRouteProvider {
    async fn route(&self, pickup: &str, dropoff: &str) -> Result<RouteInfo, NetworkError> {
        self.calls
            .lock()
            .unwrap()
            .push((pickup.to_string(), dropoff.to_string()));
        match self.routes.get(pickup) {
            Some((route, delay)) => {
                tokio::time::sleep(*delay).await;
                Ok(*route)
            }
            None => Err(NetworkError::Request("no route".to_string())),
        }
    }
}

// ---- storage ----

/// Storage where every write fails and nothing is ever stored.
pub struct FailingPersistence;

#[async_trait]
impl PersistencePort for FailingPersistence {
    async fn load(&self, _key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(None)
    }

    async fn save(&self, _key: &str, _value: &str) -> Result<(), PersistenceError> {
        Err(PersistenceError::Io("disk full".to_string()))
    }

    async fn remove(&self, _key: &str) -> Result<(), PersistenceError> {
        Err(PersistenceError::Io("disk full".to_string()))
    }
}

// ---- time and ids ----

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// 2026-10-19 14:05 UTC
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 14, 5, 0).unwrap()
}

pub fn sequential_ids(prefix: &'static str) -> Box<dyn Fn() -> String + Send + Sync> {
    let counter = Arc::new(AtomicU64::new(1));
    Box::new(move || format!("{}_{}", prefix, counter.fetch_add(1, Ordering::SeqCst)))
}

// ---- fixtures ----

/// Deterministic collaborators around the given gateway: recording suggestions,
/// no router, a fixed clock and sequential order ids.
pub fn test_deps(payments: Arc<dyn PaymentGateway>) -> BookingDeps {
    BookingDeps {
        catalog: Arc::new(RideCatalog::default()),
        suggestions: Arc::new(RecordingBackend::new()),
        payments,
        routes: None,
        trip_details: Box::new(SeededTripDetails::new(7)),
        clock: Arc::new(FixedClock(test_now())),
        next_order_id: sequential_ids("order"),
    }
}

pub fn sample_order(id: &str) -> Order {
    Order {
        id: id.to_string(),
        pickup_text: "Kimironko Market, Gasabo".to_string(),
        dropoff_text: "Nyabugogo Bus Park, Nyarugenge".to_string(),
        ride_type_id: "economy".to_string(),
        ride_type_name: "Economy".to_string(),
        price: Fare::Exact { amount: 11_000 },
        date: "October 19, 2026".to_string(),
        time: "02:05 PM".to_string(),
        immediate: true,
        distance_km: Some(6.0),
        duration_minutes: Some(18.0),
        created_at: test_now(),
        status: OrderStatus::Confirmed,
    }
}

pub fn sample_entry(id: &str) -> OrderHistoryEntry {
    OrderHistoryEntry::complete(
        sample_order(id),
        json!({ "method": "mobile_money" }),
        test_now(),
        TripDetails {
            driver_name: "Alice M.".to_string(),
            rating: 4.7,
            duration_label: "18 min".to_string(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client(10);

        let submit_task = tokio::spawn(async move { client.submit().await });

        let responder = expect_submit(&mut receiver)
            .await
            .expect("Expected Submit request");
        responder.send(Ok(SubmitOutcome::Ignored)).unwrap();

        let result = submit_task.await.unwrap();
        assert_eq!(result, Ok(SubmitOutcome::Ignored));
    }

    #[tokio::test]
    async fn scripted_gateway_replays_then_accepts() {
        let gateway = ScriptedPaymentGateway::accepting().declining_once();
        let order = sample_order("order_1");

        let first = gateway.confirm(&order, json!({})).await.unwrap();
        let second = gateway.confirm(&order, json!({})).await.unwrap();

        assert!(!first.success);
        assert!(second.success);
        assert_eq!(gateway.calls(), 2);
    }
}
