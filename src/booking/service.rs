use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{broadcast, mpsc};
use tokio::time::{sleep, timeout};
use tracing::{debug, info, instrument, warn};

use super::{
    display_stamp, validate, BookingEvent, BookingForm, BookingSnapshot, Clock, FormField,
    PaymentConfirmation, PaymentGateway, PaymentOutcome, RouteProvider, SeededTripDetails,
    SimulatedPaymentGateway, SubmitOutcome, SystemClock, TripDetailsGenerator, ValidationErrors,
    Workflow, WorkflowStep, ZonedClock,
};
use crate::app_system::BookingConfig;
use crate::clients::BookingClient;
use crate::domain::{
    Fare, LocationField, Order, OrderHistoryEntry, OrderStatus, RideCatalog, RideTiming,
    RouteInfo, Suggestion,
};
use crate::error::{BookingError, NetworkError, PaymentError};
use crate::fare::FareEngine;
use crate::history::OrderHistoryStore;
use crate::messages::{BookingRequest, ServiceResponse};
use crate::suggestion::{
    StaticSuggestionBackend, SuggestionBackend, SuggestionClient, SuggestionDelivery,
    SuggestionField,
};

const ROUTE_ERROR_MESSAGE: &str = "Unable to calculate route. Try again.";
const EVENT_BUFFER: usize = 64;

/// Macro for clean error response handling
macro_rules! send_error {
    ($respond_to:expr, $error:expr) => {{
        let _ = $respond_to.send(Err($error));
        return;
    }};
}

/// External collaborators the booking service talks to.
pub struct BookingDeps {
    pub catalog: Arc<RideCatalog>,
    pub suggestions: Arc<dyn SuggestionBackend>,
    pub payments: Arc<dyn PaymentGateway>,
    /// Without a provider, routes only arrive through `update_route`.
    pub routes: Option<Arc<dyn RouteProvider>>,
    pub trip_details: Box<dyn TripDetailsGenerator>,
    pub clock: Arc<dyn Clock>,
    pub next_order_id: Box<dyn Fn() -> String + Send + Sync>,
}

impl BookingDeps {
    /// Local stand-ins: static Kigali suggestions, an always-accepting gateway and no router.
    pub fn offline(config: &BookingConfig) -> Self {
        let trip_details = match config.trip_seed {
            Some(seed) => SeededTripDetails::new(seed),
            None => SeededTripDetails::from_entropy(),
        };
        let clock: Arc<dyn Clock> = match config.utc_offset {
            Some(offset) => Arc::new(ZonedClock::new(SystemClock, offset)),
            None => Arc::new(SystemClock),
        };
        Self {
            catalog: Arc::new(RideCatalog::default()),
            suggestions: Arc::new(StaticSuggestionBackend::default()),
            payments: Arc::new(SimulatedPaymentGateway::default()),
            routes: None,
            trip_details: Box::new(trip_details),
            clock,
            next_order_id: Box::new(|| uuid::Uuid::new_v4().to_string()),
        }
    }
}

/// Results of work the service spawned, fed back into its own loop.
enum Completion {
    Route {
        seq: u64,
        result: Result<RouteInfo, NetworkError>,
    },
    Submitted {
        order: Order,
        respond_to: ServiceResponse<SubmitOutcome, BookingError>,
    },
    PaymentSettled {
        order_id: String,
        result: Result<PaymentConfirmation, PaymentError>,
        respond_to: ServiceResponse<PaymentOutcome, BookingError>,
    },
}

/// Owns the booking workflow. All state changes happen on this actor's task;
/// lookups, submissions and payments run on spawned tasks and report back
/// through internal channels.
pub struct BookingService {
    receiver: mpsc::Receiver<BookingRequest>,
    deliveries: mpsc::UnboundedReceiver<SuggestionDelivery>,
    delivery_tx: mpsc::UnboundedSender<SuggestionDelivery>,
    completions: mpsc::UnboundedReceiver<Completion>,
    completion_tx: mpsc::UnboundedSender<Completion>,
    events: broadcast::Sender<BookingEvent>,

    config: BookingConfig,
    fares: FareEngine,
    pickup: SuggestionField,
    dropoff: SuggestionField,
    routes: Option<Arc<dyn RouteProvider>>,
    payments: Arc<dyn PaymentGateway>,
    trip_details: Box<dyn TripDetailsGenerator>,
    clock: Arc<dyn Clock>,
    next_order_id: Box<dyn Fn() -> String + Send + Sync>,
    history: OrderHistoryStore,

    form: BookingForm,
    route: Option<RouteInfo>,
    route_seq: u64,
    route_error: Option<String>,
    quote: Option<Fare>,
    errors: ValidationErrors,
    workflow: Workflow,
    payment_error: Option<String>,
    in_progress: bool,
}

impl BookingService {
    pub fn new(
        config: BookingConfig,
        deps: BookingDeps,
        history: OrderHistoryStore,
    ) -> (Self, BookingClient) {
        let (sender, receiver) = mpsc::channel(config.channel_size);
        let (delivery_tx, deliveries) = mpsc::unbounded_channel();
        let (completion_tx, completions) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(EVENT_BUFFER);

        let lookups = SuggestionClient::new(deps.suggestions, config.suggestions);
        let service = Self {
            receiver,
            deliveries,
            delivery_tx,
            completions,
            completion_tx,
            events: events.clone(),
            fares: FareEngine::new(deps.catalog, config.fares),
            pickup: SuggestionField::new(LocationField::Pickup, lookups.clone()),
            dropoff: SuggestionField::new(LocationField::Dropoff, lookups),
            routes: deps.routes,
            payments: deps.payments,
            trip_details: deps.trip_details,
            clock: deps.clock,
            next_order_id: deps.next_order_id,
            history,
            config,
            form: BookingForm::default(),
            route: None,
            route_seq: 0,
            route_error: None,
            quote: None,
            errors: ValidationErrors::default(),
            workflow: Workflow::Selecting,
            payment_error: None,
            in_progress: false,
        };
        let client = BookingClient::new(sender, events);
        (service, client)
    }

    #[instrument(name = "booking_service", skip(self))]
    pub async fn run(mut self) {
        info!("BookingService starting");

        loop {
            tokio::select! {
                msg = self.receiver.recv() => {
                    let Some(msg) = msg else { break };
                    match msg {
                        BookingRequest::SetLocation { field, text, respond_to } => {
                            self.handle_set_location(field, text, respond_to);
                        }
                        BookingRequest::SelectSuggestion { field, suggestion, respond_to } => {
                            self.handle_select_suggestion(field, suggestion, respond_to);
                        }
                        BookingRequest::ClearLocation { field, respond_to } => {
                            self.handle_clear_location(field, respond_to);
                        }
                        BookingRequest::SelectRide { ride_type_id, respond_to } => {
                            self.handle_select_ride(ride_type_id, respond_to);
                        }
                        BookingRequest::SetTiming { timing, respond_to } => {
                            self.handle_set_timing(timing, respond_to);
                        }
                        BookingRequest::UpdateRoute { route, respond_to } => {
                            self.route_seq += 1;
                            self.apply_route(route);
                            let _ = respond_to.send(Ok(()));
                        }
                        BookingRequest::Submit { respond_to } => {
                            self.handle_submit(respond_to);
                        }
                        BookingRequest::ProceedToPayment { respond_to } => {
                            self.handle_proceed_to_payment(respond_to);
                        }
                        BookingRequest::BackToSelecting { respond_to } => {
                            self.handle_back_to_selecting(respond_to);
                        }
                        BookingRequest::Pay { details, respond_to } => {
                            self.handle_pay(details, respond_to);
                        }
                        BookingRequest::CancelPayment { respond_to } => {
                            self.handle_cancel_payment(respond_to);
                        }
                        BookingRequest::Snapshot { respond_to } => {
                            let _ = respond_to.send(Ok(self.snapshot()));
                        }
                        BookingRequest::Suggestions { field, respond_to } => {
                            let state = self.field(field).state().clone();
                            let _ = respond_to.send(Ok(state));
                        }
                        BookingRequest::History { respond_to } => {
                            let _ = respond_to.send(Ok(self.history.entries().to_vec()));
                        }
                        BookingRequest::SignIn { user, respond_to } => {
                            self.history.sign_in(user).await;
                            let _ = respond_to.send(Ok(()));
                        }
                        BookingRequest::SignOut { respond_to } => {
                            self.history.sign_out().await;
                            let _ = respond_to.send(Ok(()));
                        }
                        BookingRequest::Shutdown => {
                            info!("BookingService shutting down");
                            break;
                        }
                    }
                }
                Some(delivery) = self.deliveries.recv() => {
                    self.handle_suggestions(delivery);
                }
                Some(done) = self.completions.recv() => {
                    match done {
                        Completion::Route { seq, result } => self.handle_route_resolved(seq, result),
                        Completion::Submitted { order, respond_to } => {
                            self.handle_submitted(order, respond_to);
                        }
                        Completion::PaymentSettled { order_id, result, respond_to } => {
                            self.handle_payment_settled(order_id, result, respond_to).await;
                        }
                    }
                }
            }
        }

        self.pickup.dismiss();
        self.dropoff.dismiss();
        info!("BookingService stopped");
    }

    // ---- location fields ----

    #[instrument(fields(%field), skip(self, text, respond_to))]
    fn handle_set_location(
        &mut self,
        field: LocationField,
        text: String,
        respond_to: ServiceResponse<(), BookingError>,
    ) {
        if let Err(e) = self.require_editable("edit a location") {
            send_error!(respond_to, e);
        }

        let changed = match field {
            LocationField::Pickup => self.pickup.input(&text, &self.delivery_tx),
            LocationField::Dropoff => self.dropoff.input(&text, &self.delivery_tx),
        };
        self.form.set_location(field, text);
        if changed {
            self.emit_suggestions(field);
        }
        self.clear_error(field.into());
        self.invalidate_route();
        self.emit_snapshot();

        let _ = respond_to.send(Ok(()));
    }

    #[instrument(fields(%field, text = %suggestion.text), skip(self, suggestion, respond_to))]
    fn handle_select_suggestion(
        &mut self,
        field: LocationField,
        suggestion: Suggestion,
        respond_to: ServiceResponse<(), BookingError>,
    ) {
        if let Err(e) = self.require_editable("select a suggestion") {
            send_error!(respond_to, e);
        }

        self.form.set_location(field, suggestion.text);
        if self.field_mut(field).dismiss() {
            self.emit_suggestions(field);
        }
        self.clear_error(field.into());
        self.invalidate_route();
        self.request_route();
        self.emit_snapshot();
        debug!("Suggestion selected");

        let _ = respond_to.send(Ok(()));
    }

    #[instrument(fields(%field), skip(self, respond_to))]
    fn handle_clear_location(
        &mut self,
        field: LocationField,
        respond_to: ServiceResponse<(), BookingError>,
    ) {
        if let Err(e) = self.require_editable("clear a location") {
            send_error!(respond_to, e);
        }

        self.form.set_location(field, String::new());
        if self.field_mut(field).dismiss() {
            self.emit_suggestions(field);
        }
        self.invalidate_route();
        self.emit_snapshot();

        let _ = respond_to.send(Ok(()));
    }

    #[instrument(skip(self, delivery), fields(field = %delivery.field, seq = delivery.seq))]
    fn handle_suggestions(&mut self, delivery: SuggestionDelivery) {
        let field = delivery.field;
        if self.field_mut(field).apply(delivery) {
            self.emit_suggestions(field);
        }
    }

    // ---- ride, timing, route ----

    #[instrument(skip(self, respond_to))]
    fn handle_select_ride(
        &mut self,
        ride_type_id: String,
        respond_to: ServiceResponse<Option<Fare>, BookingError>,
    ) {
        if let Err(e) = self.require_editable("select a ride") {
            send_error!(respond_to, e);
        }
        if !self.fares.catalog().contains(&ride_type_id) {
            warn!("Unknown ride type");
            send_error!(respond_to, BookingError::UnknownRideType(ride_type_id));
        }

        self.form.ride_type = Some(ride_type_id);
        self.clear_error(FormField::Ride);
        self.refresh_quote();
        self.emit_snapshot();

        let _ = respond_to.send(Ok(self.quote));
    }

    #[instrument(skip(self, respond_to))]
    fn handle_set_timing(
        &mut self,
        timing: RideTiming,
        respond_to: ServiceResponse<(), BookingError>,
    ) {
        if let Err(e) = self.require_editable("change the ride time") {
            send_error!(respond_to, e);
        }

        self.form.timing = timing;
        self.clear_error(FormField::ScheduledDate);
        self.clear_error(FormField::ScheduledTime);
        self.emit_snapshot();

        let _ = respond_to.send(Ok(()));
    }

    /// Asks the routing collaborator for a route once both locations are filled in.
    fn request_route(&mut self) {
        let Some(provider) = self.routes.clone() else {
            return;
        };
        if !self.form.has_both_locations() {
            return;
        }

        self.route_seq += 1;
        let seq = self.route_seq;
        let pickup = self.form.pickup.clone();
        let dropoff = self.form.dropoff.clone();
        let limit = self.config.suggestions.lookup_timeout;
        let completions = self.completion_tx.clone();
        debug!(seq, "Requesting route");

        tokio::spawn(async move {
            let result = match timeout(limit, provider.route(&pickup, &dropoff)).await {
                Ok(result) => result,
                Err(_) => Err(NetworkError::Timeout(limit)),
            };
            let _ = completions.send(Completion::Route { seq, result });
        });
    }

    #[instrument(skip(self, result))]
    fn handle_route_resolved(&mut self, seq: u64, result: Result<RouteInfo, NetworkError>) {
        if seq != self.route_seq {
            debug!(seq, latest = self.route_seq, "Discarding stale route");
            return;
        }
        match result {
            Ok(route) => self.apply_route(route),
            Err(e) => {
                warn!(error = %e, "Route lookup failed");
                self.route_error = Some(ROUTE_ERROR_MESSAGE.to_string());
                self.emit_snapshot();
            }
        }
    }

    /// Stores a route. A pending order keeps the price it was confirmed with.
    fn apply_route(&mut self, route: RouteInfo) {
        info!(
            distance_km = route.distance_km,
            duration_minutes = route.duration_minutes,
            "Route updated"
        );
        self.route = Some(route);
        self.route_error = None;
        if self.workflow.step() == WorkflowStep::Selecting {
            self.refresh_quote();
        }
        self.emit_snapshot();
    }

    fn invalidate_route(&mut self) {
        self.route_seq += 1;
        self.route_error = None;
        if self.route.take().is_some() {
            debug!("Route invalidated by location change");
            self.refresh_quote();
        }
    }

    fn refresh_quote(&mut self) {
        self.quote = self
            .form
            .ride_type
            .as_deref()
            .and_then(|id| self.fares.quote(self.route.as_ref(), id));
    }

    // ---- submission ----

    #[instrument(skip(self, respond_to))]
    fn handle_submit(&mut self, respond_to: ServiceResponse<SubmitOutcome, BookingError>) {
        if self.in_progress {
            debug!("Submission already in progress, ignoring");
            let _ = respond_to.send(Ok(SubmitOutcome::Ignored));
            return;
        }
        if let Err(e) = self.require_selecting("submit") {
            send_error!(respond_to, e);
        }

        let today = self.clock.local_now().date_naive();
        let errors = validate(&self.form, self.fares.catalog(), today);
        if !errors.is_empty() {
            info!(error_count = errors.len(), "Booking form rejected");
            self.set_errors(errors.clone());
            let _ = respond_to.send(Ok(SubmitOutcome::Rejected(errors)));
            return;
        }
        self.set_errors(ValidationErrors::default());

        let Some(order) = self.build_order() else {
            let id = self.form.ride_type.clone().unwrap_or_default();
            send_error!(respond_to, BookingError::UnknownRideType(id));
        };

        info!(order_id = %order.id, price = %order.price, "Submitting order");
        self.in_progress = true;
        self.emit_snapshot();

        let latency = self.config.submit_latency;
        let completions = self.completion_tx.clone();
        tokio::spawn(async move {
            if !latency.is_zero() {
                sleep(latency).await;
            }
            let _ = completions.send(Completion::Submitted { order, respond_to });
        });
    }

    #[instrument(fields(order_id = %order.id), skip(self, order, respond_to))]
    fn handle_submitted(
        &mut self,
        order: Order,
        respond_to: ServiceResponse<SubmitOutcome, BookingError>,
    ) {
        self.in_progress = false;
        if self.workflow.step() != WorkflowStep::Selecting {
            warn!("Workflow moved on before submission finished, dropping order");
            let _ = respond_to.send(Ok(SubmitOutcome::Ignored));
            return;
        }

        self.workflow = Workflow::Confirmed(order.clone());
        self.payment_error = None;
        info!(price = %order.price, "Order confirmed");
        self.emit_snapshot();

        let _ = respond_to.send(Ok(SubmitOutcome::Confirmed(order)));
    }

    fn build_order(&self) -> Option<Order> {
        let ride = self.fares.catalog().get(self.form.ride_type.as_deref()?)?;
        let price = self.fares.quote(self.route.as_ref(), &ride.id)?;
        let local_now = self.clock.local_now();
        let (date, time) = display_stamp(&self.form.timing, local_now);

        Some(Order {
            id: (self.next_order_id)(),
            pickup_text: self.form.pickup.trim().to_string(),
            dropoff_text: self.form.dropoff.trim().to_string(),
            ride_type_id: ride.id.clone(),
            ride_type_name: ride.name.clone(),
            price,
            date,
            time,
            immediate: self.form.timing.is_immediate(),
            distance_km: self.route.map(|r| r.distance_km),
            duration_minutes: self.route.map(|r| r.duration_minutes),
            created_at: local_now.with_timezone(&Utc),
            status: OrderStatus::Confirmed,
        })
    }

    // ---- confirmation and payment ----

    #[instrument(skip(self, respond_to))]
    fn handle_proceed_to_payment(&mut self, respond_to: ServiceResponse<Order, BookingError>) {
        if self.in_progress {
            send_error!(respond_to, BookingError::SubmissionInProgress);
        }
        match std::mem::replace(&mut self.workflow, Workflow::Selecting) {
            Workflow::Confirmed(mut order) => {
                order.status = OrderStatus::Paying;
                info!(order_id = %order.id, "Proceeding to payment");
                self.workflow = Workflow::AwaitingPayment(order.clone());
                self.payment_error = None;
                self.emit_snapshot();
                let _ = respond_to.send(Ok(order));
            }
            other => {
                let from = other.step();
                self.workflow = other;
                send_error!(
                    respond_to,
                    BookingError::InvalidTransition {
                        from,
                        action: "proceed to payment"
                    }
                );
            }
        }
    }

    #[instrument(skip(self, respond_to))]
    fn handle_back_to_selecting(&mut self, respond_to: ServiceResponse<(), BookingError>) {
        if self.in_progress {
            send_error!(respond_to, BookingError::SubmissionInProgress);
        }
        match std::mem::replace(&mut self.workflow, Workflow::Selecting) {
            Workflow::Confirmed(order) => {
                info!(order_id = %order.id, "Pending order discarded");
                self.payment_error = None;
                self.refresh_quote();
                self.emit_snapshot();
                let _ = respond_to.send(Ok(()));
            }
            other => {
                let from = other.step();
                self.workflow = other;
                send_error!(
                    respond_to,
                    BookingError::InvalidTransition {
                        from,
                        action: "go back to selection"
                    }
                );
            }
        }
    }

    #[instrument(skip(self, respond_to))]
    fn handle_cancel_payment(&mut self, respond_to: ServiceResponse<Order, BookingError>) {
        if self.in_progress {
            send_error!(respond_to, BookingError::SubmissionInProgress);
        }
        match std::mem::replace(&mut self.workflow, Workflow::Selecting) {
            Workflow::AwaitingPayment(mut order) => {
                order.status = OrderStatus::Confirmed;
                info!(order_id = %order.id, "Payment cancelled");
                self.workflow = Workflow::Confirmed(order.clone());
                self.payment_error = None;
                self.emit_snapshot();
                let _ = respond_to.send(Ok(order));
            }
            other => {
                let from = other.step();
                self.workflow = other;
                send_error!(
                    respond_to,
                    BookingError::InvalidTransition {
                        from,
                        action: "cancel payment"
                    }
                );
            }
        }
    }

    #[instrument(skip(self, details, respond_to))]
    fn handle_pay(
        &mut self,
        details: serde_json::Value,
        respond_to: ServiceResponse<PaymentOutcome, BookingError>,
    ) {
        if self.in_progress {
            debug!("Payment already in progress, ignoring");
            let _ = respond_to.send(Ok(PaymentOutcome::Ignored));
            return;
        }
        let order = match &self.workflow {
            Workflow::AwaitingPayment(order) => order.clone(),
            other => send_error!(
                respond_to,
                BookingError::InvalidTransition {
                    from: other.step(),
                    action: "pay"
                }
            ),
        };

        info!(order_id = %order.id, price = %order.price, "Submitting payment");
        self.in_progress = true;
        self.payment_error = None;
        self.emit_snapshot();

        let gateway = self.payments.clone();
        let limit = self.config.payment_timeout;
        let completions = self.completion_tx.clone();
        tokio::spawn(async move {
            let result = match timeout(limit, gateway.confirm(&order, details)).await {
                Ok(Ok(confirmation)) if !confirmation.success => Err(PaymentError::Declined(
                    "payment was not successful".to_string(),
                )),
                Ok(result) => result,
                Err(_) => Err(PaymentError::Timeout(limit)),
            };
            let _ = completions.send(Completion::PaymentSettled {
                order_id: order.id,
                result,
                respond_to,
            });
        });
    }

    #[instrument(skip(self, result, respond_to))]
    async fn handle_payment_settled(
        &mut self,
        order_id: String,
        result: Result<PaymentConfirmation, PaymentError>,
        respond_to: ServiceResponse<PaymentOutcome, BookingError>,
    ) {
        self.in_progress = false;
        let mut order = match std::mem::replace(&mut self.workflow, Workflow::Selecting) {
            Workflow::AwaitingPayment(order) if order.id == order_id => order,
            other => {
                warn!("Payment settled for an order that is no longer pending");
                self.workflow = other;
                let _ = respond_to.send(Ok(PaymentOutcome::Ignored));
                return;
            }
        };

        let confirmation = match result {
            Ok(confirmation) => confirmation,
            Err(e) => {
                warn!(error = %e, "Payment failed, returning to confirmation");
                order.status = OrderStatus::Confirmed;
                self.workflow = Workflow::Confirmed(order);
                self.payment_error = Some(e.to_string());
                self.emit_snapshot();
                let _ = respond_to.send(Ok(PaymentOutcome::Failed(e)));
                return;
            }
        };

        let trip = self.trip_details.generate(&order);
        let entry =
            OrderHistoryEntry::complete(order, confirmation.record, self.clock.now(), trip);
        let total = self.history.append(entry.clone()).await.len();
        info!(
            driver = %entry.driver_name,
            history_len = total,
            "Order completed"
        );

        self.workflow = Workflow::Completed(entry.order.clone());
        self.emit_snapshot();
        self.emit(BookingEvent::OrderCompleted(entry.clone()));
        self.reset();

        let _ = respond_to.send(Ok(PaymentOutcome::Completed(entry)));
    }

    /// Returns to an empty form after a completed order.
    fn reset(&mut self) {
        self.form = BookingForm::default();
        self.route = None;
        self.route_seq += 1;
        self.route_error = None;
        self.quote = None;
        self.payment_error = None;
        self.set_errors(ValidationErrors::default());
        for field in [LocationField::Pickup, LocationField::Dropoff] {
            if self.field_mut(field).dismiss() {
                self.emit_suggestions(field);
            }
        }
        self.workflow = Workflow::Selecting;
        self.emit_snapshot();
    }

    // ---- helpers ----

    fn require_selecting(&self, action: &'static str) -> Result<(), BookingError> {
        match self.workflow.step() {
            WorkflowStep::Selecting => Ok(()),
            from => Err(BookingError::InvalidTransition { from, action }),
        }
    }

    /// Form edits are refused while a submission is building an order from the form.
    fn require_editable(&self, action: &'static str) -> Result<(), BookingError> {
        self.require_selecting(action)?;
        if self.in_progress {
            debug!(action, "Form locked while submitting");
            return Err(BookingError::SubmissionInProgress);
        }
        Ok(())
    }

    fn field(&self, field: LocationField) -> &SuggestionField {
        match field {
            LocationField::Pickup => &self.pickup,
            LocationField::Dropoff => &self.dropoff,
        }
    }

    fn field_mut(&mut self, field: LocationField) -> &mut SuggestionField {
        match field {
            LocationField::Pickup => &mut self.pickup,
            LocationField::Dropoff => &mut self.dropoff,
        }
    }

    fn clear_error(&mut self, field: FormField) {
        if self.errors.remove(field) {
            self.emit(BookingEvent::ValidationChanged(self.errors.clone()));
        }
    }

    fn set_errors(&mut self, errors: ValidationErrors) {
        if self.errors != errors {
            self.errors = errors;
            self.emit(BookingEvent::ValidationChanged(self.errors.clone()));
        }
    }

    fn snapshot(&self) -> BookingSnapshot {
        BookingSnapshot {
            step: self.workflow.step(),
            form: self.form.clone(),
            route: self.route,
            quote: self.quote,
            order: self.workflow.order().cloned(),
            submitting: self.in_progress,
            route_error: self.route_error.clone(),
            payment_error: self.payment_error.clone(),
        }
    }

    fn emit_snapshot(&self) {
        self.emit(BookingEvent::WorkflowChanged(self.snapshot()));
    }

    fn emit_suggestions(&self, field: LocationField) {
        self.emit(BookingEvent::SuggestionsChanged {
            field,
            state: self.field(field).state().clone(),
        });
    }

    fn emit(&self, event: BookingEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}
