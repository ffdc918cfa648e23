use tokio::sync::oneshot;

use crate::booking::{BookingSnapshot, PaymentOutcome, SubmitOutcome};
use crate::domain::{
    Fare, LocationField, Order, OrderHistoryEntry, RideTiming, RouteInfo, Suggestion, UserRecord,
};
use crate::error::BookingError;
use crate::suggestion::SuggestionState;

/// Generic type aliases for service communication
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

/// Requests accepted by the booking service. Each carries a oneshot channel for the reply.
#[derive(Debug)]
pub enum BookingRequest {
    SetLocation {
        field: LocationField,
        text: String,
        respond_to: ServiceResponse<(), BookingError>,
    },
    SelectSuggestion {
        field: LocationField,
        suggestion: Suggestion,
        respond_to: ServiceResponse<(), BookingError>,
    },
    ClearLocation {
        field: LocationField,
        respond_to: ServiceResponse<(), BookingError>,
    },
    SelectRide {
        ride_type_id: String,
        respond_to: ServiceResponse<Option<Fare>, BookingError>,
    },
    SetTiming {
        timing: RideTiming,
        respond_to: ServiceResponse<(), BookingError>,
    },
    UpdateRoute {
        route: RouteInfo,
        respond_to: ServiceResponse<(), BookingError>,
    },
    Submit {
        respond_to: ServiceResponse<SubmitOutcome, BookingError>,
    },
    ProceedToPayment {
        respond_to: ServiceResponse<Order, BookingError>,
    },
    BackToSelecting {
        respond_to: ServiceResponse<(), BookingError>,
    },
    Pay {
        details: serde_json::Value,
        respond_to: ServiceResponse<PaymentOutcome, BookingError>,
    },
    CancelPayment {
        respond_to: ServiceResponse<Order, BookingError>,
    },
    Snapshot {
        respond_to: ServiceResponse<BookingSnapshot, BookingError>,
    },
    Suggestions {
        field: LocationField,
        respond_to: ServiceResponse<SuggestionState, BookingError>,
    },
    History {
        respond_to: ServiceResponse<Vec<OrderHistoryEntry>, BookingError>,
    },
    SignIn {
        user: UserRecord,
        respond_to: ServiceResponse<(), BookingError>,
    },
    SignOut {
        respond_to: ServiceResponse<(), BookingError>,
    },
    Shutdown,
}
