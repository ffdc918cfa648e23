use super::{BookingSnapshot, ValidationErrors};
use crate::domain::{LocationField, OrderHistoryEntry};
use crate::suggestion::SuggestionState;

/// Notifications broadcast to the presentation layer.
#[derive(Debug, Clone)]
pub enum BookingEvent {
    WorkflowChanged(BookingSnapshot),
    ValidationChanged(ValidationErrors),
    SuggestionsChanged {
        field: LocationField,
        state: SuggestionState,
    },
    OrderCompleted(OrderHistoryEntry),
}
