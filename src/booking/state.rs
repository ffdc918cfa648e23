use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use super::ValidationErrors;
use crate::domain::{Fare, LocationField, Order, OrderHistoryEntry, RideTiming, RouteInfo};
use crate::error::PaymentError;

const DATE_FORMAT: &str = "%B %-d, %Y";
const NOW_TIME_FORMAT: &str = "%I:%M %p";
const SCHEDULED_TIME_FORMAT: &str = "%-I:%M %p";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WorkflowStep {
    Selecting,
    Confirmed,
    AwaitingPayment,
    Completed,
}

impl std::fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            WorkflowStep::Selecting => "selecting",
            WorkflowStep::Confirmed => "confirmed",
            WorkflowStep::AwaitingPayment => "awaitingPayment",
            WorkflowStep::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// Workflow state as held by the service. Confirmed and later steps own the pending order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Workflow {
    Selecting,
    Confirmed(Order),
    AwaitingPayment(Order),
    Completed(Order),
}

impl Workflow {
    pub(crate) fn step(&self) -> WorkflowStep {
        match self {
            Workflow::Selecting => WorkflowStep::Selecting,
            Workflow::Confirmed(_) => WorkflowStep::Confirmed,
            Workflow::AwaitingPayment(_) => WorkflowStep::AwaitingPayment,
            Workflow::Completed(_) => WorkflowStep::Completed,
        }
    }

    pub(crate) fn order(&self) -> Option<&Order> {
        match self {
            Workflow::Selecting => None,
            Workflow::Confirmed(order)
            | Workflow::AwaitingPayment(order)
            | Workflow::Completed(order) => Some(order),
        }
    }
}

/// The booking form as the user has filled it in so far.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingForm {
    pub pickup: String,
    pub dropoff: String,
    pub ride_type: Option<String>,
    pub timing: RideTiming,
}

impl BookingForm {
    pub fn location(&self, field: LocationField) -> &str {
        match field {
            LocationField::Pickup => &self.pickup,
            LocationField::Dropoff => &self.dropoff,
        }
    }

    pub fn set_location(&mut self, field: LocationField, text: String) {
        match field {
            LocationField::Pickup => self.pickup = text,
            LocationField::Dropoff => self.dropoff = text,
        }
    }

    pub fn has_both_locations(&self) -> bool {
        !self.pickup.trim().is_empty() && !self.dropoff.trim().is_empty()
    }
}

/// Point-in-time view of the workflow, published on every change.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSnapshot {
    pub step: WorkflowStep,
    pub form: BookingForm,
    pub route: Option<RouteInfo>,
    /// Live price preview for the selected ride while selecting.
    pub quote: Option<Fare>,
    pub order: Option<Order>,
    pub submitting: bool,
    pub route_error: Option<String>,
    pub payment_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Confirmed(Order),
    Rejected(ValidationErrors),
    /// Another submission was already in flight.
    Ignored,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaymentOutcome {
    Completed(OrderHistoryEntry),
    Failed(PaymentError),
    Ignored,
}

/// Display date and time for an order, in the zone of `now`. Immediate rides use
/// the creation instant.
pub fn display_stamp(timing: &RideTiming, now: DateTime<FixedOffset>) -> (String, String) {
    let today = now.format(DATE_FORMAT).to_string();
    let current_time = now.format(NOW_TIME_FORMAT).to_string();

    match timing {
        RideTiming::Now => (today, current_time),
        RideTiming::Scheduled { date, time } => (
            date.map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or(today),
            time.map(|t| t.format(SCHEDULED_TIME_FORMAT).to_string())
                .unwrap_or(current_time),
        ),
    }
}
