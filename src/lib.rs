//! Ride-booking orchestration engine.
//!
//! A single [`booking::BookingService`] actor owns the booking workflow:
//! debounced location suggestions, ride selection and fare quotes, order
//! confirmation, the payment handoff, and the persisted order history.
//! Callers talk to it through a cloneable [`clients::BookingClient`] and
//! observe it through broadcast [`booking::BookingEvent`]s.
//!
//! [`app_system::BookingSystem`] wires the service to its collaborators and
//! handles startup and shutdown.

pub mod app_system;
pub mod booking;
pub mod clients;
pub mod domain;
pub mod error;
pub mod fare;
pub mod history;
pub mod messages;
pub mod suggestion;

#[cfg(test)]
mod mock_framework;
