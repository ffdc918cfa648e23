use std::time::Duration;
use thiserror::Error;

use crate::booking::WorkflowStep;

/// Failure of a suggestion or route lookup. Cancellation is never one of these.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum NetworkError {
    #[error("Lookup request failed: {0}")]
    Request(String),
    #[error("Lookup returned an invalid response: {0}")]
    InvalidResponse(String),
    #[error("Lookup timed out after {0:?}")]
    Timeout(Duration),
}

impl NetworkError {
    /// Banner text shown to the user while the field stays editable.
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::Timeout(_) => "Location service is taking too long. Try again.",
            _ => "Failed to load suggestions. Try again.",
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PaymentError {
    #[error("Payment declined: {0}")]
    Declined(String),
    #[error("Payment gateway error: {0}")]
    Gateway(String),
    #[error("Payment timed out after {0:?}")]
    Timeout(Duration),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PersistenceError {
    #[error("Storage I/O error: {0}")]
    Io(String),
    #[error("Storage serialization error: {0}")]
    Serialization(String),
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

impl From<std::io::Error> for PersistenceError {
    fn from(e: std::io::Error) -> Self {
        PersistenceError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(e: serde_json::Error) -> Self {
        PersistenceError::Serialization(e.to_string())
    }
}

/// Errors for requests the workflow cannot accept in its current state.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BookingError {
    #[error("Cannot {action} while {from:?}")]
    InvalidTransition { from: WorkflowStep, action: &'static str },
    #[error("Unknown ride type: {0}")]
    UnknownRideType(String),
    #[error("A submission is already in progress")]
    SubmissionInProgress,
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
