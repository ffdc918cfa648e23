use serde::{Deserialize, Serialize};

/// The two location inputs of the booking form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LocationField {
    Pickup,
    Dropoff,
}

impl std::fmt::Display for LocationField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationField::Pickup => write!(f, "pickup"),
            LocationField::Dropoff => write!(f, "dropoff"),
        }
    }
}

/// Text typed into a location field, tagged with the sequence number it was issued under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationQuery {
    pub text: String,
    pub seq: u64,
}

impl LocationQuery {
    pub fn new(text: impl Into<String>, seq: u64) -> Self {
        Self {
            text: text.into(),
            seq,
        }
    }
}

/// An address suggestion. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl Suggestion {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            key: None,
        }
    }

    pub fn with_key(text: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            key: Some(key.into()),
        }
    }
}
