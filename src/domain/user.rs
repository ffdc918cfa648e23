use serde::{Deserialize, Serialize};

use super::OrderHistoryEntry;

/// A signed-in user, as kept in local storage. Owned by the account screens;
/// the booking core only mirrors completed orders into `order_history`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub order_history: Vec<OrderHistoryEntry>,
}

impl UserRecord {
    pub fn new(id: impl Into<String>, full_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            full_name: full_name.into(),
            email: email.into(),
            phone_number: String::new(),
            is_verified: false,
            order_history: Vec::new(),
        }
    }
}
