use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

use super::{PersistencePort, CURRENT_USER_KEY, ORDER_HISTORY_KEY, USER_RECORDS_KEY};
use crate::domain::{OrderHistoryEntry, UserRecord};
use crate::error::PersistenceError;

/// Completed orders, newest first, written through a [`PersistencePort`].
///
/// The in-memory list is authoritative for the session. Every append rewrites the
/// whole snapshot; a failed write is logged and counted, never surfaced to the user.
pub struct OrderHistoryStore {
    port: Arc<dyn PersistencePort>,
    entries: Vec<OrderHistoryEntry>,
    current_user: Option<UserRecord>,
    failed_writes: usize,
}

impl OrderHistoryStore {
    /// Reads the persisted history and current user. Absent or unreadable values start empty.
    #[instrument(name = "history_load", skip(port))]
    pub async fn load(port: Arc<dyn PersistencePort>) -> Self {
        let entries = match read_json::<Vec<OrderHistoryEntry>>(port.as_ref(), ORDER_HISTORY_KEY).await {
            Ok(entries) => entries.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "Stored order history is unreadable, starting empty");
                Vec::new()
            }
        };
        let current_user = match read_json::<UserRecord>(port.as_ref(), CURRENT_USER_KEY).await {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "Stored user record is unreadable, ignoring it");
                None
            }
        };

        info!(
            entries = entries.len(),
            signed_in = current_user.is_some(),
            "Order history loaded"
        );
        Self {
            port,
            entries,
            current_user,
            failed_writes: 0,
        }
    }

    pub fn entries(&self) -> &[OrderHistoryEntry] {
        &self.entries
    }

    pub fn current_user(&self) -> Option<&UserRecord> {
        self.current_user.as_ref()
    }

    /// Number of writes that failed this session.
    pub fn failed_writes(&self) -> usize {
        self.failed_writes
    }

    /// Prepends `entry`, persists the full list, and mirrors it into the signed-in user.
    #[instrument(skip(self, entry), fields(order_id = %entry.id()))]
    pub async fn append(&mut self, entry: OrderHistoryEntry) -> &[OrderHistoryEntry] {
        self.entries.insert(0, entry.clone());

        let written = write_json(self.port.as_ref(), ORDER_HISTORY_KEY, &self.entries).await;
        if let Err(e) = written {
            self.report_failure(ORDER_HISTORY_KEY, &e);
        }
        let mirrored = self.mirror_into_user(entry).await;
        if let Err(e) = mirrored {
            self.report_failure(USER_RECORDS_KEY, &e);
        }

        debug!(entries = self.entries.len(), "History appended");
        &self.entries
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn sign_in(&mut self, user: UserRecord) {
        let written = write_json(self.port.as_ref(), CURRENT_USER_KEY, &user).await;
        if let Err(e) = written {
            self.report_failure(CURRENT_USER_KEY, &e);
        }
        info!("User signed in");
        self.current_user = Some(user);
    }

    #[instrument(skip(self))]
    pub async fn sign_out(&mut self) {
        let removed = self.port.remove(CURRENT_USER_KEY).await;
        if let Err(e) = removed {
            self.report_failure(CURRENT_USER_KEY, &e);
        }
        if self.current_user.take().is_some() {
            info!("User signed out");
        }
    }

    async fn mirror_into_user(&mut self, entry: OrderHistoryEntry) -> Result<(), PersistenceError> {
        let Some(user) = self.current_user.as_mut() else {
            return Ok(());
        };
        user.order_history.insert(0, entry.clone());
        let user = user.clone();

        let mut records = read_json::<Vec<UserRecord>>(self.port.as_ref(), USER_RECORDS_KEY)
            .await?
            .unwrap_or_default();
        match records.iter_mut().find(|r| r.id == user.id) {
            Some(record) => record.order_history.insert(0, entry),
            None => records.push(user.clone()),
        }

        write_json(self.port.as_ref(), USER_RECORDS_KEY, &records).await?;
        write_json(self.port.as_ref(), CURRENT_USER_KEY, &user).await
    }

    fn report_failure(&mut self, key: &str, e: &PersistenceError) {
        self.failed_writes += 1;
        error!(key, error = %e, "Failed to persist, keeping in-memory state");
    }
}

async fn read_json<T: DeserializeOwned>(
    port: &dyn PersistencePort,
    key: &str,
) -> Result<Option<T>, PersistenceError> {
    match port.load(key).await? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

async fn write_json<T: Serialize + ?Sized>(
    port: &dyn PersistencePort,
    key: &str,
    value: &T,
) -> Result<(), PersistenceError> {
    let raw = serde_json::to_string(value)?;
    port.save(key, &raw).await
}
