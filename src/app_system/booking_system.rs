use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info, instrument};

use super::BookingConfig;
use crate::booking::{BookingDeps, BookingService};
use crate::clients::BookingClient;
use crate::error::BookingError;
use crate::history::{OrderHistoryStore, PersistencePort};

/// Starts the booking service, wires its collaborators, and shuts it down.
pub struct BookingSystem {
    pub booking_client: BookingClient,
    handles: Vec<JoinHandle<()>>,
}

impl BookingSystem {
    /// Loads persisted history, then spawns the booking service.
    #[instrument(name = "booking_system", skip_all)]
    pub async fn start(
        config: BookingConfig,
        persistence: Arc<dyn PersistencePort>,
        deps: BookingDeps,
    ) -> Self {
        info!("Starting booking system");

        let history = OrderHistoryStore::load(persistence).await;
        let (service, booking_client) = BookingService::new(config, deps, history);
        let handles = vec![tokio::spawn(service.run())];

        info!("Booking system started successfully");
        Self {
            booking_client,
            handles,
        }
    }

    #[instrument(skip(self))]
    pub async fn shutdown(self) -> Result<(), BookingError> {
        info!("Shutting down booking system");

        // Other clones may still hold the channel open, so ask explicitly.
        let _ = self.booking_client.shutdown().await;

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = ?e, "Service shutdown error");
                return Err(BookingError::ActorCommunicationError(format!(
                    "Actor task failed: {:?}",
                    e
                )));
            }
        }

        info!("Booking system shutdown complete");
        Ok(())
    }
}
