use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tracing::{error, info, warn, Instrument};

use ride_booking::app_system::{setup_tracing, BookingConfig, BookingSystem};
use ride_booking::booking::{BookingDeps, BookingEvent, PaymentOutcome, SubmitOutcome};
use ride_booking::clients::BookingClient;
use ride_booking::domain::{LocationField, RouteInfo};
use ride_booking::history::FilePersistence;

/// Types a query, waits for suggestions, and picks the first one.
async fn choose_location(
    client: &BookingClient,
    field: LocationField,
    query: &str,
    settle: Duration,
) -> Result<(), String> {
    client
        .set_location(field, query.to_string())
        .await
        .map_err(|e| e.to_string())?;
    tokio::time::sleep(settle).await;

    let state = client.suggestions(field).await.map_err(|e| e.to_string())?;
    match state.suggestions().first() {
        Some(suggestion) => {
            info!(%field, choice = %suggestion.text, "Picking suggestion");
            client
                .select_suggestion(field, suggestion.clone())
                .await
                .map_err(|e| e.to_string())
        }
        None => {
            warn!(%field, query, "No suggestions, keeping typed text");
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = BookingConfig::from_env();
    info!(data_dir = %config.data_dir.display(), "Starting ride booking demo");

    let settle = config.suggestions.debounce + Duration::from_millis(150);
    let persistence = Arc::new(FilePersistence::new(config.data_dir.clone()));
    let deps = BookingDeps::offline(&config);
    let system = BookingSystem::start(config, persistence, deps).await;
    let client = system.booking_client.clone();

    let mut events = client.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            if let BookingEvent::OrderCompleted(entry) = event {
                info!(order_id = %entry.id(), driver = %entry.driver_name, "Ride booked");
            }
        }
    });

    let span = tracing::info_span!("booking_flow");
    let result = async {
        choose_location(&client, LocationField::Pickup, "Kimironko", settle).await?;
        choose_location(&client, LocationField::Dropoff, "Nyabugogo", settle).await?;

        let preview = client
            .select_ride("economy".to_string())
            .await
            .map_err(|e| e.to_string())?;
        if let Some(fare) = preview {
            info!(%fare, "Price before routing");
        }
        client
            .update_route(RouteInfo::new(6.0, 18.0))
            .await
            .map_err(|e| e.to_string())?;

        let order = match client.submit().await.map_err(|e| e.to_string())? {
            SubmitOutcome::Confirmed(order) => order,
            SubmitOutcome::Rejected(errors) => {
                return Err(format!("Booking rejected: {:?}", errors));
            }
            SubmitOutcome::Ignored => return Err("Submission ignored".to_string()),
        };
        info!(order_id = %order.id, price = %order.price, "Order confirmed");

        client
            .proceed_to_payment()
            .await
            .map_err(|e| e.to_string())?;
        let details = json!({ "method": "mobile_money", "phone": "+250788123456" });
        match client.pay(details).await.map_err(|e| e.to_string())? {
            PaymentOutcome::Completed(entry) => {
                info!(price = %entry.order.price, "Payment completed")
            }
            PaymentOutcome::Failed(e) => error!(error = %e, "Payment failed"),
            PaymentOutcome::Ignored => warn!("Payment ignored"),
        }

        let history = client.history().await.map_err(|e| e.to_string())?;
        info!(orders = history.len(), "Order history");
        Ok::<(), String>(())
    }
    .instrument(span)
    .await;

    if let Err(e) = &result {
        error!(error = %e, "Booking flow failed");
    }

    system.shutdown().await.map_err(|e| e.to_string())?;
    info!("Application completed successfully");
    result
}
