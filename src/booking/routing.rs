use async_trait::async_trait;

use crate::domain::RouteInfo;
use crate::error::NetworkError;

/// Routing collaborator: distance and duration between two resolved locations.
#[async_trait]
pub trait RouteProvider: Send + Sync {
    async fn route(&self, pickup: &str, dropoff: &str) -> Result<RouteInfo, NetworkError>;
}
