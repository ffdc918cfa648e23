//! The booking workflow: validation, order creation, payment handoff and completion.

mod clock;
mod events;
mod payment;
mod routing;
mod service;
mod state;
mod trip_details;
mod validation;

pub use clock::*;
pub use events::*;
pub use payment::*;
pub use routing::*;
pub use service::*;
pub use state::*;
pub use trip_details::*;
pub use validation::*;
