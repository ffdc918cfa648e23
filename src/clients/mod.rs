//! Cloneable handles for talking to the service actors.

mod booking_client;
mod macros;

pub use booking_client::*;
