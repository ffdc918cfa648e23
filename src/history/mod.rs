//! Durable order history and the key-value port it is written through.

mod persistence;
mod store;

pub use persistence::*;
pub use store::*;
