//! Debounced, cancellable address suggestions for the location fields.

mod client;
mod debounce;
mod field;
mod static_backend;

pub use client::*;
pub use debounce::*;
pub use field::*;
pub use static_backend::*;
